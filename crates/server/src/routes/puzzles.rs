use axum::{extract::Query, Extension, Json};
use puzzle_engine::{Difficulty, Puzzle, PuzzleFilter, Theme};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PuzzleQuery {
    pub theme: Option<String>,
    pub difficulty: Option<String>,
    pub min_rating: Option<u32>,
    pub max_rating: Option<u32>,
}

impl PuzzleQuery {
    /// Parse the loose query strings ("mate-in-2", "easy") into a filter.
    pub fn to_filter(&self) -> Result<PuzzleFilter, AppError> {
        let theme = self
            .theme
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::parse::<Theme>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let difficulty = self
            .difficulty
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(str::parse::<Difficulty>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if let (Some(min), Some(max)) = (self.min_rating, self.max_rating) {
            if min > max {
                return Err(AppError::BadRequest(format!(
                    "min_rating {min} is above max_rating {max}"
                )));
            }
        }

        Ok(PuzzleFilter {
            theme,
            difficulty,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        })
    }
}

/// Public fields of a puzzle. The solution is never included.
pub fn puzzle_summary(puzzle: &Puzzle) -> JsonValue {
    serde_json::json!({
        "id": puzzle.id,
        "theme": puzzle.theme,
        "theme_label": puzzle.theme.label(),
        "difficulty": puzzle.difficulty,
        "rating": puzzle.rating,
        "points": puzzle.points,
        "title": puzzle.title,
        "description": puzzle.description,
        "hint_count": puzzle.hints.len(),
        "moves_to_find": puzzle.solver_moves(),
    })
}

/// GET /api/puzzles?theme=fork&difficulty=beginner&min_rating=800&max_rating=1200
pub async fn get_puzzles(
    Extension(state): Extension<AppState>,
    Query(params): Query<PuzzleQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let filter = params.to_filter()?;
    let catalog = state.catalog().await;

    let puzzles: Vec<JsonValue> = catalog
        .filter(&filter)
        .iter()
        .map(|p| puzzle_summary(p))
        .collect();
    let themes: Vec<JsonValue> = catalog
        .themes()
        .into_iter()
        .map(|t| serde_json::json!({ "theme": t, "label": t.label() }))
        .collect();

    Ok(Json(serde_json::json!({
        "puzzles": puzzles,
        "total": puzzles.len(),
        "themes": themes,
    })))
}

/// POST /api/admin/catalog/reload
/// Re-read the configured puzzle source. Safe to retry.
pub async fn reload_catalog(
    Extension(state): Extension<AppState>,
) -> Result<Json<JsonValue>, AppError> {
    let report = state.reload_catalog().await?;
    Ok(Json(serde_json::json!({
        "loaded": report.loaded,
        "rejected": report.rejected,
    })))
}
