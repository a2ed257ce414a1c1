use axum::{extract::Path, Extension, Json};
use puzzle_engine::{Phase, Puzzle, Verdict};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::puzzles::{puzzle_summary, PuzzleQuery};
use crate::state::{AppState, Sitting};

fn sitting_view(id: Uuid, sitting: &Sitting) -> JsonValue {
    serde_json::json!({
        "id": id,
        "scoreboard": sitting.scoreboard,
        "session": sitting.engine.snapshot(),
    })
}

/// POST /api/sittings
pub async fn create_sitting(
    Extension(state): Extension<AppState>,
) -> Result<Json<JsonValue>, AppError> {
    let id = state.create_sitting().await;
    let sitting = state.sitting(id).await?;
    let sitting = sitting.lock().await;
    Ok(Json(sitting_view(id, &sitting)))
}

/// GET /api/sittings/{id}
pub async fn get_sitting(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JsonValue>, AppError> {
    let sitting = state.sitting(id).await?;
    let sitting = sitting.lock().await;
    Ok(Json(sitting_view(id, &sitting)))
}

/// DELETE /api/sittings/{id}
pub async fn close_sitting(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JsonValue>, AppError> {
    state.close_sitting(id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pick {
    #[default]
    Random,
    Next,
    Previous,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoadPuzzleBody {
    /// Load this exact puzzle. Takes precedence over `pick`.
    pub puzzle_id: Option<String>,
    #[serde(default)]
    pub pick: Pick,
    /// Only honoured for random picks.
    pub filter: Option<PuzzleQuery>,
}

/// POST /api/sittings/{id}/puzzle
/// Load a puzzle into the sitting, discarding whatever was in progress.
pub async fn load_puzzle(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<LoadPuzzleBody>,
) -> Result<Json<JsonValue>, AppError> {
    let sitting = state.sitting(id).await?;
    let mut sitting = sitting.lock().await;

    let puzzle = match (&body.puzzle_id, body.pick) {
        (Some(puzzle_id), _) => sitting.catalog.get(puzzle_id)?,
        (None, Pick::Next) => sitting.catalog.next_puzzle()?,
        (None, Pick::Previous) => sitting.catalog.previous_puzzle()?,
        (None, Pick::Random) => match &body.filter {
            Some(query) => {
                let filter = query.to_filter()?;
                sitting.catalog.random_matching(&filter)?
            }
            None => sitting.catalog.random_puzzle()?,
        },
    };

    let session = sitting.engine.load(puzzle.clone())?;
    sitting.scoreboard.record_attempt();
    tracing::info!(sitting = %id, puzzle = %puzzle.id, "Puzzle loaded");

    Ok(Json(serde_json::json!({
        "puzzle": puzzle_view(&puzzle),
        "session": session,
        "scoreboard": sitting.scoreboard,
    })))
}

fn puzzle_view(puzzle: &Puzzle) -> JsonValue {
    let mut view = puzzle_summary(puzzle);
    view["starting_position"] = JsonValue::from(puzzle.starting_position.clone());
    view
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
    /// SAN (`Nf3`) or coordinates (`g1f3`).
    pub candidate: String,
}

/// POST /api/sittings/{id}/move
pub async fn submit_move(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MoveBody>,
) -> Result<Json<JsonValue>, AppError> {
    let sitting = state.sitting(id).await?;
    let mut sitting = sitting.lock().await;

    let submission = sitting.engine.submit_move(&body.candidate)?;
    if let Verdict::Solved { .. } = submission.verdict {
        sitting.scoreboard.record(&submission.verdict);
    }

    let mut result = serde_json::to_value(&submission)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    result["snapback"] = JsonValue::from(submission.needs_snapback());
    result["scoreboard"] = serde_json::json!(sitting.scoreboard);
    Ok(Json(result))
}

/// POST /api/sittings/{id}/hint
pub async fn request_hint(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JsonValue>, AppError> {
    let sitting = state.sitting(id).await?;
    let mut sitting = sitting.lock().await;

    let hint = sitting.engine.request_hint()?;
    let hints_used = sitting
        .engine
        .session()
        .map(|s| s.hints_used())
        .unwrap_or_default();

    Ok(Json(serde_json::json!({
        "hint": hint,
        "hints_used": hints_used,
    })))
}

/// POST /api/sittings/{id}/reveal
pub async fn reveal_solution(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JsonValue>, AppError> {
    let sitting = state.sitting(id).await?;
    let mut sitting = sitting.lock().await;

    let was_active = sitting.engine.phase() == Some(Phase::AwaitingPlayerMove);
    let steps = sitting.engine.reveal_solution()?;
    if was_active {
        sitting.scoreboard.record_reveal();
    }

    Ok(Json(serde_json::json!({
        "remaining": steps,
        "phase": sitting.engine.phase(),
        "scoreboard": sitting.scoreboard,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::state_with_sample_catalog;

    async fn new_sitting(state: &AppState) -> Uuid {
        let Json(view) = create_sitting(Extension(state.clone())).await.unwrap();
        view["id"].as_str().unwrap().parse().unwrap()
    }

    async fn load(state: &AppState, id: Uuid, puzzle_id: &str) -> JsonValue {
        let body = LoadPuzzleBody {
            puzzle_id: Some(puzzle_id.to_string()),
            ..Default::default()
        };
        let Json(view) = load_puzzle(Extension(state.clone()), Path(id), Json(body))
            .await
            .unwrap();
        view
    }

    async fn play(state: &AppState, id: Uuid, candidate: &str) -> Result<JsonValue, AppError> {
        let body = MoveBody {
            candidate: candidate.to_string(),
        };
        submit_move(Extension(state.clone()), Path(id), Json(body))
            .await
            .map(|Json(v)| v)
    }

    #[tokio::test]
    async fn test_new_sitting_is_idle() {
        let state = state_with_sample_catalog();
        let id = new_sitting(&state).await;
        let Json(view) = get_sitting(Extension(state), Path(id)).await.unwrap();
        assert!(view["session"].is_null());
        assert_eq!(view["scoreboard"]["total_score"], 0);
    }

    #[tokio::test]
    async fn test_solve_two_step_puzzle_updates_scoreboard() {
        let state = state_with_sample_catalog();
        let id = new_sitting(&state).await;

        let view = load(&state, id, "back-rank").await;
        assert_eq!(view["session"]["orientation"], "white_bottom");
        assert!(view["puzzle"].get("solution").is_none());

        let first = play(&state, id, "Re8+").await.unwrap();
        assert_eq!(first["verdict"], "correct");
        assert_eq!(first["opponent_replied"], "Kh7");
        assert_eq!(first["step_index"], 1);

        let second = play(&state, id, "h8").await;
        assert_eq!(second.unwrap()["verdict"], "illegal");

        let last = play(&state, id, "e8h8").await.unwrap();
        assert_eq!(last["verdict"], "solved");
        assert_eq!(last["score"], 30);
        assert_eq!(last["snapback"], false);
        assert_eq!(last["scoreboard"]["total_score"], 30);
        assert_eq!(last["scoreboard"]["solved_count"], 1);
        assert_eq!(last["scoreboard"]["attempted_count"], 1);

        let after = play(&state, id, "Kf1").await.unwrap_err();
        assert!(matches!(after, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_move_asks_for_snapback() {
        let state = state_with_sample_catalog();
        let id = new_sitting(&state).await;
        let view = load(&state, id, "knight-grab").await;

        let wrong = play(&state, id, "Ng5").await.unwrap();
        assert_eq!(wrong["verdict"], "wrong_move");
        assert_eq!(wrong["snapback"], true);
        assert_eq!(wrong["attempts"], 1);
        assert_eq!(wrong["fen"], view["puzzle"]["starting_position"]);
    }

    #[tokio::test]
    async fn test_move_before_loading_is_conflict() {
        let state = state_with_sample_catalog();
        let id = new_sitting(&state).await;
        assert!(matches!(
            play(&state, id, "e4").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_hint_and_reveal() {
        let state = state_with_sample_catalog();
        let id = new_sitting(&state).await;
        load(&state, id, "back-rank").await;

        let Json(hint) = request_hint(Extension(state.clone()), Path(id)).await.unwrap();
        assert_eq!(hint["hint"]["kind"], "hint");
        assert_eq!(hint["hints_used"], 1);

        let Json(reveal) = reveal_solution(Extension(state.clone()), Path(id)).await.unwrap();
        assert_eq!(reveal["phase"], "revealed");
        assert_eq!(reveal["remaining"][0]["expectedMove"], "Re8+");
        assert_eq!(reveal["remaining"][0]["opponentReply"], "Kh7");
        assert_eq!(reveal["scoreboard"]["revealed_count"], 1);

        let Json(again) = reveal_solution(Extension(state.clone()), Path(id)).await.unwrap();
        assert_eq!(again["remaining"], reveal["remaining"]);
        assert_eq!(again["scoreboard"]["revealed_count"], 1);
    }

    #[tokio::test]
    async fn test_sequential_and_filtered_picks() {
        let state = state_with_sample_catalog();
        let id = new_sitting(&state).await;

        let next = |pick| LoadPuzzleBody {
            pick,
            ..Default::default()
        };
        let Json(first) = load_puzzle(Extension(state.clone()), Path(id), Json(next(Pick::Next)))
            .await
            .unwrap();
        let Json(second) = load_puzzle(Extension(state.clone()), Path(id), Json(next(Pick::Next)))
            .await
            .unwrap();
        assert_ne!(first["puzzle"]["id"], second["puzzle"]["id"]);

        let filtered = LoadPuzzleBody {
            filter: Some(PuzzleQuery {
                difficulty: Some("advanced".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = load_puzzle(Extension(state.clone()), Path(id), Json(filtered))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_sitting_and_close() {
        let state = state_with_sample_catalog();
        assert!(matches!(
            get_sitting(Extension(state.clone()), Path(Uuid::new_v4())).await,
            Err(AppError::NotFound(_))
        ));

        let id = new_sitting(&state).await;
        close_sitting(Extension(state.clone()), Path(id)).await.unwrap();
        assert!(matches!(
            get_sitting(Extension(state), Path(id)).await,
            Err(AppError::NotFound(_))
        ));
    }
}
