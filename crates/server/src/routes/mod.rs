use axum::{routing::{get, post}, Extension, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub mod health;
pub mod puzzles;
pub mod sittings;

/// Every route, with shared state and the CORS/compression layers applied.
pub fn router(state: AppState) -> Router {
    let cors = if state.config().cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/health", get(health::health_check))
        // Catalog
        .route("/api/puzzles", get(puzzles::get_puzzles))
        .route("/api/admin/catalog/reload", post(puzzles::reload_catalog))
        // Sittings
        .route("/api/sittings", post(sittings::create_sitting))
        .route(
            "/api/sittings/{id}",
            get(sittings::get_sitting).delete(sittings::close_sitting),
        )
        .route("/api/sittings/{id}/puzzle", post(sittings::load_puzzle))
        .route("/api/sittings/{id}/move", post(sittings::submit_move))
        .route("/api/sittings/{id}/hint", post(sittings::request_hint))
        .route("/api/sittings/{id}/reveal", post(sittings::reveal_solution))
        .layer(Extension(state))
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
pub(crate) mod test_support {
    use puzzle_engine::PuzzleCatalog;

    use crate::config::Config;
    use crate::state::AppState;

    const SAMPLE: &str = r#"[
        {
            "id": "knight-grab", "theme": "hangingPiece", "difficulty": "beginner",
            "rating": 900, "points": 10,
            "startingPosition": "rnbqkb1r/pppp1ppp/5n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
            "solution": ["Nxe5"],
            "hint": "One of Black's pawns is loose."
        },
        {
            "id": "back-rank", "theme": "mate-in-2", "difficulty": "intermediate",
            "rating": 1400, "points": 30,
            "startingPosition": "6k1/5p2/6p1/6P1/8/8/1B3PPP/4R1K1 w - - 0 1",
            "solution": [{ "move": "Re8+", "opponentResponse": "Kh7" }, { "move": "Rh8#" }],
            "hints": ["The king has no air.", "Start with a check."]
        }
    ]"#;

    pub fn state_with_sample_catalog() -> AppState {
        let mut catalog = PuzzleCatalog::with_seed(3);
        catalog.load_str(SAMPLE).expect("sample catalog parses");
        let config = Config {
            puzzle_source: "/nonexistent/puzzles.json".to_string(),
            ..Config::default()
        };
        AppState::new(config, catalog)
    }
}
