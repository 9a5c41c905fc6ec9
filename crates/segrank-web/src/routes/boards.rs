use crate::error::{AppError, AppResult};
use crate::render;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Html;
use segrank_core::leaderboard::BoardType;
use segrank_core::store::{artifact_path, load_leaderboard};
use std::sync::Arc;
use tracing::debug;

/// First leaderboard of the bundle, followed by links to the rest.
pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let board = state
        .first_board()
        .ok_or_else(|| AppError::NotFound("No leaderboards have been published".to_string()))?;

    let mut body = render::board_table(board);
    body.push_str(&render::board_index(state.boards()));
    Ok(Html(render::page(&render::board_title(board), &body)))
}

/// Reads the CSV artifact for one (board type, column).
pub async fn named(
    State(state): State<Arc<AppState>>,
    Path((board_type, column)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let board_type: BoardType = board_type
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown board type '{}'", board_type)))?;
    if column.contains(['/', '\\']) || column.starts_with('.') {
        return Err(AppError::Validation(format!("Invalid column '{}'", column)));
    }

    let path = artifact_path(&state.data_dir, board_type, &column);
    debug!("Serving {:?}", path);

    let board = tokio::task::spawn_blocking(move || load_leaderboard(path))
        .await
        .map_err(|e| AppError::Any(e.into()))??;

    Ok(Html(render::page(
        &render::board_title(&board),
        &render::board_table(&board),
    )))
}
