mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::{ClockInRepository, MemoryClockIns, PgClockIns};

pub fn router() -> Router<AppState> {
    handlers::clock_in_routes()
}
