use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod gates;
pub mod handlers;
pub mod services;
pub mod session;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
