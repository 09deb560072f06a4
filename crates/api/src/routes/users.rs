//! Route definitions for the `/users` resource (accounts and login).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST /register        -> register (public)
/// POST /register/admin  -> register_admin (admin only)
/// POST /login           -> login (public)
/// GET  /me              -> me
/// GET  /                -> list_users (admin only)
/// GET  /{id}            -> get_user
/// PUT  /{id}            -> update_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/register/admin", post(users::register_admin))
        .route("/login", post(users::login))
        .route("/me", get(users::me))
        .route("/", get(users::list_users))
        .route("/{id}", get(users::get_user).put(users::update_user))
}
