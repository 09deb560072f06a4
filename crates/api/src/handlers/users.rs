//! Handlers for the `/users` resource: registration, login and account
//! management.
//!
//! Registration is split in two entry points. The public one creates
//! builder and coach accounts and is the first step of a candidature;
//! the admin one creates admin accounts. In both cases the password is
//! generated server side and emailed to the new user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildup_core::roles::{self, ROLE_ADMIN};
use buildup_core::types::Timestamp;
use buildup_core::{validate, CoreError};
use buildup_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use buildup_db::repositories::{FileRepo, UserRepo};
use buildup_events::{Effect, EmailTemplate};
use serde::{Deserialize, Serialize};

use crate::auth::{jwt, password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Content type recorded for uploaded profile pictures.
const PROFILE_PICTURE_CONTENT_TYPE: &str = "image/png";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Timestamp,
    pub email: String,
    pub discord_tag: String,
    pub username: String,
    /// `builder` or `coach`; admin accounts go through the admin route.
    pub role: String,
}

/// Request body for `POST /users/register/admin`.
#[derive(Debug, Deserialize)]
pub struct RegisterAdminRequest {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Timestamp,
    pub email: String,
    pub discord_tag: String,
    pub username: String,
}

/// Request body for `POST /users/login`. The identifier matches the
/// username or the account email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Request body for `PUT /users/{id}`. All fields are optional;
/// `profile_picture` carries raw image bytes the way the mobile client
/// sends them, as a JSON byte array.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<Timestamp>,
    pub email: Option<String>,
    pub discord_tag: Option<String>,
    pub username: Option<String>,
    /// New password in clear text; re-hashed server side when non-blank.
    pub password: Option<String>,
    pub profile_picture: Option<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Admins may act on any account; everyone else only on their own.
fn ensure_admin_or_self(user: &AuthUser, target_id: &str) -> Result<(), AppError> {
    if user.role != ROLE_ADMIN && user.user_id != target_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only access your own account".into(),
        )));
    }
    Ok(())
}

/// Create the account row, generate its password and queue the welcome
/// email. Shared by the public and admin registration routes.
async fn create_account(state: &AppState, input: RegisterRequest) -> Result<User, AppError> {
    validate::validate_required_text("first_name", &input.first_name, validate::MAX_NAME_LENGTH)?;
    validate::validate_required_text("last_name", &input.last_name, validate::MAX_NAME_LENGTH)?;
    validate::validate_required_text("discord_tag", &input.discord_tag, validate::MAX_NAME_LENGTH)?;
    validate::validate_username(&input.username)?;

    // Emails are stored lowercase.
    let email = input.email.to_lowercase();
    validate::validate_email(&email)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some()
        || UserRepo::find_by_username(&state.pool, &input.username)
            .await?
            .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "The email or the username is already in use".into(),
        )));
    }

    let password = password::generate_password();
    let (password_hash, password_salt) = password::create_password_hash(&password);

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            first_name: input.first_name,
            last_name: input.last_name,
            birthdate: input.birthdate,
            email,
            discord_tag: input.discord_tag,
            username: input.username,
            role: input.role,
            password_hash,
            password_salt,
        },
    )
    .await?;

    let effects = vec![Effect::email(
        user.email.clone(),
        EmailTemplate::AccountCreated,
        vec![
            ("first_name", user.first_name.clone()),
            ("last_name", user.last_name.clone()),
            ("password", password),
        ],
    )];
    state.dispatcher.dispatch("users.register", effects).await;

    Ok(user)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users/register
///
/// Public registration for builder and coach accounts. The generated
/// password is sent to the new user by email, never returned.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    roles::validate_role(&input.role)?;
    if input.role == ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only admins can register admins".into(),
        )));
    }

    let user = create_account(&state, input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/v1/users/register/admin
///
/// Create an admin account. Restricted to admins.
pub async fn register_admin(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<RegisterAdminRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = create_account(
        &state,
        RegisterRequest {
            first_name: input.first_name,
            last_name: input.last_name,
            birthdate: input.birthdate,
            email: input.email,
            discord_tag: input.discord_tag,
            username: input.username,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/v1/users/login
///
/// Authenticate with username (or email) + password. Returns a JWT and
/// the authenticated user.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find the user; the identifier matches username or email.
    let user = UserRepo::find_by_username_or_email(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    // 2. Verify the password against the stored hash and salt.
    if !password::verify_password(&input.password, &user.password_hash, &user.password_salt) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    // 3. Issue the JWT carrying the user id and role.
    let token = jwt::generate_token(&user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// GET /api/v1/users/me
///
/// The account behind the presented token.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<UserResponse>> {
    let row = UserRepo::find_by_id(&state.pool, &user.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", user.user_id.as_str()))?;
    Ok(Json(UserResponse::from(row)))
}

/// GET /api/v1/users
///
/// List every account, newest first. Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/users/{id}
///
/// Fetch one account. Admins see everyone, other roles only themselves.
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    ensure_admin_or_self(&user, &id)?;

    let row = UserRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", id.as_str()))?;
    Ok(Json(UserResponse::from(row)))
}

/// PUT /api/v1/users/{id}
///
/// Update identity fields, and optionally the password and the profile
/// picture. Admins update anyone, other roles only themselves.
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(mut input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    ensure_admin_or_self(&user, &id)?;

    let existing = UserRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", id.as_str()))?;

    if let Some(first_name) = &input.first_name {
        validate::validate_required_text("first_name", first_name, validate::MAX_NAME_LENGTH)?;
    }
    if let Some(last_name) = &input.last_name {
        validate::validate_required_text("last_name", last_name, validate::MAX_NAME_LENGTH)?;
    }

    // A changed email or username must not collide with another account.
    if let Some(email) = &mut input.email {
        *email = email.to_lowercase();
        if *email != existing.email {
            validate::validate_email(email)?;
            if UserRepo::find_by_email(&state.pool, email).await?.is_some() {
                return Err(AppError::Core(CoreError::Conflict(
                    "The new email is already in use".into(),
                )));
            }
        }
    }
    if let Some(username) = &input.username {
        if *username != existing.username {
            validate::validate_username(username)?;
            if UserRepo::find_by_username(&state.pool, username)
                .await?
                .is_some()
            {
                return Err(AppError::Core(CoreError::Conflict(
                    "The new username is already in use".into(),
                )));
            }
        }
    }

    let update = UpdateUser {
        first_name: input.first_name,
        last_name: input.last_name,
        birthdate: input.birthdate,
        email: input.email,
        discord_tag: input.discord_tag,
        username: input.username,
    };
    UserRepo::update(&state.pool, &id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("user", id.as_str()))?;

    if let Some(picture) = &input.profile_picture {
        if !picture.is_empty() {
            let file_name = format!("profile_{id}");
            let stored = FileRepo::upsert(
                &state.pool,
                &file_name,
                PROFILE_PICTURE_CONTENT_TYPE,
                picture,
            )
            .await?;
            UserRepo::set_profile_picture(&state.pool, &id, &stored.id).await?;
        }
    }

    if let Some(new_password) = &input.password {
        if !new_password.trim().is_empty() {
            let (hash, salt) = password::create_password_hash(new_password);
            UserRepo::update_password(&state.pool, &id, &hash, &salt).await?;
        }
    }

    // Re-read so the response reflects the picture and password updates.
    let row = UserRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", id.as_str()))?;
    Ok(Json(UserResponse::from(row)))
}
