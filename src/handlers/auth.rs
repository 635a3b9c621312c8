use axum::{extract::State, http::StatusCode, response::Json};
use axum_extra::extract::cookie::CookieJar;
use common::{ChangePasswordRequest, LoginRequest, RegisterRequest, Role, UserDto};
use sea_orm::TransactionTrait;
use service::students::NewStudentProfile;
use service::users::{self, NewUser};
use service::{dto, sessions, validation, ServiceError};
use tracing::{debug, info, instrument, trace};

use crate::auth::{build_session_cookie, clear_session_cookie, AuthContext};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::schemas::{ApiResponse, AppState};

/// Register a new account
///
/// Student accounts get their student profile in the same transaction.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    trace!("Entering register function");
    validation::validate_signup(
        &request.username,
        &request.password,
        request.confirm_password.as_deref(),
    )?;
    validation::validate_request(&request)?;

    let role = request.role.unwrap_or_default();
    if role == Role::Admin {
        return Err(ServiceError::Validation("Role must be student or professor".to_string()).into());
    }

    let new_user = NewUser {
        username: request.username,
        password: request.password,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        role: dto::role_from_dto(role),
    };
    let profile = NewStudentProfile {
        major: request.major,
        year_level: request.year_level.map(dto::year_level_from_dto),
    };

    let txn = state.db.begin().await?;
    let (account, profile) = users::register(&txn, new_user, Some(profile)).await?;
    txn.commit().await?;

    info!(
        "User registered with ID: {}, student profile: {}",
        account.id,
        profile.is_some()
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(dto::user_dto(&account), "User registered successfully")),
    ))
}

/// Log in and receive a session cookie
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, jar, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<UserDto>>), ApiError> {
    trace!("Entering login function");
    let account = users::authenticate(&state.db, &request.username, &request.password).await?;
    let session = sessions::create_session(&state.db, account.id, state.session_ttl).await?;

    info!("User {} logged in", account.id);
    let jar = jar.add(build_session_cookie(session.token, state.session_ttl));
    Ok((jar, Json(ApiResponse::ok(dto::user_dto(&account), "Login successful"))))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout successful", body = UserResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state, jar, auth), fields(user_id = auth.user_id()))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthContext,
) -> Result<(CookieJar, Json<ApiResponse<UserDto>>), ApiError> {
    sessions::delete_session(&state.db, &auth.token).await?;
    debug!("Session removed for user {}", auth.user_id());

    let jar = jar.remove(clear_session_cookie());
    Ok((jar, Json(ApiResponse::ok(dto::user_dto(&auth.user), "Logout successful"))))
}

/// Get the logged-in user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(auth), fields(user_id = auth.user_id()))]
pub async fn me(auth: AuthContext) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::ok(dto::user_dto(&auth.user), "Current user"))
}

/// Change the password of the logged-in user
#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully", body = UserResponse),
        (status = 400, description = "Old password incorrect or new password invalid", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, request), fields(user_id = auth.user_id()))]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let updated = users::change_password(&state.db, auth.user_id(), &request).await?;
    Ok(Json(ApiResponse::ok(
        dto::user_dto(&updated),
        "Password changed successfully",
    )))
}
