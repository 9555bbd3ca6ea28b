use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    db::DbPool,
    dto::auth::{LoginRequest, LoginResponse, SignupRequest},
    error::AppResult,
    models::User,
    response::{ApiResponse, Meta},
    services::auth_service::{login_user, signup_user},
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Signup successful", body = ApiResponse<User>),
        (status = 400, description = "Invalid role or duplicate email")
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(pool): State<DbPool>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = signup_user(&pool, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Signup successful", user, None)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(pool): State<DbPool>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&pool, payload).await?;
    Ok(Json(ApiResponse::success(
        "Logged in",
        resp,
        Some(Meta::empty()),
    )))
}
