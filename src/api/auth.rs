//! Authentication and roster endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{MemberSummary, Role, UpdateMember, User},
};

use super::{ApiResponse, AuthenticatedUser, Librarian};

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response payload
#[derive(Serialize, ToSchema)]
pub struct LoginData {
    /// Bearer token carrying the user's id, email and role
    pub access_token: String,
}

/// Signup request
#[derive(Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Created member payload
#[derive(Serialize, ToSchema)]
pub struct SignupData {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Payload carrying only an entity id
#[derive(Serialize, ToSchema)]
pub struct MemberIdData {
    pub id: i32,
}

fn required<'a>(value: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("'{}' is required", name))),
    }
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Member created", body = ApiResponse<SignupData>),
        (status = 403, description = "Librarian privileges required"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Missing or malformed field")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SignupData>>)> {
    let name = required(&request.name, "name")?.to_string();
    let email = required(&request.email, "email")?.to_string();
    let password = required(&request.password, "password")?.to_string();
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.services.users.signup(&name, &email, &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Member added successfully",
            SignupData {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
            },
        )),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginData>),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Missing field")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    let (email, password) = match (request.email.as_deref(), request.password.as_deref()) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ))
        }
    };

    let access_token = state.services.users.authenticate(email, password).await?;

    Ok(Json(ApiResponse::success(
        "Login successful",
        LoginData { access_token },
    )))
}

/// Get the calling token's user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.services.users.get_by_id(claims.user_id()?).await?;

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        user,
    )))
}

/// List all members
#[utoipa::path(
    get,
    path = "/auth/members",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member roster", body = Vec<MemberSummary>),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
) -> AppResult<Json<ApiResponse<Vec<MemberSummary>>>> {
    let members = state.services.users.list_members().await?;

    Ok(Json(ApiResponse::success(
        "Members retrieved successfully",
        members,
    )))
}

/// Update a member
#[utoipa::path(
    put,
    path = "/auth/members/{id}",
    tag = "auth",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    request_body = UpdateMember,
    responses(
        (status = 200, description = "Member updated", body = ApiResponse<MemberIdData>),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
    Path(id): Path<i32>,
    Json(update): Json<UpdateMember>,
) -> AppResult<Json<ApiResponse<MemberIdData>>> {
    update
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.services.users.update_member(id, update).await?;

    Ok(Json(ApiResponse::success(
        "Member updated successfully",
        MemberIdData { id: user.id },
    )))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/auth/members/{id}",
    tag = "auth",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member deleted", body = ApiResponse<MemberIdData>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<MemberIdData>>> {
    state.services.users.delete_member(id).await?;

    Ok(Json(ApiResponse::success(
        "Member deleted successfully",
        MemberIdData { id },
    )))
}
