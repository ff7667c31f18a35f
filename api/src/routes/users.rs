//! User administration. Every route here is admin only; the service
//! audits refused attempts.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::user::{CreateUserRequest, ResetPasswordRequest, UpdateUserRequest};
use crate::dto::IncludeInactiveQuery;
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(deactivate))
            .route("/{id}/password", web::post().to(reset_password))
            .route("/{id}/unlock", web::post().to(unlock)),
    );
}

async fn list(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<IncludeInactiveQuery>,
) -> ApiResult<HttpResponse> {
    let users = state
        .user_service
        .list(&auth.actor(), query.include_inactive)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

async fn create(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let user = state.user_service.create(&auth.actor(), request.into()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(user)))
}

async fn get(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = state.user_service.get(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

async fn update(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let user = state
        .user_service
        .update(&auth.actor(), path.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

async fn deactivate(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.user_service.deactivate(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("User deactivated")))
}

async fn reset_password(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    state
        .user_service
        .reset_password(&auth.actor(), path.into_inner(), &request.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Password reset")))
}

/// POST /users/{id}/unlock: clears the lockout and failed login counter
async fn unlock(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = state.user_service.unlock(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}
