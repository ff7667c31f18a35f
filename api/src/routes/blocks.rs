use actix_web::{web, HttpResponse};
use uuid::Uuid;

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::block::{AssignCuratorsRequest, CreateBlockRequest, UpdateBlockRequest};
use crate::dto::IncludeInactiveQuery;
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blocks")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(deactivate))
            .route("/{id}/curators", web::put().to(assign_curators)),
    );
}

/// GET /blocks: all blocks for admins, assigned blocks for everyone else
async fn list(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<IncludeInactiveQuery>,
) -> ApiResult<HttpResponse> {
    let blocks = state
        .block_service
        .list(&auth.actor(), query.include_inactive)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(blocks)))
}

async fn create(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateBlockRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let block = state.block_service.create(&auth.actor(), request.into()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(block)))
}

async fn get(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let block = state.block_service.get(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(block)))
}

async fn update(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBlockRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let block = state
        .block_service
        .update(&auth.actor(), path.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(block)))
}

/// DELETE /blocks/{id}: refused while active contacts remain in the block
async fn deactivate(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.block_service.deactivate(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Block deactivated")))
}

async fn assign_curators(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<AssignCuratorsRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let block = state
        .block_service
        .assign_curators(&auth.actor(), path.into_inner(), request.user_ids)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(block)))
}
