use actix_web::{web, HttpResponse};
use uuid::Uuid;

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::reference::{CreateReferenceRequest, ReferenceListQuery, UpdateReferenceRequest};
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/references")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(deactivate)),
    );
}

/// GET /references?category=influence_status
///
/// Readable by every role; inactive values only for admins.
async fn list(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<ReferenceListQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let values = state
        .reference_service
        .list(&auth.actor(), query.category, query.include_inactive)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(values)))
}

async fn create(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateReferenceRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let value = state.reference_service.create(&auth.actor(), request.into()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(value)))
}

async fn update(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReferenceRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let value = state
        .reference_service
        .update(&auth.actor(), path.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(value)))
}

async fn deactivate(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.reference_service.deactivate(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Reference value deactivated")))
}
