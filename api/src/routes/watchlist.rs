//! Risk watchlist routes.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::watchlist::{
    CreateWatchlistRequest, MarkCheckedRequest, UpdateWatchlistRequest, WatchlistListQuery,
};
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/watchlist")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            // before /{id} so "due" is not parsed as an id
            .route("/due", web::get().to(due))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/check", web::post().to(mark_checked)),
    );
}

async fn list(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<WatchlistListQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .watchlist_service
        .list(&auth.actor(), query.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

/// GET /watchlist/due: entries whose next check is today or earlier
async fn due(state: web::Data<AppState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let entries = state.watchlist_service.due(&auth.actor(), today).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}

async fn create(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateWatchlistRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let entry = state.watchlist_service.create(&auth.actor(), request.into()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(entry)))
}

async fn get(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let entry = state.watchlist_service.get(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(entry)))
}

async fn update(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateWatchlistRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let entry = state
        .watchlist_service
        .update(&auth.actor(), path.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(entry)))
}

async fn delete(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.watchlist_service.delete(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Watchlist entry deleted")))
}

/// POST /watchlist/{id}/check
///
/// Records a completed check and schedules the next one from today.
/// The body is optional.
async fn mark_checked(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: Option<web::Json<MarkCheckedRequest>>,
) -> ApiResult<HttpResponse> {
    let note = match body {
        Some(body) => validated(body)?.note,
        None => None,
    };
    let entry = state
        .watchlist_service
        .mark_checked(&auth.actor(), path.into_inner(), note)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(entry)))
}
