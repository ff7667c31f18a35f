//! Contact card routes: list, CRUD, soft delete and restore, status changes
//! and the per-contact interaction feed.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::contact::{
    ChangeStatusRequest, ContactListQuery, CreateContactRequest, UpdateContactRequest,
};
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contacts")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/restore", web::post().to(restore))
            .route("/{id}/status", web::post().to(change_status))
            .route("/{id}/history", web::get().to(history))
            .route("/{id}/interactions", web::get().to(interactions)),
    );
}

/// GET /contacts
///
/// Query: `block_id`, `status_id`, `responsible_user_id`, `search`,
/// `include_inactive` (admins only), `page`, `per_page`. Results are
/// limited to the caller's scope.
async fn list(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<ContactListQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .contact_service
        .list(&auth.actor(), query.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

async fn create(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateContactRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let contact = state.contact_service.create(&auth.actor(), request.into()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(contact)))
}

async fn get(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let contact = state.contact_service.get(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(contact)))
}

async fn update(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContactRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let contact = state
        .contact_service
        .update(&auth.actor(), path.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(contact)))
}

/// DELETE /contacts/{id}: soft delete
async fn delete(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.contact_service.delete(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Contact deleted")))
}

async fn restore(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let contact = state.contact_service.restore(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(contact)))
}

async fn change_status(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<ChangeStatusRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let contact = state
        .contact_service
        .change_status(&auth.actor(), path.into_inner(), request.status_id, request.reason)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(contact)))
}

/// GET /contacts/{id}/history: status changes, newest first
async fn history(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let history = state
        .contact_service
        .status_history(&auth.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(history)))
}

async fn interactions(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let interactions = state
        .interaction_service
        .list_for_contact(&auth.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(interactions)))
}
