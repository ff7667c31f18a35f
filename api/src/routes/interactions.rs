use actix_web::{web, HttpResponse};
use uuid::Uuid;

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::interaction::{CreateInteractionRequest, UpdateInteractionRequest};
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/interactions")
            .route("", web::post().to(create))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete)),
    );
}

/// POST /interactions
///
/// Records a touch with a contact. With `new_status_id` the contact's
/// influence status changes in the same call and the change is linked to
/// the interaction in the status history.
async fn create(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateInteractionRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let interaction = state
        .interaction_service
        .create(&auth.actor(), request.into())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(interaction)))
}

async fn get(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let interaction = state.interaction_service.get(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(interaction)))
}

/// PUT /interactions/{id}: author or admin only
async fn update(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateInteractionRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let interaction = state
        .interaction_service
        .update(&auth.actor(), path.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(interaction)))
}

async fn delete(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.interaction_service.delete(&auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Interaction deleted")))
}
