use actix_web::{web, HttpResponse};

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/auth/me
pub async fn me(state: web::Data<AppState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    let profile = state.auth_service.profile(&auth.actor()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}
