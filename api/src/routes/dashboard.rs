use actix_web::{web, HttpResponse};
use chrono::Utc;

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(summary));
}

/// GET /dashboard: counters over the caller's visible contacts and watchlist
async fn summary(state: web::Data<AppState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let summary = state.dashboard_service.summary(&auth.actor(), today).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}
