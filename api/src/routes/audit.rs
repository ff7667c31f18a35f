use actix_web::{web, HttpResponse};

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::audit::AuditLogQuery;
use crate::handlers::{ApiError, ApiResult};
use crate::middleware::AuthContext;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/audit-logs", web::get().to(search));
}

/// GET /audit-logs
///
/// Admin only. Filters: `user_id`, `entity_type`, `entity_id`, `action`,
/// `from`, `to` (RFC 3339), `page`, `per_page`. Newest first.
async fn search(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<AuditLogQuery>,
) -> ApiResult<HttpResponse> {
    let filter = query.into_inner().into_filter().map_err(ApiError::BadRequest)?;
    let access = state.access_service.authorize(&auth.actor()).await?;
    let page = state.audit_service.search(&access, filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}
