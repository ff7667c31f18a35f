use actix_web::{web, HttpResponse};

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::ChangePasswordRequest;
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/auth/password
///
/// ## Errors
/// - 400 Bad Request: new password fails the policy
/// - 401 Unauthorized: current password is wrong
pub async fn change_password(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    state
        .auth_service
        .change_password(&auth.actor(), &request.current_password, &request.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Password changed")))
}
