use actix_web::{web, HttpResponse};

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::MfaCodeRequest;
use crate::handlers::{validated, ApiResult};
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/auth/mfa/setup
///
/// Generates a pending secret and returns it with the `otpauth://` URI for
/// the authenticator app. MFA stays off until the code is confirmed.
pub async fn setup(state: web::Data<AppState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    let setup = state.auth_service.begin_mfa_setup(&auth.actor()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(setup)))
}

/// Handler for POST /api/v1/auth/mfa/confirm
pub async fn confirm(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<MfaCodeRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let profile = state.auth_service.confirm_mfa(&auth.actor(), &request.code).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile).with_message("Two-factor authentication enabled")))
}

/// Handler for POST /api/v1/auth/mfa/disable
pub async fn disable(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<MfaCodeRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let profile = state.auth_service.disable_mfa(&auth.actor(), &request.code).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile).with_message("Two-factor authentication disabled")))
}
