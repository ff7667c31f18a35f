use actix_web::{web, HttpRequest, HttpResponse};

use kurator_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::LoginRequest;
use crate::handlers::{validated, ApiResult};
use crate::middleware::request_origin;

/// Handler for POST /api/v1/auth/login
///
/// Verifies login and password and, when the account has MFA enabled, the
/// six-digit TOTP code. Returns a bearer access token.
///
/// # Request Body
///
/// ```json
/// {
///     "login": "i.petrova",
///     "password": "********",
///     "totp_code": "492039"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "data": {
///         "access_token": "eyJ...",
///         "token_type": "Bearer",
///         "expires_in": 3600,
///         "user": { "id": "...", "login": "i.petrova", "role": "curator", "mfa_enabled": true }
///     }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed body
/// - 401 Unauthorized: `INVALID_CREDENTIALS`, `MFA_REQUIRED` or `INVALID_MFA_CODE`
/// - 423 Locked: `ACCOUNT_LOCKED` with `retry_after_minutes`
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = validated(body)?;
    let response = state
        .auth_service
        .login(
            &request.login,
            &request.password,
            request.totp_code.as_deref(),
            request_origin(&req),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
