//! Tests for JWT issuing and verification.

use chrono::Utc;

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenService, TokenServiceConfig};

fn service() -> TokenService {
    TokenService::new(TokenServiceConfig {
        jwt_secret: "test-secret-for-token-service".to_string(),
        ..Default::default()
    })
}

fn user() -> User {
    User::new("a.volkov", "Alexei Volkov", "$2b$04$hash", UserRole::Curator)
}

#[test]
fn test_issue_and_verify() {
    let service = service();
    let user = user();

    let token = service.issue(&user).unwrap();
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 3600);

    let claims = service.verify(&token.token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.login, "a.volkov");
    assert_eq!(claims.role, UserRole::Curator);
    assert_eq!(claims.iss, "kurator");
    assert_eq!(claims.aud, "kurator-api");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_each_token_has_unique_id() {
    let service = service();
    let user = user();
    let a = service.verify(&service.issue(&user).unwrap().token).unwrap();
    let b = service.verify(&service.issue(&user).unwrap().token).unwrap();
    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_expired_token() {
    let service = service();
    let mut claims = Claims::for_user(&user(), 3600, "kurator", "kurator-api");
    let past = Utc::now().timestamp() - 7200;
    claims.iat = past;
    claims.nbf = past;
    claims.exp = Utc::now().timestamp() - 3600;
    let token = service.encode_claims(&claims).unwrap();

    assert!(matches!(
        service.verify(&token),
        Err(DomainError::Token(TokenError::TokenExpired))
    ));
}

#[test]
fn test_wrong_secret_is_invalid() {
    let other = TokenService::new(TokenServiceConfig {
        jwt_secret: "a-different-secret".to_string(),
        ..Default::default()
    });
    let token = other.issue(&user()).unwrap();

    assert!(matches!(
        service().verify(&token.token),
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_wrong_audience_is_invalid() {
    let service = service();
    let claims = Claims::for_user(&user(), 3600, "kurator", "someone-else");
    let token = service.encode_claims(&claims).unwrap();

    assert!(matches!(
        service.verify(&token),
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_garbage_is_invalid() {
    assert!(matches!(
        service().verify("not.a.jwt"),
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}
