use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
}

pub fn verify_token(token: &str, cfg: &JwtConfig) -> anyhow::Result<Claims> {
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&cfg.audience));
    validation.set_issuer(std::slice::from_ref(&cfg.issuer));
    let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());
    let data = decode::<Claims>(token, &decoding, &validation)?;
    Ok(data.claims)
}

/// Validates the Bearer token and yields the calling user's id. Token
/// issuance lives in a separate service; this side only verifies.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        ))?;

        let claims = verify_token(token, &state.config.jwt).map_err(|_| {
            warn!("invalid or expired token");
            (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            )
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    fn test_cfg() -> JwtConfig {
        JwtConfig {
            secret: "dev-secret".into(),
            issuer: "nutrilog".into(),
            audience: "nutrilog-users".into(),
        }
    }

    fn sign(cfg: &JwtConfig, sub: Uuid, ttl: Duration) -> String {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub,
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            iss: cfg.issuer.clone(),
            aud: cfg.audience.clone(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(cfg.secret.as_bytes()),
        )
        .expect("sign token")
    }

    #[test]
    fn accepts_a_valid_token() {
        let cfg = test_cfg();
        let user_id = Uuid::new_v4();
        let token = sign(&cfg, user_id, Duration::minutes(5));
        let claims = verify_token(&token, &cfg).expect("verify token");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn rejects_an_expired_token() {
        let cfg = test_cfg();
        let token = sign(&cfg, Uuid::new_v4(), Duration::minutes(-5));
        assert!(verify_token(&token, &cfg).is_err());
    }

    #[test]
    fn rejects_wrong_issuer_or_audience() {
        let cfg = test_cfg();
        let other = JwtConfig {
            secret: cfg.secret.clone(),
            issuer: "someone-else".into(),
            audience: "someone-elses-users".into(),
        };
        let token = sign(&other, Uuid::new_v4(), Duration::minutes(5));
        assert!(verify_token(&token, &cfg).is_err());
    }

    #[test]
    fn rejects_a_tampered_token() {
        let cfg = test_cfg();
        let other = JwtConfig {
            secret: "different-secret".into(),
            ..test_cfg()
        };
        let token = sign(&other, Uuid::new_v4(), Duration::minutes(5));
        assert!(verify_token(&token, &cfg).is_err());
    }
}
