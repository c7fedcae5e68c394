use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::Claims;
use crate::config::AuthConfig;
use crate::state::AppState;

/// Verification settings for provider-issued HS256 tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(cfg: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(std::slice::from_ref(&cfg.audience));
        if let Some(issuer) = &cfg.issuer {
            validation.set_issuer(std::slice::from_ref(issuer));
        }
        Self {
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        debug!(user_id = %data.claims.sub, "token verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for TokenVerifier {
    fn from_ref(state: &AppState) -> Self {
        TokenVerifier::new(&state.config.auth)
    }
}

/// Extracts and validates the bearer token, returning the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenVerifier: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header".into()))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".into()))?;

        let claims = TokenVerifier::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "rejected token");
            (StatusCode::UNAUTHORIZED, "invalid or expired token".to_string())
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryAchievementStore, MemoryEntryStore};
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::sync::Arc;
    use time::OffsetDateTime;

    fn state() -> AppState {
        AppState::fake(
            Arc::new(MemoryEntryStore::new(time::UtcOffset::UTC)),
            Arc::new(MemoryAchievementStore::default()),
        )
    }

    fn token(secret: &str, sub: Uuid, aud: &str, iss: &str, ttl_secs: i64) -> String {
        let claims = Claims {
            sub,
            exp: (OffsetDateTime::now_utc().unix_timestamp() + ttl_secs) as usize,
            aud: aud.into(),
            iss: Some(iss.into()),
            email: Some("eater@example.com".into()),
            role: Some("authenticated".into()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode token")
    }

    async fn extract(state: &AppState, header: Option<String>) -> Result<AuthUser, (StatusCode, String)> {
        let mut req = Request::builder().uri("/api/v1/profile");
        if let Some(h) = header {
            req = req.header(axum::http::header::AUTHORIZATION, h);
        }
        let (mut parts, _) = req.body(()).expect("request").into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn accepts_provider_token() {
        let state = state();
        let user = Uuid::new_v4();
        let t = token("test-secret", user, "authenticated", "test-issuer", 300);
        let AuthUser(id) = extract(&state, Some(format!("Bearer {t}"))).await.expect("auth");
        assert_eq!(id, user);
    }

    #[tokio::test]
    async fn rejects_missing_header_and_bad_scheme() {
        let state = state();
        let err = extract(&state, None).await.err().expect("missing header");
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);

        let t = token("test-secret", Uuid::new_v4(), "authenticated", "test-issuer", 300);
        let err = extract(&state, Some(format!("Token {t}"))).await.err().expect("bad scheme");
        assert_eq!(err.1, "invalid auth scheme");
    }

    #[tokio::test]
    async fn rejects_wrong_secret_audience_or_issuer() {
        let state = state();
        let user = Uuid::new_v4();
        for t in [
            token("other-secret", user, "authenticated", "test-issuer", 300),
            token("test-secret", user, "anon", "test-issuer", 300),
            token("test-secret", user, "authenticated", "someone-else", 300),
        ] {
            let err = extract(&state, Some(format!("Bearer {t}"))).await.err().expect("rejected");
            assert_eq!(err.0, StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let state = state();
        let t = token("test-secret", Uuid::new_v4(), "authenticated", "test-issuer", -3600);
        assert!(extract(&state, Some(format!("Bearer {t}"))).await.is_err());
    }
}
