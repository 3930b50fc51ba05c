use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::services::JwtKeys;
use crate::error::{ApiError, SessionError};
use crate::users::store::UserId;

/// Authenticated principal decoded from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
}

/// Request-scoped session, built once before the handler runs and
/// immutable afterwards. Anonymous is a valid state; the gates decide
/// whether it is acceptable for a given handler.
#[derive(Debug, Clone)]
pub enum Session {
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(identity) => Some(identity),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
            // No credential at all is a valid anonymous session.
            return Ok(Session::Anonymous);
        };

        // A credential was supplied: from here on, any defect fails the
        // request rather than degrading to anonymous.
        let header = header
            .to_str()
            .map_err(|_| SessionError::InvalidCredential)?;
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(SessionError::InvalidCredential)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "credential rejected");
            e
        })?;

        Ok(Session::Authenticated(Identity {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::state::AppState;
    use axum::http::Request;

    async fn build_session(
        state: &AppState,
        authorization: Option<String>,
    ) -> Result<Session, ApiError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(axum::http::header::AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).expect("request").into_parts();
        Session::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn missing_header_yields_anonymous() {
        let state = AppState::fake();
        let session = build_session(&state, None).await.expect("session");
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn valid_token_yields_the_signed_identity() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let identity = Identity {
            user_id: 4,
            email: "test@test.com".into(),
            name: "TestMan".into(),
        };
        let token = keys.sign(&identity).expect("sign");

        let session = build_session(&state, Some(format!("Bearer {token}")))
            .await
            .expect("session");
        assert_eq!(session.identity(), Some(&identity));
    }

    #[tokio::test]
    async fn garbage_token_fails_instead_of_degrading() {
        let state = AppState::fake();
        let err = build_session(&state, Some("Bearer not-a-token".into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Session(SessionError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn non_utf8_header_fails_instead_of_degrading() {
        let state = AppState::fake();
        let request = Request::builder().uri("/").body(()).expect("request");
        let (mut parts, ()) = request.into_parts();
        parts.headers.insert(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_bytes(b"Bearer \xFF\xFEgarbage").expect("header value"),
        );
        let err = Session::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Session(SessionError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn wrong_scheme_is_an_invalid_credential() {
        let state = AppState::fake();
        let err = build_session(&state, Some("Basic dXNlcjpwdw==".into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Session(SessionError::InvalidCredential)
        ));
    }
}
