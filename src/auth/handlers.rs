use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::dto::{LoginRequest, SignUpRequest, TokenResponse};
use crate::auth::services::{hash_password, verify_password, JwtKeys};
use crate::auth::session::Identity;
use crate::error::{ApiError, CredentialError};
use crate::state::AppState;
use crate::users::dto::PublicUser;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(mut payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    // Normalized so the uniqueness invariant compares like with like.
    payload.email = payload.email.trim().to_lowercase();

    // Hashing may suspend this handler while other requests interleave.
    // That is safe: the duplicate-email check lives inside
    // `UserStore::create`, which checks and inserts under one lock.
    let hash = hash_password(&payload.password)?;

    let user = state.users.create(&payload.name, &payload.email, &hash)?;
    info!(user_id = user.id, email = %user.email, "user signed up");
    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let Some(user) = state.users.find_by_email(&payload.email) else {
        warn!(email = %payload.email, "login with unknown email");
        return Err(CredentialError::UnknownEmail.into());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with wrong password");
        return Err(CredentialError::WrongPassword.into());
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&Identity {
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
    })?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::Session;
    use crate::error::Conflict;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    fn signup_body(name: &str, email: &str, password: &str) -> Json<SignUpRequest> {
        Json(SignUpRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        })
    }

    fn login_body(email: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            email: email.into(),
            password: password.into(),
        })
    }

    #[tokio::test]
    async fn duplicate_sign_up_leaves_one_account() {
        let state = AppState::fake();
        sign_up(State(state.clone()), signup_body("Amy", "amy@x.com", "pw1"))
            .await
            .expect("first sign-up");

        let err = sign_up(State(state.clone()), signup_body("Amy2", "amy@x.com", "pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(Conflict::DuplicateEmail(_))));

        let accounts: Vec<_> = state
            .users
            .all()
            .into_iter()
            .filter(|u| u.email == "amy@x.com")
            .collect();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Amy");
    }

    #[tokio::test]
    async fn sign_up_normalizes_the_email() {
        let state = AppState::fake();
        sign_up(State(state.clone()), signup_body("Amy", "  Amy@X.Com ", "pw"))
            .await
            .expect("sign-up");
        assert!(state.users.find_by_email("amy@x.com").is_some());

        let err = sign_up(State(state.clone()), signup_body("Amy2", "AMY@x.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(Conflict::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_email_from_wrong_password() {
        let state = AppState::fake();
        sign_up(State(state.clone()), signup_body("Amy", "amy@x.com", "secret-pw"))
            .await
            .expect("sign-up");

        let err = login(State(state.clone()), login_body("nobody@x.com", "secret-pw"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Credential(CredentialError::UnknownEmail)
        ));

        let err = login(State(state.clone()), login_body("amy@x.com", "wrong-pw"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Credential(CredentialError::WrongPassword)
        ));
    }

    #[tokio::test]
    async fn login_token_round_trips_through_the_session_builder() {
        let state = AppState::fake();
        sign_up(State(state.clone()), signup_body("Amy", "amy@x.com", "secret-pw"))
            .await
            .expect("sign-up");
        let user = state.users.find_by_email("amy@x.com").expect("amy");

        let Json(response) = login(State(state.clone()), login_body("amy@x.com", "secret-pw"))
            .await
            .expect("login");

        let request = Request::builder()
            .uri("/")
            .header(
                axum::http::header::AUTHORIZATION,
                format!("Bearer {}", response.token),
            )
            .body(())
            .expect("request");
        let (mut parts, ()) = request.into_parts();
        let session = Session::from_request_parts(&mut parts, &state)
            .await
            .expect("session");

        let me = session.identity().expect("authenticated");
        assert_eq!(me.user_id, user.id);
        assert_eq!(me.email, "amy@x.com");
        assert_eq!(me.name, "Amy");
    }
}
