use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::gates;
use crate::auth::session::Session;
use crate::error::{ApiError, NotFound};
use crate::state::AppState;
use crate::users::dto::{PublicUser, UpdateProfileRequest, UserDetails};
use crate::users::store::{UserId, UserPatch};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_profile))
        .route("/me/friends/:user_id", post(add_friend))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/by-name/:name", get(get_user_by_name))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserDetails>, ApiError> {
    gates::authenticated(&session, |me| {
        let user = state.users.find_by_id(me.user_id).ok_or(NotFound::User)?;
        Ok(Json(UserDetails::expand(&user, &state.users, &state.posts)))
    })
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    gates::authenticated(&session, move |me| {
        let patch = UserPatch {
            name: payload.name,
            age: payload.age,
        };
        let user = state.users.update(me.user_id, patch)?;
        info!(user_id = user.id, "profile updated");
        Ok(Json(PublicUser::from(&user)))
    })
}

#[instrument(skip(state))]
pub async fn add_friend(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<UserId>,
) -> Result<Json<PublicUser>, ApiError> {
    gates::authenticated(&session, |me| {
        let updated = state.users.add_friend_edge(me.user_id, user_id)?;
        info!(user_id = me.user_id, friend_id = user_id, "friend added");
        Ok(Json(PublicUser::from(&updated)))
    })
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<PublicUser>> {
    let users = state.users.all();
    Json(users.iter().map(PublicUser::from).collect())
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserDetails>, ApiError> {
    let user = state.users.find_by_id(id).ok_or(NotFound::User)?;
    Ok(Json(UserDetails::expand(&user, &state.users, &state.posts)))
}

#[instrument(skip(state))]
pub async fn get_user_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<UserDetails>, ApiError> {
    let user = state.users.find_by_name(&name).ok_or(NotFound::User)?;
    Ok(Json(UserDetails::expand(&user, &state.users, &state.posts)))
}
