use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::gates;
use crate::auth::session::Session;
use crate::error::{ApiError, NotFound};
use crate::posts::dto::{AddPostRequest, PostDetails};
use crate::posts::store::PostId;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(add_post))
        .route("/posts/:id", get(get_post).delete(delete_post))
        .route("/posts/:id/like", post(toggle_like))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<PostDetails>> {
    let posts = state.posts.all();
    Json(
        posts
            .iter()
            .map(|p| PostDetails::expand(p, &state.users))
            .collect(),
    )
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Json<PostDetails>, ApiError> {
    let post = state.posts.find_by_id(id).ok_or(NotFound::Post)?;
    Ok(Json(PostDetails::expand(&post, &state.users)))
}

#[instrument(skip(state, payload))]
pub async fn add_post(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AddPostRequest>,
) -> Result<(StatusCode, Json<PostDetails>), ApiError> {
    gates::authenticated(&session, |me| {
        let post = state.posts.create(me.user_id, &payload.title, &payload.body);
        info!(post_id = post.id, author_id = me.user_id, "post created");
        Ok((
            StatusCode::CREATED,
            Json(PostDetails::expand(&post, &state.users)),
        ))
    })
}

#[instrument(skip(state))]
pub async fn toggle_like(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PostId>,
) -> Result<Json<PostDetails>, ApiError> {
    gates::authenticated(&session, |me| {
        let post = state.posts.toggle_like(id, me.user_id)?;
        Ok(Json(PostDetails::expand(&post, &state.users)))
    })
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PostId>,
) -> Result<Json<PostDetails>, ApiError> {
    gates::post_author(&state.posts, &session, id, |me| {
        let post = state.posts.delete(id)?;
        info!(post_id = id, author_id = me.user_id, "post deleted");
        Ok(Json(PostDetails::expand(&post, &state.users)))
    })
}
