use crate::auth::session::{Identity, Session};
use crate::error::{ApiError, NotFound, PermissionDenied};
use crate::posts::store::{PostId, PostStore};

/// Capability gate: runs the wrapped handler only for a logged-in session.
/// Anonymous sessions are rejected before the handler is ever invoked.
pub fn authenticated<T, F>(session: &Session, handler: F) -> Result<T, ApiError>
where
    F: FnOnce(&Identity) -> Result<T, ApiError>,
{
    match session.identity() {
        None => Err(PermissionDenied::NotLoggedIn.into()),
        Some(me) => handler(me),
    }
}

/// Ownership gate: composes on top of [`authenticated`], since comparing
/// authorship needs the session's user id. The post must exist and belong
/// to the caller before the handler runs.
pub fn post_author<T, F>(
    posts: &PostStore,
    session: &Session,
    post_id: PostId,
    handler: F,
) -> Result<T, ApiError>
where
    F: FnOnce(&Identity) -> Result<T, ApiError>,
{
    authenticated(session, |me| {
        let post = posts.find_by_id(post_id).ok_or(NotFound::Post)?;
        if post.author_id != me.user_id {
            return Err(PermissionDenied::NotOwner.into());
        }
        handler(me)
    })
}
