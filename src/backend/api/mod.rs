use crate::{
    backend::{
        api::{
            article::{create_article, get_article, like_article},
            comment::{create_comment, delete_comment, get_replies, get_root_comments},
            notifications::{count_notifications, list_notifications},
            user::{login_user, register_user, validate},
        },
        store::MagpieContext,
        utils::error::BackendError,
    },
    common::{user::DbPerson, AUTH_COOKIE},
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;

pub mod article;
pub mod comment;
pub mod notifications;
pub mod user;

pub fn api_routes(context: MagpieContext) -> Router {
    Router::new()
        .route("/account/register", post(register_user))
        .route("/account/login", post(login_user))
        .route("/article", get(get_article).post(create_article))
        .route("/article/like", post(like_article))
        .route("/comment", post(create_comment).delete(delete_comment))
        .route("/comment/list", get(get_root_comments))
        .route("/comment/replies", get(get_replies))
        .route("/notifications/list", get(list_notifications))
        .route("/notifications/count", get(count_notifications))
        .route_layer(middleware::from_fn_with_state(context.clone(), auth))
        .with_state(context)
}

/// Resolves the login token from the `auth` header or cookie and stores the
/// principal as a request extension. Requests without a valid token simply
/// carry no principal; handlers decide whether that is acceptable.
async fn auth(
    State(context): State<MagpieContext>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(AUTH_COOKIE)
        .and_then(|h| h.to_str().ok())
        .map(ToString::to_string)
        .or_else(|| jar.get(AUTH_COOKIE).map(|c| c.value().to_string()));
    if let Some(token) = token {
        if let Ok(person) = validate(&token, &context) {
            request.extensions_mut().insert(person);
        }
    }
    Ok(next.run(request).await)
}

/// Authenticated principal; extraction fails on routes that need a login but
/// got no valid token.
pub struct AuthPerson(pub DbPerson);

#[async_trait]
impl<S> FromRequestParts<S> for AuthPerson
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<DbPerson>()
            .cloned()
            .map(AuthPerson)
            .ok_or(BackendError::PermissionDenied)
    }
}
