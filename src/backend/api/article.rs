use super::AuthPerson;
use crate::{
    backend::{
        store::{article::DbArticleForm, MagpieContext},
        utils::error::BackendResult,
    },
    common::{
        article::{ArticleView, CreateArticleParams, DbArticle, GetArticleParams, LikeArticleParams},
        notifications::DbNotification,
        SuccessResponse,
    },
};
use axum::{
    extract::{Query, State},
    Form, Json,
};
use axum_macros::debug_handler;

#[debug_handler]
pub(in crate::backend::api) async fn create_article(
    AuthPerson(person): AuthPerson,
    State(context): State<MagpieContext>,
    Form(params): Form<CreateArticleParams>,
) -> BackendResult<Json<ArticleView>> {
    let form = DbArticleForm {
        title: params.title,
        text: params.text,
        author_id: person.id,
    };
    let article = DbArticle::create(form, &context)?;
    Ok(Json(DbArticle::read_view(article.id, &context)?))
}

#[debug_handler]
pub(in crate::backend::api) async fn get_article(
    State(context): State<MagpieContext>,
    Query(params): Query<GetArticleParams>,
) -> BackendResult<Json<ArticleView>> {
    Ok(Json(DbArticle::read_view(params.id, &context)?))
}

#[debug_handler]
pub(in crate::backend::api) async fn like_article(
    AuthPerson(person): AuthPerson,
    State(context): State<MagpieContext>,
    Form(params): Form<LikeArticleParams>,
) -> BackendResult<Json<SuccessResponse>> {
    if params.like {
        DbNotification::set_like(params.article_id, person.id, &context)?;
    } else {
        DbNotification::remove_like(params.article_id, person.id, &context)?;
    }
    Ok(Json(SuccessResponse::default()))
}
