use super::AuthPerson;
use crate::{
    backend::{
        store::{comment::DbCommentInsertForm, MagpieContext},
        utils::error::BackendResult,
    },
    common::comment::{
        CreateCommentParams, DbComment, DbCommentView, DeleteCommentParams, DeleteCommentResult,
        GetRepliesParams, GetRootCommentsParams,
    },
};
use axum::{
    extract::{Query, State},
    Form, Json,
};
use axum_macros::debug_handler;

#[debug_handler]
pub(in crate::backend::api) async fn create_comment(
    AuthPerson(person): AuthPerson,
    State(context): State<MagpieContext>,
    Form(params): Form<CreateCommentParams>,
) -> BackendResult<Json<DbCommentView>> {
    let form = DbCommentInsertForm {
        creator_id: person.id,
        article_id: params.article_id,
        parent_id: params.parent_id,
        content: params.content,
    };
    Ok(Json(DbComment::create(form, &context)?))
}

#[debug_handler]
pub(in crate::backend::api) async fn get_root_comments(
    State(context): State<MagpieContext>,
    Query(params): Query<GetRootCommentsParams>,
) -> BackendResult<Json<Vec<DbCommentView>>> {
    Ok(Json(DbComment::read_roots(
        params.article_id,
        params.skip,
        params.limit,
        &context,
    )?))
}

#[debug_handler]
pub(in crate::backend::api) async fn get_replies(
    State(context): State<MagpieContext>,
    Query(params): Query<GetRepliesParams>,
) -> BackendResult<Json<Vec<DbCommentView>>> {
    Ok(Json(DbComment::read_replies(
        params.parent_id,
        params.skip,
        params.limit,
        &context,
    )?))
}

#[debug_handler]
pub(in crate::backend::api) async fn delete_comment(
    AuthPerson(person): AuthPerson,
    State(context): State<MagpieContext>,
    Form(params): Form<DeleteCommentParams>,
) -> BackendResult<Json<DeleteCommentResult>> {
    Ok(Json(DbComment::delete(params.id, person.id, &context)?))
}
