use super::AuthPerson;
use crate::{
    backend::{store::MagpieContext, utils::error::BackendResult},
    common::notifications::DbNotification,
};
use axum::{extract::State, Json};
use axum_macros::debug_handler;

#[debug_handler]
pub(in crate::backend::api) async fn list_notifications(
    AuthPerson(person): AuthPerson,
    State(context): State<MagpieContext>,
) -> BackendResult<Json<Vec<DbNotification>>> {
    Ok(Json(DbNotification::list(person.id, &context)))
}

#[debug_handler]
pub(in crate::backend::api) async fn count_notifications(
    AuthPerson(person): AuthPerson,
    State(context): State<MagpieContext>,
) -> BackendResult<Json<i64>> {
    Ok(Json(DbNotification::count(person.id, &context)))
}
