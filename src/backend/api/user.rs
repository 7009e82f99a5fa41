use crate::{
    backend::{store::MagpieContext, utils::error::BackendResult},
    common::user::{DbPerson, LoginResponse, LoginUserParams, RegisterUserParams},
};
use axum::{extract::State, Form, Json};
use axum_macros::debug_handler;
use chrono::Utc;
use jsonwebtoken::{decode, encode, get_current_timestamp, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// person.username
    pub sub: String,
    /// Creation time as unix timestamp
    pub iat: i64,
    /// Expiration time
    pub exp: u64,
}

fn generate_login_token(person: &DbPerson, context: &MagpieContext) -> BackendResult<String> {
    let claims = Claims {
        sub: person.username.clone(),
        iat: Utc::now().timestamp(),
        exp: get_current_timestamp() + 60 * 60 * 24 * 365,
    };
    let key = EncodingKey::from_secret(context.config.auth.jwt_secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

pub(crate) fn validate(jwt: &str, context: &MagpieContext) -> BackendResult<DbPerson> {
    let key = DecodingKey::from_secret(context.config.auth.jwt_secret.as_bytes());
    let claims = decode::<Claims>(jwt, &key, &Validation::default())?.claims;
    DbPerson::read_from_name(&claims.sub, context)
}

#[debug_handler]
pub(in crate::backend::api) async fn register_user(
    State(context): State<MagpieContext>,
    Form(params): Form<RegisterUserParams>,
) -> BackendResult<Json<LoginResponse>> {
    let person = DbPerson::create(&params.username, &params.password, &context)?;
    let jwt = generate_login_token(&person, &context)?;
    Ok(Json(LoginResponse { jwt, person }))
}

#[debug_handler]
pub(in crate::backend::api) async fn login_user(
    State(context): State<MagpieContext>,
    Form(params): Form<LoginUserParams>,
) -> BackendResult<Json<LoginResponse>> {
    let person = DbPerson::verify_login(&params.username, &params.password, &context)?;
    let jwt = generate_login_token(&person, &context)?;
    Ok(Json(LoginResponse { jwt, person }))
}
