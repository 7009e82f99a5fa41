use super::newtypes::PersonId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account. Only the fields the comment engine needs; profile data
/// lives with the external account service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DbPerson {
    pub id: PersonId,
    pub username: String,
    #[serde(skip)]
    pub password_encrypted: String,
    pub published: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RegisterUserParams {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginUserParams {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginResponse {
    pub jwt: String,
    pub person: DbPerson,
}
