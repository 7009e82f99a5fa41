use super::MagpieContext;
use crate::{
    backend::utils::{
        error::{BackendError, BackendResult},
        validate::validate_user_name,
    },
    common::{newtypes::PersonId, user::DbPerson},
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;

impl DbPerson {
    pub fn create(username: &str, password: &str, context: &MagpieContext) -> BackendResult<Self> {
        validate_user_name(username)?;
        if Self::read_from_name(username, context).is_ok() {
            return Err(BackendError::Validation(
                "Username already taken".to_string(),
            ));
        }
        let person = DbPerson {
            id: context.store.next_person_id(),
            username: username.to_string(),
            password_encrypted: hash(password, DEFAULT_COST)?,
            published: Utc::now(),
        };
        context.store.persons.insert(person.id, person.clone());
        Ok(person)
    }

    pub fn read(id: PersonId, context: &MagpieContext) -> BackendResult<Self> {
        context
            .store
            .persons
            .get(&id)
            .map(|p| p.clone())
            .ok_or(BackendError::NotFound)
    }

    pub fn read_from_name(username: &str, context: &MagpieContext) -> BackendResult<Self> {
        context
            .store
            .persons
            .iter()
            .find(|p| p.username == username)
            .map(|p| p.clone())
            .ok_or(BackendError::NotFound)
    }

    pub fn verify_login(
        username: &str,
        password: &str,
        context: &MagpieContext,
    ) -> BackendResult<Self> {
        let person = Self::read_from_name(username, context)
            .map_err(|_| BackendError::Validation("Invalid login".to_string()))?;
        if !verify(password, &person.password_encrypted)? {
            return Err(BackendError::Validation("Invalid login".to_string()));
        }
        Ok(person)
    }
}
