use tracing::{info, warn};
use uuid::Uuid;

use super::{matches, required};
use crate::errors::{ServiceError, ServiceResult};
use crate::models::{Actor, NewUser, User, UserFilter, UserPatch};
use crate::store::{MemoryStore, Store};

const USER_NOT_FOUND: &str = "User not found.";

pub struct UserService {
    store: Box<dyn Store<User>>,
}

impl UserService {
    pub fn new(store: Box<dyn Store<User>>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn create(&mut self, input: NewUser) -> ServiceResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: required(&input.name, "Name is required.")?,
            nickname: required(&input.nickname, "Nickname is required.")?,
            phone: input.phone.trim().to_string(),
            email: validate_email(&input.email)?,
            profile: input.profile,
        };
        self.ensure_nickname_free(&user.nickname, None)?;
        self.store.insert(user.clone())?;
        info!(id = %user.id, nickname = %user.nickname, "user created");
        Ok(user)
    }

    pub fn list(&self, filter: Option<&UserFilter>) -> ServiceResult<Vec<User>> {
        let users = self.store.list()?;
        let Some(filter) = filter else {
            return Ok(users);
        };
        Ok(users
            .into_iter()
            .filter(|user| {
                matches(&user.name, filter.name.as_deref())
                    && matches(&user.nickname, filter.nickname.as_deref())
            })
            .collect())
    }

    pub fn get(&self, id: Uuid) -> ServiceResult<User> {
        self.store
            .find(id)?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    pub fn update(&mut self, id: Uuid, patch: UserPatch) -> ServiceResult<User> {
        let mut user = self.get(id)?;
        if let Some(name) = patch.name {
            user.name = required(&name, "Name is required.")?;
        }
        if let Some(nickname) = patch.nickname {
            let nickname = required(&nickname, "Nickname is required.")?;
            self.ensure_nickname_free(&nickname, Some(id))?;
            user.nickname = nickname;
        }
        if let Some(phone) = patch.phone {
            user.phone = phone.trim().to_string();
        }
        if let Some(email) = patch.email {
            user.email = validate_email(&email)?;
        }
        if let Some(profile) = patch.profile {
            user.profile = profile;
        }

        if !self.store.replace(user.clone())? {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }
        info!(%id, nickname = %user.nickname, "user updated");
        Ok(user)
    }

    /// Remove a user account. Restricted to administrators.
    pub fn delete(&mut self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        let user = self.get(id)?;
        if !actor.role.can_manage_users() {
            warn!(%id, actor = %actor, "user deletion refused");
            return Err(ServiceError::unauthorized(
                "Only administrators can delete users.",
            ));
        }
        if !self.store.remove(id)? {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }
        info!(%id, nickname = %user.nickname, by = %actor.nickname, "user deleted");
        Ok(())
    }

    fn ensure_nickname_free(&self, nickname: &str, except: Option<Uuid>) -> ServiceResult<()> {
        let taken = self
            .store
            .list()?
            .iter()
            .any(|user| user.nickname == nickname && Some(user.id) != except);
        if taken {
            Err(ServiceError::conflict(format!(
                "Nickname {nickname} is already taken."
            )))
        } else {
            Ok(())
        }
    }
}

fn validate_email(raw: &str) -> ServiceResult<String> {
    let email = required(raw, "Email is required.")?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ServiceError::validation("Email must look like name@domain.")),
    }
}
