use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait UserService {
    async fn get_users(&self) -> Result<Vec<User>, ReadError>;
    async fn create_user(&self, name: Name) -> Result<User, CreateError>;

    async fn validate_user_name(&self, name: &str) -> Result<Name, CreateError> {
        let name = Name::new(name).map_err(|err| CreateError::Other(err.into()))?;
        let users = self.get_users().await?;
        if users.iter().any(|u| u.name == name) {
            return Err(CreateError::Conflict);
        }
        Ok(name)
    }
}

#[allow(async_fn_in_trait)]
pub trait UserRepository {
    async fn read_users(&self) -> Result<Vec<User>, ReadError>;
    async fn create_user(&self, name: Name) -> Result<User, CreateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub name: Name,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}
