use derive_more::{AsRef, Display};

/// Maximum number of characters of a user or exercise name.
pub const MAX_NAME_LEN: usize = 64;

/// Display name of a user or an exercise, stored without surrounding whitespace.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(value: &str) -> Result<Self, NameError> {
        let value = value.trim();

        match value.chars().count() {
            0 => Err(NameError::Empty),
            len if len > MAX_NAME_LEN => Err(NameError::TooLong(len)),
            _ => Ok(Self(value.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must not exceed {MAX_NAME_LEN} characters (got {0})")]
    TooLong(usize),
}
