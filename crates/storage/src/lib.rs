#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use serde::{Serialize, de::DeserializeOwned};
use strum::AsRefStr;

use liftbuddy_domain as domain;

#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod memory;
mod model;
mod store;


pub use model::ModelError;
pub use store::Store;

/// Key/value storage holding one serialized value per key.
pub trait Backend {
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BackendError>;
    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), BackendError>;
    fn remove(&mut self, key: &str) -> Result<(), BackendError>;
}

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    LocalStorage(#[from] gloo_storage::errors::StorageError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<BackendError> for domain::StorageError {
    fn from(value: BackendError) -> Self {
        domain::StorageError::Other(Box::new(value))
    }
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    #[strum(serialize = "users")]
    Users,
    #[strum(serialize = "session")]
    Session,
    #[strum(serialize = "exercises")]
    Exercises,
    #[strum(serialize = "workouts")]
    Workouts,
    #[strum(serialize = "exercise_history")]
    ExerciseHistory,
}
