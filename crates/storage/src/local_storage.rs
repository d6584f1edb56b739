use std::collections::VecDeque;

use gloo_storage::{LocalStorage, Storage as GlooStorage, errors::StorageError};
use serde::{Serialize, de::DeserializeOwned};

use liftbuddy_web_app::{
    OngoingWorkout, OngoingWorkoutRepository, Settings, SettingsRepository, log,
};

use crate::{Backend, BackendError};

/// Backend persisting each table in the browser's local storage.
pub struct Browser;

impl Backend for Browser {
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BackendError> {
        match LocalStorage::get(key) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), BackendError> {
        Ok(LocalStorage::set(key, value)?)
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        LocalStorage::delete(key);
        Ok(())
    }
}

pub struct UI;

const KEY_SETTINGS: &str = "settings";
const KEY_ONGOING_WORKOUT: &str = "ongoing workout";

impl SettingsRepository for UI {
    async fn read_settings(&self) -> Result<Settings, String> {
        match LocalStorage::get(KEY_SETTINGS) {
            Ok(settings) => Ok(settings),
            Err(StorageError::KeyNotFound(_)) => Ok(Settings::default()),
            Err(err) => Err(err.to_string()),
        }
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        LocalStorage::set(KEY_SETTINGS, settings).map_err(|err| err.to_string())
    }
}

impl OngoingWorkoutRepository for UI {
    async fn read_ongoing_workout(&self) -> Result<Option<OngoingWorkout>, String> {
        match LocalStorage::get(KEY_ONGOING_WORKOUT) {
            Ok(ongoing_workout) => Ok(ongoing_workout),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(err.to_string()),
        }
    }

    async fn write_ongoing_workout(
        &self,
        ongoing_workout: Option<OngoingWorkout>,
    ) -> Result<(), String> {
        LocalStorage::set(KEY_ONGOING_WORKOUT, ongoing_workout).map_err(|err| err.to_string())
    }
}

pub struct Log;

const KEY_LOG: &str = "log";

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(StorageError::KeyNotFound(_)) => Ok(VecDeque::new()),
            Err(err) => Err(log::Error::Unknown(err.to_string())),
        }
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry);
        LocalStorage::set(KEY_LOG, entries).map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
