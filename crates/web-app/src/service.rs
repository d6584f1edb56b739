use std::collections::VecDeque;

use crate::{
    OngoingWorkout, OngoingWorkoutRepository, OngoingWorkoutService, Settings, SettingsRepository,
    SettingsService, log,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: log::Repository> log::Service for Service<R> {
    fn get_log_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.repository.read_entries()
    }

    fn add_log_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        self.repository.write_entry(entry)
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    async fn get_settings(&self) -> Result<Settings, String> {
        self.repository.read_settings().await
    }

    async fn set_settings(&self, settings: Settings) -> Result<(), String> {
        self.repository.write_settings(settings).await
    }
}

impl<R: OngoingWorkoutRepository> OngoingWorkoutService for Service<R> {
    async fn get_ongoing_workout(&self) -> Result<Option<OngoingWorkout>, String> {
        self.repository.read_ongoing_workout().await
    }

    async fn set_ongoing_workout(
        &self,
        ongoing_workout: Option<OngoingWorkout>,
    ) -> Result<(), String> {
        self.repository.write_ongoing_workout(ongoing_workout).await
    }
}
