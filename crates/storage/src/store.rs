use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use liftbuddy_domain as domain;

use crate::{
    Backend, BackendError, Table,
    model::{Exercise, HistoryEntry, ModelError, User, Workout},
};

/// Implements all repositories on top of a key/value backend.
///
/// Each table is stored as a JSON array under its own key. Every repository call holds the
/// backend lock for its whole duration.
pub struct Store<B> {
    backend: Mutex<B>,
}

impl<B: Backend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, B>, domain::StorageError> {
        self.backend
            .lock()
            .map_err(|_| BackendError::Other(anyhow!("storage lock poisoned")).into())
    }

    fn get_all<R, V>(backend: &B, table: Table) -> Result<Vec<R>, BackendError>
    where
        R: TryFrom<V, Error = ModelError>,
        V: DeserializeOwned,
    {
        let values: Vec<V> = backend.read(table.as_ref())?.unwrap_or_default();
        Ok(values
            .into_iter()
            .map(R::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn put_all<'a, V: 'a, T>(
        backend: &mut B,
        table: Table,
        values: impl IntoIterator<Item = &'a V>,
    ) -> Result<(), BackendError>
    where
        T: From<&'a V> + Serialize,
    {
        backend.write(
            table.as_ref(),
            &values.into_iter().map(T::from).collect::<Vec<T>>(),
        )
    }

    fn users(backend: &B) -> Result<Vec<domain::User>, BackendError> {
        Self::get_all::<domain::User, User>(backend, Table::Users)
    }

    fn exercises(backend: &B) -> Result<Vec<domain::Exercise>, BackendError> {
        Self::get_all::<domain::Exercise, Exercise>(backend, Table::Exercises)
    }

    fn workouts(backend: &B) -> Result<Vec<domain::Workout>, BackendError> {
        Self::get_all::<domain::Workout, Workout>(backend, Table::Workouts)
    }

    fn history(backend: &B) -> Result<Vec<domain::HistoryEntry>, BackendError> {
        Self::get_all::<domain::HistoryEntry, HistoryEntry>(backend, Table::ExerciseHistory)
    }
}

fn storage_error(err: BackendError) -> domain::StorageError {
    domain::StorageError::from(err)
}

impl<B: Backend> domain::SessionRepository for Store<B> {
    async fn request_session(
        &self,
        user_id: domain::UserID,
    ) -> Result<domain::User, domain::ReadError> {
        let mut backend = self.lock()?;
        let user = Self::users(&backend)
            .map_err(storage_error)?
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or(domain::ReadError::NotFound)?;
        backend
            .write(Table::Session.as_ref(), &*user.id)
            .map_err(storage_error)?;
        debug!("started session for user {}", *user.id);
        Ok(user)
    }

    async fn initialize_session(&self) -> Result<domain::User, domain::ReadError> {
        let backend = self.lock()?;
        let Some(user_id) = backend
            .read::<Uuid>(Table::Session.as_ref())
            .map_err(storage_error)?
        else {
            return Err(domain::StorageError::NoSession.into());
        };
        Self::users(&backend)
            .map_err(storage_error)?
            .into_iter()
            .find(|u| *u.id == user_id)
            .ok_or(domain::StorageError::NoSession.into())
    }

    async fn delete_session(&self) -> Result<(), domain::DeleteError> {
        let mut backend = self.lock()?;
        backend
            .remove(Table::Session.as_ref())
            .map_err(storage_error)?;
        Ok(())
    }
}

impl<B: Backend> domain::UserRepository for Store<B> {
    async fn read_users(&self) -> Result<Vec<domain::User>, domain::ReadError> {
        let backend = self.lock()?;
        Ok(Self::users(&backend).map_err(storage_error)?)
    }

    async fn create_user(&self, name: domain::Name) -> Result<domain::User, domain::CreateError> {
        let mut backend = self.lock()?;
        let mut users = Self::users(&backend).map_err(storage_error)?;
        if users.iter().any(|u| u.name == name) {
            return Err(domain::CreateError::Conflict);
        }
        let user = domain::User {
            id: Uuid::new_v4().into(),
            name,
        };
        users.push(user.clone());
        Self::put_all::<_, User>(&mut backend, Table::Users, &users).map_err(storage_error)?;
        Ok(user)
    }
}

impl<B: Backend> domain::ExerciseRepository for Store<B> {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let backend = self.lock()?;
        Ok(Self::exercises(&backend).map_err(storage_error)?)
    }

    async fn create_exercise(
        &self,
        name: domain::Name,
        muscle_group: domain::MuscleGroup,
        suggested_sets: domain::Sets,
        description: Option<String>,
    ) -> Result<domain::Exercise, domain::CreateError> {
        let mut backend = self.lock()?;
        let mut exercises = Self::exercises(&backend).map_err(storage_error)?;
        let exercise = domain::Exercise {
            id: Uuid::new_v4().into(),
            name,
            muscle_group,
            suggested_sets,
            description,
        };
        exercises.push(exercise.clone());
        Self::put_all::<_, Exercise>(&mut backend, Table::Exercises, &exercises)
            .map_err(storage_error)?;
        Ok(exercise)
    }
}

impl<B: Backend> domain::ExerciseHistoryRepository for Store<B> {
    async fn read_exercise_history(
        &self,
        user_id: domain::UserID,
        exercise_id: domain::ExerciseID,
    ) -> Result<Vec<domain::HistoryEntry>, domain::ReadError> {
        let backend = self.lock()?;
        Ok(Self::history(&backend)
            .map_err(storage_error)?
            .into_iter()
            .filter(|e| e.user_id == user_id && e.exercise_id == exercise_id)
            .collect())
    }

    async fn create_history_entry(
        &self,
        entry: domain::HistoryEntry,
    ) -> Result<domain::HistoryEntry, domain::CreateError> {
        let mut backend = self.lock()?;
        let mut history = Self::history(&backend).map_err(storage_error)?;
        history.push(entry.clone());
        Self::put_all::<_, HistoryEntry>(&mut backend, Table::ExerciseHistory, &history)
            .map_err(storage_error)?;
        Ok(entry)
    }
}

impl<B: Backend> domain::WorkoutRepository for Store<B> {
    async fn read_workouts(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::Workout>, domain::ReadError> {
        let backend = self.lock()?;
        Ok(Self::workouts(&backend)
            .map_err(storage_error)?
            .into_iter()
            .filter(|w| w.user_id == user_id)
            .collect())
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::Workout, domain::ReadError> {
        let backend = self.lock()?;
        Self::workouts(&backend)
            .map_err(storage_error)?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or(domain::ReadError::NotFound)
    }

    async fn create_workout(
        &self,
        user_id: domain::UserID,
        exercises: Vec<domain::WorkoutExercise>,
        suggested_exercises: Vec<domain::ExerciseID>,
    ) -> Result<domain::Workout, domain::CreateError> {
        let mut backend = self.lock()?;
        let mut workouts = Self::workouts(&backend).map_err(storage_error)?;
        let workout = domain::Workout {
            id: Uuid::new_v4().into(),
            user_id,
            exercises,
            suggested_exercises,
            completed: false,
            version: 0,
        };
        workouts.push(workout.clone());
        Self::put_all::<_, Workout>(&mut backend, Table::Workouts, &workouts)
            .map_err(storage_error)?;
        Ok(workout)
    }

    async fn replace_workout(
        &self,
        mut workout: domain::Workout,
    ) -> Result<domain::Workout, domain::UpdateError> {
        let mut backend = self.lock()?;
        let mut workouts = Self::workouts(&backend).map_err(storage_error)?;
        let stored = workouts
            .iter_mut()
            .find(|w| w.id == workout.id)
            .ok_or(domain::UpdateError::NotFound)?;
        if stored.version != workout.version {
            debug!(
                "rejected stale workout {} (version {} != {})",
                *workout.id, workout.version, stored.version
            );
            return Err(domain::UpdateError::Conflict);
        }
        workout.version += 1;
        *stored = workout.clone();
        Self::put_all::<_, Workout>(&mut backend, Table::Workouts, &workouts)
            .map_err(storage_error)?;
        Ok(workout)
    }
}
