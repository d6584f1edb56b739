use chrono::Utc;
use log::{debug, error};
use rand::Rng;

use crate::{
    CreateError, DeleteError, Exercise, ExerciseHistoryRepository, ExerciseHistoryService,
    ExerciseID, ExerciseRepository, ExerciseService, HistoryEntry, Name, ReadError, Reps,
    SessionRepository, SessionService, StorageError, UpdateError, User, UserID, UserRepository,
    UserService, Weight, Workout, WorkoutDetails, WorkoutExercise, WorkoutID, WorkoutRepository,
    WorkoutService, exercise, history, select_additional, select_alternative, select_exercises,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SessionRepository> Service<R> {
    async fn user_id(&self) -> Result<UserID, ReadError> {
        match self.repository.initialize_session().await {
            Ok(user) => Ok(user.id),
            Err(ReadError::Storage(StorageError::NoSession)) => Err(ReadError::Unauthenticated),
            Err(err) => Err(err),
        }
    }
}

impl<R: SessionRepository + WorkoutRepository> Service<R> {
    /// Workout of the signed-in user. Workouts of other users are reported as not found.
    async fn owned_workout(&self, workout_id: WorkoutID) -> Result<(UserID, Workout), ReadError> {
        let user_id = self.user_id().await?;
        let workout = self.repository.read_workout(workout_id).await?;
        if workout.user_id != user_id {
            return Err(ReadError::NotFound);
        }
        Ok((user_id, workout))
    }
}

impl<R: ExerciseHistoryRepository> Service<R> {
    /// New workout entry prefilled with the most recent values the user recorded.
    async fn prefilled(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<WorkoutExercise, ReadError> {
        let last = history::latest(
            self.repository
                .read_exercise_history(user_id, exercise_id)
                .await?,
        );
        Ok(WorkoutExercise {
            exercise_id,
            weight: last.as_ref().and_then(|e| e.weight),
            reps: last.as_ref().and_then(|e| e.reps),
        })
    }
}

impl<R: SessionRepository> SessionService for Service<R> {
    async fn request_session(&self, user_id: UserID) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.request_session(user_id),
            ReadError,
            "request",
            "session"
        )
    }

    async fn get_session(&self) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.initialize_session(),
            ReadError,
            "get",
            "session"
        )
    }

    async fn delete_session(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.delete_session(),
            DeleteError,
            "delete",
            "session"
        )
    }
}

impl<R: UserRepository> UserService for Service<R> {
    async fn get_users(&self) -> Result<Vec<User>, ReadError> {
        log_on_error!(self.repository.read_users(), ReadError, "get", "users")
    }

    async fn create_user(&self, name: Name) -> Result<User, CreateError> {
        log_on_error!(
            self.repository.create_user(name),
            CreateError,
            "create",
            "user"
        )
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn seed_exercises(&self) -> Result<usize, CreateError> {
        let created = log_on_error!(
            exercise::seed(&self.repository),
            CreateError,
            "seed",
            "exercises"
        )?;
        if created > 0 {
            debug!("seeded catalog with {created} exercises");
        }
        Ok(created)
    }
}

impl<R: SessionRepository + ExerciseHistoryRepository> ExerciseHistoryService for Service<R> {
    async fn get_exercise_history(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Vec<HistoryEntry>, ReadError> {
        let user_id = self.user_id().await?;
        log_on_error!(
            self.repository.read_exercise_history(user_id, exercise_id),
            ReadError,
            "get",
            "exercise history"
        )
    }
}

impl<R> WorkoutService for Service<R>
where
    R: SessionRepository + ExerciseRepository + ExerciseHistoryRepository + WorkoutRepository,
{
    async fn generate_workout<G: Rng + ?Sized>(
        &self,
        rng: &mut G,
    ) -> Result<WorkoutID, CreateError> {
        let user_id = self.user_id().await?;

        if self
            .repository
            .read_workouts(user_id)
            .await?
            .iter()
            .any(Workout::is_open)
        {
            return Err(CreateError::Conflict);
        }

        let exercises = self.get_exercises().await?;
        let selected = select_exercises(&exercises, rng);
        debug!("generating workout with {} exercises", selected.len());

        let workout = log_on_error!(
            self.repository.create_workout(
                user_id,
                selected.iter().copied().map(WorkoutExercise::new).collect(),
                selected,
            ),
            CreateError,
            "create",
            "workout"
        )?;
        Ok(workout.id)
    }

    async fn get_current_workout(&self) -> Result<Option<WorkoutDetails>, ReadError> {
        let user_id = match self.user_id().await {
            Ok(user_id) => user_id,
            Err(ReadError::Unauthenticated) => return Ok(None),
            Err(err) => return Err(err),
        };

        let workouts = log_on_error!(
            self.repository.read_workouts(user_id),
            ReadError,
            "get",
            "workouts"
        )?;
        let Some(workout) = workouts.into_iter().find(Workout::is_open) else {
            return Ok(None);
        };

        let exercises = self.get_exercises().await?;
        Ok(Some(workout.details(&exercises)))
    }

    async fn update_exercise(
        &self,
        workout_id: WorkoutID,
        exercise_id: ExerciseID,
        weight: Option<Weight>,
        reps: Option<Reps>,
    ) -> Result<(), UpdateError> {
        let (user_id, mut workout) = self.owned_workout(workout_id).await?;

        if workout.set_values(exercise_id, weight, reps) == 0 {
            debug!(
                "exercise {} not part of workout {}",
                *exercise_id, *workout_id
            );
        }

        log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )?;

        if let Some(entry) = HistoryEntry::new(user_id, exercise_id, weight, reps, Utc::now()) {
            log_on_error!(
                self.repository.create_history_entry(entry),
                CreateError,
                "create",
                "history entry"
            )?;
        }

        Ok(())
    }

    async fn reroll_exercise<G: Rng + ?Sized>(
        &self,
        workout_id: WorkoutID,
        exercise_id: ExerciseID,
        rng: &mut G,
    ) -> Result<(), UpdateError> {
        let (user_id, mut workout) = self.owned_workout(workout_id).await?;

        let exercises = self.get_exercises().await?;
        let muscle_group = exercises
            .iter()
            .find(|e| e.id == exercise_id)
            .map(|e| e.muscle_group.clone())
            .ok_or(UpdateError::NotFound)?;

        let new_exercise_id = select_alternative(
            &exercises,
            &muscle_group,
            &workout.suggested_exercises,
            rng,
        )
        .ok_or(UpdateError::NotFound)?;
        debug!(
            "rerolling exercise {} of workout {} to {}",
            *exercise_id, *workout_id, *new_exercise_id
        );

        let replacement = self.prefilled(user_id, new_exercise_id).await?;
        workout.reroll(exercise_id, &replacement);

        log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )?;
        Ok(())
    }

    async fn add_exercise<G: Rng + ?Sized>(
        &self,
        workout_id: WorkoutID,
        rng: &mut G,
    ) -> Result<(), UpdateError> {
        let (user_id, mut workout) = self.owned_workout(workout_id).await?;

        let exercises = self.get_exercises().await?;
        let exercise_id = select_additional(&exercises, &workout.suggested_exercises, rng)
            .ok_or(UpdateError::NotFound)?;
        debug!("adding exercise {} to workout {}", *exercise_id, *workout_id);

        workout.append(self.prefilled(user_id, exercise_id).await?);

        log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )?;
        Ok(())
    }

    async fn complete_workout(&self, workout_id: WorkoutID) -> Result<(), UpdateError> {
        let (_, mut workout) = self.owned_workout(workout_id).await?;

        workout.completed = true;

        log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )?;
        Ok(())
    }
}
