use chrono::{DateTime, Utc};

#[allow(async_fn_in_trait)]
pub trait OngoingWorkoutService {
    async fn get_ongoing_workout(&self) -> Result<Option<OngoingWorkout>, String>;
    async fn set_ongoing_workout(&self, ongoing_workout: Option<OngoingWorkout>)
    -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait OngoingWorkoutRepository {
    async fn read_ongoing_workout(&self) -> Result<Option<OngoingWorkout>, String>;
    async fn write_ongoing_workout(
        &self,
        ongoing_workout: Option<OngoingWorkout>,
    ) -> Result<(), String>;
}

/// Position within the current workout, kept across page reloads.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct OngoingWorkout {
    pub workout_id: u128,
    pub start_time: DateTime<Utc>,
    pub exercise_idx: usize,
}

impl OngoingWorkout {
    #[must_use]
    pub fn new(workout_id: u128) -> Self {
        Self {
            workout_id,
            start_time: Utc::now(),
            exercise_idx: 0,
        }
    }

    /// Cursor position for a workout with `len` exercises.
    #[must_use]
    pub fn exercise_idx(&self, len: usize) -> usize {
        self.exercise_idx.min(len.saturating_sub(1))
    }
}
