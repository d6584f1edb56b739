use chrono::{DateTime, Utc};

use crate::{CreateError, ExerciseID, ReadError, Reps, UserID, Weight};

#[allow(async_fn_in_trait)]
pub trait ExerciseHistoryService {
    /// Entries of the signed-in user for the given exercise, oldest first.
    async fn get_exercise_history(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Vec<HistoryEntry>, ReadError>;

    async fn get_last_values(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Option<HistoryEntry>, ReadError> {
        Ok(latest(self.get_exercise_history(exercise_id).await?))
    }
}

#[allow(async_fn_in_trait)]
pub trait ExerciseHistoryRepository {
    async fn read_exercise_history(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
    ) -> Result<Vec<HistoryEntry>, ReadError>;
    async fn create_history_entry(&self, entry: HistoryEntry)
    -> Result<HistoryEntry, CreateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub user_id: UserID,
    pub exercise_id: ExerciseID,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Returns `None` if neither weight nor reps is given, as there is nothing to record.
    #[must_use]
    pub fn new(
        user_id: UserID,
        exercise_id: ExerciseID,
        weight: Option<Weight>,
        reps: Option<Reps>,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        if weight.is_none() && reps.is_none() {
            return None;
        }
        Some(Self {
            user_id,
            exercise_id,
            weight,
            reps,
            timestamp,
        })
    }
}

/// Most recent entry. Of entries with equal timestamps the one appended last wins.
#[must_use]
pub fn latest(entries: impl IntoIterator<Item = HistoryEntry>) -> Option<HistoryEntry> {
    entries.into_iter().max_by_key(|e| e.timestamp)
}
