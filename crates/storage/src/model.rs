use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use liftbuddy_domain as domain;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    Name(#[from] domain::NameError),
    #[error(transparent)]
    MuscleGroup(#[from] domain::MuscleGroupError),
    #[error(transparent)]
    Sets(#[from] domain::SetsError),
    #[error(transparent)]
    Weight(#[from] domain::WeightError),
    #[error(transparent)]
    Reps(#[from] domain::RepsError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

impl From<&domain::User> for User {
    fn from(value: &domain::User) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
        }
    }
}

impl TryFrom<User> for domain::User {
    type Error = ModelError;

    fn try_from(value: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: String,
    pub suggested_sets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            muscle_group: value.muscle_group.to_string(),
            suggested_sets: value.suggested_sets.into(),
            description: value.description.clone(),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = ModelError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            muscle_group: domain::MuscleGroup::new(&value.muscle_group)?,
            suggested_sets: domain::Sets::new(value.suggested_sets)?,
            description: value.description,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercises: Vec<WorkoutExercise>,
    pub suggested_exercises: Vec<Uuid>,
    pub completed: bool,
    #[serde(default)]
    pub version: u32,
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self {
            id: *value.id,
            user_id: *value.user_id,
            exercises: value.exercises.iter().map(WorkoutExercise::from).collect(),
            suggested_exercises: value.suggested_exercises.iter().map(|id| **id).collect(),
            completed: value.completed,
            version: value.version,
        }
    }
}

impl TryFrom<Workout> for domain::Workout {
    type Error = ModelError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            user_id: value.user_id.into(),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::WorkoutExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            suggested_exercises: value
                .suggested_exercises
                .into_iter()
                .map(domain::ExerciseID::from)
                .collect(),
            completed: value.completed,
            version: value.version,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub exercise_id: Uuid,
    pub weight: Option<f32>,
    pub reps: Option<u32>,
}

impl From<&domain::WorkoutExercise> for WorkoutExercise {
    fn from(value: &domain::WorkoutExercise) -> Self {
        Self {
            exercise_id: *value.exercise_id,
            weight: value.weight.map(f32::from),
            reps: value.reps.map(u32::from),
        }
    }
}

impl TryFrom<WorkoutExercise> for domain::WorkoutExercise {
    type Error = ModelError;

    fn try_from(value: WorkoutExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            exercise_id: value.exercise_id.into(),
            weight: value.weight.map(domain::Weight::new).transpose()?,
            reps: value.reps.map(domain::Reps::new).transpose()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub user_id: Uuid,
    pub exercise_id: Uuid,
    pub weight: Option<f32>,
    pub reps: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

impl From<&domain::HistoryEntry> for HistoryEntry {
    fn from(value: &domain::HistoryEntry) -> Self {
        Self {
            user_id: *value.user_id,
            exercise_id: *value.exercise_id,
            weight: value.weight.map(f32::from),
            reps: value.reps.map(u32::from),
            timestamp: value.timestamp,
        }
    }
}

impl TryFrom<HistoryEntry> for domain::HistoryEntry {
    type Error = ModelError;

    fn try_from(value: HistoryEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: value.user_id.into(),
            exercise_id: value.exercise_id.into(),
            weight: value.weight.map(domain::Weight::new).transpose()?,
            reps: value.reps.map(domain::Reps::new).transpose()?,
            timestamp: value.timestamp,
        })
    }
}
