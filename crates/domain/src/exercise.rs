use derive_more::{AsRef, Deref, Display, Into};
use uuid::Uuid;

use crate::{CreateError, Name, ReadError, catalog};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;

    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        self.get_exercises()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(ReadError::NotFound)
    }

    async fn get_muscle_groups(&self) -> Result<Vec<MuscleGroup>, ReadError> {
        Ok(muscle_groups(&self.get_exercises().await?))
    }

    /// Populates an empty catalog with the built-in exercises.
    ///
    /// Returns the number of created exercises, which is zero if any exercise already existed.
    async fn seed_exercises(&self) -> Result<usize, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn create_exercise(
        &self,
        name: Name,
        muscle_group: MuscleGroup,
        suggested_sets: Sets,
        description: Option<String>,
    ) -> Result<Exercise, CreateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub muscle_group: MuscleGroup,
    pub suggested_sets: Sets,
    pub description: Option<String>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Lowercase tag such as `chest` or `legs`.
#[derive(AsRef, Debug, Display, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MuscleGroup(String);

impl MuscleGroup {
    pub fn new(name: &str) -> Result<Self, MuscleGroupError> {
        let normalized = name.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(MuscleGroupError::Empty);
        }

        Ok(Self(normalized))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleGroupError {
    #[error("Muscle group must not be empty")]
    Empty,
}

#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sets(u32);

impl Sets {
    pub fn new(value: u32) -> Result<Self, SetsError> {
        if !(1..100).contains(&value) {
            return Err(SetsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetsError {
    #[error("Sets must be in the range 1 to 99")]
    OutOfRange,
}

/// Distinct muscle groups in order of first appearance.
#[must_use]
pub fn muscle_groups(exercises: &[Exercise]) -> Vec<MuscleGroup> {
    let mut groups: Vec<MuscleGroup> = vec![];
    for exercise in exercises {
        if !groups.contains(&exercise.muscle_group) {
            groups.push(exercise.muscle_group.clone());
        }
    }
    groups
}

pub(crate) async fn seed<R: ExerciseRepository>(repository: &R) -> Result<usize, CreateError> {
    if !repository.read_exercises().await?.is_empty() {
        return Ok(0);
    }

    let mut created = 0;
    for entry in catalog::EXERCISES {
        repository
            .create_exercise(
                Name::new(entry.name).map_err(|err| CreateError::Other(err.into()))?,
                MuscleGroup::new(entry.muscle_group)
                    .map_err(|err| CreateError::Other(err.into()))?,
                Sets::new(entry.suggested_sets).map_err(|err| CreateError::Other(err.into()))?,
                entry.description.map(String::from),
            )
            .await?;
        created += 1;
    }
    Ok(created)
}
