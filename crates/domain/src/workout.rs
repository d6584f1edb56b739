use derive_more::Deref;
use log::warn;
use rand::{Rng, seq::IndexedRandom};
use uuid::Uuid;

use crate::{
    CreateError, Exercise, ExerciseID, MuscleGroup, Name, ReadError, Reps, Sets, UpdateError,
    UserID, Weight, muscle_groups,
};

/// Operations on the workout of the signed-in user.
///
/// All methods fail with `Unauthenticated` if there is no session, except for
/// `get_current_workout`, which returns `None` in that case. Operations on a workout
/// that does not exist or belongs to another user fail with `NotFound`.
#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    /// Creates a workout with one randomly selected exercise per muscle group.
    ///
    /// Fails with `Conflict` while the user has an open workout.
    async fn generate_workout<G: Rng + ?Sized>(&self, rng: &mut G)
    -> Result<WorkoutID, CreateError>;

    async fn get_current_workout(&self) -> Result<Option<WorkoutDetails>, ReadError>;

    /// Replaces weight and reps of all entries of the given exercise.
    ///
    /// A history entry is recorded if weight or reps is given. The workout is written first, so
    /// an error while recording the history entry leaves the new values in place.
    async fn update_exercise(
        &self,
        workout_id: WorkoutID,
        exercise_id: ExerciseID,
        weight: Option<Weight>,
        reps: Option<Reps>,
    ) -> Result<(), UpdateError>;

    /// Swaps the given exercise for another one of the same muscle group.
    ///
    /// Exercises that have not been suggested in this workout yet are preferred.
    async fn reroll_exercise<G: Rng + ?Sized>(
        &self,
        workout_id: WorkoutID,
        exercise_id: ExerciseID,
        rng: &mut G,
    ) -> Result<(), UpdateError>;

    async fn add_exercise<G: Rng + ?Sized>(
        &self,
        workout_id: WorkoutID,
        rng: &mut G,
    ) -> Result<(), UpdateError>;

    async fn complete_workout(&self, workout_id: WorkoutID) -> Result<(), UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    /// All workouts of the user in creation order.
    async fn read_workouts(&self, user_id: UserID) -> Result<Vec<Workout>, ReadError>;
    async fn read_workout(&self, id: WorkoutID) -> Result<Workout, ReadError>;
    async fn create_workout(
        &self,
        user_id: UserID,
        exercises: Vec<WorkoutExercise>,
        suggested_exercises: Vec<ExerciseID>,
    ) -> Result<Workout, CreateError>;
    /// Stores the workout if its version matches the stored one and returns it with an
    /// incremented version. A version mismatch results in `Conflict`.
    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub user_id: UserID,
    pub exercises: Vec<WorkoutExercise>,
    pub suggested_exercises: Vec<ExerciseID>,
    pub completed: bool,
    pub version: u32,
}

impl Workout {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.completed
    }

    /// Returns the number of updated entries.
    pub fn set_values(
        &mut self,
        exercise_id: ExerciseID,
        weight: Option<Weight>,
        reps: Option<Reps>,
    ) -> usize {
        let mut updated = 0;
        for entry in self
            .exercises
            .iter_mut()
            .filter(|e| e.exercise_id == exercise_id)
        {
            entry.weight = weight;
            entry.reps = reps;
            updated += 1;
        }
        updated
    }

    /// Replaces all entries of `exercise_id` and marks the new exercise as suggested.
    pub fn reroll(&mut self, exercise_id: ExerciseID, replacement: &WorkoutExercise) {
        for entry in self
            .exercises
            .iter_mut()
            .filter(|e| e.exercise_id == exercise_id)
        {
            *entry = replacement.clone();
        }
        self.suggested_exercises.push(replacement.exercise_id);
    }

    pub fn append(&mut self, entry: WorkoutExercise) {
        self.suggested_exercises.push(entry.exercise_id);
        self.exercises.push(entry);
    }

    /// Joins the entries with the exercise catalog. Entries of unknown exercises are omitted.
    #[must_use]
    pub fn details(&self, exercises: &[Exercise]) -> WorkoutDetails {
        WorkoutDetails {
            id: self.id,
            completed: self.completed,
            suggested_exercises: self.suggested_exercises.clone(),
            exercises: self
                .exercises
                .iter()
                .filter_map(|entry| {
                    let Some(exercise) = exercises.iter().find(|e| e.id == entry.exercise_id)
                    else {
                        warn!(
                            "exercise {} of workout {} not found in catalog",
                            *entry.exercise_id, *self.id
                        );
                        return None;
                    };
                    Some(WorkoutExerciseDetails {
                        exercise_id: entry.exercise_id,
                        name: exercise.name.clone(),
                        muscle_group: exercise.muscle_group.clone(),
                        suggested_sets: exercise.suggested_sets,
                        description: exercise.description.clone(),
                        weight: entry.weight,
                        reps: entry.reps,
                    })
                })
                .collect(),
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub exercise_id: ExerciseID,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
}

impl WorkoutExercise {
    #[must_use]
    pub fn new(exercise_id: ExerciseID) -> Self {
        Self {
            exercise_id,
            weight: None,
            reps: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetails {
    pub id: WorkoutID,
    pub completed: bool,
    pub suggested_exercises: Vec<ExerciseID>,
    pub exercises: Vec<WorkoutExerciseDetails>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExerciseDetails {
    pub exercise_id: ExerciseID,
    pub name: Name,
    pub muscle_group: MuscleGroup,
    pub suggested_sets: Sets,
    pub description: Option<String>,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
}

/// One exercise per muscle group, in order of the first appearance of the group.
pub fn select_exercises<G: Rng + ?Sized>(exercises: &[Exercise], rng: &mut G) -> Vec<ExerciseID> {
    muscle_groups(exercises)
        .iter()
        .filter_map(|group| {
            exercises
                .iter()
                .filter(|e| &e.muscle_group == group)
                .collect::<Vec<_>>()
                .choose(&mut *rng)
                .map(|e| e.id)
        })
        .collect()
}

/// Exercise of the given muscle group, preferring exercises that have not been suggested yet.
pub fn select_alternative<G: Rng + ?Sized>(
    exercises: &[Exercise],
    muscle_group: &MuscleGroup,
    suggested: &[ExerciseID],
    rng: &mut G,
) -> Option<ExerciseID> {
    let candidates = exercises
        .iter()
        .filter(|e| &e.muscle_group == muscle_group)
        .map(|e| e.id)
        .collect::<Vec<_>>();
    choose_unsuggested(&candidates, suggested, rng)
}

/// Any exercise, preferring exercises that have not been suggested yet.
pub fn select_additional<G: Rng + ?Sized>(
    exercises: &[Exercise],
    suggested: &[ExerciseID],
    rng: &mut G,
) -> Option<ExerciseID> {
    let candidates = exercises.iter().map(|e| e.id).collect::<Vec<_>>();
    choose_unsuggested(&candidates, suggested, rng)
}

fn choose_unsuggested<G: Rng + ?Sized>(
    candidates: &[ExerciseID],
    suggested: &[ExerciseID],
    rng: &mut G,
) -> Option<ExerciseID> {
    let unsuggested = candidates
        .iter()
        .filter(|id| !suggested.contains(id))
        .copied()
        .collect::<Vec<_>>();
    if unsuggested.is_empty() {
        candidates.choose(rng).copied()
    } else {
        unsuggested.choose(rng).copied()
    }
}
