//! State of the workout page.
//!
//! The page shows one exercise of the current workout at a time. Weight and reps are edited
//! in local buffers, which are persisted whenever the user leaves the exercise.

use std::collections::HashMap;

use liftbuddy_domain::{
    ExerciseID, Reps, RepsError, Weight, WeightError, WorkoutDetails, WorkoutExerciseDetails,
    WorkoutService,
};
use log::warn;
use rand::Rng;

use crate::{OngoingWorkout, WeightUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Success(&'static str),
    Failure(&'static str),
}

pub struct WorkoutView {
    workout: Option<WorkoutDetails>,
    ongoing_workout: Option<OngoingWorkout>,
    weight: String,
    reps: String,
    weight_unit: WeightUnit,
    /// Weight input last saved per exercise. Converted units lose precision when stored in kg.
    typed_weights: HashMap<ExerciseID, (Weight, String)>,
    notifications: Vec<Notification>,
}

impl WorkoutView {
    #[must_use]
    pub fn new(weight_unit: WeightUnit, ongoing_workout: Option<OngoingWorkout>) -> Self {
        Self {
            workout: None,
            ongoing_workout,
            weight: String::new(),
            reps: String::new(),
            weight_unit,
            typed_weights: HashMap::new(),
            notifications: vec![],
        }
    }

    #[must_use]
    pub fn workout(&self) -> Option<&WorkoutDetails> {
        self.workout.as_ref()
    }

    /// Cursor state to be persisted, `None` if there is no current workout.
    #[must_use]
    pub fn ongoing_workout(&self) -> Option<&OngoingWorkout> {
        self.ongoing_workout.as_ref()
    }

    #[must_use]
    pub fn exercise_idx(&self) -> usize {
        match (&self.ongoing_workout, &self.workout) {
            (Some(ongoing_workout), Some(workout)) => {
                ongoing_workout.exercise_idx(workout.exercises.len())
            }
            _ => 0,
        }
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&WorkoutExerciseDetails> {
        self.workout
            .as_ref()
            .and_then(|w| w.exercises.get(self.exercise_idx()))
    }

    #[must_use]
    pub fn num_exercises(&self) -> usize {
        self.workout.as_ref().map_or(0, |w| w.exercises.len())
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.exercise_idx() == 0
    }

    /// Adding exercises and ending the workout is only offered on the last exercise.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.num_exercises() > 0 && self.exercise_idx() == self.num_exercises() - 1
    }

    #[must_use]
    pub fn weight(&self) -> &str {
        &self.weight
    }

    #[must_use]
    pub fn reps(&self) -> &str {
        &self.reps
    }

    #[must_use]
    pub fn weight_unit(&self) -> WeightUnit {
        self.weight_unit
    }

    pub fn set_weight(&mut self, input: &str) {
        self.weight = input.to_string();
    }

    pub fn set_reps(&mut self, input: &str) {
        self.reps = input.to_string();
    }

    #[must_use]
    pub fn weight_error(&self) -> Option<WeightError> {
        self.parse_buffers().err().and_then(|(weight, _)| weight)
    }

    #[must_use]
    pub fn reps_error(&self) -> Option<RepsError> {
        self.parse_buffers().err().and_then(|(_, reps)| reps)
    }

    /// Notifications produced since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub async fn refresh<S: WorkoutService>(&mut self, service: &S) {
        match service.get_current_workout().await {
            Ok(workout) => self.load(workout),
            Err(err) => {
                warn!("failed to load workout: {err}");
                self.notify(Notification::Failure("Failed to load workout"));
            }
        }
    }

    pub async fn start<S: WorkoutService, G: Rng + ?Sized>(&mut self, service: &S, rng: &mut G) {
        match service.generate_workout(rng).await {
            Ok(id) => {
                self.ongoing_workout = Some(OngoingWorkout::new(id.as_u128()));
                self.refresh(service).await;
                self.notify(Notification::Success("New workout generated!"));
            }
            Err(_) => self.notify(Notification::Failure("Failed to generate workout")),
        }
    }

    pub async fn previous<S: WorkoutService>(&mut self, service: &S) {
        if self.workout.is_none() || self.is_first() {
            return;
        }
        self.save(service).await;
        self.move_to(self.exercise_idx() - 1);
        self.refresh(service).await;
    }

    pub async fn next<S: WorkoutService>(&mut self, service: &S) {
        if self.workout.is_none() || self.is_last() {
            return;
        }
        self.save(service).await;
        self.move_to(self.exercise_idx() + 1);
        self.refresh(service).await;
    }

    pub async fn reroll<S: WorkoutService, G: Rng + ?Sized>(&mut self, service: &S, rng: &mut G) {
        let (Some(workout), Some(exercise)) = (&self.workout, self.current_exercise()) else {
            return;
        };
        match service
            .reroll_exercise(workout.id, exercise.exercise_id, rng)
            .await
        {
            Ok(()) => {
                self.refresh(service).await;
                self.notify(Notification::Success("Exercise changed!"));
            }
            Err(_) => self.notify(Notification::Failure("Failed to change exercise")),
        }
    }

    pub async fn add_exercise<S: WorkoutService, G: Rng + ?Sized>(
        &mut self,
        service: &S,
        rng: &mut G,
    ) {
        let Some(workout_id) = self.workout.as_ref().map(|w| w.id) else {
            return;
        };
        self.save(service).await;
        match service.add_exercise(workout_id, rng).await {
            Ok(()) => {
                self.refresh(service).await;
                self.notify(Notification::Success("Added new exercise!"));
            }
            Err(_) => self.notify(Notification::Failure("Failed to add exercise")),
        }
    }

    pub async fn end_workout<S: WorkoutService>(&mut self, service: &S) {
        let Some(workout_id) = self.workout.as_ref().map(|w| w.id) else {
            return;
        };
        self.save(service).await;
        match service.complete_workout(workout_id).await {
            Ok(()) => {
                self.refresh(service).await;
                self.notify(Notification::Success("Workout completed! 💪"));
            }
            Err(_) => self.notify(Notification::Failure("Failed to end workout")),
        }
    }

    async fn save<S: WorkoutService>(&mut self, service: &S) {
        let (Some(workout), Some(exercise)) = (&self.workout, self.current_exercise()) else {
            return;
        };
        let (workout_id, exercise_id) = (workout.id, exercise.exercise_id);
        let Ok((weight, reps)) = self.parse_buffers() else {
            self.notify(Notification::Failure("Failed to save progress"));
            return;
        };
        if service
            .update_exercise(workout_id, exercise_id, weight, reps)
            .await
            .is_err()
        {
            self.notify(Notification::Failure("Failed to save progress"));
            return;
        }
        match weight {
            Some(weight) => {
                self.typed_weights
                    .insert(exercise_id, (weight, self.weight.trim().to_string()));
            }
            None => {
                self.typed_weights.remove(&exercise_id);
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn parse_buffers(
        &self,
    ) -> Result<
        (Option<Weight>, Option<Reps>),
        (Option<WeightError>, Option<RepsError>),
    > {
        let weight = if self.weight.trim().is_empty() {
            Ok(None)
        } else {
            self.weight_unit.parse(&self.weight).map(Some)
        };
        let reps = if self.reps.trim().is_empty() {
            Ok(None)
        } else {
            Reps::try_from(self.reps.as_str()).map(Some)
        };
        match (weight, reps) {
            (Ok(weight), Ok(reps)) => Ok((weight, reps)),
            (weight, reps) => Err((weight.err(), reps.err())),
        }
    }

    fn load(&mut self, workout: Option<WorkoutDetails>) {
        self.workout = workout;
        match &self.workout {
            Some(workout) => {
                if self
                    .ongoing_workout
                    .as_ref()
                    .is_none_or(|o| o.workout_id != workout.id.as_u128())
                {
                    self.ongoing_workout = Some(OngoingWorkout::new(workout.id.as_u128()));
                }
            }
            None => self.ongoing_workout = None,
        }
        let (exercise_id, weight, reps) = self
            .current_exercise()
            .map(|e| (e.exercise_id, e.weight, e.reps))
            .unwrap_or_default();
        self.weight = match (weight, self.typed_weights.get(&exercise_id)) {
            (Some(weight), Some((typed_weight, input))) if weight == *typed_weight => input.clone(),
            (Some(weight), _) => self.weight_unit.value(weight).to_string(),
            (None, _) => String::new(),
        };
        self.reps = reps.map_or_else(String::new, |r| r.to_string());
    }

    fn move_to(&mut self, exercise_idx: usize) {
        if let Some(ongoing_workout) = &mut self.ongoing_workout {
            ongoing_workout.exercise_idx = exercise_idx;
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use futures::executor::block_on;
    use liftbuddy_domain::{
        CreateError, ExerciseID, MuscleGroup, Name, ReadError, Sets, UpdateError, Weight,
        WorkoutID,
    };
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const WORKOUT_ID: u128 = 7;

    fn exercise(id: u128, name: &str, group: &str) -> WorkoutExerciseDetails {
        WorkoutExerciseDetails {
            exercise_id: ExerciseID::from(id),
            name: Name::new(name).unwrap(),
            muscle_group: MuscleGroup::new(group).unwrap(),
            suggested_sets: Sets::new(3).unwrap(),
            description: None,
            weight: None,
            reps: None,
        }
    }

    #[derive(Default)]
    struct FakeService {
        workout: RefCell<Option<WorkoutDetails>>,
        updates: RefCell<Vec<(ExerciseID, Option<Weight>, Option<Reps>)>>,
        failing: Cell<bool>,
    }

    impl FakeService {
        fn check(&self) -> Result<(), UpdateError> {
            if self.failing.get() {
                return Err(UpdateError::Other("failure".into()));
            }
            Ok(())
        }
    }

    impl WorkoutService for FakeService {
        async fn generate_workout<G: Rng + ?Sized>(
            &self,
            _rng: &mut G,
        ) -> Result<WorkoutID, CreateError> {
            if self.workout.borrow().is_some() {
                return Err(CreateError::Conflict);
            }
            *self.workout.borrow_mut() = Some(WorkoutDetails {
                id: WorkoutID::from(WORKOUT_ID),
                completed: false,
                suggested_exercises: vec![ExerciseID::from(1), ExerciseID::from(2)],
                exercises: vec![
                    exercise(1, "Bench Press", "chest"),
                    exercise(2, "Squats", "legs"),
                ],
            });
            Ok(WorkoutID::from(WORKOUT_ID))
        }

        async fn get_current_workout(&self) -> Result<Option<WorkoutDetails>, ReadError> {
            Ok(self.workout.borrow().clone())
        }

        async fn update_exercise(
            &self,
            _workout_id: WorkoutID,
            exercise_id: ExerciseID,
            weight: Option<Weight>,
            reps: Option<Reps>,
        ) -> Result<(), UpdateError> {
            self.check()?;
            self.updates.borrow_mut().push((exercise_id, weight, reps));
            if let Some(workout) = self.workout.borrow_mut().as_mut() {
                for e in &mut workout.exercises {
                    if e.exercise_id == exercise_id {
                        e.weight = weight;
                        e.reps = reps;
                    }
                }
            }
            Ok(())
        }

        async fn reroll_exercise<G: Rng + ?Sized>(
            &self,
            _workout_id: WorkoutID,
            exercise_id: ExerciseID,
            _rng: &mut G,
        ) -> Result<(), UpdateError> {
            self.check()?;
            if let Some(workout) = self.workout.borrow_mut().as_mut() {
                for e in &mut workout.exercises {
                    if e.exercise_id == exercise_id {
                        *e = exercise(3, "Incline Press", "chest");
                    }
                }
                workout.suggested_exercises.push(ExerciseID::from(3));
            }
            Ok(())
        }

        async fn add_exercise<G: Rng + ?Sized>(
            &self,
            _workout_id: WorkoutID,
            _rng: &mut G,
        ) -> Result<(), UpdateError> {
            self.check()?;
            if let Some(workout) = self.workout.borrow_mut().as_mut() {
                workout.exercises.push(exercise(4, "Deadlift", "back"));
                workout.suggested_exercises.push(ExerciseID::from(4));
            }
            Ok(())
        }

        async fn complete_workout(&self, _workout_id: WorkoutID) -> Result<(), UpdateError> {
            self.check()?;
            *self.workout.borrow_mut() = None;
            Ok(())
        }
    }

    fn started(service: &FakeService) -> WorkoutView {
        let mut view = WorkoutView::new(WeightUnit::Kilogram, None);
        block_on(view.start(service, &mut StdRng::seed_from_u64(0)));
        view
    }

    #[test]
    fn test_start() {
        let service = FakeService::default();
        let mut view = started(&service);

        assert_eq!(
            view.take_notifications(),
            vec![Notification::Success("New workout generated!")]
        );
        assert_eq!(view.num_exercises(), 2);
        assert_eq!(view.exercise_idx(), 0);
        assert!(view.is_first());
        assert!(!view.is_last());
        assert_eq!(
            view.current_exercise().map(|e| e.name.to_string()),
            Some("Bench Press".to_string())
        );
        assert_eq!(
            view.ongoing_workout().map(|o| o.workout_id),
            Some(WORKOUT_ID)
        );
    }

    #[test]
    fn test_start_with_open_workout() {
        let service = FakeService::default();
        let mut view = started(&service);
        view.take_notifications();

        block_on(view.start(&service, &mut StdRng::seed_from_u64(0)));

        assert_eq!(
            view.take_notifications(),
            vec![Notification::Failure("Failed to generate workout")]
        );
        assert_eq!(view.num_exercises(), 2);
    }

    #[test]
    fn test_next_saves_values() {
        let service = FakeService::default();
        let mut view = started(&service);
        view.take_notifications();

        view.set_weight("60");
        view.set_reps("10");
        block_on(view.next(&service));

        assert_eq!(
            *service.updates.borrow(),
            vec![(
                ExerciseID::from(1),
                Some(Weight::new(60.0).unwrap()),
                Some(Reps::new(10).unwrap())
            )]
        );
        assert_eq!(view.exercise_idx(), 1);
        assert!(view.is_last());
        assert_eq!(view.weight(), "");
        assert_eq!(view.reps(), "");
        assert_eq!(view.take_notifications(), Vec::<Notification>::new());

        block_on(view.previous(&service));

        assert_eq!(view.exercise_idx(), 0);
        assert_eq!(view.weight(), "60");
        assert_eq!(view.reps(), "10");
    }

    #[test]
    fn test_navigation_at_bounds() {
        let service = FakeService::default();
        let mut view = started(&service);

        block_on(view.previous(&service));
        assert_eq!(view.exercise_idx(), 0);

        block_on(view.next(&service));
        block_on(view.next(&service));
        assert_eq!(view.exercise_idx(), 1);
        assert_eq!(service.updates.borrow().len(), 1);
    }

    #[test]
    fn test_empty_inputs_are_saved_as_none() {
        let service = FakeService::default();
        let mut view = started(&service);

        view.set_reps("8");
        block_on(view.next(&service));

        assert_eq!(
            *service.updates.borrow(),
            vec![(ExerciseID::from(1), None, Some(Reps::new(8).unwrap()))]
        );
    }

    #[test]
    fn test_invalid_input() {
        let service = FakeService::default();
        let mut view = started(&service);
        view.take_notifications();

        view.set_weight("abc");
        view.set_reps("1000");
        assert_eq!(view.weight_error(), Some(WeightError::ParseError));
        assert_eq!(view.reps_error(), Some(RepsError::OutOfRange));

        block_on(view.next(&service));

        assert_eq!(
            view.take_notifications(),
            vec![Notification::Failure("Failed to save progress")]
        );
        assert!(service.updates.borrow().is_empty());
        assert_eq!(view.exercise_idx(), 1);
    }

    #[test]
    fn test_pound_input() {
        let service = FakeService::default();
        let mut view = WorkoutView::new(WeightUnit::Pound, None);
        block_on(view.start(&service, &mut StdRng::seed_from_u64(0)));

        view.set_weight("225");
        block_on(view.next(&service));
        block_on(view.previous(&service));

        assert_eq!(
            service.updates.borrow()[0].1,
            Some(Weight::new(102.1).unwrap())
        );
        assert_eq!(view.weight(), "225");
    }

    #[test]
    fn test_pound_input_changed_elsewhere() {
        let service = FakeService::default();
        let mut view = WorkoutView::new(WeightUnit::Pound, None);
        block_on(view.start(&service, &mut StdRng::seed_from_u64(0)));

        view.set_weight("225");
        block_on(view.next(&service));
        block_on(service.update_exercise(
            WorkoutID::from(WORKOUT_ID),
            ExerciseID::from(1),
            Some(Weight::new(100.0).unwrap()),
            None,
        ))
        .unwrap();
        block_on(view.previous(&service));

        assert_eq!(view.weight(), "220.5");
    }

    #[test]
    fn test_reroll() {
        let service = FakeService::default();
        let mut view = started(&service);
        view.take_notifications();

        block_on(view.reroll(&service, &mut StdRng::seed_from_u64(0)));

        assert_eq!(
            view.take_notifications(),
            vec![Notification::Success("Exercise changed!")]
        );
        assert_eq!(
            view.current_exercise().map(|e| e.name.to_string()),
            Some("Incline Press".to_string())
        );
        assert_eq!(view.num_exercises(), 2);
    }

    #[test]
    fn test_add_exercise() {
        let service = FakeService::default();
        let mut view = started(&service);
        view.take_notifications();

        block_on(view.next(&service));
        block_on(view.add_exercise(&service, &mut StdRng::seed_from_u64(0)));

        assert_eq!(
            view.take_notifications(),
            vec![Notification::Success("Added new exercise!")]
        );
        assert_eq!(view.num_exercises(), 3);
        assert_eq!(view.exercise_idx(), 1);
        assert!(!view.is_last());
    }

    #[test]
    fn test_end_workout() {
        let service = FakeService::default();
        let mut view = started(&service);
        view.take_notifications();

        view.set_weight("80");
        block_on(view.end_workout(&service));

        assert_eq!(
            view.take_notifications(),
            vec![Notification::Success("Workout completed! 💪")]
        );
        assert_eq!(service.updates.borrow().len(), 1);
        assert_eq!(view.workout(), None);
        assert_eq!(view.ongoing_workout(), None);
        assert_eq!(view.num_exercises(), 0);
        assert!(!view.is_last());
    }

    #[test]
    fn test_failures() {
        let service = FakeService::default();
        let mut view = started(&service);
        view.take_notifications();
        service.failing.set(true);

        block_on(view.reroll(&service, &mut StdRng::seed_from_u64(0)));
        block_on(view.add_exercise(&service, &mut StdRng::seed_from_u64(0)));
        block_on(view.end_workout(&service));

        assert_eq!(
            view.take_notifications(),
            vec![
                Notification::Failure("Failed to change exercise"),
                Notification::Failure("Failed to save progress"),
                Notification::Failure("Failed to add exercise"),
                Notification::Failure("Failed to save progress"),
                Notification::Failure("Failed to end workout"),
            ]
        );
        assert_eq!(view.num_exercises(), 2);
    }

    #[test]
    fn test_refresh_restores_position() {
        let service = FakeService::default();
        started(&service);

        let ongoing_workout = OngoingWorkout {
            exercise_idx: 1,
            ..OngoingWorkout::new(WORKOUT_ID)
        };
        let mut view = WorkoutView::new(WeightUnit::Kilogram, Some(ongoing_workout));
        block_on(view.refresh(&service));
        assert_eq!(view.exercise_idx(), 1);

        let stale = OngoingWorkout {
            exercise_idx: 1,
            ..OngoingWorkout::new(WORKOUT_ID + 1)
        };
        let mut view = WorkoutView::new(WeightUnit::Kilogram, Some(stale));
        block_on(view.refresh(&service));
        assert_eq!(view.exercise_idx(), 0);
    }

    #[test]
    fn test_without_workout() {
        let service = FakeService::default();
        let mut view = WorkoutView::new(WeightUnit::Kilogram, None);
        block_on(view.refresh(&service));

        block_on(view.next(&service));
        block_on(view.reroll(&service, &mut StdRng::seed_from_u64(0)));
        block_on(view.end_workout(&service));

        assert_eq!(view.workout(), None);
        assert_eq!(view.current_exercise(), None);
        assert_eq!(view.take_notifications(), Vec::<Notification>::new());
    }
}
