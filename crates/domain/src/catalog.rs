/// Exercise of the built-in catalog used to seed an empty exercise store.
pub struct CatalogExercise {
    pub name: &'static str,
    pub muscle_group: &'static str,
    pub suggested_sets: u32,
    pub description: Option<&'static str>,
}

pub static EXERCISES: &[CatalogExercise] = &[
    CatalogExercise {
        name: "Bench Press",
        muscle_group: "chest",
        suggested_sets: 4,
        description: None,
    },
    CatalogExercise {
        name: "Squats",
        muscle_group: "legs",
        suggested_sets: 4,
        description: None,
    },
    CatalogExercise {
        name: "Shoulder Press",
        muscle_group: "shoulders",
        suggested_sets: 3,
        description: None,
    },
    CatalogExercise {
        name: "Deadlift",
        muscle_group: "back",
        suggested_sets: 4,
        description: None,
    },
    CatalogExercise {
        name: "Bicep Curls",
        muscle_group: "arms",
        suggested_sets: 3,
        description: None,
    },
    CatalogExercise {
        name: "Leg Press",
        muscle_group: "legs",
        suggested_sets: 4,
        description: None,
    },
    CatalogExercise {
        name: "Incline Press",
        muscle_group: "chest",
        suggested_sets: 3,
        description: None,
    },
    CatalogExercise {
        name: "Lateral Raises",
        muscle_group: "shoulders",
        suggested_sets: 3,
        description: None,
    },
    CatalogExercise {
        name: "Pull-ups",
        muscle_group: "back",
        suggested_sets: 3,
        description: None,
    },
    CatalogExercise {
        name: "Tricep Extensions",
        muscle_group: "arms",
        suggested_sets: 3,
        description: None,
    },
];
