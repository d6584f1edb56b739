use liftbuddy_domain::{Weight, WeightError};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub weight_unit: WeightUnit,
}

/// Unit in which weights are entered and displayed. Weights are always stored in kg.
#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub enum WeightUnit {
    #[default]
    Kilogram,
    Pound,
}

const KG_PER_LB: f32 = 0.453_592_37;

impl WeightUnit {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            WeightUnit::Kilogram => "kg",
            WeightUnit::Pound => "lb",
        }
    }

    /// Numeric value in this unit, rounded to one decimal.
    #[must_use]
    pub fn value(self, weight: Weight) -> f32 {
        let kg = f32::from(weight);
        match self {
            WeightUnit::Kilogram => kg,
            WeightUnit::Pound => round_to_tenth(kg / KG_PER_LB),
        }
    }

    #[must_use]
    pub fn format(self, weight: Weight) -> String {
        format!("{} {}", self.value(weight), self.symbol())
    }

    /// Parses a value entered in this unit and converts it to kg.
    pub fn parse(self, input: &str) -> Result<Weight, WeightError> {
        match self {
            WeightUnit::Kilogram => Weight::try_from(input),
            WeightUnit::Pound => {
                let lb = input
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| WeightError::ParseError)?;
                Weight::new(round_to_tenth(lb * KG_PER_LB))
            }
        }
    }
}

fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
