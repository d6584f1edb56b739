#![warn(clippy::pedantic)]

pub mod log;
mod ongoing_workout;
mod service;
mod settings;
pub mod workout_view;

pub use ongoing_workout::*;
pub use service::Service;
pub use settings::*;
