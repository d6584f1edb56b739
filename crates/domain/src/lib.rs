#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
mod error;
mod exercise;
mod history;
mod measure;
mod name;
mod service;
mod session;
mod user;
mod workout;

pub use error::*;
pub use exercise::*;
pub use history::*;
pub use measure::*;
pub use name::*;
pub use service::*;
pub use session::*;
pub use user::*;
pub use workout::*;
