pub mod catalogue;
pub mod runner;
pub mod scenario;
pub mod suite;

pub use crate::domain::model::{Fixture, Format, Operation};
pub use crate::domain::ports::{ConversionApi, FixtureSource};
pub use crate::utils::error::Result;
