pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::{FixtureLoader, LambdatestService};
pub use crate::config::SuiteConfig;
pub use crate::core::catalogue::catalogue;
pub use crate::core::runner::{Outcome, ScenarioReport, ScenarioRunner};
pub use crate::core::suite::{RunReport, ScenarioFilter, SuiteRunner};
pub use crate::domain::model::{Fixture, Format, Operation};
pub use crate::domain::ports::{ConversionApi, FixtureSource};
pub use crate::utils::converters::json_to_map;
pub use crate::utils::error::{Result, SuiteError};
