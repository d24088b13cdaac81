pub mod converters;
pub mod error;
pub mod logger;
pub mod validation;
