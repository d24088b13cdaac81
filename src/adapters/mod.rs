// Adapters layer: concrete implementations of the domain ports (filesystem fixtures, HTTP API).

pub mod fixtures;
pub mod http;

pub use fixtures::FixtureLoader;
pub use http::LambdatestService;
