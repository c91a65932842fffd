//! HTTP server: shared state, route table and the builder that ties them
//! together

pub mod builder;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use host::AppState;
