mod errors;
mod models;
mod service;
mod service_builder;

pub use errors::Error;
pub use models::{GenerationSummary, Solution};
pub use service::Service;
pub use service_builder::ServiceBuilder;
