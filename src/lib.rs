pub mod config;
pub mod models;
pub mod oracle;
pub mod services;
pub mod targets;

pub use oracle::CommandOracle;
pub use services::optimization::{Service, Solution};
