mod service;

pub use service::{DEFAULT_MAX_ATTEMPTS, Evaluator, InvalidMaxAttempts};
