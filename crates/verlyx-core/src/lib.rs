//! Verlyx Hub Core Library
//!
//! Shared configuration, errors, logging setup, and argument pass-through for
//! the Verlyx Hub desktop runner.

pub mod args;
pub mod config;
pub mod error;
pub mod logging;

pub use args::EntrypointArgs;
pub use config::RunnerConfig;
pub use error::{RunnerError, RunnerResult};
pub use logging::{init_logging, LogConfig, LogFormat};
