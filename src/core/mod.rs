//! Core engine module
//!
//! Contains the main Engine struct, timing, and configuration

mod config;
mod engine;
mod time;

pub use config::{BallConfig, ConfigError, ControllerConfig};
pub use engine::{Engine, EngineConfig, EngineContext, Game, init_logger};
pub use time::{FixedTimestep, Time};
