pub mod config;
pub mod error;

pub use config::{Actions, AppConfig, BusinessScope, Capability, Context, Permission, Resource};
pub use error::{Result, SchedulingError};
