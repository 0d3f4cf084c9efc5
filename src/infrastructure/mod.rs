//! Infrastructure layer - External service implementations

pub mod logging;
pub mod ml;
pub mod observability;
pub mod services;
pub mod storage;
pub mod trigger;
