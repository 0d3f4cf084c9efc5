//! Infrastructure services

mod model_lifecycle;

pub use model_lifecycle::ModelLifecycleManager;
