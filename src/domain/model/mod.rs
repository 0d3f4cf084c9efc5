//! Model domain - iris data, labels and classifier kinds

mod dataset;
mod features;
mod info;
mod kind;
mod reference;
mod species;

pub use dataset::{Dataset, DatasetOrigin, DatasetSource, Sample};
pub use features::{FeatureVector, FEATURE_NAMES};
pub use info::{ModelInfo, ModelStatus};
pub use kind::ModelKind;
pub use species::{Species, LABEL_TABLE_VERSION};
