//! Product rotation: spreads coverage of the catalog across days.

pub mod scheduler;
pub mod state;
pub mod store;

pub use scheduler::{RotationScheduler, RotationStatus};
pub use state::{CatalogChange, RotationState};
pub use store::{JsonFileRotationStore, RotationStore};
