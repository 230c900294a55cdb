pub mod controller;
pub mod error;

pub use controller::{Factories, SyncConfig, SyncController, SyncReport};
pub use error::SyncError;
