pub mod collation;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

// Application layer and its ports
pub mod app;

// View-model shapes shared across stages
pub mod domain;

pub use app::discovery_use_case::{DiscoveryUseCase, EventSnapshot, Listing};
pub use error::{DiscoveryError, Result};
