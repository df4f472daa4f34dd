pub mod error;
pub mod logging;

pub mod catalog;
pub mod config;
pub mod coords;
pub mod descriptor;
pub mod manifest;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod resolve;
pub mod writer;

pub use config::HarvestConfig;
pub use error::{HarvestError, Result};
pub use pipeline::{HarvestOutcome, HarvestSummary, Harvester};
pub use publish::PublishUnit;
