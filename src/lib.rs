/// Agents and the action selection interface
pub mod agent;

/// Tabular learning algorithms
pub mod algo;

/// Environment
pub mod env;

/// Errors
pub mod error;

/// Exploration policies
pub mod exploration;

/// Episode sampling
pub mod sample;

/// Transitions and the markers that frame episodes
pub mod transition;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use error::{Error, Result};
