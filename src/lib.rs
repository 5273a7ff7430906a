//! Tabular Q-learning on a square grid world.
//!
//! An agent learns to walk from a start cell to a goal cell while steering clear of
//! danger cells. [`gym::GridWorld`] supplies the dynamics, [`algo::QTableAgent`] the
//! learning, and [`train::Trainer`] the interruptible loop that ties them together.

/// The agent interface driven by training loops
pub mod agent;

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Grid world environment
pub mod gym;

/// Training and evaluation loops
pub mod train;

/// Terminal visualization of training
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use agent::Agent;
pub use error::{Error, Result};
