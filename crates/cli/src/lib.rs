//! Demo command and HTTP collaborator built on `rescope-scope`.

pub mod commands;
pub mod database;
pub mod execute;
pub mod server;

pub use commands::Commands;
pub use database::{Faults, SimulatedDatabase};
pub use server::{router, AppState};

use rescope_config::AcquireMode;
use rescope_scope::AcquireStrategy;

/// Map the configured acquire mode onto the scope strategy
pub fn acquire_strategy(mode: AcquireMode) -> AcquireStrategy {
    match mode {
        AcquireMode::Sequential => AcquireStrategy::Sequential,
        AcquireMode::Concurrent => AcquireStrategy::Concurrent,
    }
}
