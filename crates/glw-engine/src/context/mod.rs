//! Driver ownership and draw dispatch.
//!
//! This module is responsible for:
//! - owning the driver every wrapper talks through
//! - the error-check policy applied after state-changing calls
//! - caching program, vertex array and texture-unit bindings
//! - routing clears, capability switches, viewport and draws

mod dispatch;
mod init;
mod state;

pub use dispatch::Context;
pub use init::ContextInit;
pub use state::{Capability, ClearMask, DispatchStats, IndexType, Topology};
