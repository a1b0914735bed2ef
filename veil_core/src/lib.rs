//! veil_core: Foundation types for the VEIL simulation engine.
//!
//! This crate provides:
//! - Seeded RNG for deterministic simulation
//! - Labelled fixed-dimension state vectors
//! - Core model types (NPCs, world events, locations)
//! - Simulation configuration
//! - Snapshot types for world serialization

pub mod collections;
pub mod config;
pub mod errors;
pub mod event;
pub mod location;
pub mod npc;
pub mod rng;
pub mod snapshot;
pub mod vectors;

pub use config::*;
pub use errors::*;
pub use event::*;
pub use location::*;
pub use npc::*;
pub use rng::*;
pub use vectors::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
