//! veil_sim: the deterministic per-tick simulation pipeline.
//!
//! This crate provides:
//! - The delayed-delivery event queue and attenuating propagator
//! - The nine per-tick simulation engines
//! - The world state manager running the twelve-stage tick pipeline
//! - An optional background tick runner

pub mod event_queue;
pub mod propagation;
pub mod systems;
pub mod tick_runner;
pub mod world;

pub use event_queue::EventQueue;
pub use propagation::EventPropagator;
pub use tick_runner::TickRunner;
pub use world::{TickResult, WorldStateManager};
