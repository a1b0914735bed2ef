//! Per-tick simulation engines.
//!
//! Every engine is a pure data transform over NPC state: arithmetic
//! clamps, unknown archetypes fall back to defaults, and nothing in
//! here is permitted to fail.

pub mod emotion;
pub mod environment;
pub mod intention;
pub mod interaction;
pub mod movement;
pub mod relationship;
pub mod schedule;
pub mod social;
pub mod vitality;
