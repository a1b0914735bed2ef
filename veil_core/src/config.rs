//! Simulation configuration.
//!
//! All tuning knobs for the world manager and its engines live here,
//! separated from runtime state so they can be tuned per-game without
//! touching engine code.

use serde::{Deserialize, Serialize};

/// Master configuration for the simulation core.
///
/// All fields have sensible defaults but can be tuned per-game or
/// per-mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Registry capacity.
    pub max_npcs: usize,
    /// Starting clock in game-hours.
    pub initial_game_time: f64,
    /// Seed for all deterministic randomness in the world.
    pub world_seed: u64,

    /// Per-tick emotion decay toward the personality baseline.
    pub emotion_decay_rate: f32,
    /// Global multiplier on event emotion impacts.
    pub event_impact_scale: f32,

    /// Per-NPC recent memory log cap.
    pub max_recent_memories: usize,

    /// Base probability multiplier for NPC-NPC interactions.
    pub interaction_rate: f32,
    /// Cap on interactions per location per tick.
    pub max_interactions_per_location: usize,
    /// NPCs below this energy won't interact.
    pub min_energy_for_interaction: f32,

    /// Weak ties fade toward zero at this rate per tick.
    pub relationship_decay_rate: f32,
    /// Global multiplier for relationship changes.
    pub relationship_delta_scale: f32,

    /// Passive energy expenditure per tick.
    pub energy_drain_per_tick: f32,
    /// Base energy recovery per tick (scaled by environment).
    pub energy_regen_base: f32,
    /// Passive health recovery per tick (scaled by safety).
    pub health_regen_rate: f32,
    /// Health drain per tick in unsafe environments.
    pub danger_health_drain: f32,
    /// Safety below this causes health drain.
    pub danger_safety_threshold: f32,
    /// Below this health, energy is capped.
    pub health_energy_cap_threshold: f32,

    /// How quickly NPC social vectors blend toward the peer signal.
    pub social_blend_rate: f32,
    /// Per-tick social influence decay toward zero.
    pub social_decay_rate: f32,
    /// Multiplier for event social impacts.
    pub social_event_scale: f32,

    /// Base probability an NPC considers moving.
    pub move_probability: f32,
    /// How quickly NPC environment adapts to the location.
    pub environment_blend_rate: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_npcs: 1000,
            initial_game_time: 0.0,
            world_seed: 0,

            emotion_decay_rate: 0.05,
            event_impact_scale: 1.0,

            max_recent_memories: 10,

            interaction_rate: 0.3,
            max_interactions_per_location: 10,
            min_energy_for_interaction: 0.1,

            relationship_decay_rate: 0.01,
            relationship_delta_scale: 1.0,

            energy_drain_per_tick: 0.01,
            energy_regen_base: 0.03,
            health_regen_rate: 0.005,
            danger_health_drain: 0.02,
            danger_safety_threshold: 0.3,
            health_energy_cap_threshold: 0.5,

            social_blend_rate: 0.2,
            social_decay_rate: 0.05,
            social_event_scale: 1.0,

            move_probability: 0.2,
            environment_blend_rate: 0.5,
        }
    }
}

impl SimConfig {
    /// Create a config with the gameplay defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config optimized for testing: deterministic seed,
    /// interactions and movement forced to fire.
    pub fn for_testing() -> Self {
        SimConfig {
            world_seed: 42,
            interaction_rate: 100.0,
            move_probability: 1.0,
            ..Self::default()
        }
    }
}
