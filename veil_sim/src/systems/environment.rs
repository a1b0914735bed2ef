//! Environment engine — updates NPC environment vectors from locations.
//!
//! Each tick, every NPC's environment vector is blended toward the
//! environment of their current location. This feeds into the intention
//! computation (unsafe locations push NPCs toward survive/escape).
//!
//! The crowding dimension is computed dynamically from the number of
//! NPCs currently at the location relative to its capacity.

use veil_core::collections::FastHashMap;
use veil_core::location::LocationGraph;
use veil_core::npc::{LocationId, NpcId, NpcStatus};
use veil_core::vectors::environment_idx;

/// Updates NPC environment vectors from the location graph.
#[derive(Debug, Clone)]
pub struct EnvironmentEngine {
    /// How quickly NPC environment adapts to the location (0-1).
    /// 0 = no change, 1 = instant snap to location environment.
    pub blend_rate: f32,
}

impl Default for EnvironmentEngine {
    fn default() -> Self {
        EnvironmentEngine { blend_rate: 0.5 }
    }
}

impl EnvironmentEngine {
    /// Create an engine with an explicit blend rate.
    pub fn new(blend_rate: f32) -> Self {
        EnvironmentEngine { blend_rate }
    }

    /// Dynamic crowding value for a location.
    ///
    /// Unlimited-capacity locations use a soft scale where 20 NPCs
    /// saturate crowding.
    pub fn compute_crowding(&self, capacity: u32, npc_count: usize) -> f32 {
        if capacity == 0 {
            (npc_count as f32 / 20.0).clamp(0.0, 1.0)
        } else {
            (npc_count as f32 / capacity as f32).clamp(0.0, 1.0)
        }
    }

    /// Blend every NPC's environment toward its current location's
    /// environment. NPCs at unknown locations are skipped for this
    /// stage only.
    pub fn tick(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>, graph: &LocationGraph) {
        let mut counts: FastHashMap<LocationId, usize> = FastHashMap::default();
        for npc in npcs.values() {
            *counts.entry(npc.location_id.clone()).or_insert(0) += 1;
        }

        for npc in npcs.values_mut() {
            let Some(loc) = graph.get_location(&npc.location_id) else {
                continue;
            };

            let mut target = loc.environment;
            target.0[environment_idx::CROWDING] = self.compute_crowding(
                loc.capacity,
                counts.get(&npc.location_id).copied().unwrap_or(0),
            );

            npc.environment.blend_toward(&target, self.blend_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::location::Location;

    fn registry(npcs: Vec<NpcStatus>) -> FastHashMap<NpcId, NpcStatus> {
        npcs.into_iter().map(|n| (n.id.clone(), n)).collect()
    }

    #[test]
    fn test_crowding_with_capacity() {
        let engine = EnvironmentEngine::default();
        assert_eq!(engine.compute_crowding(10, 5), 0.5);
        assert_eq!(engine.compute_crowding(10, 15), 1.0);
        assert_eq!(engine.compute_crowding(10, 0), 0.0);
    }

    #[test]
    fn test_crowding_unlimited_soft_scale() {
        let engine = EnvironmentEngine::default();
        assert_eq!(engine.compute_crowding(0, 10), 0.5);
        assert_eq!(engine.compute_crowding(0, 40), 1.0);
    }

    #[test]
    fn test_blend_toward_location() {
        let engine = EnvironmentEngine::new(0.5);
        let mut graph = LocationGraph::new();
        graph
            .add_location(Location::from_kind("tavern", "The Gull", "tavern", 0))
            .unwrap();
        let mut npcs = registry(vec![NpcStatus::new("a", "A").with_location("tavern")]);

        engine.tick(&mut npcs, &graph);
        let env = &npcs[&NpcId::from("a")].environment;
        // Tavern base: [0.7, 0.6, 0.9, crowding]; blended halfway from zero.
        assert!((env.safety() - 0.35).abs() < 1e-6);
        assert!((env.resources() - 0.3).abs() < 1e-6);
        assert!((env.weather_comfort() - 0.45).abs() < 1e-6);
        // Crowding target: 1 NPC / 20 = 0.05, blended to 0.025.
        assert!((env.crowding() - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_full_blend_snaps_to_target() {
        let engine = EnvironmentEngine::new(1.0);
        let mut graph = LocationGraph::new();
        graph
            .add_location(Location::from_kind("temple", "Sanctum", "temple", 0))
            .unwrap();
        let mut npcs = registry(vec![NpcStatus::new("a", "A").with_location("temple")]);

        engine.tick(&mut npcs, &graph);
        let env = &npcs[&NpcId::from("a")].environment;
        assert_eq!(env.safety(), 0.9);
    }

    #[test]
    fn test_unknown_location_skipped() {
        let engine = EnvironmentEngine::new(0.5);
        let graph = LocationGraph::new();
        let mut npcs = registry(vec![NpcStatus::new("a", "A").with_location("nowhere")]);

        engine.tick(&mut npcs, &graph);
        assert_eq!(npcs[&NpcId::from("a")].environment.0, [0.0; 4]);
    }

    #[test]
    fn test_crowding_reflects_cohabitants() {
        let engine = EnvironmentEngine::new(1.0);
        let mut graph = LocationGraph::new();
        graph
            .add_location(Location::from_kind("hut", "Hut", "residential", 4))
            .unwrap();
        let mut npcs = registry(vec![
            NpcStatus::new("a", "A").with_location("hut"),
            NpcStatus::new("b", "B").with_location("hut"),
        ]);

        engine.tick(&mut npcs, &graph);
        assert_eq!(npcs[&NpcId::from("a")].environment.crowding(), 0.5);
    }
}
