//! Movement engine — NPC autonomous movement decisions.
//!
//! Each tick, stationary NPCs may decide to move to an adjacent
//! location based on their intention vectors, energy, and the location
//! graph. Movement is not instant: NPCs enter a traveling state and
//! arrive after travel_hours have elapsed.
//!
//! Intention-to-movement mapping:
//! - explore: pull toward environments unlike the current one
//! - survive: pull toward safety, away from dangerous paths
//! - escape: pull to leave, any destination
//! - socialize: pull toward crowded locations
//! - achieve/dominate: pull toward resource-rich locations

use serde::{Deserialize, Serialize};

use veil_core::collections::FastHashMap;
use veil_core::location::LocationGraph;
use veil_core::npc::{LocationId, NpcId, NpcStatus};
use veil_core::rng::DeterministicRng;
use veil_core::vectors::{intention_idx, EnvironmentVec};

/// NPCs below this energy won't move.
const MIN_ENERGY_TO_MOVE: f32 = 0.15;

/// Energy cost per hour of travel.
const ENERGY_COST_PER_HOUR: f32 = 0.02;

/// Tracks an NPC currently traveling between locations.
/// Exists for the interval [departure, arrival); removed on arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelState {
    /// The traveling NPC.
    pub npc_id: NpcId,
    /// Where they left from.
    pub origin_id: LocationId,
    /// Where they're going.
    pub destination_id: LocationId,
    /// Game-time when they left.
    pub departure_time: f64,
    /// Game-time when they arrive.
    pub arrival_time: f64,
}

/// Decides NPC movement and manages travel state.
#[derive(Debug, Clone)]
pub struct MovementEngine {
    /// Base probability an NPC considers moving.
    pub move_probability: f32,
    travelers: FastHashMap<NpcId, TravelState>,
    rng: DeterministicRng,
}

impl MovementEngine {
    /// Create an engine with its own RNG stream.
    pub fn new(move_probability: f32, seed: u64) -> Self {
        MovementEngine {
            move_probability,
            travelers: FastHashMap::default(),
            rng: DeterministicRng::with_domain(seed, "movement"),
        }
    }

    /// Whether an NPC is currently in transit.
    pub fn is_traveling(&self, npc_id: &NpcId) -> bool {
        self.travelers.contains_key(npc_id)
    }

    /// Current travel state for an NPC, if in transit.
    pub fn travel_state(&self, npc_id: &NpcId) -> Option<&TravelState> {
        self.travelers.get(npc_id)
    }

    /// Number of NPCs in transit.
    pub fn traveler_count(&self) -> usize {
        self.travelers.len()
    }

    /// Drop all travel state (used on world restore).
    pub fn clear(&mut self) {
        self.travelers.clear();
    }

    /// Score how attractive a destination is for an NPC.
    /// Higher scores mean the NPC is more likely to travel there.
    pub fn score_destination(
        &self,
        npc: &NpcStatus,
        dest_env: &EnvironmentVec,
        edge_danger: f32,
        travel_hours: f64,
    ) -> f32 {
        let intention = &npc.intention.0;
        let curr_env = &npc.environment;

        let mut score = 0.0f32;

        // Explore: prefer destinations different from current
        score += intention[intention_idx::EXPLORE] * dest_env.distance(curr_env) * 2.0;

        // Survive: prefer safer destinations, avoid dangerous paths
        let safety_gain = dest_env.safety() - curr_env.safety();
        score += intention[intention_idx::SURVIVE] * safety_gain * 3.0;
        score -= intention[intention_idx::SURVIVE] * edge_danger * 2.0;

        // Escape: strong pull to leave, any destination
        score += intention[intention_idx::ESCAPE] * 1.5;

        // Socialize: prefer crowded destinations
        let crowding_gain = dest_env.crowding() - curr_env.crowding();
        score += intention[intention_idx::SOCIALIZE] * crowding_gain * 2.0;

        // Achieve/Dominate: prefer resource-rich destinations
        let resource_gain = dest_env.resources() - curr_env.resources();
        score += (intention[intention_idx::ACHIEVE] + intention[intention_idx::DOMINATE])
            * resource_gain
            * 2.0;

        // Penalize long travel times
        score -= travel_hours as f32 * 0.1;

        // Penalize danger for non-brave NPCs
        score -= edge_danger * (1.0 - intention[intention_idx::DOMINATE]) * 1.5;

        score
    }

    /// Decide whether an NPC departs this tick and where to.
    ///
    /// Only candidates with positive scores are retained; the best one
    /// is put to a Bernoulli draw scaled by its score.
    pub fn decide_movement(&mut self, npc: &NpcStatus, graph: &LocationGraph) -> Option<LocationId> {
        if npc.energy < MIN_ENERGY_TO_MOVE {
            return None;
        }

        let neighbors = graph.neighbors(&npc.location_id);
        if neighbors.is_empty() {
            return None;
        }

        let mut best: Option<(&LocationId, f32)> = None;
        for edge in neighbors {
            let Some(dest) = graph.get_location(&edge.target_id) else {
                continue;
            };
            let score =
                self.score_destination(npc, &dest.environment, edge.danger, edge.travel_hours);
            if score <= 0.0 {
                continue;
            }
            match best {
                Some((_, best_score)) if best_score >= score => {}
                _ => best = Some((&edge.target_id, score)),
            }
        }

        let (dest_id, best_score) = best?;
        let prob = self.move_probability * best_score.clamp(0.0, 1.0);
        if self.rng.gen_bool(prob) {
            Some(dest_id.clone())
        } else {
            None
        }
    }

    /// Process movement for all NPCs in one tick.
    ///
    /// 1. Arrive travelers whose arrival time has passed.
    /// 2. Decide new departures for stationary NPCs (in sorted-id order
    ///    so RNG consumption is reproducible).
    /// 3. Deduct travel energy from new departures.
    ///
    /// Returns the journeys started this tick.
    pub fn tick(
        &mut self,
        npcs: &mut FastHashMap<NpcId, NpcStatus>,
        graph: &LocationGraph,
        game_time: f64,
    ) -> Vec<TravelState> {
        // Count NPCs per location for capacity checks
        let mut counts: FastHashMap<LocationId, u32> = FastHashMap::default();
        for npc in npcs.values() {
            *counts.entry(npc.location_id.clone()).or_insert(0) += 1;
        }

        // 1. Arrivals
        let arrived: Vec<NpcId> = self
            .travelers
            .iter()
            .filter(|(_, t)| t.arrival_time <= game_time)
            .map(|(id, _)| id.clone())
            .collect();
        for npc_id in arrived {
            if let Some(travel) = self.travelers.remove(&npc_id) {
                if let Some(npc) = npcs.get_mut(&npc_id) {
                    npc.location_id = travel.destination_id;
                }
            }
        }

        // 2. Departures
        let mut ids: Vec<NpcId> = npcs.keys().cloned().collect();
        ids.sort();

        let mut new_journeys = Vec::new();
        for npc_id in ids {
            if self.is_traveling(&npc_id) {
                continue;
            }
            let Some(dest_id) = npcs
                .get(&npc_id)
                .and_then(|npc| self.decide_movement(npc, graph))
            else {
                continue;
            };

            // Skip destinations at capacity
            if let Some(dest) = graph.get_location(&dest_id) {
                if dest.capacity > 0 && counts.get(&dest_id).copied().unwrap_or(0) >= dest.capacity
                {
                    continue;
                }
            }

            let Some(npc) = npcs.get_mut(&npc_id) else {
                continue;
            };
            let Some(edge) = graph.get_edge(&npc.location_id, &dest_id) else {
                continue;
            };

            let travel = TravelState {
                npc_id: npc_id.clone(),
                origin_id: npc.location_id.clone(),
                destination_id: dest_id,
                departure_time: game_time,
                arrival_time: game_time + edge.travel_hours,
            };

            // 3. Deduct energy for the journey
            let cost = edge.travel_hours as f32 * ENERGY_COST_PER_HOUR;
            npc.energy = (npc.energy - cost).max(0.0);

            self.travelers.insert(npc_id, travel.clone());
            new_journeys.push(travel);
        }

        new_journeys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::location::Location;
    use veil_core::vectors::IntentionVec;

    fn explorer(id: &str, location: &str) -> NpcStatus {
        let mut npc = NpcStatus::new(id, id.to_uppercase()).with_location(location);
        let mut intent = [0.0f32; 8];
        intent[intention_idx::EXPLORE] = 1.0;
        npc.intention = IntentionVec(intent);
        npc
    }

    fn two_location_graph() -> LocationGraph {
        let mut graph = LocationGraph::new();
        graph
            .add_location(Location::from_kind("tavern", "The Gull", "tavern", 0))
            .unwrap();
        graph
            .add_location(Location::from_kind("forest", "Deepwood", "forest", 0))
            .unwrap();
        graph
            .add_edge(
                &LocationId::from("tavern"),
                &LocationId::from("forest"),
                2.0,
                0.3,
                true,
            )
            .unwrap();
        graph
    }

    fn registry(npcs: Vec<NpcStatus>) -> FastHashMap<NpcId, NpcStatus> {
        npcs.into_iter().map(|n| (n.id.clone(), n)).collect()
    }

    #[test]
    fn test_low_energy_stays() {
        let mut engine = MovementEngine::new(1.0, 42);
        let graph = two_location_graph();
        let mut npc = explorer("a", "tavern");
        npc.energy = 0.05;
        assert!(engine.decide_movement(&npc, &graph).is_none());
    }

    #[test]
    fn test_isolated_location_no_decision() {
        let mut engine = MovementEngine::new(1.0, 42);
        let mut graph = LocationGraph::new();
        graph
            .add_location(Location::from_kind("island", "Isle", "forest", 0))
            .unwrap();
        let npc = explorer("a", "island");
        assert!(engine.decide_movement(&npc, &graph).is_none());
    }

    #[test]
    fn test_explorer_departs_with_forced_probability() {
        let mut engine = MovementEngine::new(1.0, 42);
        let graph = two_location_graph();
        let mut npcs = registry(vec![explorer("a", "tavern")]);

        let journeys = engine.tick(&mut npcs, &graph, 0.0);
        assert_eq!(journeys.len(), 1);
        assert_eq!(journeys[0].destination_id.as_str(), "forest");
        assert_eq!(journeys[0].arrival_time, 2.0);
        assert!(engine.is_traveling(&NpcId::from("a")));
        // Energy deducted: 2h * 0.02
        assert!((npcs[&NpcId::from("a")].energy - 0.96).abs() < 1e-6);
        // Still at origin until arrival
        assert_eq!(npcs[&NpcId::from("a")].location_id.as_str(), "tavern");
    }

    #[test]
    fn test_arrival_moves_npc() {
        let mut engine = MovementEngine::new(1.0, 42);
        // One-way path so the arrival can't bounce straight back.
        let mut graph = LocationGraph::new();
        graph
            .add_location(Location::from_kind("tavern", "The Gull", "tavern", 0))
            .unwrap();
        graph
            .add_location(Location::from_kind("forest", "Deepwood", "forest", 0))
            .unwrap();
        graph
            .add_edge(
                &LocationId::from("tavern"),
                &LocationId::from("forest"),
                2.0,
                0.3,
                false,
            )
            .unwrap();
        let mut npcs = registry(vec![explorer("a", "tavern")]);

        engine.tick(&mut npcs, &graph, 0.0);
        // Mid-journey: nothing changes
        engine.tick(&mut npcs, &graph, 1.0);
        assert_eq!(npcs[&NpcId::from("a")].location_id.as_str(), "tavern");
        // Arrival
        engine.tick(&mut npcs, &graph, 2.0);
        assert_eq!(npcs[&NpcId::from("a")].location_id.as_str(), "forest");
        assert!(!engine.is_traveling(&NpcId::from("a")));
    }

    #[test]
    fn test_traveling_npc_does_not_redecide() {
        let mut engine = MovementEngine::new(1.0, 42);
        let graph = two_location_graph();
        let mut npcs = registry(vec![explorer("a", "tavern")]);

        let first = engine.tick(&mut npcs, &graph, 0.0);
        assert_eq!(first.len(), 1);
        let second = engine.tick(&mut npcs, &graph, 0.5);
        assert!(second.is_empty());
    }

    #[test]
    fn test_capacity_full_destination_skipped() {
        let mut engine = MovementEngine::new(1.0, 42);
        let mut graph = LocationGraph::new();
        graph
            .add_location(Location::from_kind("tavern", "The Gull", "tavern", 0))
            .unwrap();
        graph
            .add_location(Location::from_kind("hut", "Tiny Hut", "residential", 1))
            .unwrap();
        graph
            .add_edge(
                &LocationId::from("tavern"),
                &LocationId::from("hut"),
                1.0,
                0.0,
                true,
            )
            .unwrap();

        let mut occupant = explorer("occupant", "hut");
        occupant.energy = 0.0; // pinned in place
        let mut npcs = registry(vec![explorer("mover", "tavern"), occupant]);

        let journeys = engine.tick(&mut npcs, &graph, 0.0);
        assert!(journeys.is_empty());
    }

    #[test]
    fn test_zero_probability_never_departs() {
        let mut engine = MovementEngine::new(0.0, 42);
        let graph = two_location_graph();
        let mut npcs = registry(vec![explorer("a", "tavern")]);
        for t in 0..20 {
            let journeys = engine.tick(&mut npcs, &graph, t as f64);
            assert!(journeys.is_empty());
        }
    }

    #[test]
    fn test_danger_penalty_deters_survivor() {
        let engine = MovementEngine::new(1.0, 42);
        let mut npc = NpcStatus::new("a", "A").with_location("tavern");
        let mut intent = [0.0f32; 8];
        intent[intention_idx::SURVIVE] = 1.0;
        npc.intention = IntentionVec(intent);
        npc.environment = EnvironmentVec([0.5, 0.5, 0.5, 0.5]);

        let same_env = EnvironmentVec([0.5, 0.5, 0.5, 0.5]);
        let safe = engine.score_destination(&npc, &same_env, 0.0, 1.0);
        let risky = engine.score_destination(&npc, &same_env, 0.9, 1.0);
        assert!(safe > risky);
    }

    #[test]
    fn test_clear_drops_travelers() {
        let mut engine = MovementEngine::new(1.0, 42);
        let graph = two_location_graph();
        let mut npcs = registry(vec![explorer("a", "tavern")]);
        engine.tick(&mut npcs, &graph, 0.0);
        assert_eq!(engine.traveler_count(), 1);
        engine.clear();
        assert_eq!(engine.traveler_count(), 0);
    }
}
