//! World state manager: the single owner of all mutable world state.
//!
//! Maintains the NPC registry, event queue, location graph, memory
//! store, and game clock, and runs the twelve-stage tick pipeline.
//! All mutation is serialised through one exclusive lock: a tick either
//! completes or the process crashes, and CRUD outside a tick waits its
//! turn. The manager is an explicitly constructed value — there is no
//! process-wide singleton.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use veil_core::collections::FastHashMap;
use veil_core::config::SimConfig;
use veil_core::errors::{Result, VeilError};
use veil_core::event::WorldEvent;
use veil_core::location::{Location, LocationGraph};
use veil_core::npc::{LocationId, NpcId, NpcStatus};
use veil_core::snapshot::{GraphSnapshot, NpcSnapshot, WorldSnapshot};

use veil_memory::{InMemoryStore, MemoryEntry, MemoryStore};

use crate::event_queue::EventQueue;
use crate::propagation::EventPropagator;
use crate::systems::emotion::EmotionEngine;
use crate::systems::environment::EnvironmentEngine;
use crate::systems::intention::IntentionEngine;
use crate::systems::interaction::{InteractionEngine, InteractionOutcome};
use crate::systems::movement::MovementEngine;
use crate::systems::relationship::RelationshipEngine;
use crate::systems::schedule::ScheduleEngine;
use crate::systems::social::SocialEngine;
use crate::systems::vitality::VitalityEngine;

/// Summary of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickResult {
    /// In-game time after the tick.
    pub game_time: f64,
    /// Number of NPCs whose vectors were updated.
    pub npcs_updated: usize,
    /// Number of events delivered this tick.
    pub events_delivered: usize,
    /// Number of events still in the queue.
    pub events_pending: usize,
    /// Pairwise interactions resolved this tick.
    pub interactions_resolved: usize,
    /// NPCs who departed on a journey this tick.
    pub npcs_departed: usize,
}

/// Everything the manager owns, guarded by one mutex.
struct WorldInner {
    config: SimConfig,
    game_time: f64,
    npcs: FastHashMap<NpcId, NpcStatus>,
    graph: LocationGraph,
    queue: EventQueue,
    propagator: EventPropagator,
    memory: InMemoryStore,

    emotion: EmotionEngine,
    intention: IntentionEngine,
    interaction: InteractionEngine,
    relationship: RelationshipEngine,
    movement: MovementEngine,
    environment: EnvironmentEngine,
    vitality: VitalityEngine,
    social: SocialEngine,
    schedule: ScheduleEngine,

    event_seq: u64,
    memory_seq: u64,
}

impl WorldInner {
    fn new(config: SimConfig) -> Self {
        WorldInner {
            game_time: config.initial_game_time,
            npcs: FastHashMap::default(),
            graph: LocationGraph::new(),
            queue: EventQueue::new(),
            propagator: EventPropagator::new(),
            memory: InMemoryStore::new(),

            emotion: EmotionEngine::new(config.emotion_decay_rate, config.event_impact_scale),
            intention: IntentionEngine::new(),
            interaction: InteractionEngine::new(
                config.interaction_rate,
                config.max_interactions_per_location,
                config.min_energy_for_interaction,
                config.world_seed,
            ),
            relationship: RelationshipEngine::new(
                config.relationship_decay_rate,
                config.relationship_delta_scale,
            ),
            movement: MovementEngine::new(config.move_probability, config.world_seed),
            environment: EnvironmentEngine::new(config.environment_blend_rate),
            vitality: VitalityEngine {
                energy_drain: config.energy_drain_per_tick,
                energy_regen_base: config.energy_regen_base,
                health_regen_rate: config.health_regen_rate,
                danger_health_drain: config.danger_health_drain,
                danger_safety_threshold: config.danger_safety_threshold,
                health_energy_cap_threshold: config.health_energy_cap_threshold,
            },
            social: SocialEngine::new(
                config.social_blend_rate,
                config.social_decay_rate,
                config.social_event_scale,
            ),
            schedule: ScheduleEngine::default(),

            event_seq: 0,
            memory_seq: 0,
            config,
        }
    }

    /// Stamp missing fields and hand the event to the propagator.
    fn submit_event(&mut self, mut event: WorldEvent) -> usize {
        if event.timestamp == 0.0 {
            event.timestamp = self.game_time;
        }
        if event.id.is_empty() {
            event.id = format!("evt-{}", self.event_seq).into();
            self.event_seq += 1;
        }
        self.propagator.submit(&mut self.queue, event)
    }

    /// Record an event as a memory for one NPC (non-empty descriptions
    /// only): both in the recent log and in the memory store.
    fn form_memory(&mut self, npc_id: &NpcId, event: &WorldEvent) {
        if event.description.is_empty() {
            return;
        }
        let Some(npc) = self.npcs.get_mut(npc_id) else {
            return;
        };
        npc.push_memory(event.description.clone(), self.config.max_recent_memories);

        let valence = event.emotion_impact.iter().sum::<f32>()
            / event.emotion_impact.len() as f32;
        let entry = MemoryEntry::new(
            format!("mem-{}", self.memory_seq),
            npc_id.clone(),
            event.description.clone(),
            self.game_time,
            event.location_id.clone(),
        )
        .with_importance(event.intensity)
        .with_valence(valence);
        self.memory_seq += 1;
        self.memory.store(entry);
    }

    /// Apply one resolved interaction: relationship delta, vitality
    /// costs, memories for both sides, and the outcome event.
    fn apply_outcome(&mut self, outcome: &InteractionOutcome) {
        self.relationship.apply_delta(
            &mut self.npcs,
            &outcome.npc_a,
            &outcome.npc_b,
            outcome.relationship_delta,
        );

        if let Some(a) = self.npcs.get_mut(&outcome.npc_a) {
            self.vitality
                .apply_interaction_cost(a, outcome.energy_cost, outcome.health_delta_a);
        }
        if let Some(b) = self.npcs.get_mut(&outcome.npc_b) {
            self.vitality
                .apply_interaction_cost(b, outcome.energy_cost, outcome.health_delta_b);
        }

        self.form_memory(&outcome.npc_a, &outcome.event);
        self.form_memory(&outcome.npc_b, &outcome.event);

        self.submit_event(outcome.event.clone());
    }

    /// The twelve-stage tick pipeline. Later stages observe the
    /// mutations of earlier stages within the same tick.
    fn tick(&mut self, delta_hours: f64) -> TickResult {
        // 1. Advance the clock.
        self.game_time += delta_hours;
        let now = self.game_time;

        // 2. Pop all due events.
        let due_events = self.queue.pop_due(now);

        let mut interactions_resolved = 0;
        let mut npcs_departed = 0;

        if !self.npcs.is_empty() {
            // 3. Apply each due event: emotion, vitality, social, memory.
            for event in &due_events {
                self.emotion.apply_event_batch(&mut self.npcs, event);
                self.vitality.apply_event_batch(&mut self.npcs, event);
                self.social.apply_event_batch(&mut self.npcs, event);

                let ids: Vec<NpcId> = self.npcs.keys().cloned().collect();
                for npc_id in ids {
                    self.form_memory(&npc_id, event);
                }
            }

            // 4. Decay emotions toward personality baselines.
            self.emotion.tick(&mut self.npcs);

            // 5. Recompute intentions (reflecting updated energy/health).
            self.intention.tick(&mut self.npcs);

            // Refresh activities so the interaction stage sees who is
            // asleep at this tick's energy levels.
            self.schedule.tick(&mut self.npcs, now);

            // 6. Resolve pairwise interactions among co-located NPCs.
            let outcomes = self.interaction.tick(&self.npcs, now);
            interactions_resolved = outcomes.len();

            // 7. Apply each outcome and feed its event back in.
            for outcome in &outcomes {
                self.apply_outcome(outcome);
            }

            // 8. Decay weak relationships, prune negligible ones.
            self.relationship.decay(&mut self.npcs);

            // 9. Movement: arrivals, departure decisions, travel costs.
            let journeys = self.movement.tick(&mut self.npcs, &self.graph, now);
            npcs_departed = journeys.len();

            // 10. Blend NPC environments toward their locations.
            self.environment.tick(&mut self.npcs, &self.graph);

            // 11. Vitality dynamics.
            self.vitality.tick(&mut self.npcs);

            // 12. Social influence dynamics.
            self.social.tick(&mut self.npcs);
        }

        let result = TickResult {
            game_time: now,
            npcs_updated: self.npcs.len(),
            events_delivered: due_events.len(),
            events_pending: self.queue.len(),
            interactions_resolved,
            npcs_departed,
        };
        debug!(
            game_time = result.game_time,
            npcs = result.npcs_updated,
            delivered = result.events_delivered,
            pending = result.events_pending,
            interactions = result.interactions_resolved,
            departed = result.npcs_departed,
            "tick complete"
        );
        result
    }

    fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            game_time: self.game_time,
            npcs: self
                .npcs
                .iter()
                .map(|(id, npc)| (id.as_str().to_string(), NpcSnapshot::from(npc)))
                .collect(),
            locations: GraphSnapshot::from(&self.graph),
        }
    }

    fn restore(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        // Validate everything first; only then swap state so a failed
        // restore leaves the world untouched.
        let (game_time, npcs, graph) = snapshot.to_runtime()?;

        self.game_time = game_time;
        self.npcs = npcs.into_iter().map(|n| (n.id.clone(), n)).collect();
        self.graph = graph;
        self.queue.clear();
        self.movement.clear();
        self.memory.clear();
        info!(game_time, npcs = self.npcs.len(), "world restored from snapshot");
        Ok(())
    }
}

/// Persistent in-process world state.
///
/// Safe to share between threads: every operation takes the interior
/// lock for its whole duration, so concurrent tickers and CRUD callers
/// are serialised.
pub struct WorldStateManager {
    inner: Mutex<WorldInner>,
}

impl Default for WorldStateManager {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl WorldStateManager {
    /// Create a world from a configuration record.
    pub fn new(config: SimConfig) -> Self {
        WorldStateManager {
            inner: Mutex::new(WorldInner::new(config)),
        }
    }

    // --- NPC CRUD ---

    /// Register an NPC in the world.
    pub fn add_npc(&self, npc: NpcStatus) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.npcs.len() >= inner.config.max_npcs {
            return Err(VeilError::CapacityExceeded(inner.config.max_npcs));
        }
        if inner.npcs.contains_key(&npc.id) {
            return Err(VeilError::DuplicateId(npc.id.as_str().to_string()));
        }
        inner.npcs.insert(npc.id.clone(), npc);
        Ok(())
    }

    /// A copy of an NPC's current state.
    pub fn get_npc(&self, npc_id: &NpcId) -> Option<NpcStatus> {
        self.inner.lock().npcs.get(npc_id).cloned()
    }

    /// Copies of all NPCs, optionally filtered by location.
    pub fn list_npcs(&self, location_id: Option<&LocationId>) -> Vec<NpcStatus> {
        let inner = self.inner.lock();
        inner
            .npcs
            .values()
            .filter(|npc| location_id.is_none_or(|loc| npc.location_id == *loc))
            .cloned()
            .collect()
    }

    /// Remove an NPC. Returns true if it existed.
    pub fn remove_npc(&self, npc_id: &NpcId) -> bool {
        self.inner.lock().npcs.remove(npc_id).is_some()
    }

    /// Number of registered NPCs.
    pub fn npc_count(&self) -> usize {
        self.inner.lock().npcs.len()
    }

    /// The prompt-context character sheet for an NPC.
    pub fn character_sheet(&self, npc_id: &NpcId) -> Option<String> {
        self.inner
            .lock()
            .npcs
            .get(npc_id)
            .map(NpcStatus::to_character_sheet)
    }

    /// Supply custom intention weights for an archetype. NPCs of other
    /// archetypes keep the shared default matrices.
    pub fn register_archetype_weights(
        &self,
        archetype: &str,
        weights: crate::systems::intention::ArchetypeWeights,
    ) {
        self.inner
            .lock()
            .intention
            .register_archetype(archetype.to_string(), weights);
    }

    // --- Locations ---

    /// Add a location to the world graph.
    pub fn add_location(&self, location: Location) -> Result<()> {
        self.inner.lock().graph.add_location(location)
    }

    /// Add an edge between two locations.
    pub fn add_edge(
        &self,
        from: &LocationId,
        to: &LocationId,
        travel_hours: f64,
        danger: f32,
        bidirectional: bool,
    ) -> Result<()> {
        self.inner
            .lock()
            .graph
            .add_edge(from, to, travel_hours, danger, bidirectional)
    }

    /// A copy of a location.
    pub fn get_location(&self, id: &LocationId) -> Option<Location> {
        self.inner.lock().graph.get_location(id).cloned()
    }

    /// Copies of all registered locations.
    pub fn list_locations(&self) -> Vec<Location> {
        self.inner
            .lock()
            .graph
            .iter_locations()
            .cloned()
            .collect()
    }

    // --- Events ---

    /// Submit a world event and schedule its propagation cascade.
    ///
    /// The event's timestamp is stamped with the current game time if
    /// zero. Returns the number of scheduled deliveries (including the
    /// original). Never fails: an event that cannot cascade simply
    /// schedules once.
    pub fn submit_event(&self, event: WorldEvent) -> usize {
        self.inner.lock().submit_event(event)
    }

    /// Number of events still waiting in the queue.
    pub fn pending_events(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Delivery time of the next queued event, if any.
    pub fn peek_next_event_time(&self) -> Option<f64> {
        self.inner.lock().queue.peek_next_time()
    }

    // --- Memory ---

    /// The most recent memories for an NPC, newest first.
    pub fn recent_memories(&self, npc_id: &NpcId, limit: usize) -> Vec<MemoryEntry> {
        self.inner.lock().memory.get_recent(npc_id, limit)
    }

    /// Similarity search over an NPC's memories.
    pub fn search_memories(
        &self,
        npc_id: &NpcId,
        query_embedding: &[f32],
        limit: usize,
    ) -> Vec<MemoryEntry> {
        self.inner.lock().memory.search(npc_id, query_embedding, limit)
    }

    // --- Simulation ---

    /// Current in-game time in hours.
    pub fn game_time(&self) -> f64 {
        self.inner.lock().game_time
    }

    /// Advance the simulation by `delta_hours`, running the full
    /// pipeline under the exclusive lock.
    pub fn tick(&self, delta_hours: f64) -> TickResult {
        self.inner.lock().tick(delta_hours)
    }

    // --- Serialization ---

    /// A full snapshot of the world.
    pub fn snapshot(&self) -> WorldSnapshot {
        self.inner.lock().snapshot()
    }

    /// Replace registry, clock, and graph from a snapshot; the event
    /// queue, travel states, and memory store reset to empty. A failed
    /// restore leaves the manager in its pre-call state.
    pub fn restore(&self, snapshot: &WorldSnapshot) -> Result<()> {
        self.inner.lock().restore(snapshot)
    }
}
