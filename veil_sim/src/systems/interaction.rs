//! Interaction engine — pairwise autonomous NPC interactions.
//!
//! Each tick: group NPCs by location, enumerate unordered pairs of
//! awake NPCs with enough energy, sample a Bernoulli draw per pair from
//! intention alignment and existing affinity, and classify the pairs
//! that fire into interaction kinds with relationship and vitality
//! effects. Each NPC participates in at most one interaction per tick.

use veil_core::collections::{FastHashMap, FastHashSet};
use veil_core::event::WorldEvent;
use veil_core::npc::{Activity, LocationId, NpcId, NpcStatus};
use veil_core::rng::DeterministicRng;
use veil_core::vectors::intention_idx;

/// Health considered "low" for aid classification.
const AID_HEALTH_THRESHOLD: f32 = 0.5;

/// How an interaction between two NPCs resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Two socializers chatting.
    FriendlyChat,
    /// Two dominators clashing.
    Conflict,
    /// A dominator leaning on a survivor.
    Intimidation,
    /// A nurturer tending someone hurt.
    Aid,
    /// Anything else.
    CasualEncounter,
}

impl InteractionKind {
    /// Stable lowercase label, used as the `interaction_<label>` event
    /// type suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::FriendlyChat => "friendly_chat",
            InteractionKind::Conflict => "conflict",
            InteractionKind::Intimidation => "intimidation",
            InteractionKind::Aid => "aid",
            InteractionKind::CasualEncounter => "casual_encounter",
        }
    }
}

/// Per-kind effect constants.
///
/// `health_delta_a` applies to the first participant as classified
/// (the dominator in an intimidation, the carer in an aid).
#[derive(Debug, Clone, Copy)]
pub struct InteractionEffects {
    pub relationship_delta: f32,
    pub energy_cost: f32,
    pub health_delta_a: f32,
    pub health_delta_b: f32,
    pub event_intensity: f32,
}

/// Effect table per interaction kind.
pub fn effects_for(kind: InteractionKind) -> InteractionEffects {
    match kind {
        InteractionKind::FriendlyChat => InteractionEffects {
            relationship_delta: 0.05,
            energy_cost: 0.01,
            health_delta_a: 0.0,
            health_delta_b: 0.0,
            event_intensity: 0.3,
        },
        InteractionKind::Conflict => InteractionEffects {
            relationship_delta: -0.10,
            energy_cost: 0.03,
            health_delta_a: -0.08,
            health_delta_b: -0.08,
            event_intensity: 0.6,
        },
        InteractionKind::Intimidation => InteractionEffects {
            relationship_delta: -0.06,
            energy_cost: 0.01,
            health_delta_a: 0.0,
            health_delta_b: -0.03,
            event_intensity: 0.5,
        },
        InteractionKind::Aid => InteractionEffects {
            relationship_delta: 0.08,
            energy_cost: 0.01,
            health_delta_a: 0.0,
            health_delta_b: 0.05,
            event_intensity: 0.4,
        },
        InteractionKind::CasualEncounter => InteractionEffects {
            relationship_delta: 0.01,
            energy_cost: 0.01,
            health_delta_a: 0.0,
            health_delta_b: 0.0,
            event_intensity: 0.1,
        },
    }
}

/// One resolved pairwise interaction.
#[derive(Debug, Clone)]
pub struct InteractionOutcome {
    /// First participant (the acting side for asymmetric kinds).
    pub npc_a: NpcId,
    /// Second participant.
    pub npc_b: NpcId,
    /// How the pair was classified.
    pub kind: InteractionKind,
    /// Symmetric affinity change.
    pub relationship_delta: f32,
    /// Energy deducted from both participants.
    pub energy_cost: f32,
    /// Health change for the first participant.
    pub health_delta_a: f32,
    /// Health change for the second participant.
    pub health_delta_b: f32,
    /// The world event this interaction emits.
    pub event: WorldEvent,
}

/// Pairs co-located NPCs and generates interaction outcomes.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    /// Base probability multiplier for NPC-NPC interactions.
    pub interaction_rate: f32,
    /// Cap on interactions per location per tick.
    pub max_per_location: usize,
    /// NPCs below this energy won't interact.
    pub min_energy: f32,
    rng: DeterministicRng,
}

impl InteractionEngine {
    /// Create an engine with explicit knobs and its own RNG stream.
    pub fn new(interaction_rate: f32, max_per_location: usize, min_energy: f32, seed: u64) -> Self {
        InteractionEngine {
            interaction_rate,
            max_per_location,
            min_energy,
            rng: DeterministicRng::with_domain(seed, "interactions"),
        }
    }

    /// Classify a pair by their dominant intentions (and health).
    pub fn resolve_kind(&self, a: &NpcStatus, b: &NpcStatus) -> InteractionKind {
        let dom_a = a.intention.dominant_index();
        let dom_b = b.intention.dominant_index();

        use veil_core::vectors::intention_idx::{DOMINATE, NURTURE, SOCIALIZE, SURVIVE};

        if dom_a == SOCIALIZE && dom_b == SOCIALIZE {
            return InteractionKind::FriendlyChat;
        }
        if dom_a == DOMINATE && dom_b == DOMINATE {
            return InteractionKind::Conflict;
        }
        if (dom_a == DOMINATE && dom_b == SURVIVE) || (dom_a == SURVIVE && dom_b == DOMINATE) {
            return InteractionKind::Intimidation;
        }
        if (dom_a == NURTURE && b.health < AID_HEALTH_THRESHOLD)
            || (dom_b == NURTURE && a.health < AID_HEALTH_THRESHOLD)
        {
            return InteractionKind::Aid;
        }
        InteractionKind::CasualEncounter
    }

    /// Probability that a co-located pair interacts this tick.
    ///
    /// Proportional to intention alignment (dot product, zero-clamped)
    /// and modulated by existing affinity; zero when either NPC lacks
    /// the energy to engage.
    pub fn interaction_probability(&self, a: &NpcStatus, b: &NpcStatus) -> f32 {
        if a.energy < self.min_energy || b.energy < self.min_energy {
            return 0.0;
        }
        let alignment = a.intention.alignment(&b.intention).max(0.0);
        let affinity = 0.5 * (a.affinity_with(&b.id) + b.affinity_with(&a.id));
        (self.interaction_rate * alignment * (1.0 + 0.5 * affinity)).clamp(0.0, 1.0)
    }

    /// Resolve an interaction between two NPCs into an outcome.
    ///
    /// For asymmetric kinds the participants are oriented so the acting
    /// side (dominator, carer) comes first.
    pub fn resolve(&self, a: &NpcStatus, b: &NpcStatus, game_time: f64) -> InteractionOutcome {
        let kind = self.resolve_kind(a, b);

        // Orient asymmetric pairs: actor first.
        let (first, second) = match kind {
            InteractionKind::Intimidation
                if a.intention.dominant_index() != intention_idx::DOMINATE =>
            {
                (b, a)
            }
            InteractionKind::Aid
                if a.intention.dominant_index() != intention_idx::NURTURE =>
            {
                (b, a)
            }
            _ => (a, b),
        };

        let effects = effects_for(kind);
        let description = match kind {
            InteractionKind::FriendlyChat => {
                format!("{} and {} shared a friendly chat", first.name, second.name)
            }
            InteractionKind::Conflict => {
                format!("{} and {} came to blows", first.name, second.name)
            }
            InteractionKind::Intimidation => {
                format!("{} intimidated {}", first.name, second.name)
            }
            InteractionKind::Aid => format!("{} tended to {}", first.name, second.name),
            InteractionKind::CasualEncounter => {
                format!("{} and {} crossed paths", first.name, second.name)
            }
        };

        let event = WorldEvent::new(
            format!("interaction_{}", kind.as_str()),
            first.location_id.0.clone(),
        )
        .with_source(first.id.clone())
        .with_description(description)
        .with_intensity(effects.event_intensity)
        .with_timestamp(game_time);

        InteractionOutcome {
            npc_a: first.id.clone(),
            npc_b: second.id.clone(),
            kind,
            relationship_delta: effects.relationship_delta,
            energy_cost: effects.energy_cost,
            health_delta_a: effects.health_delta_a,
            health_delta_b: effects.health_delta_b,
            event,
        }
    }

    /// Run the interaction stage over the whole registry.
    ///
    /// NPCs are grouped by location; within a location, pairs are
    /// enumerated in sorted-id order so runs are reproducible. Sleeping
    /// NPCs never interact; each NPC appears in at most one outcome.
    pub fn tick(
        &mut self,
        npcs: &FastHashMap<NpcId, NpcStatus>,
        game_time: f64,
    ) -> Vec<InteractionOutcome> {
        let mut by_location: FastHashMap<&LocationId, Vec<&NpcStatus>> = FastHashMap::default();
        for npc in npcs.values() {
            if npc.activity == Activity::Sleeping {
                continue;
            }
            by_location.entry(&npc.location_id).or_default().push(npc);
        }

        let mut locations: Vec<&LocationId> = by_location.keys().copied().collect();
        locations.sort();

        let mut outcomes = Vec::new();
        let mut engaged: FastHashSet<NpcId> = FastHashSet::default();

        for location in locations {
            let mut group = by_location[&location].clone();
            group.sort_by(|a, b| a.id.cmp(&b.id));

            let mut resolved_here = 0;
            for i in 0..group.len() {
                if resolved_here >= self.max_per_location {
                    break;
                }
                let a = group[i];
                if engaged.contains(&a.id) {
                    continue;
                }
                for b in group.iter().skip(i + 1) {
                    if engaged.contains(&b.id) {
                        continue;
                    }
                    let prob = self.interaction_probability(a, b);
                    if prob <= 0.0 || !self.rng.gen_bool(prob) {
                        continue;
                    }
                    outcomes.push(self.resolve(a, b, game_time));
                    engaged.insert(a.id.clone());
                    engaged.insert(b.id.clone());
                    resolved_here += 1;
                    break;
                }
            }
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::vectors::IntentionVec;

    fn engine() -> InteractionEngine {
        InteractionEngine::new(100.0, 10, 0.1, 42)
    }

    fn npc_with_intent(id: &str, location: &str, dominant: usize) -> NpcStatus {
        let mut npc = NpcStatus::new(id, id.to_uppercase()).with_location(location);
        let mut intent = [0.0f32; 8];
        intent[dominant] = 1.0;
        npc.intention = IntentionVec(intent);
        npc
    }

    #[test]
    fn test_socialize_pair_chats() {
        let e = engine();
        let a = npc_with_intent("a", "tavern", intention_idx::SOCIALIZE);
        let b = npc_with_intent("b", "tavern", intention_idx::SOCIALIZE);
        assert_eq!(e.resolve_kind(&a, &b), InteractionKind::FriendlyChat);
    }

    #[test]
    fn test_dominate_pair_conflicts() {
        let e = engine();
        let a = npc_with_intent("a", "tavern", intention_idx::DOMINATE);
        let b = npc_with_intent("b", "tavern", intention_idx::DOMINATE);
        assert_eq!(e.resolve_kind(&a, &b), InteractionKind::Conflict);
    }

    #[test]
    fn test_dominate_survive_intimidates_either_order() {
        let e = engine();
        let bully = npc_with_intent("bully", "tavern", intention_idx::DOMINATE);
        let victim = npc_with_intent("victim", "tavern", intention_idx::SURVIVE);
        assert_eq!(e.resolve_kind(&bully, &victim), InteractionKind::Intimidation);
        assert_eq!(e.resolve_kind(&victim, &bully), InteractionKind::Intimidation);
    }

    #[test]
    fn test_nurture_low_health_aids() {
        let e = engine();
        let carer = npc_with_intent("carer", "tavern", intention_idx::NURTURE);
        let mut hurt = npc_with_intent("hurt", "tavern", intention_idx::EXPLORE);
        hurt.health = 0.3;
        assert_eq!(e.resolve_kind(&carer, &hurt), InteractionKind::Aid);
    }

    #[test]
    fn test_nurture_healthy_is_casual() {
        let e = engine();
        let carer = npc_with_intent("carer", "tavern", intention_idx::NURTURE);
        let healthy = npc_with_intent("fine", "tavern", intention_idx::EXPLORE);
        assert_eq!(e.resolve_kind(&carer, &healthy), InteractionKind::CasualEncounter);
    }

    #[test]
    fn test_fallback_casual() {
        let e = engine();
        let a = npc_with_intent("a", "tavern", intention_idx::SURVIVE);
        let b = npc_with_intent("b", "tavern", intention_idx::EXPLORE);
        assert_eq!(e.resolve_kind(&a, &b), InteractionKind::CasualEncounter);
    }

    #[test]
    fn test_probability_zero_for_low_energy() {
        let e = InteractionEngine::new(1.0, 10, 0.2, 42);
        let mut a = npc_with_intent("a", "tavern", intention_idx::SOCIALIZE);
        a.energy = 0.05;
        let b = npc_with_intent("b", "tavern", intention_idx::SOCIALIZE);
        assert_eq!(e.interaction_probability(&a, &b), 0.0);
    }

    #[test]
    fn test_probability_positive_for_aligned_intentions() {
        let e = InteractionEngine::new(1.0, 10, 0.1, 42);
        let a = npc_with_intent("a", "tavern", intention_idx::SOCIALIZE);
        let b = npc_with_intent("b", "tavern", intention_idx::SOCIALIZE);
        assert!(e.interaction_probability(&a, &b) > 0.0);
    }

    #[test]
    fn test_probability_rises_with_affinity() {
        let e = InteractionEngine::new(0.3, 10, 0.1, 42);
        let mut a = npc_with_intent("a", "tavern", intention_idx::SOCIALIZE);
        let b = npc_with_intent("b", "tavern", intention_idx::SOCIALIZE);
        let stranger_prob = e.interaction_probability(&a, &b);
        a.relationships.insert(NpcId::from("b"), 0.9);
        assert!(e.interaction_probability(&a, &b) > stranger_prob);
    }

    #[test]
    fn test_resolve_generates_event() {
        let e = engine();
        let a = npc_with_intent("a", "tavern", intention_idx::SOCIALIZE);
        let b = npc_with_intent("b", "tavern", intention_idx::SOCIALIZE);
        let outcome = e.resolve(&a, &b, 100.0);

        assert_eq!(outcome.event.timestamp, 100.0);
        assert!(outcome.event.description.contains('A'));
        assert!(outcome.event.description.contains('B'));
        assert!(outcome.event.event_type.starts_with("interaction_"));
        assert_eq!(outcome.event.location_id.as_str(), "tavern");
    }

    #[test]
    fn test_resolve_delta_signs() {
        let e = engine();
        let a = npc_with_intent("a", "tavern", intention_idx::SOCIALIZE);
        let b = npc_with_intent("b", "tavern", intention_idx::SOCIALIZE);
        assert!(e.resolve(&a, &b, 0.0).relationship_delta > 0.0);

        let c = npc_with_intent("c", "tavern", intention_idx::DOMINATE);
        let d = npc_with_intent("d", "tavern", intention_idx::DOMINATE);
        assert!(e.resolve(&c, &d, 0.0).relationship_delta < 0.0);
    }

    #[test]
    fn test_intimidation_orients_dominator_first() {
        let e = engine();
        let victim = npc_with_intent("victim", "tavern", intention_idx::SURVIVE);
        let bully = npc_with_intent("bully", "tavern", intention_idx::DOMINATE);
        let outcome = e.resolve(&victim, &bully, 0.0);
        assert_eq!(outcome.npc_a.as_str(), "bully");
        assert_eq!(outcome.health_delta_b, -0.03);
    }

    fn registry(npcs: Vec<NpcStatus>) -> FastHashMap<NpcId, NpcStatus> {
        npcs.into_iter().map(|n| (n.id.clone(), n)).collect()
    }

    #[test]
    fn test_tick_only_pairs_same_location() {
        let mut e = engine();
        let npcs = registry(vec![
            npc_with_intent("a", "tavern", intention_idx::SOCIALIZE),
            npc_with_intent("b", "market", intention_idx::SOCIALIZE),
        ]);
        assert!(e.tick(&npcs, 0.0).is_empty());
    }

    #[test]
    fn test_tick_respects_max_per_location() {
        let mut e = InteractionEngine::new(100.0, 2, 0.1, 42);
        let npcs = registry(
            (0..10)
                .map(|i| npc_with_intent(&format!("npc-{i}"), "plaza", intention_idx::SOCIALIZE))
                .collect(),
        );
        assert!(e.tick(&npcs, 0.0).len() <= 2);
    }

    #[test]
    fn test_tick_each_npc_at_most_once() {
        let mut e = engine();
        let npcs = registry(
            (0..6)
                .map(|i| npc_with_intent(&format!("npc-{i}"), "plaza", intention_idx::SOCIALIZE))
                .collect(),
        );
        let outcomes = e.tick(&npcs, 0.0);
        let mut participants = Vec::new();
        for o in &outcomes {
            participants.push(o.npc_a.clone());
            participants.push(o.npc_b.clone());
        }
        let unique: FastHashSet<&NpcId> = participants.iter().collect();
        assert_eq!(unique.len(), participants.len());
    }

    #[test]
    fn test_tick_skips_sleeping() {
        let mut e = engine();
        let mut a = npc_with_intent("a", "tavern", intention_idx::SOCIALIZE);
        a.activity = Activity::Sleeping;
        let b = npc_with_intent("b", "tavern", intention_idx::SOCIALIZE);
        let npcs = registry(vec![a, b]);
        assert!(e.tick(&npcs, 0.0).is_empty());
    }

    #[test]
    fn test_outcome_event_timestamp_is_tick_clock() {
        let mut e = engine();
        let npcs = registry(vec![
            npc_with_intent("a", "tavern", intention_idx::SOCIALIZE),
            npc_with_intent("b", "tavern", intention_idx::SOCIALIZE),
        ]);
        let outcomes = e.tick(&npcs, 77.5);
        assert!(!outcomes.is_empty());
        for o in &outcomes {
            assert_eq!(o.event.timestamp, 77.5);
        }
    }
}
