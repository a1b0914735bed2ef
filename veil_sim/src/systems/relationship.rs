//! Relationship engine — NPC-to-NPC affinity updates.
//!
//! Relationships are sparse floats in [-1, 1]:
//! -1 = sworn enemy, 0 = stranger, +1 = best friend.
//!
//! Updates come from two sources:
//! 1. Interaction deltas, applied symmetrically each tick.
//! 2. Passive decay — weak ties fade toward 0 over time.
//!
//! The damping term `(1 - |old|)` makes extreme affinities harder to
//! shift, so a best friend doesn't become an enemy from one bad
//! interaction.

use veil_core::collections::FastHashMap;
use veil_core::npc::{NpcId, NpcStatus};

/// Affinities below this absolute value are pruned on decay.
const PRUNE_THRESHOLD: f32 = 0.01;

/// Manages NPC relationship affinities.
#[derive(Debug, Clone)]
pub struct RelationshipEngine {
    /// Per-tick decay rate for weak ties.
    pub decay_rate: f32,
    /// Global multiplier applied to all deltas.
    pub delta_scale: f32,
}

impl Default for RelationshipEngine {
    fn default() -> Self {
        RelationshipEngine {
            decay_rate: 0.01,
            delta_scale: 1.0,
        }
    }
}

/// Damped affinity update: `new = clamp(old + d * (1 - |old|), -1, 1)`.
fn damped(old: f32, scaled_delta: f32) -> f32 {
    (old + scaled_delta * (1.0 - old.abs())).clamp(-1.0, 1.0)
}

impl RelationshipEngine {
    /// Create an engine with explicit knobs.
    pub fn new(decay_rate: f32, delta_scale: f32) -> Self {
        RelationshipEngine {
            decay_rate,
            delta_scale,
        }
    }

    /// Apply a symmetric relationship change between two NPCs in the
    /// registry. Both sides' maps are updated so the relationship is
    /// always consistent from both directions. Unknown ids are ignored.
    pub fn apply_delta(
        &self,
        npcs: &mut FastHashMap<NpcId, NpcStatus>,
        a: &NpcId,
        b: &NpcId,
        delta: f32,
    ) {
        if a == b || !npcs.contains_key(a) || !npcs.contains_key(b) {
            return;
        }
        let scaled = delta * self.delta_scale;

        let old_a = npcs[a].affinity_with(b);
        let old_b = npcs[b].affinity_with(a);
        let new_a = damped(old_a, scaled);
        let new_b = damped(old_b, scaled);

        if let Some(npc_a) = npcs.get_mut(a) {
            npc_a.relationships.insert(b.clone(), new_a);
        }
        if let Some(npc_b) = npcs.get_mut(b) {
            npc_b.relationships.insert(a.clone(), new_b);
        }
    }

    /// Decay all stored affinities toward zero and prune negligible
    /// ones.
    pub fn decay(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>) {
        let factor = 1.0 - self.decay_rate;
        for npc in npcs.values_mut() {
            for affinity in npc.relationships.values_mut() {
                *affinity *= factor;
            }
            npc.relationships
                .retain(|_, affinity| affinity.abs() >= PRUNE_THRESHOLD);
        }
    }

    /// Personality compatibility between two NPCs: 1 for identical
    /// personalities, approaching -1 for maximally distant ones.
    pub fn personality_compatibility(&self, a: &NpcStatus, b: &NpcStatus) -> f32 {
        let distance = a.personality.distance(&b.personality);
        let max_dist = (a.personality.0.len() as f32).sqrt();
        1.0 - 2.0 * (distance / max_dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::vectors::PersonalityVec;

    fn registry(ids: &[&str]) -> FastHashMap<NpcId, NpcStatus> {
        let mut npcs = FastHashMap::default();
        for id in ids {
            let npc = NpcStatus::new(*id, id.to_uppercase());
            npcs.insert(npc.id.clone(), npc);
        }
        npcs
    }

    #[test]
    fn test_apply_delta_symmetric() {
        let engine = RelationshipEngine::default();
        let mut npcs = registry(&["a", "b"]);
        engine.apply_delta(&mut npcs, &NpcId::from("a"), &NpcId::from("b"), 0.2);

        let ab = npcs[&NpcId::from("a")].affinity_with(&NpcId::from("b"));
        let ba = npcs[&NpcId::from("b")].affinity_with(&NpcId::from("a"));
        assert!((ab - 0.2).abs() < 1e-6);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_damping_resists_extremes() {
        let engine = RelationshipEngine::default();
        let mut npcs = registry(&["a", "b"]);
        npcs.get_mut(&NpcId::from("a"))
            .unwrap()
            .relationships
            .insert(NpcId::from("b"), 0.9);
        npcs.get_mut(&NpcId::from("b"))
            .unwrap()
            .relationships
            .insert(NpcId::from("a"), 0.9);

        engine.apply_delta(&mut npcs, &NpcId::from("a"), &NpcId::from("b"), 0.5);
        let ab = npcs[&NpcId::from("a")].affinity_with(&NpcId::from("b"));
        // 0.9 + 0.5 * 0.1 = 0.95
        assert!((ab - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_delta_clamped_to_unit_interval() {
        let engine = RelationshipEngine::new(0.01, 10.0);
        let mut npcs = registry(&["a", "b"]);
        engine.apply_delta(&mut npcs, &NpcId::from("a"), &NpcId::from("b"), 1.0);
        let ab = npcs[&NpcId::from("a")].affinity_with(&NpcId::from("b"));
        assert!(ab <= 1.0);
    }

    #[test]
    fn test_self_delta_ignored() {
        let engine = RelationshipEngine::default();
        let mut npcs = registry(&["a"]);
        engine.apply_delta(&mut npcs, &NpcId::from("a"), &NpcId::from("a"), 0.5);
        assert!(npcs[&NpcId::from("a")].relationships.is_empty());
    }

    #[test]
    fn test_decay_shrinks_and_prunes() {
        let engine = RelationshipEngine::new(0.5, 1.0);
        let mut npcs = registry(&["a"]);
        let a = npcs.get_mut(&NpcId::from("a")).unwrap();
        a.relationships.insert(NpcId::from("b"), 0.8);
        a.relationships.insert(NpcId::from("c"), 0.015);

        engine.decay(&mut npcs);
        let a = &npcs[&NpcId::from("a")];
        assert!((a.affinity_with(&NpcId::from("b")) - 0.4).abs() < 1e-6);
        // 0.015 * 0.5 = 0.0075 < 0.01: pruned
        assert!(!a.relationships.contains_key(&NpcId::from("c")));
    }

    #[test]
    fn test_decay_prunes_negative_weak_ties() {
        let engine = RelationshipEngine::new(0.5, 1.0);
        let mut npcs = registry(&["a"]);
        npcs.get_mut(&NpcId::from("a"))
            .unwrap()
            .relationships
            .insert(NpcId::from("b"), -0.012);
        engine.decay(&mut npcs);
        assert!(npcs[&NpcId::from("a")].relationships.is_empty());
    }

    #[test]
    fn test_compatibility_identical_is_one() {
        let engine = RelationshipEngine::default();
        let npcs = registry(&["a", "b"]);
        let c = engine.personality_compatibility(&npcs[&NpcId::from("a")], &npcs[&NpcId::from("b")]);
        assert!((c - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_compatibility_distant_is_negative() {
        let engine = RelationshipEngine::default();
        let mut npcs = registry(&["a", "b"]);
        npcs.get_mut(&NpcId::from("a")).unwrap().personality = PersonalityVec([1.0; 5]);
        npcs.get_mut(&NpcId::from("b")).unwrap().personality = PersonalityVec([0.0; 5]);
        let c = engine.personality_compatibility(&npcs[&NpcId::from("a")], &npcs[&NpcId::from("b")]);
        assert!((c + 1.0).abs() < 1e-6);
    }
}
