//! Social influence engine — peer pressure and social contagion.
//!
//! Updates NPC social_influence vectors from:
//! 1. Peer pressure from co-located NPCs (proximity contagion).
//! 2. Archetype radiation profiles (a priest radiates
//!    religious_devotion).
//! 3. Relationship weighting (friends influence more).
//! 4. Personality susceptibility (high agreeableness = more
//!    susceptible, high neuroticism = slightly less).
//! 5. Event-driven shifts (events with non-zero social_impact).
//! 6. Passive decay toward zero.

use veil_core::collections::FastHashMap;
use veil_core::event::WorldEvent;
use veil_core::npc::{LocationId, NpcId, NpcStatus};
use veil_core::vectors::SOCIAL_DIM;

/// Social radiation profile for an archetype.
///
/// Dims: cultural_conformity, economic_pressure, fashion_awareness,
/// status_seeking, religious_devotion, political_alignment.
/// Unknown archetypes radiate nothing.
pub fn archetype_profile(archetype: &str) -> [f32; SOCIAL_DIM] {
    match archetype {
        "merchant" => [0.0, 0.4, 0.2, 0.1, 0.0, 0.0],
        "priest" => [0.15, 0.0, 0.0, 0.0, 0.5, 0.1],
        "noble" => [0.1, 0.0, 0.15, 0.4, 0.0, 0.3],
        "guard" => [0.25, 0.0, 0.0, 0.1, 0.0, 0.2],
        "soldier" => [0.2, 0.0, 0.0, 0.1, 0.0, 0.25],
        "artist" => [0.0, 0.0, 0.4, 0.1, 0.0, 0.0],
        "bard" => [0.1, 0.0, 0.35, 0.0, 0.0, 0.0],
        "farmer" => [0.2, 0.1, 0.0, 0.0, 0.1, 0.0],
        "scholar" => [0.1, 0.0, 0.0, 0.15, 0.0, 0.1],
        "criminal" => [0.0, 0.2, 0.0, 0.15, 0.0, -0.1],
        _ => [0.0; SOCIAL_DIM],
    }
}

/// Updates NPC social_influence vectors via peer pressure and events.
#[derive(Debug, Clone)]
pub struct SocialEngine {
    /// How quickly NPC social vectors blend toward the peer signal.
    pub blend_rate: f32,
    /// Per-tick decay rate toward zero (no external pressure).
    pub decay_rate: f32,
    /// Multiplier for event social_impact.
    pub event_scale: f32,
}

impl Default for SocialEngine {
    fn default() -> Self {
        SocialEngine {
            blend_rate: 0.2,
            decay_rate: 0.05,
            event_scale: 1.0,
        }
    }
}

impl SocialEngine {
    /// Create an engine with explicit knobs.
    pub fn new(blend_rate: f32, decay_rate: f32, event_scale: f32) -> Self {
        SocialEngine {
            blend_rate,
            decay_rate,
            event_scale,
        }
    }

    /// How susceptible an NPC is to social influence.
    ///
    /// High agreeableness raises susceptibility; high neuroticism
    /// lowers it slightly (contrarian tendencies).
    pub fn compute_susceptibility(&self, npc: &NpcStatus) -> f32 {
        (0.4 + 0.5 * npc.personality.agreeableness() - 0.15 * npc.personality.neuroticism())
            .clamp(0.2, 1.0)
    }

    /// The weighted social signal from co-located peers.
    ///
    /// Each peer radiates their own social_influence plus their
    /// archetype profile, weighted by relationship affinity
    /// (`0.5 + 0.5 * affinity`, so strangers weigh 0.5 and enemies
    /// contribute little). The sum is averaged over peer count.
    pub fn compute_peer_signal(
        &self,
        npc: &NpcStatus,
        co_located: &[&NpcStatus],
    ) -> [f32; SOCIAL_DIM] {
        let mut weighted_sum = [0.0f32; SOCIAL_DIM];
        let mut peer_count = 0u32;

        for other in co_located {
            if other.id == npc.id {
                continue;
            }
            peer_count += 1;

            let weight = 0.5 + npc.affinity_with(&other.id) * 0.5;
            let profile = archetype_profile(other.archetype.as_str());
            for (i, acc) in weighted_sum.iter_mut().enumerate() {
                *acc += weight * (other.social_influence.0[i] + profile[i]);
            }
        }

        if peer_count == 0 {
            return [0.0; SOCIAL_DIM];
        }
        for acc in weighted_sum.iter_mut() {
            *acc /= peer_count as f32;
        }
        weighted_sum
    }

    /// Apply an event's social impact, scaled by intensity and the
    /// engine's event scale. All-zero impacts are skipped.
    pub fn apply_event(&self, npc: &mut NpcStatus, event: &WorldEvent) {
        if event.social_impact.iter().all(|x| *x == 0.0) {
            return;
        }
        npc.social_influence
            .apply_impact(&event.social_impact, event.intensity * self.event_scale);
    }

    /// Apply an event's social impact in-place to all NPCs.
    pub fn apply_event_batch(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>, event: &WorldEvent) {
        if event.social_impact.iter().all(|x| *x == 0.0) {
            return;
        }
        for npc in npcs.values_mut() {
            npc.social_influence
                .apply_impact(&event.social_impact, event.intensity * self.event_scale);
        }
    }

    /// One tick of social dynamics: blend toward the peer signal at
    /// `blend_rate * susceptibility`, decay toward zero, clamp.
    pub fn tick(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>) {
        let mut by_location: FastHashMap<&LocationId, Vec<&NpcStatus>> = FastHashMap::default();
        for npc in npcs.values() {
            by_location.entry(&npc.location_id).or_default().push(npc);
        }

        let mut signals: Vec<(NpcId, [f32; SOCIAL_DIM], f32)> = Vec::with_capacity(npcs.len());
        for npc in npcs.values() {
            let co_located = by_location
                .get(&npc.location_id)
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            let signal = self.compute_peer_signal(npc, co_located);
            let susceptibility = self.compute_susceptibility(npc);
            signals.push((npc.id.clone(), signal, susceptibility));
        }

        for (npc_id, signal, susceptibility) in signals {
            if let Some(npc) = npcs.get_mut(&npc_id) {
                npc.social_influence
                    .blend_toward(&signal, self.blend_rate * susceptibility);
                npc.social_influence.scale(1.0 - self.decay_rate);
                npc.social_influence.clamp01();
            }
        }
    }
}
