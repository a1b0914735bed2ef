//! Emotion engine — decay toward personality baseline + event impact.
//!
//! Emotions naturally decay toward a baseline determined by the NPC's
//! personality. Events push emotions in specific directions.

use veil_core::collections::FastHashMap;
use veil_core::event::WorldEvent;
use veil_core::npc::{NpcId, NpcStatus};
use veil_core::vectors::{
    clamp01_slice, EmotionVec, PersonalityVec, EMOTION_DIM, PERSONALITY_DIM,
};

/// Mapping from Big Five personality to emotion baseline (5 x 8).
///
/// High openness raises anticipation and surprise; conscientiousness
/// raises trust; extraversion raises joy; agreeableness raises trust
/// and lowers anger; neuroticism raises sadness, fear, and anger.
pub const PERSONALITY_TO_EMOTION_BASELINE: [[f32; EMOTION_DIM]; PERSONALITY_DIM] = [
    // joy   sad   anger  fear  surpr  disg  trust  antic
    [0.1, 0.0, 0.0, 0.0, 0.2, 0.0, 0.1, 0.3],   // openness
    [0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.3, 0.1],   // conscientiousness
    [0.3, -0.1, 0.0, -0.1, 0.1, 0.0, 0.1, 0.1], // extraversion
    [0.2, 0.0, -0.2, 0.0, 0.0, -0.1, 0.3, 0.0], // agreeableness
    [-0.2, 0.3, 0.2, 0.3, 0.0, 0.1, -0.2, 0.0], // neuroticism
];

/// Manages emotion decay and event-driven emotion shifts.
#[derive(Debug, Clone)]
pub struct EmotionEngine {
    /// How quickly emotions return to baseline per tick (0-1).
    /// 0 = no decay, 1 = instant snap to baseline.
    pub decay_rate: f32,
    /// Global multiplier for event emotion impacts.
    pub impact_scale: f32,
}

impl Default for EmotionEngine {
    fn default() -> Self {
        EmotionEngine {
            decay_rate: 0.05,
            impact_scale: 1.0,
        }
    }
}

impl EmotionEngine {
    /// Create an engine with explicit knobs.
    pub fn new(decay_rate: f32, impact_scale: f32) -> Self {
        EmotionEngine {
            decay_rate,
            impact_scale,
        }
    }

    /// Compute the emotional baseline from a personality vector.
    pub fn compute_baseline(&self, personality: &PersonalityVec) -> [f32; EMOTION_DIM] {
        let mut baseline = [0.0f32; EMOTION_DIM];
        for (p_idx, row) in PERSONALITY_TO_EMOTION_BASELINE.iter().enumerate() {
            let p = personality.0[p_idx];
            for (e_idx, coeff) in row.iter().enumerate() {
                baseline[e_idx] += p * coeff;
            }
        }
        clamp01_slice(&mut baseline);
        baseline
    }

    /// Decay current emotion toward the personality-derived baseline.
    /// Returns the new emotion vector without mutating the NPC.
    pub fn decay(&self, npc: &NpcStatus) -> EmotionVec {
        let baseline = self.compute_baseline(&npc.personality);
        let mut emotion = npc.emotion;
        emotion.blend_toward(&baseline, self.decay_rate);
        emotion
    }

    /// Apply an event's emotion impact, scaled by event intensity and
    /// the global impact scale. Returns the new emotion vector.
    pub fn apply_event(&self, npc: &NpcStatus, event: &WorldEvent) -> EmotionVec {
        let mut emotion = npc.emotion;
        emotion.apply_impact(&event.emotion_impact, event.intensity * self.impact_scale);
        emotion
    }

    /// Apply emotion decay in-place for all NPCs.
    pub fn tick(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>) {
        for npc in npcs.values_mut() {
            npc.emotion = self.decay(npc);
        }
    }

    /// Apply an event's emotion impact in-place to all NPCs.
    pub fn apply_event_batch(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>, event: &WorldEvent) {
        for npc in npcs.values_mut() {
            npc.emotion = self.apply_event(npc, event);
        }
    }
}
