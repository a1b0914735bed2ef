//! Intention computation engine.
//!
//! Recalculates NPC intention vectors from their composite state.
//! Pure linear algebra, designed for batch processing of hundreds of
//! NPCs per tick:
//!
//! ```text
//! raw = w_p * (M_p * personality)
//!     + w_e * (M_e * emotion)
//!     + w_s * (M_s * social_influence)
//!     + w_v * (M_v * environment)
//!     + w_m * intention
//! intention' = normalize(raw + vitality_bias)
//! ```

use serde::{Deserialize, Serialize};

use veil_core::collections::{CompactString, FastHashMap};
use veil_core::npc::{NpcId, NpcStatus};
use veil_core::rng::DeterministicRng;
use veil_core::vectors::{
    intention_idx, IntentionVec, EMOTION_DIM, ENVIRONMENT_DIM, INTENTION_DIM, PERSONALITY_DIM,
    SOCIAL_DIM,
};

/// Seed for the default transformation matrices. Fixed so that two
/// runs produce identical matrices.
const MATRIX_INIT_SEED: u64 = 42;

/// Standard deviation of the Gaussian matrix initialiser.
const MATRIX_INIT_STDDEV: f32 = 0.3;

/// Thresholds below which vitality biases kick in.
const LOW_ENERGY_THRESHOLD: f32 = 0.3;
const LOW_HEALTH_THRESHOLD: f32 = 0.4;

/// Strength of the vitality bias on intention computation.
const ENERGY_SURVIVE_BIAS: f32 = 0.5;
const HEALTH_SURVIVE_BIAS: f32 = 0.8;
const HEALTH_ESCAPE_BIAS: f32 = 0.3;

/// Create a small random transformation matrix for initialization.
/// Row-major: one row of input weights per intention coordinate.
fn random_mapping<const IN: usize>() -> [[f32; IN]; INTENTION_DIM] {
    let mut rng = DeterministicRng::new(MATRIX_INIT_SEED);
    let mut m = [[0.0f32; IN]; INTENTION_DIM];
    for row in m.iter_mut() {
        for x in row.iter_mut() {
            *x = rng.gen_normal(0.0, MATRIX_INIT_STDDEV);
        }
    }
    m
}

/// Multiply a row-major matrix by an input vector.
fn matvec<const IN: usize>(m: &[[f32; IN]; INTENTION_DIM], input: &[f32; IN]) -> [f32; INTENTION_DIM] {
    let mut out = [0.0f32; INTENTION_DIM];
    for (o, row) in m.iter().enumerate() {
        let mut acc = 0.0;
        for (i, coeff) in row.iter().enumerate() {
            acc += coeff * input[i];
        }
        out[o] = acc;
    }
    out
}

/// Tunable weights and transformation matrices for an NPC archetype.
///
/// Game designers can adjust these per archetype to create different
/// behavioral profiles (e.g. a guard prioritizes "survive" and
/// "dominate", a merchant prioritizes "achieve" and "socialize").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeWeights {
    pub w_personality: f32,
    pub w_emotion: f32,
    pub w_social: f32,
    pub w_environment: f32,
    pub w_momentum: f32,

    /// Personality-to-intention transformation.
    pub m_personality: [[f32; PERSONALITY_DIM]; INTENTION_DIM],
    /// Emotion-to-intention transformation.
    pub m_emotion: [[f32; EMOTION_DIM]; INTENTION_DIM],
    /// Social-to-intention transformation.
    pub m_social: [[f32; SOCIAL_DIM]; INTENTION_DIM],
    /// Environment-to-intention transformation.
    pub m_environment: [[f32; ENVIRONMENT_DIM]; INTENTION_DIM],
}

impl Default for ArchetypeWeights {
    fn default() -> Self {
        ArchetypeWeights {
            w_personality: 0.25,
            w_emotion: 0.25,
            w_social: 0.15,
            w_environment: 0.15,
            w_momentum: 0.20,
            m_personality: random_mapping::<PERSONALITY_DIM>(),
            m_emotion: random_mapping::<EMOTION_DIM>(),
            m_social: random_mapping::<SOCIAL_DIM>(),
            m_environment: random_mapping::<ENVIRONMENT_DIM>(),
        }
    }
}

/// Computes updated intention vectors for NPCs.
///
/// Supports both single-NPC updates and batch processing.
#[derive(Debug, Clone, Default)]
pub struct IntentionEngine {
    weights: FastHashMap<CompactString, ArchetypeWeights>,
    default: ArchetypeWeights,
}

impl IntentionEngine {
    /// Create an engine with only the default weight set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Weights for an archetype; unknown archetypes use the default.
    pub fn get_weights(&self, archetype: &str) -> &ArchetypeWeights {
        self.weights.get(archetype).unwrap_or(&self.default)
    }

    /// Register custom weights for an archetype.
    pub fn register_archetype(&mut self, name: impl Into<CompactString>, weights: ArchetypeWeights) {
        self.weights.insert(name.into(), weights);
    }

    /// Compute a new intention vector for a single NPC.
    ///
    /// Includes the vitality bias: low energy boosts "survive", low
    /// health strongly boosts "survive" and "escape". Does not mutate
    /// the NPC.
    pub fn compute(&self, npc: &NpcStatus) -> IntentionVec {
        let w = self.get_weights(npc.archetype.as_str());

        let from_personality = matvec(&w.m_personality, &npc.personality.0);
        let from_emotion = matvec(&w.m_emotion, &npc.emotion.0);
        let from_social = matvec(&w.m_social, &npc.social_influence.0);
        let from_environment = matvec(&w.m_environment, &npc.environment.0);

        let mut raw = [0.0f32; INTENTION_DIM];
        for i in 0..INTENTION_DIM {
            raw[i] = w.w_personality * from_personality[i]
                + w.w_emotion * from_emotion[i]
                + w.w_social * from_social[i]
                + w.w_environment * from_environment[i]
                + w.w_momentum * npc.intention.0[i];
        }

        if npc.energy < LOW_ENERGY_THRESHOLD {
            let deficit = (LOW_ENERGY_THRESHOLD - npc.energy) / LOW_ENERGY_THRESHOLD;
            raw[intention_idx::SURVIVE] += ENERGY_SURVIVE_BIAS * deficit;
        }

        if npc.health < LOW_HEALTH_THRESHOLD {
            let deficit = (LOW_HEALTH_THRESHOLD - npc.health) / LOW_HEALTH_THRESHOLD;
            raw[intention_idx::SURVIVE] += HEALTH_SURVIVE_BIAS * deficit;
            raw[intention_idx::ESCAPE] += HEALTH_ESCAPE_BIAS * deficit;
        }

        let mut intention = IntentionVec(raw);
        intention.normalize_or_uniform();
        intention
    }

    /// Update intention vectors in-place for all NPCs.
    pub fn tick(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>) {
        for npc in npcs.values_mut() {
            npc.intention = self.compute(npc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc() -> NpcStatus {
        NpcStatus::new("npc-1", "Guard")
    }

    #[test]
    fn test_matrices_deterministic_across_instances() {
        let a = ArchetypeWeights::default();
        let b = ArchetypeWeights::default();
        assert_eq!(a.m_personality, b.m_personality);
        assert_eq!(a.m_emotion, b.m_emotion);
    }

    #[test]
    fn test_compute_unit_norm() {
        let engine = IntentionEngine::new();
        let intention = engine.compute(&npc());
        assert!((intention.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_compute_deterministic() {
        let engine = IntentionEngine::new();
        let npc = npc();
        let a = engine.compute(&npc);
        let b = engine.compute(&npc);
        assert_eq!(a, b);
    }

    #[test]
    fn test_low_energy_boosts_survive() {
        let engine = IntentionEngine::new();
        let mut healthy = npc();
        healthy.energy = 1.0;
        let mut tired = npc();
        tired.energy = 0.05;

        let healthy_intent = engine.compute(&healthy);
        let tired_intent = engine.compute(&tired);
        assert!(
            tired_intent.0[intention_idx::SURVIVE] > healthy_intent.0[intention_idx::SURVIVE]
        );
    }

    #[test]
    fn test_low_health_boosts_survive_and_escape() {
        let engine = IntentionEngine::new();
        let mut wounded = npc();
        wounded.health = 0.1;
        let intent = engine.compute(&wounded);
        let baseline = engine.compute(&npc());
        assert!(intent.0[intention_idx::SURVIVE] > baseline.0[intention_idx::SURVIVE]);
        assert!(intent.0[intention_idx::ESCAPE] > baseline.0[intention_idx::ESCAPE]);
    }

    #[test]
    fn test_unknown_archetype_uses_default() {
        let engine = IntentionEngine::new();
        let mut other = npc();
        other.archetype = "chronomancer".into();
        assert_eq!(engine.compute(&other), engine.compute(&npc()));
    }

    #[test]
    fn test_registered_archetype_differs() {
        let mut engine = IntentionEngine::new();
        let weights = ArchetypeWeights {
            w_momentum: 1.0,
            w_personality: 0.0,
            w_emotion: 0.0,
            w_social: 0.0,
            w_environment: 0.0,
            ..ArchetypeWeights::default()
        };
        engine.register_archetype("monk", weights);

        let mut monk = npc();
        monk.archetype = "monk".into();
        // Pure momentum: a uniform vector normalizes to 1/sqrt(8) per axis.
        let intent = engine.compute(&monk);
        let expected = 1.0 / (INTENTION_DIM as f32).sqrt();
        for x in intent.0 {
            assert!((x - expected).abs() < 1e-5);
        }
        assert!((intent.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_batch_tick_updates_all() {
        let engine = IntentionEngine::new();
        let mut npcs = FastHashMap::default();
        for i in 0..5 {
            let npc = NpcStatus::new(format!("npc-{i}"), format!("N{i}"));
            npcs.insert(npc.id.clone(), npc);
        }
        engine.tick(&mut npcs);
        for npc in npcs.values() {
            assert!((npc.intention.norm() - 1.0).abs() < 1e-5);
        }
    }
}
