//! Labelled fixed-dimension state vectors.
//!
//! Each NPC's state is a composite of hand-designed semantic vectors.
//! These are NOT embeddings — they are interpretable, debuggable,
//! deterministic feature vectors with fixed dimensions:
//! - Intention (8): survive, socialize, achieve, explore, create,
//!   dominate, nurture, escape. L2-unit norm after every recomputation.
//! - Emotion (8): Plutchik wheel, each coordinate in [0, 1].
//! - Personality (5): Big Five, immutable after creation.
//! - Social influence (6): external social pressures, each in [0, 1].
//! - Environment (4): sensed local conditions, each in [0, 1].

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VeilError};

/// Intention vector dimension.
pub const INTENTION_DIM: usize = 8;
/// Emotion vector dimension.
pub const EMOTION_DIM: usize = 8;
/// Personality vector dimension.
pub const PERSONALITY_DIM: usize = 5;
/// Social influence vector dimension.
pub const SOCIAL_DIM: usize = 6;
/// Environment vector dimension.
pub const ENVIRONMENT_DIM: usize = 4;

/// Ordered intention coordinate labels.
pub const INTENTION_LABELS: [&str; INTENTION_DIM] = [
    "survive",
    "socialize",
    "achieve",
    "explore",
    "create",
    "dominate",
    "nurture",
    "escape",
];

/// Ordered emotion coordinate labels (Plutchik).
pub const EMOTION_LABELS: [&str; EMOTION_DIM] = [
    "joy",
    "sadness",
    "anger",
    "fear",
    "surprise",
    "disgust",
    "trust",
    "anticipation",
];

/// Ordered personality coordinate labels (Big Five).
pub const PERSONALITY_LABELS: [&str; PERSONALITY_DIM] = [
    "openness",
    "conscientiousness",
    "extraversion",
    "agreeableness",
    "neuroticism",
];

/// Ordered social influence coordinate labels.
pub const SOCIAL_LABELS: [&str; SOCIAL_DIM] = [
    "cultural_conformity",
    "economic_pressure",
    "fashion_awareness",
    "status_seeking",
    "religious_devotion",
    "political_alignment",
];

/// Ordered environment coordinate labels.
pub const ENVIRONMENT_LABELS: [&str; ENVIRONMENT_DIM] = [
    "safety",
    "resource_abundance",
    "weather_comfort",
    "crowding",
];

/// Named intention indices.
pub mod intention_idx {
    pub const SURVIVE: usize = 0;
    pub const SOCIALIZE: usize = 1;
    pub const ACHIEVE: usize = 2;
    pub const EXPLORE: usize = 3;
    pub const CREATE: usize = 4;
    pub const DOMINATE: usize = 5;
    pub const NURTURE: usize = 6;
    pub const ESCAPE: usize = 7;
}

/// Named emotion indices.
pub mod emotion_idx {
    pub const JOY: usize = 0;
    pub const SADNESS: usize = 1;
    pub const ANGER: usize = 2;
    pub const FEAR: usize = 3;
    pub const SURPRISE: usize = 4;
    pub const DISGUST: usize = 5;
    pub const TRUST: usize = 6;
    pub const ANTICIPATION: usize = 7;
}

/// Named personality indices.
pub mod personality_idx {
    pub const OPENNESS: usize = 0;
    pub const CONSCIENTIOUSNESS: usize = 1;
    pub const EXTRAVERSION: usize = 2;
    pub const AGREEABLENESS: usize = 3;
    pub const NEUROTICISM: usize = 4;
}

/// Named environment indices.
pub mod environment_idx {
    pub const SAFETY: usize = 0;
    pub const RESOURCES: usize = 1;
    pub const WEATHER_COMFORT: usize = 2;
    pub const CROWDING: usize = 3;
}

// ---------------------------------------------------------------------------
// Shared slice math
// ---------------------------------------------------------------------------

/// Clamp every component of a slice to [0, 1] in place.
pub fn clamp01_slice(v: &mut [f32]) {
    for x in v.iter_mut() {
        *x = x.clamp(0.0, 1.0);
    }
}

/// L2 norm of a slice.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Dot product of two equal-length slices.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean distance between two equal-length slices.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Index of the largest component. Ties resolve to the first occurrence.
pub fn dominant_index(v: &[f32]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

/// The `n` largest (label, value) pairs in descending order.
pub fn top_labelled(v: &[f32], labels: &[&'static str], n: usize) -> Vec<(&'static str, f32)> {
    let mut pairs: Vec<(&'static str, f32)> =
        labels.iter().copied().zip(v.iter().copied()).collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs.truncate(n);
    pairs
}

/// Copy a slice into a fixed array, failing on length mismatch.
fn checked_array<const N: usize>(v: &[f32]) -> Result<[f32; N]> {
    if v.len() != N {
        return Err(VeilError::DimensionMismatch {
            expected: N,
            got: v.len(),
        });
    }
    let mut out = [0.0f32; N];
    out.copy_from_slice(v);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Intention
// ---------------------------------------------------------------------------

/// 8-dim intention vector: what the NPC wants to do right now.
///
/// Kept at L2-unit norm after every recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentionVec(pub [f32; INTENTION_DIM]);

impl IntentionVec {
    /// Uniform vector (all entries 1/8) — the creation default.
    pub fn uniform() -> Self {
        IntentionVec([1.0 / INTENTION_DIM as f32; INTENTION_DIM])
    }

    /// Build from a slice, checking the dimension.
    pub fn from_slice(v: &[f32]) -> Result<Self> {
        Ok(IntentionVec(checked_array(v)?))
    }

    /// Label of the strongest coordinate.
    pub fn dominant_label(&self) -> &'static str {
        INTENTION_LABELS[dominant_index(&self.0)]
    }

    /// Index of the strongest coordinate.
    pub fn dominant_index(&self) -> usize {
        dominant_index(&self.0)
    }

    /// L2 norm.
    pub fn norm(&self) -> f32 {
        l2_norm(&self.0)
    }

    /// Intention alignment with another NPC's drives.
    pub fn alignment(&self, other: &IntentionVec) -> f32 {
        dot(&self.0, &other.0)
    }

    /// L2-normalise in place; degenerate vectors become uniform.
    pub fn normalize_or_uniform(&mut self) {
        let norm = self.norm();
        if norm < 1e-8 {
            *self = Self::uniform();
        } else {
            for x in self.0.iter_mut() {
                *x /= norm;
            }
        }
    }

    /// Top-`n` (label, value) pairs for prompt context.
    pub fn top(&self, n: usize) -> Vec<(&'static str, f32)> {
        top_labelled(&self.0, &INTENTION_LABELS, n)
    }
}

impl Default for IntentionVec {
    fn default() -> Self {
        Self::uniform()
    }
}

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

/// 8-dim Plutchik emotion wheel, each coordinate in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionVec(pub [f32; EMOTION_DIM]);

impl EmotionVec {
    /// All-zero emotions — the creation default.
    pub fn zero() -> Self {
        EmotionVec([0.0; EMOTION_DIM])
    }

    /// Build from a slice, checking the dimension.
    pub fn from_slice(v: &[f32]) -> Result<Self> {
        Ok(EmotionVec(checked_array(v)?))
    }

    /// Label of the strongest coordinate.
    pub fn dominant_label(&self) -> &'static str {
        EMOTION_LABELS[dominant_index(&self.0)]
    }

    /// Add a signed impact vector and clamp back to [0, 1].
    pub fn apply_impact(&mut self, impact: &[f32; EMOTION_DIM], scale: f32) {
        for (x, d) in self.0.iter_mut().zip(impact.iter()) {
            *x += d * scale;
        }
        clamp01_slice(&mut self.0);
    }

    /// Move toward a target vector at the given rate and clamp.
    pub fn blend_toward(&mut self, target: &[f32; EMOTION_DIM], rate: f32) {
        for (x, t) in self.0.iter_mut().zip(target.iter()) {
            *x += rate * (t - *x);
        }
        clamp01_slice(&mut self.0);
    }

    /// Top-`n` (label, value) pairs for prompt context.
    pub fn top(&self, n: usize) -> Vec<(&'static str, f32)> {
        top_labelled(&self.0, &EMOTION_LABELS, n)
    }
}

// ---------------------------------------------------------------------------
// Personality
// ---------------------------------------------------------------------------

/// 5-dim Big Five personality vector. Set at creation, never mutated
/// by the simulation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityVec(pub [f32; PERSONALITY_DIM]);

impl PersonalityVec {
    /// Uniform vector (all entries 1/5) — the creation default.
    pub fn uniform() -> Self {
        PersonalityVec([1.0 / PERSONALITY_DIM as f32; PERSONALITY_DIM])
    }

    /// Build from a slice, checking the dimension.
    pub fn from_slice(v: &[f32]) -> Result<Self> {
        Ok(PersonalityVec(checked_array(v)?))
    }

    /// Euclidean distance to another personality.
    pub fn distance(&self, other: &PersonalityVec) -> f32 {
        euclidean_distance(&self.0, &other.0)
    }

    /// Agreeableness coordinate.
    pub fn agreeableness(&self) -> f32 {
        self.0[personality_idx::AGREEABLENESS]
    }

    /// Neuroticism coordinate.
    pub fn neuroticism(&self) -> f32 {
        self.0[personality_idx::NEUROTICISM]
    }

    /// Top-`n` (label, value) pairs for prompt context.
    pub fn top(&self, n: usize) -> Vec<(&'static str, f32)> {
        top_labelled(&self.0, &PERSONALITY_LABELS, n)
    }
}

impl Default for PersonalityVec {
    fn default() -> Self {
        Self::uniform()
    }
}

// ---------------------------------------------------------------------------
// Social influence
// ---------------------------------------------------------------------------

/// 6-dim external social pressures, each coordinate in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SocialVec(pub [f32; SOCIAL_DIM]);

impl SocialVec {
    /// All-zero pressures — the creation default.
    pub fn zero() -> Self {
        SocialVec([0.0; SOCIAL_DIM])
    }

    /// Build from a slice, checking the dimension.
    pub fn from_slice(v: &[f32]) -> Result<Self> {
        Ok(SocialVec(checked_array(v)?))
    }

    /// Add a signed impact vector and clamp back to [0, 1].
    pub fn apply_impact(&mut self, impact: &[f32; SOCIAL_DIM], scale: f32) {
        for (x, d) in self.0.iter_mut().zip(impact.iter()) {
            *x += d * scale;
        }
        clamp01_slice(&mut self.0);
    }

    /// Move toward a target signal at the given rate (no clamp; callers
    /// clamp after the decay step).
    pub fn blend_toward(&mut self, target: &[f32; SOCIAL_DIM], rate: f32) {
        for (x, t) in self.0.iter_mut().zip(target.iter()) {
            *x += rate * (t - *x);
        }
    }

    /// Multiply every coordinate by a factor.
    pub fn scale(&mut self, factor: f32) {
        for x in self.0.iter_mut() {
            *x *= factor;
        }
    }

    /// Clamp every coordinate to [0, 1].
    pub fn clamp01(&mut self) {
        clamp01_slice(&mut self.0);
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// 4-dim environmental conditions sensed by an NPC (or the base
/// environment of a location), each coordinate in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvironmentVec(pub [f32; ENVIRONMENT_DIM]);

impl EnvironmentVec {
    /// All-zero environment.
    pub fn zero() -> Self {
        EnvironmentVec([0.0; ENVIRONMENT_DIM])
    }

    /// Build from a slice, checking the dimension.
    pub fn from_slice(v: &[f32]) -> Result<Self> {
        Ok(EnvironmentVec(checked_array(v)?))
    }

    /// Safety coordinate.
    pub fn safety(&self) -> f32 {
        self.0[environment_idx::SAFETY]
    }

    /// Resource abundance coordinate.
    pub fn resources(&self) -> f32 {
        self.0[environment_idx::RESOURCES]
    }

    /// Weather comfort coordinate.
    pub fn weather_comfort(&self) -> f32 {
        self.0[environment_idx::WEATHER_COMFORT]
    }

    /// Crowding coordinate.
    pub fn crowding(&self) -> f32 {
        self.0[environment_idx::CROWDING]
    }

    /// Euclidean distance to another environment.
    pub fn distance(&self, other: &EnvironmentVec) -> f32 {
        euclidean_distance(&self.0, &other.0)
    }

    /// Move toward a target environment at the given rate and clamp.
    pub fn blend_toward(&mut self, target: &EnvironmentVec, rate: f32) {
        for (x, t) in self.0.iter_mut().zip(target.0.iter()) {
            *x += rate * (t - *x);
        }
        clamp01_slice(&mut self.0);
    }
}
