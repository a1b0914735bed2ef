//! World event model and locality scale definitions.
//!
//! Events propagate through concentric locality scales with delay and
//! attenuation.

use serde::{Deserialize, Serialize};

use crate::collections::CompactString;
use crate::npc::{LocationId, NpcId};
use crate::vectors::{EMOTION_DIM, SOCIAL_DIM};

/// Events below this intensity stop propagating.
pub const INTENSITY_THRESHOLD: f32 = 0.02;

/// Concentric locality scales, ordered from narrowest to broadest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LocalityScale {
    Personal,
    Family,
    City,
    Regional,
    National,
    Global,
}

impl LocalityScale {
    /// All scales in propagation order.
    pub const ALL: [LocalityScale; 6] = [
        LocalityScale::Personal,
        LocalityScale::Family,
        LocalityScale::City,
        LocalityScale::Regional,
        LocalityScale::National,
        LocalityScale::Global,
    ];

    /// The next broader scale, or None at Global.
    pub fn broader(&self) -> Option<LocalityScale> {
        match self {
            LocalityScale::Personal => Some(LocalityScale::Family),
            LocalityScale::Family => Some(LocalityScale::City),
            LocalityScale::City => Some(LocalityScale::Regional),
            LocalityScale::Regional => Some(LocalityScale::National),
            LocalityScale::National => Some(LocalityScale::Global),
            LocalityScale::Global => None,
        }
    }
}

/// Propagation rule for one scale boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationRule {
    /// Game-hours before the event reaches the broader scale.
    pub delay_hours: f64,
    /// Multiplicative intensity factor applied at the crossing.
    pub attenuation: f32,
}

/// Look up the (delay, attenuation) rule for propagating outward from
/// a scale. Returns None at Global (nowhere broader to go).
pub fn propagation_rule(from: LocalityScale) -> Option<PropagationRule> {
    let (delay_hours, attenuation) = match from {
        LocalityScale::Personal => (1.0, 0.8),
        LocalityScale::Family => (4.0, 0.5),
        LocalityScale::City => (24.0, 0.3),
        LocalityScale::Regional => (72.0, 0.15),
        LocalityScale::National => (168.0, 0.05),
        LocalityScale::Global => return None,
    };
    Some(PropagationRule {
        delay_hours,
        attenuation,
    })
}

/// A world event that affects NPC vectorial statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Unique identifier. The world manager stamps empty ids on submit.
    #[serde(default)]
    pub id: CompactString,
    /// NPC that caused this event (None for environmental events).
    #[serde(default)]
    pub source_npc_id: Option<NpcId>,
    /// Category string (e.g. "murder", "marriage", "trade_deal").
    pub event_type: String,
    /// Human-readable description; empty descriptions form no memories.
    #[serde(default)]
    pub description: String,
    /// The locality scale where the event originated.
    pub origin_scale: LocalityScale,
    /// How far the event has propagated so far.
    pub current_scale: LocalityScale,
    /// Geographic reference.
    pub location_id: LocationId,
    /// In-game time (hours since epoch). Zero means "stamp on submit".
    #[serde(default)]
    pub timestamp: f64,
    /// 0.0-1.0; attenuates as the event propagates outward.
    pub intensity: f32,
    /// How this event shifts emotion vectors of NPCs who hear it (signed).
    #[serde(default = "zero_emotion_impact")]
    pub emotion_impact: [f32; EMOTION_DIM],
    /// How this event shifts social influence vectors (signed).
    #[serde(default = "zero_social_impact")]
    pub social_impact: [f32; SOCIAL_DIM],
}

fn zero_emotion_impact() -> [f32; EMOTION_DIM] {
    [0.0; EMOTION_DIM]
}

fn zero_social_impact() -> [f32; SOCIAL_DIM] {
    [0.0; SOCIAL_DIM]
}

impl WorldEvent {
    /// Create an event at Personal scale with default impacts.
    pub fn new(event_type: impl Into<String>, location_id: impl Into<CompactString>) -> Self {
        WorldEvent {
            id: CompactString::default(),
            source_npc_id: None,
            event_type: event_type.into(),
            description: String::new(),
            origin_scale: LocalityScale::Personal,
            current_scale: LocalityScale::Personal,
            location_id: LocationId(location_id.into()),
            timestamp: 0.0,
            intensity: 1.0,
            emotion_impact: zero_emotion_impact(),
            social_impact: zero_social_impact(),
        }
    }

    /// Set the intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the origin (and current) scale.
    pub fn with_scale(mut self, scale: LocalityScale) -> Self {
        self.origin_scale = scale;
        self.current_scale = scale;
        self
    }

    /// Set the game-time timestamp.
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the emotion impact vector.
    pub fn with_emotion_impact(mut self, impact: [f32; EMOTION_DIM]) -> Self {
        self.emotion_impact = impact;
        self
    }

    /// Set the social impact vector.
    pub fn with_social_impact(mut self, impact: [f32; SOCIAL_DIM]) -> Self {
        self.social_impact = impact;
        self
    }

    /// Set the source NPC.
    pub fn with_source(mut self, npc_id: NpcId) -> Self {
        self.source_npc_id = Some(npc_id);
        self
    }

    /// Whether this event has enough intensity (and room) to propagate.
    pub fn can_propagate(&self) -> bool {
        if self.intensity < INTENSITY_THRESHOLD {
            return false;
        }
        self.current_scale < LocalityScale::Global
    }

    /// The next cascade step: (next_scale, delay_hours, new_intensity),
    /// or None if the cascade ends here.
    pub fn next_propagation(&self) -> Option<(LocalityScale, f64, f32)> {
        if !self.can_propagate() {
            return None;
        }
        let next_scale = self.current_scale.broader()?;
        let rule = propagation_rule(self.current_scale)?;
        let new_intensity = self.intensity * rule.attenuation;
        if new_intensity < INTENSITY_THRESHOLD {
            return None;
        }
        Some((next_scale, rule.delay_hours, new_intensity))
    }
}
