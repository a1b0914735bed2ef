//! NPC composite vectorial state.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::collections::{CompactString, FastHashMap};
use crate::vectors::{EmotionVec, EnvironmentVec, IntentionVec, PersonalityVec, SocialVec};

/// Stable string identifier for an NPC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NpcId(pub CompactString);

impl NpcId {
    /// Create an id from any string-ish value.
    pub fn new(id: impl Into<CompactString>) -> Self {
        NpcId(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for NpcId {
    fn from(s: &str) -> Self {
        NpcId(s.into())
    }
}

impl std::fmt::Display for NpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Stable string identifier for a location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub CompactString);

impl LocationId {
    /// Create an id from any string-ish value.
    pub fn new(id: impl Into<CompactString>) -> Self {
        LocationId(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The default location new NPCs spawn into.
    pub fn default_location() -> Self {
        LocationId("default".into())
    }
}

impl From<&str> for LocationId {
    fn from(s: &str) -> Self {
        LocationId(s.into())
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// What an NPC is currently doing. Driven entirely by the schedule
/// engine plus the exhaustion override; no hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// No interactions, no movement, boosted energy regen.
    Sleeping,
    /// Reduced activity, staying put.
    Resting,
    /// At their trade.
    Working,
    /// Free time.
    Leisure,
    /// Not yet assigned by the schedule engine.
    #[default]
    Idle,
}

impl Activity {
    /// Stable lowercase label used in snapshots and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Sleeping => "sleeping",
            Activity::Resting => "resting",
            Activity::Working => "working",
            Activity::Leisure => "leisure",
            Activity::Idle => "idle",
        }
    }

    /// Parse a label back into an activity; unknown labels become Idle.
    pub fn from_label(label: &str) -> Self {
        match label {
            "sleeping" => Activity::Sleeping,
            "resting" => Activity::Resting,
            "working" => Activity::Working,
            "leisure" => Activity::Leisure,
            _ => Activity::Idle,
        }
    }
}

/// Full vectorial state of a single NPC.
///
/// Invariants:
/// - `personality` is immutable after construction.
/// - Every vector coordinate stays in its declared range after any
///   pipeline stage; `intention` is L2-unit norm after recomputation.
/// - `energy`, `health`, `importance` stay in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcStatus {
    /// Unique identifier.
    pub id: NpcId,
    /// Display name shown in dialogue and event descriptions.
    pub name: String,
    /// Category tag selecting intention weights, schedule, and social
    /// radiation profile (e.g. "merchant", "guard", "noble").
    pub archetype: CompactString,

    /// What the NPC wants to do right now (unit norm).
    pub intention: IntentionVec,
    /// Plutchik emotion wheel.
    pub emotion: EmotionVec,
    /// Big Five baseline, set at creation.
    pub personality: PersonalityVec,
    /// External social pressures.
    pub social_influence: SocialVec,
    /// Environmental conditions as sensed by this NPC.
    pub environment: EnvironmentVec,

    /// Physical energy (0-1).
    pub energy: f32,
    /// Physical health (0-1).
    pub health: f32,
    /// Plot relevance (0-1). Feeds the dialogue tier selector.
    pub importance: f32,

    /// Sparse affinity map toward other NPCs (-1 to 1).
    pub relationships: FastHashMap<NpcId, f32>,
    /// Last N significant event descriptions, oldest first.
    pub recent_memories: Vec<String>,

    /// Where this NPC currently is.
    pub location_id: LocationId,
    /// Current scheduled activity.
    pub activity: Activity,
}

impl NpcStatus {
    /// Create an NPC with default state at the default location.
    pub fn new(id: impl Into<CompactString>, name: impl Into<String>) -> Self {
        NpcStatus {
            id: NpcId(id.into()),
            name: name.into(),
            archetype: "generic".into(),
            intention: IntentionVec::uniform(),
            emotion: EmotionVec::zero(),
            personality: PersonalityVec::uniform(),
            social_influence: SocialVec::zero(),
            environment: EnvironmentVec::zero(),
            energy: 1.0,
            health: 1.0,
            importance: 0.5,
            relationships: FastHashMap::default(),
            recent_memories: Vec::new(),
            location_id: LocationId::default_location(),
            activity: Activity::Idle,
        }
    }

    /// Set the archetype tag.
    pub fn with_archetype(mut self, archetype: impl Into<CompactString>) -> Self {
        self.archetype = archetype.into();
        self
    }

    /// Set an explicit personality (the default is uniform).
    pub fn with_personality(mut self, personality: PersonalityVec) -> Self {
        self.personality = personality;
        self
    }

    /// Set the starting location.
    pub fn with_location(mut self, location_id: impl Into<CompactString>) -> Self {
        self.location_id = LocationId(location_id.into());
        self
    }

    /// Set plot importance.
    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = importance.clamp(0.0, 1.0);
        self
    }

    /// Label of the strongest intention coordinate.
    pub fn dominant_intention(&self) -> &'static str {
        self.intention.dominant_label()
    }

    /// Label of the strongest emotion coordinate.
    pub fn dominant_emotion(&self) -> &'static str {
        self.emotion.dominant_label()
    }

    /// Affinity toward another NPC; strangers default to 0.
    pub fn affinity_with(&self, other: &NpcId) -> f32 {
        self.relationships.get(other).copied().unwrap_or(0.0)
    }

    /// Append a memory description, trimming to the cap.
    pub fn push_memory(&mut self, description: impl Into<String>, cap: usize) {
        self.recent_memories.push(description.into());
        if self.recent_memories.len() > cap {
            let excess = self.recent_memories.len() - cap;
            self.recent_memories.drain(..excess);
        }
    }

    /// Serialize vectorial status into a human-readable prompt fragment.
    ///
    /// This string is the context handed to the cloud dialogue tier.
    pub fn to_character_sheet(&self) -> String {
        let fmt_top = |pairs: Vec<(&'static str, f32)>| {
            pairs
                .iter()
                .map(|(label, val)| format!("{label} ({val:.2})"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let drives = fmt_top(self.intention.top(3));
        let mood = fmt_top(self.emotion.top(3));
        let traits = fmt_top(self.personality.top(3));

        let memories = if self.recent_memories.is_empty() {
            "nothing notable recently".to_string()
        } else {
            let start = self.recent_memories.len().saturating_sub(5);
            self.recent_memories[start..].join("; ")
        };

        let mut sheet = String::new();
        let _ = writeln!(sheet, "Name: {} ({})", self.name, self.archetype);
        let _ = writeln!(sheet, "Drives: {drives}");
        let _ = writeln!(sheet, "Mood: {mood}");
        let _ = writeln!(sheet, "Personality: {traits}");
        let _ = writeln!(
            sheet,
            "Energy: {:.1}, Health: {:.1}",
            self.energy, self.health
        );
        let _ = write!(sheet, "Recent events: {memories}");
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectors::intention_idx;

    #[test]
    fn test_new_npc_defaults() {
        let npc = NpcStatus::new("npc-1", "Guard");
        assert_eq!(npc.intention, IntentionVec::uniform());
        assert_eq!(npc.emotion, EmotionVec::zero());
        assert_eq!(npc.personality, PersonalityVec::uniform());
        assert_eq!(npc.energy, 1.0);
        assert_eq!(npc.health, 1.0);
        assert_eq!(npc.importance, 0.5);
        assert_eq!(npc.location_id.as_str(), "default");
        assert_eq!(npc.activity, Activity::Idle);
    }

    #[test]
    fn test_dominant_intention() {
        let mut npc = NpcStatus::new("npc-1", "Scout");
        npc.intention.0 = [0.0; 8];
        npc.intention.0[intention_idx::EXPLORE] = 1.0;
        assert_eq!(npc.dominant_intention(), "explore");
    }

    #[test]
    fn test_push_memory_trims_to_cap() {
        let mut npc = NpcStatus::new("npc-1", "Guard");
        for i in 0..15 {
            npc.push_memory(format!("event {i}"), 10);
        }
        assert_eq!(npc.recent_memories.len(), 10);
        assert_eq!(npc.recent_memories[0], "event 5");
        assert_eq!(npc.recent_memories[9], "event 14");
    }

    #[test]
    fn test_character_sheet_contents() {
        let mut npc = NpcStatus::new("npc-1", "Mira").with_archetype("merchant");
        npc.push_memory("sold a rare gem", 10);
        let sheet = npc.to_character_sheet();
        assert!(sheet.contains("Name: Mira (merchant)"));
        assert!(sheet.contains("Drives:"));
        assert!(sheet.contains("Energy: 1.0, Health: 1.0"));
        assert!(sheet.contains("sold a rare gem"));
    }

    #[test]
    fn test_character_sheet_empty_memories_sentinel() {
        let npc = NpcStatus::new("npc-1", "Mira");
        assert!(npc.to_character_sheet().contains("nothing notable recently"));
    }

    #[test]
    fn test_character_sheet_last_five_memories_only() {
        let mut npc = NpcStatus::new("npc-1", "Mira");
        for i in 0..8 {
            npc.push_memory(format!("memory {i}"), 10);
        }
        let sheet = npc.to_character_sheet();
        assert!(!sheet.contains("memory 2"));
        assert!(sheet.contains("memory 3"));
        assert!(sheet.contains("memory 7"));
    }

    #[test]
    fn test_affinity_defaults_to_zero() {
        let npc = NpcStatus::new("npc-1", "Guard");
        assert_eq!(npc.affinity_with(&NpcId::from("stranger")), 0.0);
    }

    #[test]
    fn test_activity_label_roundtrip() {
        for activity in [
            Activity::Sleeping,
            Activity::Resting,
            Activity::Working,
            Activity::Leisure,
            Activity::Idle,
        ] {
            assert_eq!(Activity::from_label(activity.as_str()), activity);
        }
        assert_eq!(Activity::from_label("unknown"), Activity::Idle);
    }
}
