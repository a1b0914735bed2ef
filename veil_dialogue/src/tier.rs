//! Dialogue tier selection logic.
//!
//! Three tiers, in rising cost order: Template (free, instant), Local
//! (player hardware), Cloud (hosted model, reserved for conversations
//! that matter).

use serde::{Deserialize, Serialize};

use veil_core::npc::NpcStatus;

/// Importance at or above which an NPC always gets the cloud tier.
pub const IMPORTANCE_THRESHOLD: f32 = 0.8;

/// After this many turns, escalate to the cloud tier for coherence.
pub const TURN_ESCALATION_THRESHOLD: u32 = 3;

/// Which generator services a dialogue request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueTier {
    /// Parameterized template lookup; no model call.
    Template,
    /// Locally hosted model.
    Local,
    /// Hosted cloud model.
    Cloud,
}

/// Context about the current player-NPC interaction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DialogueContext {
    /// Whether the player started the conversation.
    pub player_initiated: bool,
    /// Whether this interaction is part of an active quest.
    pub is_quest_critical: bool,
    /// Number of back-and-forth turns so far.
    pub turn_count: u32,
    /// Whether a local model is running.
    pub local_llm_available: bool,
}

/// Select the dialogue generation tier for an NPC interaction.
///
/// Ambient (non-player) dialogue always uses templates. Important
/// NPCs, quest-critical moments, and long conversations go to the
/// cloud; otherwise a local model is preferred when available.
pub fn select_tier(npc: &NpcStatus, context: &DialogueContext) -> DialogueTier {
    if !context.player_initiated {
        return DialogueTier::Template;
    }

    let needs_cloud = npc.importance >= IMPORTANCE_THRESHOLD
        || context.is_quest_critical
        || context.turn_count >= TURN_ESCALATION_THRESHOLD;

    if needs_cloud {
        return DialogueTier::Cloud;
    }

    if context.local_llm_available {
        return DialogueTier::Local;
    }

    DialogueTier::Cloud
}
