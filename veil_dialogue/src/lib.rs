//! veil_dialogue: cost-tiered dialogue routing and template barks.
//!
//! The tier selector decides how a dialogue request is generated:
//! - Template: ambient barks, no model call (zero cost, zero latency)
//! - Local: a small model on the player's machine
//! - Cloud: a hosted model, reserved for important conversations
//!
//! The template engine is the fallback tier and a pure function of the
//! NPC's current state. The core only produces the routing decision
//! and, for the cloud tier, the assembled prompt context
//! (`NpcStatus::to_character_sheet`); the actual remote invocation is
//! the server layer's concern.

pub mod templates;
pub mod tier;

pub use templates::TemplateEngine;
pub use tier::{select_tier, DialogueContext, DialogueTier};
