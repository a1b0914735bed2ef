//! Template-based dialogue engine for ambient NPC barks.
//!
//! Zero-cost, zero-latency dialogue via a fixed lookup keyed by the
//! NPC's dominant intention and emotion. A pure function of NPC state
//! plus one uniform random pick from the matched candidate list.

use veil_core::collections::FastHashMap;
use veil_core::npc::NpcStatus;
use veil_core::rng::DeterministicRng;

/// Template library keyed by (dominant_intention, dominant_emotion).
const TEMPLATES: [((&str, &str), &[&str]); 16] = [
    (
        ("survive", "fear"),
        &[
            "I don't feel safe here...",
            "We need to be careful. Something feels wrong.",
            "I heard strange noises last night.",
        ],
    ),
    (
        ("survive", "anger"),
        &[
            "I won't let anyone threaten my family!",
            "These are dangerous times. We must fight back.",
        ],
    ),
    (
        ("socialize", "joy"),
        &[
            "What a wonderful day to meet friends!",
            "Have you heard the latest news? Come, let me tell you!",
            "It's good to see a friendly face around here.",
        ],
    ),
    (
        ("socialize", "sadness"),
        &[
            "I've been feeling lonely lately...",
            "I wish I had someone to talk to.",
        ],
    ),
    (
        ("achieve", "anticipation"),
        &[
            "I have big plans. Just you wait.",
            "Every day I'm closer to my goal.",
            "Hard work pays off. I truly believe that.",
        ],
    ),
    (
        ("achieve", "joy"),
        &[
            "Business is booming! What a time to be alive!",
            "I just closed an excellent deal.",
        ],
    ),
    (
        ("explore", "anticipation"),
        &[
            "I wonder what lies beyond those mountains...",
            "There's so much of the world I haven't seen.",
        ],
    ),
    (
        ("explore", "surprise"),
        &[
            "Did you see that? I've never seen anything like it!",
            "This place is full of wonders.",
        ],
    ),
    (
        ("create", "joy"),
        &[
            "I've been working on something special.",
            "Inspiration struck me this morning!",
        ],
    ),
    (
        ("create", "anticipation"),
        &[
            "I can see it in my mind... it will be magnificent.",
            "I just need a few more materials to finish my work.",
        ],
    ),
    (
        ("dominate", "anger"),
        &[
            "This town needs stronger leadership.",
            "People should know their place.",
        ],
    ),
    (
        ("dominate", "trust"),
        &[
            "Follow my lead and everything will be fine.",
            "I've got everything under control.",
        ],
    ),
    (
        ("nurture", "trust"),
        &[
            "How are you feeling today? You look tired.",
            "If you need anything, don't hesitate to ask.",
        ],
    ),
    (
        ("nurture", "sadness"),
        &[
            "I worry about the children in times like these.",
            "We need to take care of each other.",
        ],
    ),
    (
        ("escape", "fear"),
        &[
            "I need to get out of here...",
            "I'm saving up to leave this place for good.",
        ],
    ),
    (
        ("escape", "sadness"),
        &[
            "There's nothing left for me here.",
            "Sometimes I dream of a different life...",
        ],
    ),
];

/// Generic fallbacks when no (intention, emotion) key matches.
const FALLBACK_TEMPLATES: [&str; 5] = [
    "...",
    "Hmm.",
    "Another day, I suppose.",
    "The weather's been something, hasn't it?",
    "Stay safe out there.",
];

/// Generates ambient NPC dialogue from parameterized templates.
///
/// Templates are selected by the NPC's dominant intention and emotion;
/// a generic fallback covers unmatched combinations. The RNG is
/// seedable so tests (and deterministic replays) get reproducible
/// picks.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    templates: FastHashMap<(&'static str, &'static str), Vec<String>>,
    rng: DeterministicRng,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TemplateEngine {
    /// Create an engine with the built-in library and a seeded RNG.
    pub fn new(seed: u64) -> Self {
        let mut templates = FastHashMap::default();
        for (key, lines) in TEMPLATES {
            templates.insert(key, lines.iter().map(|s| s.to_string()).collect());
        }
        TemplateEngine {
            templates,
            rng: DeterministicRng::with_domain(seed, "templates"),
        }
    }

    /// Replace or extend the candidate list for a key.
    pub fn set_templates(
        &mut self,
        intention: &'static str,
        emotion: &'static str,
        lines: Vec<String>,
    ) {
        self.templates.insert((intention, emotion), lines);
    }

    /// Generate an ambient dialogue line for an NPC.
    pub fn generate(&mut self, npc: &NpcStatus) -> String {
        let key = (npc.dominant_intention(), npc.dominant_emotion());
        match self.templates.get(&key) {
            Some(candidates) if !candidates.is_empty() => {
                let idx = self.rng.gen_index(candidates.len());
                candidates[idx].clone()
            }
            _ => {
                let idx = self.rng.gen_index(FALLBACK_TEMPLATES.len());
                FALLBACK_TEMPLATES[idx].to_string()
            }
        }
    }

    /// Generate ambient dialogue for multiple NPCs, in input order.
    pub fn generate_batch(&mut self, npcs: &[NpcStatus]) -> Vec<String> {
        npcs.iter().map(|npc| self.generate(npc)).collect()
    }
}
