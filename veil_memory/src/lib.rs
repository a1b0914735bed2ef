//! veil_memory: per-NPC memory log with recency and similarity search.
//!
//! Memories record what an NPC witnessed and how it felt. The store is
//! a capability interface so the brute-force in-memory implementation
//! can later be swapped for a vector-database-backed one without
//! touching the world manager.

use serde::{Deserialize, Serialize};

use veil_core::collections::FastHashMap;
pub use veil_core::npc::{LocationId, NpcId};

/// Embedding dimension used by memory entries.
///
/// No embedding model is wired yet; entries carry zero vectors and
/// similarity search degrades gracefully to score 0.
pub const EMBEDDING_DIM: usize = 384;

/// A single memory held by an NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Unique memory id.
    pub memory_id: String,
    /// Owning NPC.
    pub npc_id: NpcId,
    /// Human-readable description of what happened.
    pub event_text: String,
    /// Dense embedding vector (zero stub until a model is wired).
    pub embedding: Vec<f32>,
    /// How significant this memory is (0-1).
    pub importance: f32,
    /// How positive/negative this memory feels (-1 to 1).
    pub emotional_valence: f32,
    /// In-game time when this memory was formed.
    pub game_timestamp: f64,
    /// Where this memory was formed.
    pub location_id: LocationId,
}

impl MemoryEntry {
    /// Create a memory with a zero embedding.
    pub fn new(
        memory_id: impl Into<String>,
        npc_id: NpcId,
        event_text: impl Into<String>,
        game_timestamp: f64,
        location_id: LocationId,
    ) -> Self {
        MemoryEntry {
            memory_id: memory_id.into(),
            npc_id,
            event_text: event_text.into(),
            embedding: vec![0.0; EMBEDDING_DIM],
            importance: 0.5,
            emotional_valence: 0.0,
            game_timestamp,
            location_id,
        }
    }

    /// Set the importance (clamped to [0, 1]).
    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = importance.clamp(0.0, 1.0);
        self
    }

    /// Set the emotional valence (clamped to [-1, 1]).
    pub fn with_valence(mut self, valence: f32) -> Self {
        self.emotional_valence = valence.clamp(-1.0, 1.0);
        self
    }
}

/// Capability interface for NPC memory storage and retrieval.
pub trait MemoryStore {
    /// Store a memory entry.
    fn store(&mut self, entry: MemoryEntry);

    /// Search an NPC's memories for the best matches to a query vector,
    /// ordered by descending similarity.
    fn search(&self, npc_id: &NpcId, query_embedding: &[f32], limit: usize) -> Vec<MemoryEntry>;

    /// The most recent memories for an NPC, newest first.
    fn get_recent(&self, npc_id: &NpcId, limit: usize) -> Vec<MemoryEntry>;
}

/// Cosine similarity with a zero-safety rule: near-zero-norm vectors
/// produce similarity 0 rather than NaN.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a < 1e-8 || norm_b < 1e-8 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}

/// Per-NPC append-only memory store with brute-force similarity search.
///
/// Not suitable for very large memory counts; the capability trait
/// exists so a vector-db implementation can replace it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryStore {
    memories: FastHashMap<NpcId, Vec<MemoryEntry>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries across all NPCs.
    pub fn len(&self) -> usize {
        self.memories.values().map(Vec::len).sum()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// Drop all memories (used on world restore).
    pub fn clear(&mut self) {
        self.memories.clear();
    }
}

impl MemoryStore for InMemoryStore {
    fn store(&mut self, entry: MemoryEntry) {
        self.memories
            .entry(entry.npc_id.clone())
            .or_default()
            .push(entry);
    }

    fn search(&self, npc_id: &NpcId, query_embedding: &[f32], limit: usize) -> Vec<MemoryEntry> {
        let Some(entries) = self.memories.get(npc_id) else {
            return Vec::new();
        };
        let mut scored: Vec<(f32, &MemoryEntry)> = entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, e)| e.clone())
            .collect()
    }

    fn get_recent(&self, npc_id: &NpcId, limit: usize) -> Vec<MemoryEntry> {
        let Some(entries) = self.memories.get(npc_id) else {
            return Vec::new();
        };
        let mut sorted: Vec<&MemoryEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| b.game_timestamp.total_cmp(&a.game_timestamp));
        sorted.into_iter().take(limit).cloned().collect()
    }
}
