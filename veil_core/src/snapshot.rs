//! Snapshot types for world serialization.
//!
//! We use separate snapshot types rather than serializing runtime types
//! directly so that:
//!
//! 1. The wire format is plain JSON-friendly data (vectors as
//!    `Vec<f32>`, maps keyed by id strings).
//! 2. Restores can validate every vector length against the declared
//!    dimensions *before* any runtime state is touched.
//! 3. The snapshot format can evolve independently of the runtime
//!    representation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VeilError};
use crate::location::{Location, LocationGraph};
use crate::npc::{Activity, LocationId, NpcId, NpcStatus};
use crate::vectors::{
    EmotionVec, EnvironmentVec, IntentionVec, PersonalityVec, SocialVec,
};

/// Serialized form of a single NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSnapshot {
    pub id: String,
    pub name: String,
    pub archetype: String,
    pub intention: Vec<f32>,
    pub emotion: Vec<f32>,
    pub personality: Vec<f32>,
    pub social_influence: Vec<f32>,
    pub environment: Vec<f32>,
    pub energy: f32,
    pub health: f32,
    pub importance: f32,
    pub relationships: HashMap<String, f32>,
    pub recent_memories: Vec<String>,
    pub location_id: String,
    #[serde(default)]
    pub activity: String,
}

impl From<&NpcStatus> for NpcSnapshot {
    fn from(npc: &NpcStatus) -> Self {
        NpcSnapshot {
            id: npc.id.as_str().to_string(),
            name: npc.name.clone(),
            archetype: npc.archetype.to_string(),
            intention: npc.intention.0.to_vec(),
            emotion: npc.emotion.0.to_vec(),
            personality: npc.personality.0.to_vec(),
            social_influence: npc.social_influence.0.to_vec(),
            environment: npc.environment.0.to_vec(),
            energy: npc.energy,
            health: npc.health,
            importance: npc.importance,
            relationships: npc
                .relationships
                .iter()
                .map(|(id, v)| (id.as_str().to_string(), *v))
                .collect(),
            recent_memories: npc.recent_memories.clone(),
            location_id: npc.location_id.as_str().to_string(),
            activity: npc.activity.as_str().to_string(),
        }
    }
}

impl NpcSnapshot {
    /// Rebuild the runtime NPC, validating all vector dimensions.
    pub fn to_status(&self) -> Result<NpcStatus> {
        Ok(NpcStatus {
            id: NpcId::new(self.id.as_str()),
            name: self.name.clone(),
            archetype: self.archetype.as_str().into(),
            intention: IntentionVec::from_slice(&self.intention)?,
            emotion: EmotionVec::from_slice(&self.emotion)?,
            personality: PersonalityVec::from_slice(&self.personality)?,
            social_influence: SocialVec::from_slice(&self.social_influence)?,
            environment: EnvironmentVec::from_slice(&self.environment)?,
            energy: self.energy,
            health: self.health,
            importance: self.importance,
            relationships: self
                .relationships
                .iter()
                .map(|(id, v)| (NpcId::new(id.as_str()), *v))
                .collect(),
            recent_memories: self.recent_memories.clone(),
            location_id: LocationId::new(self.location_id.as_str()),
            activity: Activity::from_label(&self.activity),
        })
    }
}

/// Serialized form of a location node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub name: String,
    pub kind: String,
    pub environment: Vec<f32>,
    pub capacity: u32,
}

/// Serialized form of one outbound edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub target_id: String,
    pub travel_hours: f64,
    pub danger: f32,
}

/// Serialized form of the location graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub locations: HashMap<String, LocationSnapshot>,
    pub edges: HashMap<String, Vec<EdgeSnapshot>>,
}

impl From<&LocationGraph> for GraphSnapshot {
    fn from(graph: &LocationGraph) -> Self {
        let locations = graph
            .iter_locations()
            .map(|loc| {
                (
                    loc.id.as_str().to_string(),
                    LocationSnapshot {
                        name: loc.name.clone(),
                        kind: loc.kind.to_string(),
                        environment: loc.environment.0.to_vec(),
                        capacity: loc.capacity,
                    },
                )
            })
            .collect();
        let edges = graph
            .iter_edges()
            .map(|(id, edges)| {
                (
                    id.as_str().to_string(),
                    edges
                        .iter()
                        .map(|e| EdgeSnapshot {
                            target_id: e.target_id.as_str().to_string(),
                            travel_hours: e.travel_hours,
                            danger: e.danger,
                        })
                        .collect(),
                )
            })
            .collect();
        GraphSnapshot { locations, edges }
    }
}

impl GraphSnapshot {
    /// Rebuild the runtime graph, validating environment dimensions.
    ///
    /// Edges referencing unknown endpoints are rejected so a restored
    /// graph is always internally consistent.
    pub fn to_graph(&self) -> Result<LocationGraph> {
        let mut graph = LocationGraph::new();
        for (id, loc) in &self.locations {
            graph.add_location(Location::new(
                id.as_str(),
                loc.name.clone(),
                loc.kind.as_str(),
                EnvironmentVec::from_slice(&loc.environment)?,
                loc.capacity,
            ))?;
        }
        for (from, edges) in &self.edges {
            let from = LocationId::new(from.as_str());
            for e in edges {
                graph.add_edge(
                    &from,
                    &LocationId::new(e.target_id.as_str()),
                    e.travel_hours,
                    e.danger,
                    false,
                )?;
            }
        }
        Ok(graph)
    }
}

/// Full world snapshot tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// In-game time in hours.
    pub game_time: f64,
    /// All NPCs keyed by id.
    pub npcs: HashMap<String, NpcSnapshot>,
    /// The location graph.
    #[serde(default)]
    pub locations: GraphSnapshot,
}

impl WorldSnapshot {
    /// Parse a snapshot from a JSON tree, mapping malformed input to
    /// `InvalidSnapshot`.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| VeilError::InvalidSnapshot(e.to_string()))
    }

    /// Render the snapshot as a JSON tree.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| VeilError::InvalidSnapshot(e.to_string()))
    }

    /// Validate and rebuild all runtime state without mutating anything.
    ///
    /// Callers swap the results in only after this succeeds, so a failed
    /// restore leaves the world untouched.
    pub fn to_runtime(&self) -> Result<(f64, Vec<NpcStatus>, LocationGraph)> {
        let mut npcs = Vec::with_capacity(self.npcs.len());
        for (id, snap) in &self.npcs {
            let status = snap.to_status()?;
            if status.id.as_str() != id {
                return Err(VeilError::InvalidSnapshot(format!(
                    "npc key {id:?} does not match entry id {:?}",
                    status.id.as_str()
                )));
            }
            npcs.push(status);
        }
        let graph = self.locations.to_graph()?;
        Ok((self.game_time, npcs, graph))
    }
}
