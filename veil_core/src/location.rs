//! Location model and world graph.
//!
//! Locations are nodes in a directed weighted graph; edges carry travel
//! time in game-hours and a danger rating. Each location has a base
//! environment vector that feeds into NPC environment vectors.

use serde::{Deserialize, Serialize};

use crate::collections::{CompactString, FastHashMap, SmallVec4};
use crate::errors::{Result, VeilError};
use crate::npc::LocationId;
use crate::vectors::EnvironmentVec;

/// Common location kind constants.
pub mod location_kind {
    pub const TAVERN: &str = "tavern";
    pub const MARKET: &str = "market";
    pub const RESIDENTIAL: &str = "residential";
    pub const TEMPLE: &str = "temple";
    pub const BARRACKS: &str = "barracks";
    pub const FOREST: &str = "forest";
    pub const ROAD: &str = "road";
    pub const PLAZA: &str = "plaza";
    pub const DOCKS: &str = "docks";
    pub const DUNGEON: &str = "dungeon";
}

/// Default environment vector for a location kind.
///
/// Index order: safety, resource_abundance, weather_comfort, crowding.
/// Unknown kinds get a neutral 0.5 across the board.
pub fn default_environment(kind: &str) -> EnvironmentVec {
    let values = match kind {
        location_kind::TAVERN => [0.7, 0.6, 0.9, 0.6],
        location_kind::MARKET => [0.6, 0.9, 0.7, 0.8],
        location_kind::RESIDENTIAL => [0.8, 0.5, 0.8, 0.4],
        location_kind::TEMPLE => [0.9, 0.3, 0.8, 0.3],
        location_kind::BARRACKS => [0.9, 0.4, 0.6, 0.5],
        location_kind::FOREST => [0.3, 0.7, 0.5, 0.1],
        location_kind::ROAD => [0.4, 0.2, 0.5, 0.2],
        location_kind::PLAZA => [0.6, 0.4, 0.7, 0.7],
        location_kind::DOCKS => [0.5, 0.8, 0.4, 0.5],
        location_kind::DUNGEON => [0.1, 0.3, 0.2, 0.1],
        _ => [0.5, 0.5, 0.5, 0.5],
    };
    EnvironmentVec(values)
}

/// A location node in the world graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier (matches `NpcStatus::location_id`).
    pub id: LocationId,
    /// Human-readable name.
    pub name: String,
    /// Category (tavern, market, forest, ...).
    pub kind: CompactString,
    /// Base environment vector; the crowding coordinate is overwritten
    /// dynamically each tick.
    pub environment: EnvironmentVec,
    /// Maximum NPCs the location can hold (0 = unlimited).
    pub capacity: u32,
}

impl Location {
    /// Create a location with an explicit environment.
    pub fn new(
        id: impl Into<CompactString>,
        name: impl Into<String>,
        kind: impl Into<CompactString>,
        environment: EnvironmentVec,
        capacity: u32,
    ) -> Self {
        Location {
            id: LocationId(id.into()),
            name: name.into(),
            kind: kind.into(),
            environment,
            capacity,
        }
    }

    /// Create a location with the default environment for its kind.
    pub fn from_kind(
        id: impl Into<CompactString>,
        name: impl Into<String>,
        kind: impl Into<CompactString>,
        capacity: u32,
    ) -> Self {
        let kind = kind.into();
        let environment = default_environment(kind.as_str());
        Location {
            id: LocationId(id.into()),
            name: name.into(),
            kind,
            environment,
            capacity,
        }
    }
}

/// A directed edge in the location graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEdge {
    /// Destination location id.
    pub target_id: LocationId,
    /// Travel time in game-hours.
    pub travel_hours: f64,
    /// How dangerous the path is (0-1). Affects NPC willingness.
    pub danger: f32,
}

/// Directed weighted graph of world locations.
///
/// Locations are nodes; edges represent paths with travel times.
/// Used by the movement engine to decide NPC movement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationGraph {
    locations: FastHashMap<LocationId, Location>,
    edges: FastHashMap<LocationId, SmallVec4<LocationEdge>>,
}

impl LocationGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of locations in the graph.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Add a location to the graph.
    pub fn add_location(&mut self, location: Location) -> Result<()> {
        if self.locations.contains_key(&location.id) {
            return Err(VeilError::DuplicateId(location.id.as_str().to_string()));
        }
        self.edges.entry(location.id.clone()).or_default();
        self.locations.insert(location.id.clone(), location);
        Ok(())
    }

    /// Get a location by id.
    pub fn get_location(&self, id: &LocationId) -> Option<&Location> {
        self.locations.get(id)
    }

    /// All locations, in no particular order.
    pub fn list_locations(&self) -> Vec<&Location> {
        self.locations.values().collect()
    }

    /// Remove a location and all edges to/from it.
    ///
    /// Returns true if removed, false if not found.
    pub fn remove_location(&mut self, id: &LocationId) -> bool {
        if self.locations.remove(id).is_none() {
            return false;
        }
        self.edges.remove(id);
        for edges in self.edges.values_mut() {
            edges.retain(|e| e.target_id != *id);
        }
        true
    }

    /// Add an edge (path) between two locations. With `bidirectional`,
    /// the reverse edge is added as well.
    pub fn add_edge(
        &mut self,
        from: &LocationId,
        to: &LocationId,
        travel_hours: f64,
        danger: f32,
        bidirectional: bool,
    ) -> Result<()> {
        if !self.locations.contains_key(from) {
            return Err(VeilError::NotFound(format!("location {from}")));
        }
        if !self.locations.contains_key(to) {
            return Err(VeilError::NotFound(format!("location {to}")));
        }
        self.edges.entry(from.clone()).or_default().push(LocationEdge {
            target_id: to.clone(),
            travel_hours,
            danger,
        });
        if bidirectional {
            self.edges.entry(to.clone()).or_default().push(LocationEdge {
                target_id: from.clone(),
                travel_hours,
                danger,
            });
        }
        Ok(())
    }

    /// All outbound edges from a location (empty if unknown).
    pub fn neighbors(&self, id: &LocationId) -> &[LocationEdge] {
        self.edges.get(id).map(|e| e.as_slice()).unwrap_or(&[])
    }

    /// A specific edge between two locations, if a direct path exists.
    pub fn get_edge(&self, from: &LocationId, to: &LocationId) -> Option<&LocationEdge> {
        self.edges
            .get(from)?
            .iter()
            .find(|e| e.target_id == *to)
    }

    /// Iterate over (location id, outbound edges) pairs.
    pub fn iter_edges(&self) -> impl Iterator<Item = (&LocationId, &[LocationEdge])> {
        self.edges.iter().map(|(id, edges)| (id, edges.as_slice()))
    }

    /// Iterate over all locations.
    pub fn iter_locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(ids: &[&str]) -> LocationGraph {
        let mut graph = LocationGraph::new();
        for id in ids {
            graph
                .add_location(Location::from_kind(*id, id.to_uppercase(), "tavern", 0))
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_add_and_get_location() {
        let graph = graph_with(&["tavern"]);
        let loc = graph.get_location(&LocationId::from("tavern")).unwrap();
        assert_eq!(loc.name, "TAVERN");
        assert_eq!(graph.location_count(), 1);
    }

    #[test]
    fn test_duplicate_location_rejected() {
        let mut graph = graph_with(&["tavern"]);
        let err = graph
            .add_location(Location::from_kind("tavern", "Other", "market", 0))
            .unwrap_err();
        assert!(matches!(err, VeilError::DuplicateId(_)));
    }

    #[test]
    fn test_default_environment_presets() {
        assert_eq!(default_environment("dungeon").safety(), 0.1);
        assert_eq!(default_environment("market").resources(), 0.9);
        assert_eq!(default_environment("unheard_of").0, [0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut graph = graph_with(&["tavern"]);
        let err = graph
            .add_edge(
                &LocationId::from("tavern"),
                &LocationId::from("nowhere"),
                1.0,
                0.0,
                false,
            )
            .unwrap_err();
        assert!(matches!(err, VeilError::NotFound(_)));
    }

    #[test]
    fn test_bidirectional_edge() {
        let mut graph = graph_with(&["tavern", "market"]);
        graph
            .add_edge(
                &LocationId::from("tavern"),
                &LocationId::from("market"),
                0.5,
                0.1,
                true,
            )
            .unwrap();
        assert_eq!(graph.neighbors(&LocationId::from("tavern")).len(), 1);
        assert_eq!(graph.neighbors(&LocationId::from("market")).len(), 1);
    }

    #[test]
    fn test_unidirectional_edge() {
        let mut graph = graph_with(&["tavern", "market"]);
        graph
            .add_edge(
                &LocationId::from("tavern"),
                &LocationId::from("market"),
                0.5,
                0.1,
                false,
            )
            .unwrap();
        assert_eq!(graph.neighbors(&LocationId::from("tavern")).len(), 1);
        assert!(graph.neighbors(&LocationId::from("market")).is_empty());
    }

    #[test]
    fn test_remove_location_strips_inbound_edges() {
        let mut graph = graph_with(&["tavern", "market", "forest"]);
        graph
            .add_edge(
                &LocationId::from("tavern"),
                &LocationId::from("forest"),
                2.0,
                0.3,
                true,
            )
            .unwrap();
        graph
            .add_edge(
                &LocationId::from("market"),
                &LocationId::from("forest"),
                1.0,
                0.2,
                false,
            )
            .unwrap();

        assert!(graph.remove_location(&LocationId::from("forest")));
        assert!(graph.neighbors(&LocationId::from("tavern")).is_empty());
        assert!(graph.neighbors(&LocationId::from("market")).is_empty());
        assert!(!graph.remove_location(&LocationId::from("forest")));
    }

    #[test]
    fn test_get_edge() {
        let mut graph = graph_with(&["tavern", "forest"]);
        graph
            .add_edge(
                &LocationId::from("tavern"),
                &LocationId::from("forest"),
                2.0,
                0.3,
                false,
            )
            .unwrap();
        let edge = graph
            .get_edge(&LocationId::from("tavern"), &LocationId::from("forest"))
            .unwrap();
        assert_eq!(edge.travel_hours, 2.0);
        assert!(graph
            .get_edge(&LocationId::from("forest"), &LocationId::from("tavern"))
            .is_none());
    }
}
