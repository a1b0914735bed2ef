//! Vitality engine — energy and health dynamics per tick.
//!
//! Manages the physical state of NPCs:
//! - Energy drains passively each tick and regenerates based on
//!   environmental safety and comfort.
//! - Health is damaged by unsafe environments and regenerates slowly,
//!   faster in safe locations.
//! - Low health caps effective energy (injured NPCs tire faster).
//! - Violent and restorative events apply direct (health, energy)
//!   deltas scaled by intensity.

use veil_core::collections::FastHashMap;
use veil_core::event::WorldEvent;
use veil_core::npc::{NpcId, NpcStatus};

/// Event type prefixes that deal (health, energy) damage.
const DAMAGING_EVENT_TYPES: [(&str, f32, f32); 6] = [
    ("attack", -0.15, -0.05),
    ("battle", -0.2, -0.1),
    ("disaster", -0.1, -0.05),
    ("plague", -0.12, -0.03),
    ("fire", -0.1, -0.04),
    ("collapse", -0.08, -0.02),
];

/// Event type prefixes that restore (health, energy).
const HEALING_EVENT_TYPES: [(&str, f32, f32); 4] = [
    ("healing", 0.15, 0.05),
    ("feast", 0.05, 0.15),
    ("rest", 0.0, 0.2),
    ("celebration", 0.02, 0.1),
];

/// Manages NPC energy and health dynamics per tick.
#[derive(Debug, Clone)]
pub struct VitalityEngine {
    /// Passive energy cost per tick.
    pub energy_drain: f32,
    /// Base energy recovery per tick (scaled by environment).
    pub energy_regen_base: f32,
    /// Passive health recovery per tick (scaled by safety).
    pub health_regen_rate: f32,
    /// Health drain per tick in unsafe environments.
    pub danger_health_drain: f32,
    /// Safety below this causes health damage.
    pub danger_safety_threshold: f32,
    /// Below this health, energy is capped.
    pub health_energy_cap_threshold: f32,
}

impl Default for VitalityEngine {
    fn default() -> Self {
        VitalityEngine {
            energy_drain: 0.01,
            energy_regen_base: 0.03,
            health_regen_rate: 0.005,
            danger_health_drain: 0.02,
            danger_safety_threshold: 0.3,
            health_energy_cap_threshold: 0.5,
        }
    }
}

impl VitalityEngine {
    /// Energy regeneration for an NPC based on environment.
    /// Safe, comfortable environments restore more energy.
    pub fn compute_energy_regen(&self, npc: &NpcStatus) -> f32 {
        let env_factor = 0.5 * npc.environment.safety() + 0.5 * npc.environment.weather_comfort();
        self.energy_regen_base * env_factor
    }

    /// Net health change for an NPC based on environment: damage from
    /// unsafe surroundings plus passive healing scaled by safety.
    pub fn compute_health_change(&self, npc: &NpcStatus) -> f32 {
        let safety = npc.environment.safety();
        let mut change = 0.0;

        if safety < self.danger_safety_threshold {
            change -= self.danger_health_drain * (self.danger_safety_threshold - safety);
        }

        if npc.health < 1.0 {
            change += self.health_regen_rate * safety;
        }

        change
    }

    /// Cap energy based on health level. Injured NPCs cannot sustain
    /// high energy; at health 0.25 the cap is 0.5, at health 0 it is 0.
    pub fn apply_health_energy_cap(&self, npc: &mut NpcStatus) {
        if npc.health < self.health_energy_cap_threshold {
            let energy_cap = npc.health / self.health_energy_cap_threshold;
            npc.energy = npc.energy.min(energy_cap);
        }
    }

    /// Apply one tick of vitality dynamics to a single NPC.
    /// Order: drain energy, regen energy, health change, clamp, cap.
    pub fn update_npc(&self, npc: &mut NpcStatus) {
        npc.energy -= self.energy_drain;
        npc.energy += self.compute_energy_regen(npc);
        npc.health += self.compute_health_change(npc);

        npc.energy = npc.energy.clamp(0.0, 1.0);
        npc.health = npc.health.clamp(0.0, 1.0);

        self.apply_health_energy_cap(npc);
    }

    /// Apply an event's health/energy impact to an NPC, matched by
    /// event-type prefix and scaled by intensity.
    pub fn apply_event(&self, npc: &mut NpcStatus, event: &WorldEvent) {
        let tables = DAMAGING_EVENT_TYPES.iter().chain(HEALING_EVENT_TYPES.iter());
        for (prefix, health_delta, energy_delta) in tables {
            if event.event_type.starts_with(prefix) {
                npc.health = (npc.health + health_delta * event.intensity).clamp(0.0, 1.0);
                npc.energy = (npc.energy + energy_delta * event.intensity).clamp(0.0, 1.0);
                return;
            }
        }
    }

    /// Apply an event's health/energy impact to all NPCs.
    pub fn apply_event_batch(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>, event: &WorldEvent) {
        for npc in npcs.values_mut() {
            self.apply_event(npc, event);
        }
    }

    /// Apply an interaction's energy cost and signed health delta to a
    /// single participant.
    pub fn apply_interaction_cost(&self, npc: &mut NpcStatus, energy_cost: f32, health_delta: f32) {
        npc.energy = (npc.energy - energy_cost).clamp(0.0, 1.0);
        npc.health = (npc.health + health_delta).clamp(0.0, 1.0);
    }

    /// Apply vitality dynamics in-place for all NPCs.
    pub fn tick(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>) {
        for npc in npcs.values_mut() {
            self.update_npc(npc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::vectors::EnvironmentVec;

    fn npc_in_env(env: [f32; 4]) -> NpcStatus {
        let mut npc = NpcStatus::new("a", "A");
        npc.environment = EnvironmentVec(env);
        npc
    }

    #[test]
    fn test_regen_scales_with_environment() {
        let engine = VitalityEngine::default();
        let cosy = npc_in_env([1.0, 0.0, 1.0, 0.0]);
        let bleak = npc_in_env([0.0, 0.0, 0.0, 0.0]);
        assert!((engine.compute_energy_regen(&cosy) - 0.03).abs() < 1e-6);
        assert_eq!(engine.compute_energy_regen(&bleak), 0.0);
    }

    #[test]
    fn test_unsafe_environment_damages_health() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.1, 0.0, 0.0, 0.0]);
        npc.health = 1.0;
        engine.update_npc(&mut npc);
        assert!(npc.health < 1.0);
    }

    #[test]
    fn test_safe_environment_heals() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.9, 0.0, 0.5, 0.0]);
        npc.health = 0.8;
        engine.update_npc(&mut npc);
        assert!(npc.health > 0.8);
    }

    #[test]
    fn test_full_health_does_not_overheal() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.9, 0.0, 0.5, 0.0]);
        npc.health = 1.0;
        engine.update_npc(&mut npc);
        assert_eq!(npc.health, 1.0);
    }

    #[test]
    fn test_energy_cap_for_injured() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.5, 0.0, 0.5, 0.0]);
        npc.health = 0.25;
        npc.energy = 1.0;
        engine.update_npc(&mut npc);
        assert!(npc.energy <= npc.health / 0.5 + 1e-6);
    }

    #[test]
    fn test_attack_event_damages() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.5; 4]);
        npc.health = 0.8;
        let event = WorldEvent::new("attack_bandit", "road").with_intensity(1.0);
        engine.apply_event(&mut npc, &event);
        assert!((npc.health - 0.65).abs() < 1e-6);
        assert!((npc.energy - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_event_impact_scaled_by_intensity() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.5; 4]);
        let event = WorldEvent::new("battle_of_the_ford", "road").with_intensity(0.5);
        engine.apply_event(&mut npc, &event);
        assert!((npc.health - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_rest_event_restores_energy() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.5; 4]);
        npc.energy = 0.5;
        let event = WorldEvent::new("rest_at_inn", "tavern").with_intensity(1.0);
        engine.apply_event(&mut npc, &event);
        assert!((npc.energy - 0.7).abs() < 1e-6);
        assert_eq!(npc.health, 1.0);
    }

    #[test]
    fn test_unrelated_event_no_effect() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.5; 4]);
        let event = WorldEvent::new("trade_deal", "market").with_intensity(1.0);
        engine.apply_event(&mut npc, &event);
        assert_eq!(npc.health, 1.0);
        assert_eq!(npc.energy, 1.0);
    }

    #[test]
    fn test_interaction_cost() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.5; 4]);
        engine.apply_interaction_cost(&mut npc, 0.03, -0.08);
        assert!((npc.energy - 0.97).abs() < 1e-6);
        assert!((npc.health - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_vitals_stay_in_unit_interval() {
        let engine = VitalityEngine::default();
        let mut npc = npc_in_env([0.0; 4]);
        npc.health = 0.05;
        npc.energy = 0.01;
        for _ in 0..100 {
            engine.update_npc(&mut npc);
            assert!((0.0..=1.0).contains(&npc.energy));
            assert!((0.0..=1.0).contains(&npc.health));
        }
    }
}
