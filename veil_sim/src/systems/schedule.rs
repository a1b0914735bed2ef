//! Schedule engine — NPC daily routines and activity management.
//!
//! Each tick the schedule engine determines what each NPC should be
//! doing from the current hour of the in-game day (game_time mod 24),
//! the NPC's archetype, and an exhaustion override: NPCs with
//! critically low energy collapse into sleep regardless of schedule.

use veil_core::collections::FastHashMap;
use veil_core::npc::{Activity, NpcId, NpcStatus};

/// Energy below which NPCs collapse into sleep regardless of schedule.
const EXHAUSTION_THRESHOLD: f32 = 0.05;

/// One contiguous slot of a 24-hour schedule: [start, end) in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleSlot {
    pub start: f64,
    pub end: f64,
    pub activity: Activity,
}

const fn slot(start: f64, end: f64, activity: Activity) -> ScheduleSlot {
    ScheduleSlot {
        start,
        end,
        activity,
    }
}

use veil_core::npc::Activity::{Leisure, Resting, Sleeping, Working};

const DEFAULT_SCHEDULE: [ScheduleSlot; 7] = [
    slot(0.0, 6.0, Sleeping),
    slot(6.0, 7.0, Resting),
    slot(7.0, 12.0, Working),
    slot(12.0, 13.0, Leisure),
    slot(13.0, 18.0, Working),
    slot(18.0, 22.0, Leisure),
    slot(22.0, 24.0, Sleeping),
];

const GUARD_SCHEDULE: [ScheduleSlot; 5] = [
    slot(0.0, 6.0, Working), // Night watch
    slot(6.0, 8.0, Resting),
    slot(8.0, 14.0, Sleeping),
    slot(14.0, 16.0, Resting),
    slot(16.0, 24.0, Working), // Evening/night shift
];

const MERCHANT_SCHEDULE: [ScheduleSlot; 6] = [
    slot(0.0, 6.0, Sleeping),
    slot(6.0, 7.0, Resting),
    slot(7.0, 18.0, Working), // Long market hours
    slot(18.0, 20.0, Leisure),
    slot(20.0, 22.0, Resting),
    slot(22.0, 24.0, Sleeping),
];

const PRIEST_SCHEDULE: [ScheduleSlot; 10] = [
    slot(0.0, 5.0, Sleeping),
    slot(5.0, 6.0, Resting), // Early rise
    slot(6.0, 8.0, Working), // Morning prayers
    slot(8.0, 9.0, Leisure),
    slot(9.0, 12.0, Working), // Services
    slot(12.0, 13.0, Leisure),
    slot(13.0, 17.0, Working), // Pastoral duties
    slot(17.0, 19.0, Leisure),
    slot(19.0, 22.0, Resting),
    slot(22.0, 24.0, Sleeping),
];

const FARMER_SCHEDULE: [ScheduleSlot; 7] = [
    slot(0.0, 5.0, Sleeping),
    slot(5.0, 6.0, Resting), // Early rise
    slot(6.0, 12.0, Working),
    slot(12.0, 13.0, Leisure), // Lunch
    slot(13.0, 18.0, Working),
    slot(18.0, 21.0, Leisure),
    slot(21.0, 24.0, Sleeping), // Early to bed
];

const NOBLE_SCHEDULE: [ScheduleSlot; 7] = [
    slot(0.0, 8.0, Sleeping), // Sleeps in
    slot(8.0, 9.0, Resting),
    slot(9.0, 12.0, Working), // Court
    slot(12.0, 14.0, Leisure), // Long lunch
    slot(14.0, 17.0, Working),
    slot(17.0, 23.0, Leisure), // Entertaining
    slot(23.0, 24.0, Resting),
];

const CRIMINAL_SCHEDULE: [ScheduleSlot; 5] = [
    slot(0.0, 6.0, Working), // Night activities
    slot(6.0, 14.0, Sleeping), // Nocturnal
    slot(14.0, 16.0, Resting),
    slot(16.0, 22.0, Leisure),
    slot(22.0, 24.0, Working), // Night activities
];

const ARTIST_SCHEDULE: [ScheduleSlot; 7] = [
    slot(0.0, 2.0, Working), // Late-night inspiration
    slot(2.0, 9.0, Sleeping),
    slot(9.0, 10.0, Resting),
    slot(10.0, 13.0, Working),
    slot(13.0, 15.0, Leisure),
    slot(15.0, 19.0, Working),
    slot(19.0, 24.0, Leisure), // Evening performances
];

const SCHOLAR_SCHEDULE: [ScheduleSlot; 8] = [
    slot(0.0, 6.0, Sleeping),
    slot(6.0, 7.0, Resting),
    slot(7.0, 12.0, Working), // Morning study
    slot(12.0, 13.0, Leisure),
    slot(13.0, 18.0, Working), // Afternoon research
    slot(18.0, 20.0, Leisure),
    slot(20.0, 22.0, Working), // Evening reading
    slot(22.0, 24.0, Sleeping),
];

/// The 24-hour schedule template for an archetype.
/// Soldiers share the guard schedule; bards share the artist schedule.
/// Unknown archetypes use the default.
pub fn schedule_for(archetype: &str) -> &'static [ScheduleSlot] {
    match archetype {
        "guard" | "soldier" => &GUARD_SCHEDULE,
        "merchant" => &MERCHANT_SCHEDULE,
        "priest" => &PRIEST_SCHEDULE,
        "farmer" => &FARMER_SCHEDULE,
        "noble" => &NOBLE_SCHEDULE,
        "criminal" => &CRIMINAL_SCHEDULE,
        "artist" | "bard" => &ARTIST_SCHEDULE,
        "scholar" => &SCHOLAR_SCHEDULE,
        _ => &DEFAULT_SCHEDULE,
    }
}

/// The activity a schedule prescribes at a given hour of day.
pub fn resolve_activity(schedule: &[ScheduleSlot], hour_of_day: f64) -> Activity {
    for slot in schedule {
        if slot.start <= hour_of_day && hour_of_day < slot.end {
            return slot.activity;
        }
    }
    // Unreachable with a complete 24-hour schedule.
    Activity::Leisure
}

/// Assigns NPC activities from time-of-day and archetype, with an
/// exhaustion override.
#[derive(Debug, Clone)]
pub struct ScheduleEngine {
    /// Energy below this forces sleep.
    pub exhaustion_threshold: f32,
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        ScheduleEngine {
            exhaustion_threshold: EXHAUSTION_THRESHOLD,
        }
    }
}

impl ScheduleEngine {
    /// What an NPC should be doing at the given game time.
    pub fn compute_activity(&self, npc: &NpcStatus, game_time: f64) -> Activity {
        if npc.energy < self.exhaustion_threshold {
            return Activity::Sleeping;
        }
        let hour_of_day = game_time.rem_euclid(24.0);
        resolve_activity(schedule_for(npc.archetype.as_str()), hour_of_day)
    }

    /// Assign activities to all NPCs in-place.
    pub fn tick(&self, npcs: &mut FastHashMap<NpcId, NpcStatus>, game_time: f64) {
        for npc in npcs.values_mut() {
            npc.activity = self.compute_activity(npc, game_time);
        }
    }
}
