//! Event propagation through locality scales.
//!
//! When an event is submitted it is queued at its origin scale
//! immediately; then, for each strictly broader scale, an attenuated
//! copy is scheduled after the configured delay. Each cascade step is a
//! fresh value — scheduled deliveries never share mutable state.

use veil_core::event::WorldEvent;

use crate::event_queue::EventQueue;

/// Fans an incoming event into a delayed, attenuated cascade across
/// locality scales.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventPropagator;

impl EventPropagator {
    /// Create a propagator.
    pub fn new() -> Self {
        EventPropagator
    }

    /// Submit a new event and schedule its full propagation cascade.
    ///
    /// The event is queued at its own timestamp, then attenuated copies
    /// are scheduled for each broader scale until intensity falls below
    /// the propagation threshold or the scale reaches Global.
    ///
    /// Returns the number of scheduled deliveries, including the
    /// original.
    pub fn submit(&self, queue: &mut EventQueue, event: WorldEvent) -> usize {
        let mut current = event.clone();
        queue.push(event, current.timestamp);
        let mut count = 1;

        while let Some((next_scale, delay, new_intensity)) = current.next_propagation() {
            let impact_scale = new_intensity / current.intensity.max(1e-8);
            let delivery_time = current.timestamp + delay;

            let mut propagated = current.clone();
            propagated.current_scale = next_scale;
            propagated.intensity = new_intensity;
            for x in propagated.emotion_impact.iter_mut() {
                *x *= impact_scale;
            }
            for x in propagated.social_impact.iter_mut() {
                *x *= impact_scale;
            }
            propagated.timestamp = delivery_time;

            queue.push(propagated.clone(), delivery_time);
            count += 1;
            current = propagated;
        }

        count
    }
}
