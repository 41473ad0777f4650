/**
 * Plan Channel Registry
 *
 * One `tokio::sync::broadcast` channel per plan, created on first
 * subscription or publish. The registry is an explicit object: it is built
 * at startup, handed to handlers through `AppState`, swept periodically by
 * the maintenance task, and shut down when the server stops.
 *
 * # Delivery
 *
 * Every subscriber of a plan receives a clone of each event published on
 * it. Publishing with no subscribers is not an error. A subscriber that
 * falls more than `capacity` events behind skips the oldest ones.
 *
 * # Shutdown
 *
 * `shutdown` drops every sender. Open subscriptions then observe a closed
 * channel and end their streams, and later publishes reach nobody.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::shared::itinerary::PlanId;
use crate::shared::RealtimeEvent;

/// Sender half of one plan's channel
pub type RealtimeEventBroadcast = broadcast::Sender<RealtimeEvent>;

#[derive(Clone)]
pub struct PlanChannels {
    channels: Arc<Mutex<HashMap<PlanId, RealtimeEventBroadcast>>>,
    capacity: usize,
}

impl PlanChannels {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn get_sender(&self, plan: PlanId) -> RealtimeEventBroadcast {
        self.registry()
            .entry(plan)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Join the plan's channel, creating it if needed
    ///
    /// The receiver is registered before the registry lock is released, so a
    /// concurrent `cleanup_inactive_channels` never sees the new channel empty.
    pub fn subscribe(&self, plan: PlanId) -> broadcast::Receiver<RealtimeEvent> {
        let capacity = self.capacity;
        self.registry()
            .entry(plan)
            .or_insert_with(|| broadcast::channel(capacity).0)
            .subscribe()
    }

    /// Relay `event` to every subscriber of its plan
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, event: RealtimeEvent) -> usize {
        let plan = event.plan_id;
        let sender = self.registry().get(&plan).cloned();
        match sender {
            Some(sender) => broadcast_event(&sender, event),
            None => {
                tracing::debug!(%plan, event_type = %event.event_type(), "[Realtime] No channel for plan");
                0
            }
        }
    }

    /// Drop channels that no longer have subscribers
    pub fn cleanup_inactive_channels(&self) -> usize {
        let mut channels = self.registry();
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }

    pub fn get_subscriber_count(&self, plan: PlanId) -> usize {
        self.registry()
            .get(&plan)
            .map_or(0, |sender| sender.receiver_count())
    }

    pub fn channel_count(&self) -> usize {
        self.registry().len()
    }

    /// Close one plan's channel
    ///
    /// Subscribers still receive what was already published, then observe a
    /// closed channel. Returns whether the plan had a channel.
    pub fn close(&self, plan: PlanId) -> bool {
        let removed = self.registry().remove(&plan);
        if let Some(sender) = &removed {
            tracing::info!(%plan, subscribers = sender.receiver_count(), "[Realtime] Plan channel closed");
        }
        removed.is_some()
    }

    /// Close every channel
    pub fn shutdown(&self) {
        let closed = {
            let mut channels = self.registry();
            let closed = channels.len();
            channels.clear();
            closed
        };
        tracing::info!(channels = closed, "[Realtime] Channel registry shut down");
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<PlanId, RealtimeEventBroadcast>> {
        self.channels.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Send `event` on `broadcast_tx`, returning how many subscribers got it
pub fn broadcast_event(broadcast_tx: &RealtimeEventBroadcast, event: RealtimeEvent) -> usize {
    let plan = event.plan_id;
    let event_type = event.event_type();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::info!(%plan, %event_type, "[Realtime] Event broadcast to {} subscribers", subscriber_count);
            subscriber_count
        }
        Err(_) => {
            // No subscribers, that's okay
            tracing::debug!(%plan, %event_type, "[Realtime] No subscribers to receive event");
            0
        }
    }
}
