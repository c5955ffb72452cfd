use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::TournamentEvent;

/// Event bus distributing tournament events to live subscribers
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Tournament-specific event channels: tournament_id -> sender
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<TournamentEvent>>>>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new event bus whose per-tournament channels buffer `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Emits an event to all subscribers of a tournament
    pub async fn emit(&self, tournament_id: &str, event: TournamentEvent) {
        let channels = self.channels.read().await;

        match channels.get(tournament_id) {
            Some(sender) => match sender.send(event) {
                Ok(receiver_count) => {
                    debug!(
                        tournament_id = %tournament_id,
                        receivers = receiver_count,
                        "Tournament event emitted"
                    );
                }
                Err(_) => {
                    debug!(tournament_id = %tournament_id, "Tournament event emitted with no receivers");
                }
            },
            None => {
                debug!(tournament_id = %tournament_id, "No live subscribers, dropping event");
            }
        }
    }

    /// Subscribe to events for a tournament
    pub async fn subscribe(&self, tournament_id: &str) -> broadcast::Receiver<TournamentEvent> {
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(tournament_id) {
                return sender.subscribe();
            }
        }

        debug!(tournament_id = %tournament_id, "Creating new tournament channel for subscription");
        let mut channels = self.channels.write().await;
        channels
            .entry(tournament_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }
}
