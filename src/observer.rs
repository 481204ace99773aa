//! Session observers
//!
//! The presentation layer listens to a session through `SessionObserver`.
//! Observers are invoked synchronously, in registration order, and never retried.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{info, warn};

use crate::ratio::Ratios;

/// Pluggable consumer of session notifications. Every hook defaults to a no-op.
pub trait SessionObserver {
    fn on_ratios_updated(&self, _ratios: &Ratios) {}

    fn on_next_round(&self, _year: i32) {}

    fn on_game_ended(&self, _ratios: &Ratios) {}

    fn on_error(&self, _title: &str, _message: &str) {}
}

impl<T: SessionObserver + ?Sized> SessionObserver for Arc<T> {
    fn on_ratios_updated(&self, ratios: &Ratios) {
        (**self).on_ratios_updated(ratios)
    }

    fn on_next_round(&self, year: i32) {
        (**self).on_next_round(year)
    }

    fn on_game_ended(&self, ratios: &Ratios) {
        (**self).on_game_ended(ratios)
    }

    fn on_error(&self, title: &str, message: &str) {
        (**self).on_error(title, message)
    }
}

/// One notification as delivered to observers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum SessionEvent {
    RatiosUpdated { ratios: Ratios },
    NextRound { year: i32 },
    GameEnded { ratios: Ratios },
    Error { title: String, message: String },
}

/// Observers in registration order
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn SessionObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn notify_ratios_updated(&self, ratios: &Ratios) {
        for observer in &self.observers {
            observer.on_ratios_updated(ratios);
        }
    }

    pub fn notify_next_round(&self, year: i32) {
        for observer in &self.observers {
            observer.on_next_round(year);
        }
    }

    pub fn notify_game_ended(&self, ratios: &Ratios) {
        for observer in &self.observers {
            observer.on_game_ended(ratios);
        }
    }

    pub fn notify_error(&self, title: &str, message: &str) {
        for observer in &self.observers {
            observer.on_error(title, message);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// No-op observer for testing.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Writes every notification to the tracing subscriber
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_ratios_updated(&self, ratios: &Ratios) {
        info!(
            attractiveness = ratios.attractiveness,
            success = ratios.success,
            insertion = ratios.insertion,
            satisfaction = ratios.satisfaction,
            "Ratios updated"
        );
    }

    fn on_next_round(&self, year: i32) {
        info!(year, "Next round");
    }

    fn on_game_ended(&self, ratios: &Ratios) {
        info!(
            attractiveness = ratios.attractiveness,
            success = ratios.success,
            insertion = ratios.insertion,
            satisfaction = ratios.satisfaction,
            "Game ended"
        );
    }

    fn on_error(&self, title: &str, message: &str) {
        warn!(title, message, "Session reported an error");
    }
}

/// Keeps every notification in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, event: SessionEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SessionEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionObserver for RecordingObserver {
    fn on_ratios_updated(&self, ratios: &Ratios) {
        self.push(SessionEvent::RatiosUpdated { ratios: *ratios });
    }

    fn on_next_round(&self, year: i32) {
        self.push(SessionEvent::NextRound { year });
    }

    fn on_game_ended(&self, ratios: &Ratios) {
        self.push(SessionEvent::GameEnded { ratios: *ratios });
    }

    fn on_error(&self, title: &str, message: &str) {
        self.push(SessionEvent::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}
