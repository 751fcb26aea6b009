//! Completion events broadcast to subscribers.

use std::sync::mpsc;

use crate::context::Controller;

/// Fired once per successful operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Login finished. Carries the resolved controller, or `None` when the
    /// account has no hub.
    Login(Option<Controller>),
    /// Logout finished; the session context is gone.
    Logout,
}

/// Fan-out to every live subscriber. Dropped receivers are pruned on the next emit.
#[derive(Default)]
pub(crate) struct EventBus {
    senders: Vec<mpsc::Sender<SessionEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> mpsc::Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    pub fn emit(&mut self, event: SessionEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
        log::debug!("Emitted {} to {} subscriber(s)", event_name(&event), self.senders.len());
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

fn event_name(event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::Login(_) => "login",
        SessionEvent::Logout => "logout",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let mut bus = EventBus::default();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.emit(SessionEvent::Logout);

        assert_eq!(a.try_recv().unwrap(), SessionEvent::Logout);
        assert_eq!(b.try_recv().unwrap(), SessionEvent::Logout);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut bus = EventBus::default();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(SessionEvent::Login(None));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.try_recv().unwrap(), SessionEvent::Login(None));
    }
}
