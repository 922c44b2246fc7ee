use std::sync::mpsc::{self, Receiver, Sender};

/// Changes published by [`super::PaletteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEvent {
    Added { id: String },
    Removed { id: String },
    Renamed { id: String },
    CurrentChanged { id: String },
    ColorsChanged { id: String },
}

/// Fan-out of events to every live subscriber.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<PaletteEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> Receiver<PaletteEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to everyone; subscribers whose receiver is gone are dropped.
    pub fn publish(&mut self, event: PaletteEvent) {
        tracing::trace!(?event, "publishing palette event");
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
