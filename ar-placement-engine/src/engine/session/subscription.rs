use crate::engine::session::{SessionEventKind, SubscriptionId, TrackingSession};
use crate::error::ArError;

/// An event listener registration that must be released on teardown.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    kind: SessionEventKind,
    active: bool,
}

impl Subscription {
    pub fn register(
        session: &mut dyn TrackingSession,
        kind: SessionEventKind,
    ) -> Result<Self, ArError> {
        let id = session.subscribe(kind)?;
        Ok(Self {
            id,
            kind,
            active: true,
        })
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn kind(&self) -> SessionEventKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Release the registration. Safe to call more than once.
    pub fn unsubscribe(&mut self, session: &mut dyn TrackingSession) {
        if self.active {
            session.unsubscribe(self.id);
            self.active = false;
        }
    }
}
