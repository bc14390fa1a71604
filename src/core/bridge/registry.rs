//=========================================================================
// Event Registry
//=========================================================================
//
// Typed subscription registry for engine events.
//
// Architecture:
//   subscribe::<P>(handler) → BTreeMap<EngineEventKind, Vec<Subscription>>
//                                      ↓
//   dispatch(&EngineEvent) ──► handlers of event.kind(), in subscription order
//
// Every subscription gets its own handle, so removing one never touches the
// others registered for the same kind. The map is ordered so bulk removal
// walks kinds deterministically.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::event::{EngineEvent, EngineEventKind, EventPayload};

//=== SubscriptionHandle ==================================================

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    kind: EngineEventKind,
    id: u64,
}

impl SubscriptionHandle {
    pub fn kind(&self) -> EngineEventKind {
        self.kind
    }
}

//=== Subscription ========================================================

type Handler = Box<dyn FnMut(&EngineEvent)>;

struct Subscription {
    id: u64,
    handler: Handler,
}

//=== EventRegistry =======================================================

/// Event kind → ordered handler list.
#[derive(Default)]
pub struct EventRegistry {
    subscriptions: BTreeMap<EngineEventKind, Vec<Subscription>>,
    next_id: u64,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscription -----------------------------------------------------

    /// Registers `handler` for every event carrying payload `P`.
    pub fn subscribe<P, F>(&mut self, mut handler: F) -> SubscriptionHandle
    where
        P: EventPayload,
        F: FnMut(&P) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        let wrapped: Handler = Box::new(move |event: &EngineEvent| {
            if let Some(payload) = P::extract(event) {
                handler(payload);
            }
        });

        self.subscriptions
            .entry(P::KIND)
            .or_default()
            .push(Subscription { id, handler: wrapped });

        debug!(target: "bridge", "Subscribed to {} (#{})", P::KIND, id);
        SubscriptionHandle { kind: P::KIND, id }
    }

    /// Removes one subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let Some(list) = self.subscriptions.get_mut(&handle.kind) else {
            return false;
        };

        let before = list.len();
        list.retain(|sub| sub.id != handle.id);
        let removed = list.len() < before;

        if list.is_empty() {
            self.subscriptions.remove(&handle.kind);
        }
        removed
    }

    /// Removes every subscription for `kind`. Returns how many were removed.
    pub fn unsubscribe_kind(&mut self, kind: EngineEventKind) -> usize {
        self.subscriptions.remove(&kind).map_or(0, |list| list.len())
    }

    /// Removes everything. Returns how many subscriptions were removed.
    pub fn unsubscribe_all(&mut self) -> usize {
        let mut removed = 0;
        while let Some((kind, list)) = self.subscriptions.pop_first() {
            debug!(target: "bridge", "Unsubscribed {} handler(s) from {}", list.len(), kind);
            removed += list.len();
        }
        removed
    }

    //--- Dispatch ---------------------------------------------------------

    /// Invokes the handlers registered for the event's kind, in the order
    /// they subscribed. Returns how many ran.
    pub fn dispatch(&mut self, event: &EngineEvent) -> usize {
        let Some(list) = self.subscriptions.get_mut(&event.kind()) else {
            return 0;
        };

        for sub in list.iter_mut() {
            (sub.handler)(event);
        }
        list.len()
    }

    //--- Queries ----------------------------------------------------------

    pub fn subscriber_count(&self, kind: EngineEventKind) -> usize {
        self.subscriptions.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<_, _> = self
            .subscriptions
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventRegistry").field("subscriptions", &counts).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
