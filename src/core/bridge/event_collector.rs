//=========================================================================
// Event Collector
//=========================================================================
//
// Engine event collector with bounded draining and disconnect detection.
//
// Architecture:
//   Receiver<EngineEvent> → collect_frame() → events → registry.dispatch
//
// Bounded draining keeps a chatty engine from stalling the tick; whatever
// is left over is picked up next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::event::EngineEvent;

//=== Constants ===========================================================

pub(crate) const MAX_EVENTS_PER_FRAME: usize = 100;

//=== EventCollector ======================================================

/// Collects engine events pushed since the last frame.
#[derive(Debug)]
pub(crate) struct EventCollector {
    receiver: Receiver<EngineEvent>,
    events: Vec<EngineEvent>,
    disconnected: bool,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<EngineEvent>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(8),
            disconnected: false,
        }
    }

    /// Drains pending events (bounded). Returns how many were collected.
    pub(crate) fn collect_frame(&mut self) -> usize {
        self.events.clear();

        while self.events.len() < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => self.events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        warn!(target: "bridge", "Engine event channel disconnected");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }

        if self.events.len() >= MAX_EVENTS_PER_FRAME {
            warn!(
                target: "bridge",
                "Engine event backlog: drained {} events this frame",
                self.events.len()
            );
        }

        self.events.len()
    }

    /// Takes the collected events, leaving an empty vec.
    pub(crate) fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bridge::event::{GameOver, ScoreChanged};
    use crossbeam_channel::unbounded;

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<EngineEvent>();
        let mut collector = EventCollector::new(rx);

        assert_eq!(collector.collect_frame(), 0);
        assert!(collector.take_events().is_empty());
        assert!(!collector.is_disconnected());
    }

    #[test]
    fn collect_keeps_arrival_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(ScoreChanged { score: 10 }.into()).unwrap();
        tx.send(GameOver { final_score: 10, reason: "fell".into() }.into()).unwrap();

        assert_eq!(collector.collect_frame(), 2);
        let events = collector.take_events();
        assert_eq!(events[0], ScoreChanged { score: 10 }.into());
        assert_eq!(events[1], GameOver { final_score: 10, reason: "fell".into() }.into());
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for score in 0..(MAX_EVENTS_PER_FRAME as i64 + 5) {
            tx.send(ScoreChanged { score }.into()).unwrap();
        }

        assert_eq!(collector.collect_frame(), MAX_EVENTS_PER_FRAME);
        assert_eq!(collector.collect_frame(), 5);
    }

    #[test]
    fn collect_reports_disconnect_after_draining() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(ScoreChanged { score: 1 }.into()).unwrap();
        drop(tx);

        assert_eq!(collector.collect_frame(), 1);
        assert!(collector.is_disconnected());
        assert_eq!(collector.collect_frame(), 0);
    }
}
