//=========================================================================
// Pending Results
//=========================================================================
//
// Single-shot asynchronous results for bridge calls.
//
// Architecture:
//   engine side: Completer<T>::complete(result)  ─┐
//                                                  │ bounded(1) channel
//   caller side: Pending<T>::try_take() / wait() ◄─┘
//
// Dropping the completer without completing resolves the pending value to
// `BridgeError::Disconnected`. Dropping the pending value discards the
// result when it arrives.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, RecvError, Sender, TryRecvError};
use log::error;

//=== Internal Dependencies ===============================================

use super::interface::BridgeError;

//=== Channel Construction ================================================

/// Creates a connected completer / pending pair.
pub fn channel<T>() -> (Completer<T>, Pending<T>) {
    let (sender, receiver) = bounded(1);
    (Completer { sender }, Pending { receiver })
}

//=== Completer ===========================================================

/// Write half of a pending result. Consumed on completion.
#[derive(Debug)]
pub struct Completer<T> {
    sender: Sender<Result<T, BridgeError>>,
}

impl<T> Completer<T> {
    /// Delivers the result. A dropped receiver is not an error.
    pub fn complete(self, result: Result<T, BridgeError>) {
        let _ = self.sender.send(result);
    }

    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn fail(self, error: BridgeError) {
        self.complete(Err(error));
    }
}

//=== PendingState ========================================================

/// Outcome of a non-blocking check.
#[derive(Debug, PartialEq)]
pub enum PendingState<T> {
    Waiting,
    Ready(Result<T, BridgeError>),
}

//=== Pending =============================================================

/// Read half of a pending result.
#[derive(Debug)]
pub struct Pending<T> {
    receiver: Receiver<Result<T, BridgeError>>,
}

impl<T> Pending<T> {
    /// An already resolved value.
    pub fn ready(result: Result<T, BridgeError>) -> Self {
        let (completer, pending) = channel();
        completer.complete(result);
        pending
    }

    /// Checks for the result without blocking.
    ///
    /// After `Ready` has been returned once, further calls report
    /// `Ready(Err(Disconnected))`.
    pub fn try_take(&self) -> PendingState<T> {
        match self.receiver.try_recv() {
            Ok(result) => PendingState::Ready(result),
            Err(TryRecvError::Empty) => PendingState::Waiting,
            Err(TryRecvError::Disconnected) => PendingState::Ready(Err(BridgeError::Disconnected)),
        }
    }

    /// Blocks until the result arrives. Never call this from the tick.
    pub fn wait(self) -> Result<T, BridgeError> {
        match self.receiver.recv() {
            Ok(result) => result,
            Err(RecvError) => Err(BridgeError::Disconnected),
        }
    }
}

impl Pending<bool> {
    /// Blocks for a boolean command result, mapping failures to `false`.
    pub fn wait_succeeded(self) -> bool {
        match self.wait() {
            Ok(succeeded) => succeeded,
            Err(e) => {
                error!(target: "bridge", "Engine command failed: {}", e);
                false
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn waiting_until_completed() {
        let (completer, pending) = channel::<u32>();
        assert_eq!(pending.try_take(), PendingState::Waiting);

        completer.succeed(7);
        assert_eq!(pending.try_take(), PendingState::Ready(Ok(7)));
    }

    #[test]
    fn dropped_completer_is_disconnected() {
        let (completer, pending) = channel::<u32>();
        drop(completer);

        assert_eq!(pending.try_take(), PendingState::Ready(Err(BridgeError::Disconnected)));
    }

    #[test]
    fn ready_resolves_immediately() {
        let pending = Pending::ready(Ok("done"));
        assert_eq!(pending.wait(), Ok("done"));
    }

    #[test]
    fn wait_blocks_for_other_thread() {
        let (completer, pending) = channel::<bool>();
        let handle = thread::spawn(move || completer.succeed(true));

        assert!(pending.wait_succeeded());
        handle.join().unwrap();
    }

    #[test]
    fn wait_succeeded_maps_errors_to_false() {
        let rejected = Pending::<bool>::ready(Err(BridgeError::Rejected {
            code: "SAVE_ERROR".into(),
            message: "disk full".into(),
        }));
        assert!(!rejected.wait_succeeded());

        let (completer, pending) = channel::<bool>();
        drop(completer);
        assert!(!pending.wait_succeeded());
    }

    #[test]
    fn completing_after_drop_is_silent() {
        let (completer, pending) = channel::<u32>();
        drop(pending);
        completer.succeed(1);
    }
}
