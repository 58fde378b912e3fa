use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;

use crate::errors::{RegionFinderError, RegionFinderResult};

/// Lifecycle of one region search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running { chromosome: String },
    Succeeded,
    Cancelled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    State(RunState),
    /// `done` never decreases within a run and ends equal to `total`.
    Progress { done: u64, total: u64 },
}

///
/// Receiver of progress events. Reporting is advisory: a sink that can no
/// longer deliver simply drops events.
///
pub trait ProgressSink {
    fn report(&self, event: ProgressEvent);
}

impl ProgressSink for Sender<ProgressEvent> {
    fn report(&self, event: ProgressEvent) {
        let _ = self.send(event);
    }
}

/// Sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Adapts a closure into a [ProgressSink].
pub struct ProgressCallback<F>(pub F);

impl<F: Fn(ProgressEvent)> ProgressSink for ProgressCallback<F> {
    fn report(&self, event: ProgressEvent) {
        (self.0)(event)
    }
}

///
/// Shared flag polled by a running search. Cloning shares the flag.
///
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once [CancellationToken::cancel] has been called.
    pub fn check(&self) -> RegionFinderResult<()> {
        if self.is_cancelled() {
            Err(RegionFinderError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Monotonic unit counter that forwards every change to a sink.
pub(crate) struct ProgressCounter<'a> {
    done: u64,
    total: u64,
    sink: &'a dyn ProgressSink,
}

impl<'a> ProgressCounter<'a> {
    pub(crate) fn new(total: u64, sink: &'a dyn ProgressSink) -> Self {
        sink.report(ProgressEvent::Progress { done: 0, total });
        ProgressCounter {
            done: 0,
            total,
            sink,
        }
    }

    pub(crate) fn done(&self) -> u64 {
        self.done
    }

    pub(crate) fn advance(&mut self, units: u64) {
        self.advance_to(self.done + units);
    }

    /// Move forward to `target`, capped at the total. Never moves backward.
    pub(crate) fn advance_to(&mut self, target: u64) {
        let target = target.min(self.total);
        if target > self.done {
            self.done = target;
            self.sink.report(ProgressEvent::Progress {
                done: self.done,
                total: self.total,
            });
        }
    }

    pub(crate) fn state(&self, state: RunState) {
        self.sink.report(ProgressEvent::State(state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_counter_is_monotonic_and_capped() {
        let seen = RefCell::new(Vec::new());
        let sink = ProgressCallback(|e: ProgressEvent| {
            if let ProgressEvent::Progress { done, .. } = e {
                seen.borrow_mut().push(done);
            }
        });

        let mut counter = ProgressCounter::new(10, &sink);
        counter.advance(3);
        counter.advance_to(2);
        counter.advance_to(8);
        counter.advance(5);
        counter.advance(1);

        assert_eq!(counter.done(), 10);
        assert_eq!(*seen.borrow(), vec![0, 3, 8, 10]);
    }

    #[rstest]
    fn test_channel_sink() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.report(ProgressEvent::State(RunState::Succeeded));
        assert_eq!(rx.recv().unwrap(), ProgressEvent::State(RunState::Succeeded));

        // a closed channel is not an error
        drop(rx);
        tx.report(ProgressEvent::State(RunState::Idle));
    }

    #[rstest]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(token.check().is_ok());
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(RegionFinderError::Cancelled)));
    }
}
