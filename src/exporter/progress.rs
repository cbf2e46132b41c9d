//! Progress tracking for a running export job.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::broadcast;

use crate::types::Event;

/// Derives the job's progress percentage from settled-item counts and emits
/// [`Event::Progress`] as items settle.
///
/// An item is "settled" once its fetch has succeeded or failed; the
/// percentage reaches exactly 100 when the last item settles regardless of
/// how many failed. Item futures are driven on a single task, so settles are
/// sequential and emitted percentages are non-decreasing.
pub(super) struct ProgressTracker {
    total: usize,
    completed: AtomicUsize,
    event_tx: broadcast::Sender<Event>,
}

impl ProgressTracker {
    pub(super) fn new(total: usize, event_tx: broadcast::Sender<Event>) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            event_tx,
        }
    }

    /// Record one settled item (success or failure) and emit progress
    pub(super) fn item_settled(&self) -> u8 {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        let percent = percent_of(completed, self.total);
        self.event_tx
            .send(Event::Progress {
                completed,
                total: self.total,
                percent,
            })
            .ok();
        percent
    }

    /// Items settled so far
    pub(super) fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

/// floor(completed / total * 100), clamped to [0, 100]
///
/// Floor (not round) so that 100 is reported exactly when, and only when,
/// every item has settled. A job's total is nonzero by the time progress is
/// tracked (the empty-input guard runs first); zero is mapped to 100 so the
/// derivation stays total.
pub(super) fn percent_of(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed * 100 / total).min(100)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_floors_partial_progress() {
        assert_eq!(percent_of(0, 3), 0);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 66);
        assert_eq!(percent_of(3, 3), 100);
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(percent_of(5, 3), 100);
        assert_eq!(percent_of(0, 0), 100);
    }

    #[test]
    fn percent_stays_below_100_until_done() {
        // 199 of 200 must not report 100
        assert_eq!(percent_of(199, 200), 99);
    }
}
