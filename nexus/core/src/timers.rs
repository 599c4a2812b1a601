//! Timer Set
//!
//! An owned set of cancellable timers running on a virtual clock. The boot
//! sequence never touches wall-clock time directly: callers move the clock
//! forward and the set hands back due timers in deadline order.
//!
//! Intervals are rescheduled at `deadline + period`, so a late `advance`
//! catches up on every missed tick instead of drifting. Deadlines past the
//! end of representable time are never reached: an interval whose next
//! deadline would overflow is dropped.

use std::collections::BTreeMap;
use std::time::Duration;

/// Shortest interval period; zero periods are bumped to this
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// What a timer drives when it fires
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Loading progress tick
    Progress,
    /// One-shot delay between 100% and the typewriter starting
    Settle,
    /// Typewriter tick
    Typing,
    /// Cursor blink
    Cursor,
    /// Glitch roll
    Glitch,
    /// One-shot revert of the displayed glitch
    GlitchRevert,
}

/// Handle returned when scheduling a timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug)]
enum Repeat {
    Once,
    Every(Duration),
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    kind: TimerKind,
    deadline: Duration,
    repeat: Repeat,
}

/// A timer that came due
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    /// Virtual time the timer was due at
    pub deadline: Duration,
}

/// Owned set of cancellable interval and timeout timers
///
/// The set only ever holds a handful of timers, so lookups scan the map
/// instead of keeping a separate priority queue in sync.
#[derive(Debug, Default)]
pub struct TimerSet {
    /// Live timers; ids grow monotonically so map order is scheduling order
    timers: BTreeMap<TimerId, Timer>,
    /// Current virtual time
    now: Duration,
    next_id: u64,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a repeating timer whose first tick is one period from now
    ///
    /// A zero period would fire forever within a single advance, so it is
    /// bumped to one millisecond.
    pub fn schedule_interval(&mut self, kind: TimerKind, period: Duration) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.insert(kind, period, Repeat::Every(period))
    }

    /// Schedule a one-shot timer
    pub fn schedule_timeout(&mut self, kind: TimerKind, delay: Duration) -> TimerId {
        self.insert(kind, delay, Repeat::Once)
    }

    fn insert(&mut self, kind: TimerKind, delay: Duration, repeat: Repeat) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let deadline = self.now.saturating_add(delay);
        self.timers.insert(
            id,
            Timer {
                kind,
                deadline,
                repeat,
            },
        );

        tracing::trace!(?kind, ?id, ?deadline, "Timer scheduled");
        id
    }

    /// Cancel a single timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        let count = self.timers.len();
        self.timers.clear();
        tracing::debug!(cancelled = count, "All timers cancelled");
    }

    /// Deadline of the earliest live timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|t| t.deadline).min()
    }

    /// Pop the earliest timer due at or before `until`
    ///
    /// Ties go to the timer scheduled first. The clock moves to the fired
    /// timer's deadline; intervals get their next deadline before returning.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired> {
        let (&id, &timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(id, t)| (t.deadline, **id))?;

        self.now = self.now.max(timer.deadline);

        match timer.repeat {
            Repeat::Every(period) => match timer.deadline.checked_add(period) {
                Some(deadline) => {
                    self.timers.insert(id, Timer { deadline, ..timer });
                }
                None => {
                    self.timers.remove(&id);
                }
            },
            Repeat::Once => {
                self.timers.remove(&id);
            }
        }

        Some(Fired {
            id,
            kind: timer.kind,
            deadline: timer.deadline,
        })
    }

    /// Push every interval due at or before `until` to its first deadline
    /// after `until`, without firing it
    ///
    /// Timeouts are left alone. Returns the number of ticks skipped.
    pub fn skip_missed(&mut self, until: Duration) -> u64 {
        let mut skipped = 0u64;
        let mut overflowed = Vec::new();

        for (&id, timer) in self.timers.iter_mut() {
            let Repeat::Every(period) = timer.repeat else {
                continue;
            };
            if timer.deadline > until {
                continue;
            }

            let missed = (until - timer.deadline).as_nanos() / period.as_nanos() + 1;
            skipped = skipped.saturating_add(u64::try_from(missed).unwrap_or(u64::MAX));

            let next = missed
                .checked_mul(period.as_nanos())
                .and_then(duration_from_nanos)
                .and_then(|step| timer.deadline.checked_add(step));
            match next {
                Some(deadline) => timer.deadline = deadline,
                None => overflowed.push(id),
            }
        }

        for id in overflowed {
            self.timers.remove(&id);
        }
        skipped
    }

    /// Move the clock forward without firing anything
    ///
    /// Callers drain `pop_due` first; the clock never moves backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Whether a timer of this kind is pending
    pub fn contains_kind(&self, kind: TimerKind) -> bool {
        self.timers.values().any(|t| t.kind == kind)
    }
}

fn duration_from_nanos(nanos: u128) -> Option<Duration> {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).ok()?;
    Some(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_interval_fires_every_period() {
        let mut timers = TimerSet::new();
        timers.schedule_interval(TimerKind::Progress, ms(100));

        let mut fired = Vec::new();
        while let Some(f) = timers.pop_due(ms(350)) {
            fired.push(f.deadline);
        }

        assert_eq!(fired, vec![ms(100), ms(200), ms(300)]);
        assert_eq!(timers.next_deadline(), Some(ms(400)));
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut timers = TimerSet::new();
        timers.schedule_timeout(TimerKind::Settle, ms(500));

        assert!(timers.pop_due(ms(499)).is_none());
        let fired = timers.pop_due(ms(500)).unwrap();
        assert_eq!(fired.kind, TimerKind::Settle);
        assert!(timers.pop_due(ms(10_000)).is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_deadline_order_across_kinds() {
        let mut timers = TimerSet::new();
        timers.schedule_interval(TimerKind::Cursor, ms(530));
        timers.schedule_interval(TimerKind::Typing, ms(50));
        timers.schedule_interval(TimerKind::Glitch, ms(2000));

        let mut last = Duration::ZERO;
        while let Some(f) = timers.pop_due(ms(2000)) {
            assert!(f.deadline >= last);
            last = f.deadline;
        }
        assert_eq!(last, ms(2000));
    }

    #[test]
    fn test_equal_deadlines_fire_in_scheduling_order() {
        let mut timers = TimerSet::new();
        let first = timers.schedule_timeout(TimerKind::Settle, ms(10));
        let second = timers.schedule_timeout(TimerKind::GlitchRevert, ms(10));

        assert_eq!(timers.pop_due(ms(10)).unwrap().id, first);
        assert_eq!(timers.pop_due(ms(10)).unwrap().id, second);
    }

    #[test]
    fn test_cancel_single_timer() {
        let mut timers = TimerSet::new();
        let id = timers.schedule_interval(TimerKind::Typing, ms(50));
        timers.schedule_interval(TimerKind::Cursor, ms(530));

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(!timers.contains_kind(TimerKind::Typing));

        let fired = timers.pop_due(ms(600)).unwrap();
        assert_eq!(fired.kind, TimerKind::Cursor);
    }

    #[test]
    fn test_cancel_all_leaves_nothing_due() {
        let mut timers = TimerSet::new();
        timers.schedule_interval(TimerKind::Progress, ms(100));
        timers.schedule_interval(TimerKind::Glitch, ms(2000));
        timers.schedule_timeout(TimerKind::GlitchRevert, ms(100));

        timers.cancel_all();

        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
        assert!(timers.pop_due(Duration::from_secs(3600)).is_none());
    }

    #[test]
    fn test_zero_period_interval_is_bumped() {
        let mut timers = TimerSet::new();
        timers.schedule_interval(TimerKind::Cursor, Duration::ZERO);

        let mut count = 0;
        while timers.pop_due(ms(5)).is_some() {
            count += 1;
        }
        assert_eq!(count, 5);
    }

    #[test]
    fn test_interval_dropped_at_end_of_time() {
        let mut timers = TimerSet::new();
        timers.set_now(Duration::MAX - ms(150));
        timers.schedule_interval(TimerKind::Cursor, ms(100));

        assert!(timers.pop_due(Duration::MAX).is_some());
        assert!(timers.pop_due(Duration::MAX).is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_timeout_saturates_instead_of_overflowing() {
        let mut timers = TimerSet::new();
        timers.set_now(Duration::MAX - ms(10));
        timers.schedule_timeout(TimerKind::Settle, ms(500));

        assert_eq!(timers.next_deadline(), Some(Duration::MAX));
    }

    #[test]
    fn test_skip_missed_moves_intervals_past_target() {
        let mut timers = TimerSet::new();
        timers.schedule_interval(TimerKind::Cursor, ms(100));
        timers.schedule_timeout(TimerKind::GlitchRevert, ms(50));

        let skipped = timers.skip_missed(ms(1_000));

        // ticks at 100, 200, ..., 1000
        assert_eq!(skipped, 10);
        let fired = timers.pop_due(ms(1_000)).unwrap();
        assert_eq!(fired.kind, TimerKind::GlitchRevert);
        assert!(timers.pop_due(ms(1_000)).is_none());
        assert_eq!(timers.next_deadline(), Some(ms(1_100)));
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut timers = TimerSet::new();
        timers.set_now(ms(300));
        timers.set_now(ms(100));
        assert_eq!(timers.now(), ms(300));
    }
}
