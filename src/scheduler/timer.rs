use std::time::{Duration, Instant};

pub const TICK: Duration = Duration::from_secs(1);

/// Shortest period a [`Ticker`] runs at. Shorter periods are clamped up to it.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum TimerKind {
	Countdown,
	Drawing,
	Intermission,
}

/// A one-second repeating timer owned by exactly one phase. Cancelling consumes it, so a phase can
/// never hold two.
#[derive(Debug, PartialEq, Eq)]
pub struct Timer {
	kind: TimerKind,
	generation: u64,
}

impl Timer {
	pub(super) fn arm(kind: TimerKind, generation: u64) -> Self {
		Self { kind, generation }
	}

	pub fn kind(&self) -> TimerKind {
		self.kind
	}

	/// Distinguishes successive arms of the same kind.
	pub fn generation(&self) -> u64 {
		self.generation
	}
}

/// Converts wall-clock time into whole ticks for a host driving the scheduler from a real clock.
#[derive(Clone, Debug)]
pub struct Ticker {
	period: Duration,
	next: Instant,
}

impl Ticker {
	pub fn new(now: Instant) -> Self {
		Self::with_period(now, TICK)
	}

	pub fn with_period(now: Instant, period: Duration) -> Self {
		let period = period.max(MIN_TICK_PERIOD);
		Self {
			period,
			next: now + period,
		}
	}

	/// Whole periods elapsed since the last poll. Late polls catch up.
	pub fn poll(&mut self, now: Instant) -> u32 {
		let mut ticks = 0;
		while now >= self.next {
			self.next += self.period;
			ticks += 1;
		}
		ticks
	}

	pub fn until_next(&self, now: Instant) -> Duration {
		self.next.saturating_duration_since(now)
	}

	pub fn restart(&mut self, now: Instant) {
		self.next = now + self.period;
	}
}
