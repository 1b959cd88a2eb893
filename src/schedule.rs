//! Deferred callbacks for the UI thread.
//!
//! Every deferred action is paired with a [`Ticket`]. Scheduling again hands
//! out a newer ticket, and a callback whose ticket is no longer current does
//! nothing. The timers themselves are `gloo` timeouts held in a [`Deferred`]
//! slot, so replacing one also cancels it; the tickets cover a callback that
//! was already queued when the replacement happened.

use std::time::Duration;

use gloo::timers::callback::Timeout;

/// Identifies one scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out tickets; only the newest one is current.
#[derive(Clone, Debug, Default)]
pub struct Generation {
	current: u64,
}

impl Generation {
	/// Invalidates every earlier ticket and returns a new one.
	pub fn advance(&mut self) -> Ticket {
		self.current += 1;
		Ticket(self.current)
	}

	/// Invalidates every outstanding ticket without issuing a new one.
	pub fn invalidate(&mut self) {
		self.current += 1;
	}

	/// Whether `ticket` is the newest one handed out.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.current
	}
}

/// Trailing-edge debounce: of a burst of triggers only the last one settles.
#[derive(Clone, Debug)]
pub struct Debounce {
	quiet: Duration,
	generation: Generation,
	pending: bool,
}

impl Debounce {
	/// Creates a debounce that waits for `quiet` without triggers.
	pub fn new(quiet: Duration) -> Self {
		Self {
			quiet,
			generation: Generation::default(),
			pending: false,
		}
	}

	/// Length of the quiet window.
	pub fn quiet(&self) -> Duration {
		self.quiet
	}

	/// Records a trigger; the returned ticket must be settled once the quiet
	/// window has passed.
	pub fn trigger(&mut self) -> Ticket {
		self.pending = true;
		self.generation.advance()
	}

	/// Returns `true` exactly once, for the last ticket of a burst.
	pub fn settle(&mut self, ticket: Ticket) -> bool {
		if self.pending && self.generation.is_current(ticket) {
			self.pending = false;
			true
		} else {
			false
		}
	}

	/// Whether a trigger is waiting to settle.
	pub fn is_pending(&self) -> bool {
		self.pending
	}
}

/// Slot for at most one pending timeout.
#[derive(Default)]
pub struct Deferred {
	timeout: Option<Timeout>,
}

impl Deferred {
	/// Runs `callback` after `delay`, cancelling whatever was pending.
	pub fn schedule<F>(&mut self, delay: Duration, callback: F)
	where
		F: FnOnce() + 'static,
	{
		let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
		self.timeout = Some(Timeout::new(millis, callback));
	}

	/// Cancels the pending timeout, if any.
	pub fn cancel(&mut self) {
		// Dropping a gloo timeout clears it.
		self.timeout = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_the_last_trigger_of_a_burst_settles() {
		let mut debounce = Debounce::new(Duration::from_millis(250));
		let first = debounce.trigger();
		let second = debounce.trigger();
		let last = debounce.trigger();

		assert!(!debounce.settle(first));
		assert!(!debounce.settle(second));
		assert!(debounce.is_pending());
		assert!(debounce.settle(last));
		assert!(!debounce.is_pending());
	}

	#[test]
	fn a_ticket_settles_once() {
		let mut debounce = Debounce::new(Duration::from_millis(250));
		let ticket = debounce.trigger();
		assert!(debounce.settle(ticket));
		assert!(!debounce.settle(ticket));
	}

	#[test]
	fn a_new_burst_after_settling_starts_over() {
		let mut debounce = Debounce::new(Duration::from_millis(250));
		let ticket = debounce.trigger();
		assert!(debounce.settle(ticket));

		let stale = ticket;
		let fresh = debounce.trigger();
		assert!(!debounce.settle(stale));
		assert!(debounce.settle(fresh));
	}

	#[test]
	fn invalidate_retires_outstanding_tickets() {
		let mut generation = Generation::default();
		let ticket = generation.advance();
		generation.invalidate();
		assert!(!generation.is_current(ticket));
	}
}
