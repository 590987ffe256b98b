use std::cell::{Cell, RefCell};

/// A self-rescheduling callback plus the id of its pending request.
///
/// The callback reschedules itself through a handle to this loop, so the loop and the
/// callback keep each other alive until [`FrameLoop::stop`] takes the callback out.
pub struct FrameLoop<C> {
	callback: RefCell<Option<C>>,
	pending: Cell<Option<i32>>,
}

impl<C> Default for FrameLoop<C> {
	fn default() -> Self {
		Self {
			callback: RefCell::new(None),
			pending: Cell::new(None),
		}
	}
}

impl<C> FrameLoop<C> {
	pub fn is_running(&self) -> bool {
		self.callback.borrow().is_some()
	}

	pub fn start(&self, callback: C) {
		*self.callback.borrow_mut() = Some(callback);
	}

	/// Ask `request` to schedule the callback; remembers the returned id.
	/// Does nothing once stopped.
	pub fn schedule(&self, request: impl FnOnce(&C) -> Option<i32>) {
		if let Some(cb) = self.callback.borrow().as_ref() {
			self.pending.set(request(cb));
		}
	}

	/// Drop the callback and hand back the request still pending, for cancellation.
	pub fn stop(&self) -> Option<i32> {
		let callback = self.callback.borrow_mut().take();
		drop(callback);
		self.pending.take()
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::*;

	#[test]
	fn schedules_until_stopped() {
		let frames = FrameLoop::default();
		frames.start(|| ());
		assert!(frames.is_running());

		frames.schedule(|_| Some(7));
		assert_eq!(frames.stop(), Some(7));
		assert!(!frames.is_running());

		let mut asked = false;
		frames.schedule(|_| {
			asked = true;
			Some(8)
		});
		assert!(!asked);
		assert_eq!(frames.stop(), None);
	}

	#[test]
	fn stop_breaks_the_self_reference() {
		let frames: Rc<FrameLoop<Box<dyn Fn()>>> = Rc::new(FrameLoop::default());
		let inner = frames.clone();
		frames.start(Box::new(move || {
			inner.schedule(|_| Some(1));
		}));
		assert_eq!(Rc::strong_count(&frames), 2);

		frames.stop();
		assert_eq!(Rc::strong_count(&frames), 1);
	}

	#[test]
	fn stopped_loop_releases_captured_state() {
		let state = Rc::new(RefCell::new(Some(42)));
		let frames = FrameLoop::default();
		let captured = state.clone();
		frames.start(move || captured.borrow().is_some());
		assert_eq!(Rc::strong_count(&state), 2);

		frames.stop();
		assert_eq!(Rc::strong_count(&state), 1);
	}
}
