//! Single-slot frame hand-off between acquisition and processing.
//!
//! The acquisition side publishes complete frames; the processing side takes
//! them one at a time. The slot holds at most one frame and a newer frame
//! replaces an unconsumed older one (latest-frame-wins), so a slow consumer
//! never builds up a queue of stale camera frames. A frame already taken is
//! never dropped mid-process.

use std::sync::{Condvar, Mutex};

pub struct FrameMailbox<T> {
    slot: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T> FrameMailbox<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Put a frame into the slot, replacing any unconsumed one.
    ///
    /// Returns the frame that was displaced, if any.
    pub fn publish(&self, frame: T) -> Option<T> {
        let mut slot = self.slot.lock().expect("mailbox lock poisoned");
        let displaced = slot.replace(frame);
        self.ready.notify_one();
        displaced
    }

    /// Take the pending frame without blocking.
    pub fn try_take(&self) -> Option<T> {
        self.slot.lock().expect("mailbox lock poisoned").take()
    }

    /// Block until a frame is available and take it.
    pub fn take(&self) -> T {
        let mut slot = self.slot.lock().expect("mailbox lock poisoned");
        loop {
            if let Some(frame) = slot.take() {
                return frame;
            }
            slot = self.ready.wait(slot).expect("mailbox lock poisoned");
        }
    }
}

impl<T> Default for FrameMailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
