//! Cancellable deferred tasks.
//!
//! The game never sleeps; it asks a [`Scheduler`] to call it back after a
//! delay with a [`TimerId`] and keeps the meaning of that id to itself. Two
//! schedulers exist: [`VirtualTimers`] (manual clock, used natively and in
//! tests) and `BrowserTimers` (`setTimeout` / `clearTimeout`, wasm only).

/// Opaque handle for one scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u32);

pub trait Scheduler {
    /// Arrange for the owner to be told about `id` after `delay_ms`.
    /// Returns false if the callback could not be armed; the owner then runs
    /// the task immediately.
    fn schedule(&mut self, id: TimerId, delay_ms: u32) -> bool;
    /// Drop a scheduled callback. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
    /// Called by the owner once `id` has been handled.
    fn completed(&mut self, _id: TimerId) {}
}

/// Manual clock. Nothing fires until [`VirtualTimers::pop_due`] is asked.
#[derive(Debug, Default)]
pub struct VirtualTimers {
    now_ms: u64,
    seq: u64,
    // (due, insertion order, id)
    queue: Vec<(u64, u64, TimerId)>,
}

impl VirtualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.queue.iter().any(|(_, _, t)| *t == id)
    }

    /// Remove the earliest timer due at or before `until`, moving the clock to
    /// its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: u64) -> Option<TimerId> {
        let (pos, &(due, _, id)) = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, (due, _, _))| *due <= until)
            .min_by_key(|(_, (due, seq, _))| (*due, *seq))?;
        self.queue.remove(pos);
        self.now_ms = self.now_ms.max(due);
        Some(id)
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl Scheduler for VirtualTimers {
    fn schedule(&mut self, id: TimerId, delay_ms: u32) -> bool {
        self.seq += 1;
        self.queue.push((self.now_ms + delay_ms as u64, self.seq, id));
        true
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.retain(|(_, _, t)| *t != id);
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTimers;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{Scheduler, TimerId};
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    /// `window.setTimeout` backed scheduler. `on_fire` runs on the JS event loop.
    pub struct BrowserTimers {
        handles: HashMap<TimerId, i32>,
        on_fire: Rc<dyn Fn(TimerId)>,
    }

    impl BrowserTimers {
        pub fn new(on_fire: impl Fn(TimerId) + 'static) -> Self {
            Self {
                handles: HashMap::new(),
                on_fire: Rc::new(on_fire),
            }
        }
    }

    impl Scheduler for BrowserTimers {
        fn schedule(&mut self, id: TimerId, delay_ms: u32) -> bool {
            let Some(win) = web_sys::window() else {
                log::warn!("no window for timer {id:?}");
                return false;
            };
            let on_fire = self.on_fire.clone();
            let cb = Closure::once_into_js(move || on_fire(id));
            match win.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.unchecked_ref(),
                delay_ms as i32,
            ) {
                Ok(handle) => {
                    self.handles.insert(id, handle);
                    true
                }
                Err(e) => {
                    log::warn!("setTimeout failed for {id:?}: {e:?}");
                    false
                }
            }
        }

        fn cancel(&mut self, id: TimerId) {
            if let Some(handle) = self.handles.remove(&id) {
                if let Some(win) = web_sys::window() {
                    win.clear_timeout_with_handle(handle);
                }
            }
        }

        fn completed(&mut self, id: TimerId) {
            self.handles.remove(&id);
        }
    }
}
