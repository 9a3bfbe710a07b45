//! Animation loop - one task that reposts itself via requestAnimationFrame
//!
//! Each run gets an id. A callback only reposts while its id is still the
//! current one, so stop-then-start never leaves two chains running.

use std::cell::Cell;

#[derive(Debug, Default)]
pub struct LoopControl {
    current: Cell<Option<u64>>,
    next_id: Cell<u64>,
    /// Outstanding animation frame request
    handle: Cell<Option<i32>>,
}

impl LoopControl {
    /// Begin a new run, `None` if one is already going
    pub fn start(&self) -> Option<u64> {
        if self.current.get().is_some() {
            return None;
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.current.set(Some(id));
        Some(id)
    }

    /// End the current run; returns the request to cancel, if any
    pub fn stop(&self) -> Option<i32> {
        self.current.set(None);
        self.handle.take()
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.current.get() == Some(id)
    }

    pub fn is_running(&self) -> bool {
        self.current.get().is_some()
    }

    pub fn set_handle(&self, handle: i32) {
        self.handle.set(Some(handle));
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::AnimationLoop;

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing::warn;
    use wasm_bindgen::prelude::*;

    use super::LoopControl;
    use crate::error::js_error_message;

    struct LoopState {
        control: LoopControl,
        tick: RefCell<Option<Box<dyn FnMut(f64)>>>,
    }

    #[derive(Clone)]
    pub struct AnimationLoop {
        state: Rc<LoopState>,
    }

    impl Default for AnimationLoop {
        fn default() -> Self {
            Self {
                state: Rc::new(LoopState {
                    control: LoopControl::default(),
                    tick: RefCell::new(None),
                }),
            }
        }
    }

    impl AnimationLoop {
        pub fn is_running(&self) -> bool {
            self.state.control.is_running()
        }

        /// Run `tick(timestamp_ms)` once per display refresh until `stop`
        pub fn start(&self, tick: impl FnMut(f64) + 'static) {
            let Some(id) = self.state.control.start() else {
                return;
            };
            *self.state.tick.borrow_mut() = Some(Box::new(tick));
            schedule(Rc::clone(&self.state), id);
        }

        pub fn stop(&self) {
            if let Some(handle) = self.state.control.stop() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            // Drops the tick's captures (and any cycle through them)
            if let Ok(mut tick) = self.state.tick.try_borrow_mut() {
                tick.take();
            }
        }
    }

    fn schedule(state: Rc<LoopState>, id: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = Rc::clone(&state);
        let frame = Closure::once_into_js(move |timestamp: f64| {
            if !next.control.is_current(id) {
                return;
            }
            if let Ok(mut tick) = next.tick.try_borrow_mut() {
                if let Some(tick) = tick.as_mut() {
                    tick(timestamp);
                }
            }
            // Checked again: the tick may have stopped the loop
            if next.control.is_current(id) {
                schedule(next, id);
            }
        });

        match window.request_animation_frame(frame.unchecked_ref()) {
            Ok(handle) => state.control.set_handle(handle),
            Err(e) => warn!("⚠️ requestAnimationFrame failed: {}", js_error_message(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_run_at_a_time() {
        let control = LoopControl::default();
        let first = control.start().unwrap();
        assert!(control.start().is_none());
        assert!(control.is_current(first));
    }

    #[test]
    fn restart_invalidates_old_run() {
        let control = LoopControl::default();
        let first = control.start().unwrap();
        control.set_handle(7);
        assert_eq!(control.stop(), Some(7));
        assert_eq!(control.stop(), None);

        let second = control.start().unwrap();
        assert_ne!(first, second);
        assert!(!control.is_current(first));
        assert!(control.is_current(second));
    }
}
