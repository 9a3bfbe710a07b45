//! Session start - wait for the socket to report connected, bounded

use std::future::Future;

/// Poll `ready` every `poll_ms` until it holds or `timeout_ms` has passed.
///
/// `sleep` is injected so the wait can run on the browser timer or in a
/// test executor. Returns whether `ready` held before the deadline.
pub async fn wait_until<R, S, F>(mut ready: R, timeout_ms: u32, poll_ms: u32, mut sleep: S) -> bool
where
    R: FnMut() -> bool,
    S: FnMut(u32) -> F,
    F: Future<Output = ()>,
{
    let poll_ms = poll_ms.max(1);
    let mut waited = 0u32;
    loop {
        if ready() {
            return true;
        }
        if waited >= timeout_ms {
            return false;
        }
        sleep(poll_ms).await;
        waited = waited.saturating_add(poll_ms);
    }
}

/// Browser timer as a future
#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().is_some_and(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
                .is_ok()
        });
        // Without a timer, resolve now so the caller's deadline still advances
        if !scheduled {
            let _ = resolve.call0(&wasm_bindgen::JsValue::UNDEFINED);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
