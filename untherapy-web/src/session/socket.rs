//! Browser WebSocket transport and reconnect scheduling
//!
//! Handlers hold a `Weak<Session>` so an open socket never keeps the
//! session alive. Their closures are handed to the JS garbage collector.

use std::rc::{Rc, Weak};

use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::client::{Session, SessionAction, Transport, TransportEvent};
use crate::error::{js_error_message, ConnectionError};

pub struct BrowserSocket {
    ws: WebSocket,
}

impl Transport for BrowserSocket {
    fn send(&self, frame: &str) -> Result<(), ConnectionError> {
        self.ws
            .send_with_str(frame)
            .map_err(|e| ConnectionError::Send(js_error_message(&e)))
    }

    fn close(&self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        if let Err(e) = self.ws.close() {
            warn!("⚠️ Socket close failed: {}", js_error_message(&e));
        }
    }
}

/// Open a socket to `url` unless one is already open or opening
pub fn connect(session: &Rc<Session>, url: &str) {
    let Some(generation) = session.begin_connect() else {
        return;
    };
    info!("🔌 Connecting to {url}");

    match open(Rc::downgrade(session), url, generation) {
        Ok(socket) => session.attach(generation, Box::new(socket)),
        Err(e) => {
            warn!("🔄 Connection failed: {e}");
            let action = session.handle_event(generation, TransportEvent::Closed, js_sys::Date::now());
            follow_up(session, action, url);
        }
    }
}

/// Deliver one socket event to the session and act on the result
fn dispatch(session: &Weak<Session>, url: &str, generation: u64, event: TransportEvent) {
    let Some(session) = session.upgrade() else {
        return;
    };
    let action = session.handle_event(generation, event, js_sys::Date::now());
    follow_up(&session, action, url);
}

fn follow_up(session: &Rc<Session>, action: SessionAction, url: &str) {
    let SessionAction::ScheduleRetry { delay_ms, token } = action else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };

    let weak = Rc::downgrade(session);
    let url = url.to_string();
    let retry = Closure::once_into_js(move || {
        if let Some(session) = weak.upgrade() {
            if session.retry_due(token) {
                connect(&session, &url);
            }
        }
    });

    let scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        retry.unchecked_ref(),
        delay_ms as i32,
    );
    if let Err(e) = scheduled {
        warn!("⚠️ Could not schedule reconnect: {}", js_error_message(&e));
    }
}

fn open(session: Weak<Session>, url: &str, generation: u64) -> Result<BrowserSocket, ConnectionError> {
    let ws = WebSocket::new(url).map_err(|e| ConnectionError::Open(js_error_message(&e)))?;

    let (weak, target) = (session.clone(), url.to_string());
    let on_open = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        dispatch(&weak, &target, generation, TransportEvent::Opened);
    });

    let (weak, target) = (session.clone(), url.to_string());
    let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        match event.data().as_string() {
            Some(frame) => dispatch(&weak, &target, generation, TransportEvent::Message(frame)),
            None => warn!("⚠️ Ignoring non-text frame"),
        }
    });

    let (weak, target) = (session.clone(), url.to_string());
    let on_error = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let message = format!("{} event", event.type_());
        dispatch(&weak, &target, generation, TransportEvent::Error(message));
    });

    let (weak, target) = (session, url.to_string());
    let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |_: CloseEvent| {
        dispatch(&weak, &target, generation, TransportEvent::Closed);
    });

    ws.set_onopen(Some(on_open.into_js_value().unchecked_ref()));
    ws.set_onmessage(Some(on_message.into_js_value().unchecked_ref()));
    ws.set_onerror(Some(on_error.into_js_value().unchecked_ref()));
    ws.set_onclose(Some(on_close.into_js_value().unchecked_ref()));

    Ok(BrowserSocket { ws })
}
