//! Session state machine - transport-agnostic connection, chat and emotion
//!
//! Every socket callback is tagged with the generation it was opened under.
//! `connect` and `disconnect` bump the generation, so events from a
//! superseded socket (and retries scheduled for it) are ignored.

use std::cell::{Cell, RefCell};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{debug, info, warn};

use super::backoff::ReconnectPolicy;
use super::protocol::{ClientEvent, ServerEvent};
use crate::error::ConnectionError;
use crate::types::{ChatMessage, EmotionVector};

/// Outbound half of a socket
pub trait Transport {
    fn send(&self, frame: &str) -> Result<(), ConnectionError>;
    fn close(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Socket lifecycle callbacks, as delivered by the transport
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Error(String),
    Closed,
}

/// Follow-up the owner of the socket has to perform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionAction {
    None,
    /// Call `retry_due(token)` after `delay_ms`, reconnect if it says so
    ScheduleRetry { delay_ms: u32, token: u64 },
}

pub struct Session {
    policy: ReconnectPolicy,
    state: Cell<ConnectionState>,
    generation: Cell<u64>,
    transport: RefCell<Option<Box<dyn Transport>>>,
    /// Failed connection attempts since the last successful open
    attempts: Cell<u32>,
    chat: RefCell<Vec<ChatMessage>>,
    emotion: Cell<Option<EmotionVector>>,
    emotion_revision: Cell<u64>,
}

impl Session {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: Cell::new(ConnectionState::Disconnected),
            generation: Cell::new(0),
            transport: RefCell::new(None),
            attempts: Cell::new(0),
            chat: RefCell::new(Vec::new()),
            emotion: Cell::new(None),
            emotion_revision: Cell::new(0),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn is_connected(&self) -> bool {
        self.state.get() == ConnectionState::Connected
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Start a new connection attempt.
    ///
    /// Returns the generation to tag the new socket's events with, or `None`
    /// when a connection is already open or opening.
    pub fn begin_connect(&self) -> Option<u64> {
        if self.state.get() != ConnectionState::Disconnected {
            return None;
        }
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.state.set(ConnectionState::Connecting);
        Some(generation)
    }

    /// Hand over the socket opened for `generation`
    pub fn attach(&self, generation: u64, transport: Box<dyn Transport>) {
        if generation != self.generation.get() {
            transport.close();
            return;
        }
        if let Some(old) = self.transport.borrow_mut().replace(transport) {
            old.close();
        }
    }

    /// Close the socket and forget all session data
    pub fn disconnect(&self) {
        self.generation.set(self.generation.get() + 1);
        let transport = self.transport.borrow_mut().take();
        if let Some(transport) = transport {
            transport.close();
        }
        if self.state.get() != ConnectionState::Disconnected {
            info!("❌ Disconnected from backend");
        }
        self.state.set(ConnectionState::Disconnected);
        self.attempts.set(0);
        self.chat.borrow_mut().clear();
        self.emotion.set(None);
        self.emotion_revision.set(self.emotion_revision.get() + 1);
    }

    /// Whether a retry scheduled with `token` should still reconnect
    pub fn retry_due(&self, token: u64) -> bool {
        token == self.generation.get() && self.state.get() == ConnectionState::Disconnected
    }

    pub fn handle_event(&self, generation: u64, event: TransportEvent, now_ms: f64) -> SessionAction {
        if generation != self.generation.get() {
            debug!("Ignoring {event:?} from stale socket {generation}");
            return SessionAction::None;
        }

        match event {
            TransportEvent::Opened => {
                info!("✅ Connected to UnTherapy backend");
                self.state.set(ConnectionState::Connected);
                self.attempts.set(0);
                SessionAction::None
            }
            TransportEvent::Message(frame) => {
                self.handle_frame(&frame, now_ms);
                SessionAction::None
            }
            TransportEvent::Error(message) => {
                warn!("⚠️ Socket error: {message}");
                SessionAction::None
            }
            TransportEvent::Closed => self.handle_close(generation),
        }
    }

    fn handle_close(&self, generation: u64) -> SessionAction {
        let previous = self.state.replace(ConnectionState::Disconnected);
        let transport = self.transport.borrow_mut().take();
        drop(transport);

        if previous == ConnectionState::Connected {
            info!("❌ Disconnected from backend");
            return SessionAction::None;
        }

        // Closed before it ever opened: a failed connection attempt
        let attempt = self.attempts.get() + 1;
        match self.policy.delay_for(attempt) {
            Some(delay_ms) => {
                self.attempts.set(attempt);
                warn!("🔄 Connection failed, retry {attempt} in {delay_ms}ms");
                SessionAction::ScheduleRetry {
                    delay_ms,
                    token: generation,
                }
            }
            None => {
                warn!("🔄 Connection failed, giving up after {} attempts", self.attempts.get());
                SessionAction::None
            }
        }
    }

    fn handle_frame(&self, frame: &str, now_ms: f64) {
        let event = match ServerEvent::parse(frame) {
            Ok(event) => event,
            Err(e) => {
                warn!("⚠️ Ignoring malformed frame: {e}");
                return;
            }
        };

        match event {
            ServerEvent::EmotionUpdate(emotion) => {
                self.emotion.set(Some(emotion));
                self.emotion_revision.set(self.emotion_revision.get() + 1);
            }
            ServerEvent::ChatMessage(message) => self.chat.borrow_mut().push(message),
            ServerEvent::AiResponse { content, emotion } => {
                if let Some(emotion) = emotion {
                    debug!("AI response tagged {emotion}");
                }
                self.chat
                    .borrow_mut()
                    .push(ChatMessage::from_ai(content, now_ms));
            }
        }
    }

    fn transmit(&self, event: &ClientEvent) -> Result<(), ConnectionError> {
        let frame = event
            .to_frame()
            .map_err(|e| ConnectionError::Send(e.to_string()))?;
        let transport = self.transport.borrow();
        let transport = transport.as_ref().ok_or(ConnectionError::NotConnected)?;
        transport.send(&frame)
    }

    /// Append a user message and send it. No-op while not connected.
    pub fn send_message(&self, text: &str, now_ms: f64) -> bool {
        if !self.is_connected() {
            debug!("Dropping message while offline");
            return false;
        }
        self.chat
            .borrow_mut()
            .push(ChatMessage::from_user(text, now_ms));

        let event = ClientEvent::UserMessage {
            content: text.to_string(),
            timestamp: now_ms,
        };
        if let Err(e) = self.transmit(&event) {
            warn!("⚠️ Failed to send message: {e}");
        }
        true
    }

    /// Send base64-encoded audio. No-op while not connected.
    pub fn send_audio(&self, audio: &[u8], now_ms: f64) -> bool {
        if !self.is_connected() {
            return false;
        }
        let event = ClientEvent::AudioData {
            audio: BASE64.encode(audio),
            timestamp: now_ms,
        };
        match self.transmit(&event) {
            Ok(()) => true,
            Err(e) => {
                warn!("⚠️ Failed to send audio: {e}");
                false
            }
        }
    }

    pub fn chat(&self) -> Vec<ChatMessage> {
        self.chat.borrow().clone()
    }

    pub fn emotion(&self) -> Option<EmotionVector> {
        self.emotion.get()
    }

    /// Bumped whenever the pushed emotion changes (including clears)
    pub fn emotion_revision(&self) -> u64 {
        self.emotion_revision.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sender;
    use std::rc::Rc;

    #[derive(Default)]
    struct Wire {
        sent: RefCell<Vec<String>>,
        closed: Cell<u32>,
    }

    struct MockTransport(Rc<Wire>);

    impl Transport for MockTransport {
        fn send(&self, frame: &str) -> Result<(), ConnectionError> {
            self.0.sent.borrow_mut().push(frame.to_string());
            Ok(())
        }

        fn close(&self) {
            self.0.closed.set(self.0.closed.get() + 1);
        }
    }

    fn connected() -> (Session, Rc<Wire>, u64) {
        let session = Session::new(ReconnectPolicy::default());
        let wire = Rc::new(Wire::default());
        let generation = session.begin_connect().unwrap();
        session.attach(generation, Box::new(MockTransport(wire.clone())));
        session.handle_event(generation, TransportEvent::Opened, 0.0);
        (session, wire, generation)
    }

    fn chat_frame(id: &str, sender: &str, timestamp: f64) -> String {
        serde_json::json!({
            "event": "chat_message",
            "data": {"id": id, "content": format!("msg {id}"), "sender": sender, "timestamp": timestamp}
        })
        .to_string()
    }

    #[test]
    fn offline_send_neither_appends_nor_transmits() {
        let session = Session::new(ReconnectPolicy::default());
        assert!(!session.send_message("hello", 1.0));
        assert!(!session.send_audio(&[1, 2, 3], 1.0));
        assert!(session.chat().is_empty());
    }

    #[test]
    fn connected_send_appends_once_and_transmits_once() {
        let (session, wire, _) = connected();
        assert!(session.send_message("hello", 1_000.0));

        let chat = session.chat();
        assert_eq!(chat.len(), 1);
        assert_eq!(chat[0].id, "user_1000");
        assert_eq!(chat[0].sender, Sender::User);
        assert_eq!(wire.sent.borrow().len(), 1);
        assert!(wire.sent.borrow()[0].contains("\"user_message\""));
    }

    #[test]
    fn audio_is_base64_encoded() {
        let (session, wire, _) = connected();
        assert!(session.send_audio(b"RIFF", 7.0));
        let frame: serde_json::Value = serde_json::from_str(&wire.sent.borrow()[0]).unwrap();
        assert_eq!(frame["event"], "audio_data");
        assert_eq!(frame["data"]["audio"], "UklGRg==");
    }

    #[test]
    fn inbound_chat_keeps_arrival_order_and_fields() {
        let (session, _, generation) = connected();
        for (i, sender) in ["ai", "user", "ai"].iter().enumerate() {
            let frame = chat_frame(&format!("m{i}"), sender, i as f64 * 10.0);
            session.handle_event(generation, TransportEvent::Message(frame), 99.0);
        }

        let chat = session.chat();
        assert_eq!(chat.len(), 3);
        assert_eq!(chat[1].id, "m1");
        assert_eq!(chat[1].sender, Sender::User);
        assert_eq!(chat[1].content, "msg m1");
        assert_eq!(chat[2].timestamp, 20.0);
    }

    #[test]
    fn ai_response_becomes_ai_message() {
        let (session, _, generation) = connected();
        let frame = r#"{"event":"ai_response","data":{"content":"Tell me more","emotion":"calm"}}"#;
        session.handle_event(generation, TransportEvent::Message(frame.into()), 5_000.0);
        let chat = session.chat();
        assert_eq!(chat[0].id, "ai_5000");
        assert_eq!(chat[0].sender, Sender::Ai);
    }

    #[test]
    fn emotion_update_replaces_and_bumps_revision() {
        let (session, _, generation) = connected();
        let before = session.emotion_revision();
        let frame = r#"{"event":"emotion_update","data":{"happy":0.1,"sad":0.7,"angry":0,"fearful":0,"disgusted":0,"surprised":0,"neutral":0.2,"timestamp":1}}"#;
        session.handle_event(generation, TransportEvent::Message(frame.into()), 0.0);
        assert_eq!(session.emotion().map(|e| e.sad), Some(0.7));
        assert_eq!(session.emotion_revision(), before + 1);
    }

    #[test]
    fn malformed_frames_are_ignored() {
        let (session, _, generation) = connected();
        session.handle_event(generation, TransportEvent::Message("{oops".into()), 0.0);
        assert!(session.chat().is_empty());
        assert!(session.is_connected());
    }

    #[test]
    fn disconnect_clears_everything() {
        let (session, wire, generation) = connected();
        session.send_message("hi", 1.0);
        let frame = r#"{"event":"emotion_update","data":{"happy":1,"sad":0,"angry":0,"fearful":0,"disgusted":0,"surprised":0,"neutral":0,"timestamp":1}}"#;
        session.handle_event(generation, TransportEvent::Message(frame.into()), 0.0);

        session.disconnect();
        assert!(session.chat().is_empty());
        assert!(session.emotion().is_none());
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(wire.closed.get(), 1);

        // Also when there was nothing to clear
        session.disconnect();
        assert!(session.chat().is_empty());
    }

    #[test]
    fn connect_is_refused_while_connecting_or_connected() {
        let session = Session::new(ReconnectPolicy::default());
        let generation = session.begin_connect().unwrap();
        assert!(session.begin_connect().is_none());
        session.handle_event(generation, TransportEvent::Opened, 0.0);
        assert!(session.begin_connect().is_none());
    }

    #[test]
    fn failed_attempts_back_off_then_give_up() {
        let session = Session::new(ReconnectPolicy::default());
        let mut delays = Vec::new();

        let mut generation = session.begin_connect().unwrap();
        loop {
            match session.handle_event(generation, TransportEvent::Closed, 0.0) {
                SessionAction::ScheduleRetry { delay_ms, token } => {
                    assert!(session.retry_due(token));
                    delays.push(delay_ms);
                    generation = session.begin_connect().unwrap();
                }
                SessionAction::None => break,
            }
        }
        assert_eq!(delays, [2000, 4000, 6000, 8000, 10000]);
    }

    #[test]
    fn successful_open_resets_attempts() {
        let session = Session::new(ReconnectPolicy::default());
        let generation = session.begin_connect().unwrap();
        session.handle_event(generation, TransportEvent::Closed, 0.0);

        let generation = session.begin_connect().unwrap();
        session.handle_event(generation, TransportEvent::Opened, 0.0);
        session.handle_event(generation, TransportEvent::Closed, 0.0);

        let generation = session.begin_connect().unwrap();
        assert_eq!(
            session.handle_event(generation, TransportEvent::Closed, 0.0),
            SessionAction::ScheduleRetry {
                delay_ms: 2000,
                token: generation
            }
        );
    }

    #[test]
    fn stale_events_and_retries_are_ignored() {
        let (session, _, old) = connected();
        session.disconnect();

        let frame = chat_frame("late", "ai", 1.0);
        session.handle_event(old, TransportEvent::Message(frame), 0.0);
        assert!(session.chat().is_empty());
        assert!(!session.retry_due(old));

        let fresh = session.begin_connect().unwrap();
        session.handle_event(old, TransportEvent::Opened, 0.0);
        assert_eq!(session.state(), ConnectionState::Connecting);
        session.handle_event(fresh, TransportEvent::Opened, 0.0);
        assert!(session.is_connected());
    }

    #[test]
    fn late_socket_for_old_generation_is_closed() {
        let session = Session::new(ReconnectPolicy::default());
        let wire = Rc::new(Wire::default());
        let generation = session.begin_connect().unwrap();
        session.disconnect();
        session.attach(generation, Box::new(MockTransport(wire.clone())));
        assert_eq!(wire.closed.get(), 1);
    }
}
