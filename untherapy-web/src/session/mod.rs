//! Session module - backend socket, chat log and pushed emotion state
//!
//! Re-exports only. All logic in submodules.

mod backoff;
mod client;
mod protocol;
mod socket;

pub use backoff::ReconnectPolicy;
pub use client::{ConnectionState, Session, SessionAction, Transport, TransportEvent};
pub use protocol::{ClientEvent, ServerEvent};
pub use socket::{connect, BrowserSocket};
