//! Device side of the two-button confirm dialogs
//!
//! Flows in [`layouts`] build screens from `twobutton-ui` and run them through
//! [`interact::interact`], which performs the `ButtonRequest`/`ButtonAck`
//! handshake with the host before anything is shown.

pub mod config;
mod error;
pub mod framebuffer;
pub mod host;
pub mod interact;
pub mod layouts;
pub mod wire;

pub use config::{ConfigError, FlowConfig};
pub use error::{Error, Result};
pub use framebuffer::Framebuffer;
pub use host::{HostEnd, HostLink};
pub use interact::{Context, Screen, interact, is_confirmed, raise_if_cancelled};
pub use wire::{ButtonRequest, ButtonRequestType, DeviceMessage, HostMessage};
