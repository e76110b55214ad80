//! Screen building blocks for a two-button monochrome device
//!
//! This library holds everything that decides what ends up on a confirm
//! screen: the bounded text layout engine, the truncation helpers used for
//! addresses and hex blobs, QR magnification, buttons and the confirm dialog
//! state machine. Talking to the host lives in the device crate.

pub mod confirm;
pub mod constants;
mod error;
pub mod fonts;
pub mod input;
pub mod pages;
pub mod qr;
pub mod text;
pub mod widgets;

// Re-export commonly used types
pub use confirm::{ButtonSpec, ConfirmDialog, ConfirmMode, DialogResult, DialogState};
pub use error::UiError;
pub use input::{InputEvent, PhysicalButton};
pub use pages::{Header, Icon, Page, ScreenStyle, TextPage};
pub use qr::{QrPage, select_magnification};
pub use text::{Layout, LayoutMetrics, Line, SpanKind, TextLayout, TextSpan};
pub use widgets::{Button, ButtonLabel, ButtonRole, ButtonStyle};
