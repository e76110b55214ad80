use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// A dialog without confirm and cancel buttons could never be left
    #[error("dialog has neither a confirm nor a cancel button")]
    NoEscape,
    #[error("QR encoding failed: {0}")]
    QrEncoding(String),
}
