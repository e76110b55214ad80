use thiserror::Error;
use twobutton_ui::UiError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Action cancelled by user")]
    ActionCancelled,
    #[error("PIN entry cancelled")]
    PinCancelled,
    #[error("Process error: {0}")]
    Process(String),
    #[error("Malformed input: {0}")]
    MalformedInput(&'static str),
    #[error("UI error: {0}")]
    Ui(#[from] UiError),
    #[error("Host or input channel disconnected")]
    Disconnected,
    #[error("Display error")]
    Display,
}

pub type Result<T> = std::result::Result<T, Error>;
