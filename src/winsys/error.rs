use thiserror::Error;

/// Conditions that prevent the window manager from taking over a display.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("unable to connect to the X server: {0}")]
    Connection(String),
    #[error("the X server advertises no screens")]
    ScreenUnavailable,
    #[error("another window manager is already running")]
    AnotherManagerRunning,
    #[error("unable to set up window manager: {0}")]
    Setup(String),
}
