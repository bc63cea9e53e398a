use thiserror::Error;

/// Errors surfaced by configuration, logging setup and terminal I/O
#[derive(Error, Debug)]
pub enum GalaxyError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid color `{0}`: expected #rrggbb")]
    InvalidColor(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, GalaxyError>;
