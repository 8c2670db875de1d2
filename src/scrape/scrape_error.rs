use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ScrapeError {
    Network(String),
    Status(String),
    Io(String),
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::Network(msg) => write!(f, "Network error: {msg}"),
            ScrapeError::Status(msg) => write!(f, "Bad response: {msg}"),
            ScrapeError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl Error for ScrapeError {}
