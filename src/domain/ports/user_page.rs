//! UserPagePublisher port
//!
//! Creates the personal page of a freshly created account. Optional:
//! a failure here is logged and never counted against the run.

use crate::domain::value_objects::Username;

#[derive(Debug)]
pub enum PageError {
    Io(std::io::Error),
    Other(String),
}

impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        PageError::Io(err)
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::Io(err) => write!(f, "I/O error: {}", err),
            PageError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PageError {}

pub trait UserPagePublisher {
    fn page_exists(&self, username: &Username) -> bool;

    fn publish(&self, username: &Username, content: &str) -> Result<(), PageError>;
}

impl<T: UserPagePublisher + ?Sized> UserPagePublisher for &T {
    fn page_exists(&self, username: &Username) -> bool {
        (**self).page_exists(username)
    }

    fn publish(&self, username: &Username, content: &str) -> Result<(), PageError> {
        (**self).publish(username, content)
    }
}

/// Publisher used when no page content is configured
pub struct NoopPagePublisher;

impl UserPagePublisher for NoopPagePublisher {
    fn page_exists(&self, _username: &Username) -> bool {
        true
    }

    fn publish(&self, _username: &Username, _content: &str) -> Result<(), PageError> {
        Ok(())
    }
}
