//! Trait-based conversions between external error types and `MailerError`.

use super::MailerError;

impl From<figment::Error> for MailerError {
    fn from(e: figment::Error) -> Self {
        Self::Gathering(Box::new(e))
    }
}

impl From<serde_json::Error> for MailerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Deserialize(Box::new(e))
    }
}

impl From<lettre::transport::smtp::Error> for MailerError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

impl From<lettre::address::AddressError> for MailerError {
    fn from(e: lettre::address::AddressError) -> Self {
        Self::Address(Box::new(e))
    }
}

impl From<lettre::error::Error> for MailerError {
    fn from(e: lettre::error::Error) -> Self {
        Self::Message(Box::new(e))
    }
}
