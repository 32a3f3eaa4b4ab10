//! Error types produced while resolving dynamic mailers.

mod constructors;
mod conversions;
mod types;

pub use types::MailerError;
