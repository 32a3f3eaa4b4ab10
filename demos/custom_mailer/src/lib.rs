//! The `custom` dynamic mailer variant and its example command.
//!
//! The library half lets integration tests drive the workflows without
//! spawning the binary.

pub mod cli;
pub mod credentials;
pub mod custom;
pub mod error;
pub mod example;
pub mod logging;
