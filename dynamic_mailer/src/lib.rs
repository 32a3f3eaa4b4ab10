//! Resolve-time SMTP mailer configuration.
//!
//! A dynamic mailer is parametrised by three layers of configuration:
//!
//! 1. static defaults scoped by a variant prefix (`dynamic.<prefix>`),
//! 2. the contribution of the variant's options hook, and
//! 3. the call-site options supplied when the mailer is requested.
//!
//! The variant hook receives the call-site options and decides what to pass
//! on; the provided hook passes them through untouched. The defaults and the
//! contribution are deep-merged, the result configures a [`lettre`] SMTP
//! transport, and any `from`, `reply_to` or `to` address tables become global
//! addresses on the resulting [`Mailer`].
//!
//! ```rust
//! use dynamic_mailer::{DynamicMailer, MailerFactory, StaticDefaults, into_config_map};
//! use serde_json::json;
//!
//! struct Newsletter;
//!
//! impl DynamicMailer for Newsletter {
//!     fn prefix(&self) -> &str {
//!         "newsletter"
//!     }
//! }
//!
//! let defaults = StaticDefaults::new().with(
//!     "newsletter",
//!     into_config_map(json!({"host": "smtp.example.com", "port": 25}))?,
//! );
//! let factory = MailerFactory::new(Newsletter, defaults);
//! let options = factory.options(&into_config_map(json!({"port": 2525}))?)?;
//! assert_eq!(options.get("host"), Some(&json!("smtp.example.com")));
//! assert_eq!(options.get("port"), Some(&json!(2525)));
//! # Ok::<_, std::sync::Arc<dynamic_mailer::MailerError>>(())
//! ```

mod address;
pub mod defaults;
mod error;
mod factory;
mod mailer;
pub mod merge;
mod resolver;
mod result_ext;
pub mod transport;
mod variant;

pub use address::{AddressKind, GlobalAddress, GlobalAddresses};
pub use defaults::{DefaultsSource, FigmentDefaults, FnDefaults, MissingDefaults, StaticDefaults};
pub use error::MailerError;
pub use factory::MailerFactory;
pub use mailer::Mailer;
pub use merge::{ConfigMap, LayerProvenance, LayerStack, MergeLayer, deep_merge, into_config_map};
pub use resolver::ConfigResolver;
pub use result_ext::MailerResultExt;
pub use transport::{AuthMode, Encryption, SmtpSettings, StreamOptions, build_transport};
pub use variant::{Bindings, DynamicMailer};

/// Shared result type used throughout the crate.
pub type MailerResult<T> = std::result::Result<T, std::sync::Arc<MailerError>>;

pub use lettre;
pub use serde_json;
