//! Mailer facade applying global addresses over a transport.

use std::sync::Arc;

use lettre::address::Envelope;
use lettre::message::{Mailbox, Mailboxes, MessageBuilder, header};
use lettre::{Message, Transport};

use crate::{AddressKind, GlobalAddresses, MailerError, MailerResult, MailerResultExt};

/// A transport paired with the global addresses of its variant.
///
/// - `from` and `reply_to` pre-populate messages started with
///   [`Mailer::message`].
/// - `to` redirects delivery: every message sent through [`Mailer::send`]
///   goes to the global recipient only.
#[derive(Debug)]
pub struct Mailer<T> {
    transport: T,
    from: Option<Mailbox>,
    reply_to: Option<Mailbox>,
    to: Option<Mailbox>,
}

impl<T> Mailer<T> {
    /// Pair `transport` with the given global addresses.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Address`] when a global address cannot be
    /// parsed.
    pub fn new(transport: T, addresses: &GlobalAddresses) -> MailerResult<Self> {
        let mailbox = |kind| {
            addresses
                .get(kind)
                .map(crate::GlobalAddress::mailbox)
                .transpose()
        };
        Ok(Self {
            from: mailbox(AddressKind::From)?,
            reply_to: mailbox(AddressKind::ReplyTo)?,
            to: mailbox(AddressKind::To)?,
            transport,
        })
    }

    /// The global mailbox registered for `kind`.
    #[must_use]
    pub const fn always(&self, kind: AddressKind) -> Option<&Mailbox> {
        match kind {
            AddressKind::From => self.from.as_ref(),
            AddressKind::ReplyTo => self.reply_to.as_ref(),
            AddressKind::To => self.to.as_ref(),
        }
    }

    /// Borrow the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a message pre-populated with the global addresses.
    #[must_use]
    pub fn message(&self) -> MessageBuilder {
        let mut builder = Message::builder();
        if let Some(from) = &self.from {
            builder = builder.from(from.clone());
        }
        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(reply_to.clone());
        }
        if let Some(to) = &self.to {
            builder = builder.to(to.clone());
        }
        builder
    }
}

impl<T> Mailer<T>
where
    T: Transport,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    /// Deliver `message` through the transport.
    ///
    /// When a global `to` address is registered it becomes the only
    /// recipient: the envelope is rewritten, the `To` header is replaced and
    /// any `Cc` or `Bcc` headers are removed.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Message`] when the redirected envelope is
    /// invalid and [`MailerError::Delivery`] when the transport fails.
    pub fn send(&self, message: &Message) -> MailerResult<T::Ok> {
        let outcome = match &self.to {
            Some(to) => {
                let envelope =
                    Envelope::new(message.envelope().from().cloned(), vec![to.email.clone()])
                        .into_mailer()?;
                let mut redirected = message.clone();
                let headers = redirected.headers_mut();
                headers.set(header::To::from(Mailboxes::from(to.clone())));
                headers.remove::<header::Cc>();
                headers.remove::<header::Bcc>();
                self.transport.send_raw(&envelope, &redirected.formatted())
            }
            None => self.transport.send(message),
        };
        outcome.map_err(|err| Arc::new(MailerError::delivery(err)))
    }
}
