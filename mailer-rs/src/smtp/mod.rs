//! Outbound SMTP
//!
//! - [`client`]: relay client that delivers one message per connection
//! - [`envelope`]: RFC 5322 email built from a rendered message

pub mod client;
pub mod envelope;

pub use client::{Relay, RelayTarget, SmtpRelay};
pub use envelope::build_email;
