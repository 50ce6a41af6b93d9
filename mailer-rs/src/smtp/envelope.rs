//! RFC 5322 message construction for outgoing mail

use crate::dispatch::Message;
use crate::error::{MailError, Result};
use lettre::message::header::{ContentType, MIME_VERSION_1_0};
use lettre::message::Mailbox;
use lettre::Message as Email;
use std::time::SystemTime;

/// Build the HTML email for `message` as sent by `from`
///
/// lettre picks the transfer encoding, so non-ASCII subjects are encoded
/// words, body line endings are CRLF and no line exceeds the SMTP limit.
/// CR and LF in the subject are replaced so caller input cannot fold in
/// extra headers.
pub fn build_email(from: &str, message: &Message) -> Result<Email> {
    let sender: Mailbox = from
        .parse()
        .map_err(|e| MailError::Delivery(format!("Invalid sender address: {}", e)))?;
    let recipient: Mailbox = message
        .to()
        .parse()
        .map_err(|e| MailError::Delivery(format!("Invalid recipient address: {}", e)))?;
    let domain = from.rsplit_once('@').map(|(_, d)| d).unwrap_or("localhost");

    Email::builder()
        .from(sender)
        .to(recipient)
        .subject(header_value(message.subject()))
        .date(SystemTime::from(message.created_at()))
        .message_id(Some(format!("<{}@{}>", message.id().simple(), domain)))
        .header(MIME_VERSION_1_0)
        .header(ContentType::TEXT_HTML)
        .body(message.body().to_string())
        .map_err(|e| MailError::Delivery(format!("Failed to build email: {}", e)))
}

fn header_value(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(message: &Message) -> String {
        let email = build_email("noreply@example.com", message).unwrap();
        String::from_utf8(email.formatted()).unwrap()
    }

    #[test]
    fn test_headers() {
        let message = Message::new("jane@example.com", "Welcome aboard", "<p>Hi Jane</p>\n");
        let raw = formatted(&message);

        let (headers, _) = raw.split_once("\r\n\r\n").unwrap();
        assert!(headers.contains("From: noreply@example.com\r\n"));
        assert!(headers.contains("To: jane@example.com\r\n"));
        assert!(headers.contains("Subject: Welcome aboard\r\n"));
        assert!(headers.contains("MIME-Version: 1.0\r\n"));
        assert!(headers.contains("Content-Type: text/html; charset=utf-8"));
        assert!(headers.contains(&format!("<{}@example.com>", message.id().simple())));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let message = Message::new("jane@example.com", "Café ✓", "<p>Bonjour</p>");
        let raw = formatted(&message);

        let (headers, _) = raw.split_once("\r\n\r\n").unwrap();
        assert!(headers.is_ascii());
        assert!(headers.contains("Subject: =?"));
        assert!(!headers.contains("Café"));
    }

    #[test]
    fn test_wire_lines_are_crlf_and_short() {
        let body = format!("<p>line one</p>\n<p>line two</p>\n<p>{}</p>", "x".repeat(5000));
        let message = Message::new("jane@example.com", "Digest", body);
        let raw = formatted(&message);

        assert!(!raw.replace("\r\n", "").contains('\n'));
        assert!(raw.split("\r\n").all(|line| line.len() <= 998));
    }

    #[test]
    fn test_header_injection_is_neutralised() {
        let message = Message::new(
            "jane@example.com",
            "Hello\r\nBcc: victim@example.com",
            "body",
        );
        let raw = formatted(&message);
        let (headers, _) = raw.split_once("\r\n\r\n").unwrap();

        assert!(!headers.lines().any(|l| l.starts_with("Bcc:")));
    }

    #[test]
    fn test_invalid_recipient() {
        let message = Message::new("not an address", "Hi", "body");
        assert!(matches!(
            build_email("noreply@example.com", &message),
            Err(MailError::Delivery(_))
        ));
    }
}
