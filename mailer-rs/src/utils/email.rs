use crate::error::{MailError, Result};

/// Check that a recipient address is usable in an SMTP envelope
///
/// Accepts bare `local@domain` addresses only; display names and angle
/// brackets are rejected since the address is written into headers verbatim.
pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(MailError::InvalidEmail("Email is empty".to_string()));
    }

    if email.chars().any(|c| c.is_whitespace() || c.is_control() || c == '<' || c == '>') {
        return Err(MailError::InvalidEmail(format!(
            "Email contains forbidden characters: {}",
            email
        )));
    }

    let (local, domain) = email
        .rsplit_once('@')
        .ok_or_else(|| MailError::InvalidEmail(format!("Email must contain @: {}", email)))?;

    if local.is_empty() || local.contains('@') {
        return Err(MailError::InvalidEmail(format!("Invalid local part: {}", email)));
    }

    if !domain.contains('.') || domain.split('.').any(|label| label.is_empty()) {
        return Err(MailError::InvalidEmail(format!("Invalid domain: {}", email)));
    }

    Ok(())
}
