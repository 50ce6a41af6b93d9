//! Utility modules
//!
//! - [`email`]: Recipient address validation
//! - [`otp`]: One-time code generation

pub mod email;
pub mod otp;

pub use email::validate_email;
pub use otp::generate_otp;
