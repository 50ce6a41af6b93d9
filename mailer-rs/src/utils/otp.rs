//! One-time code generation

use rand::distributions::{Distribution, Uniform};

/// Generate a numeric one-time code of `length` digits
///
/// Each digit is drawn independently and uniformly from `0..=9`, so leading
/// zeros are possible and every code of the given length is equally likely.
pub fn generate_otp(length: usize) -> String {
    let digits = Uniform::new_inclusive(b'0', b'9');
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| digits.sample(&mut rng) as char)
        .collect()
}
