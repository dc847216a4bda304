//! Shared primitive types used across the entire generator.

/// A 5-digit ZIP-equivalent zone code, zero-padded.
pub type ZoneCode = String;

/// A 3-digit designated-market-area code.
pub type DmaCode = String;

/// Two-letter state code.
pub type StateCode = String;

/// Round to 1 decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round to 3 decimal places.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
