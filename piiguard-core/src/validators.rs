// File: piiguard-core/src/validators.rs
//! Programmatic checksum validation for pattern matches.
//!
//! Regular expressions only describe the shape of an identifier. Checksums
//! reject shape-valid but impossible numbers (a random 16-digit string is
//! rarely a real card number) before they turn into detections.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};

/// A checksum a pattern match must satisfy to become a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Mod-10 checksum (payment cards).
    Luhn,
    /// Dihedral-group checksum (Aadhaar).
    Verhoeff,
}

impl Validator {
    /// Runs the checksum over the digits of `matched`, ignoring separators.
    pub fn validate(&self, matched: &str) -> bool {
        let digits: String = matched.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return false;
        }
        match self {
            Validator::Luhn => is_valid_luhn(&digits),
            Validator::Verhoeff => is_valid_verhoeff(&digits),
        }
    }
}

/// Validates a number using the Luhn algorithm.
///
/// # Arguments
///
/// * `num_str` - A string slice containing only digits.
///
/// # Returns
///
/// `true` if the number is valid according to the Luhn algorithm, `false` otherwise.
pub fn is_valid_luhn(num_str: &str) -> bool {
    let mut sum = 0;
    let mut alternate = false;

    for c in num_str.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else { return false; };

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    sum % 10 == 0
}

const VERHOEFF_D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

const VERHOEFF_P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Validates a number (check digit last) using the Verhoeff algorithm.
pub fn is_valid_verhoeff(num_str: &str) -> bool {
    let mut check = 0usize;
    for (i, c) in num_str.chars().rev().enumerate() {
        let Some(digit) = c.to_digit(10) else { return false; };
        check = VERHOEFF_D[check][VERHOEFF_P[i % 8][digit as usize] as usize] as usize;
    }
    check == 0
}
