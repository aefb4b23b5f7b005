//! QR code tokens and targets.
//!
//! A QR code row stores an opaque alphanumeric token plus what it resolves
//! to. Rendering the actual bitmap is a client concern; the server only
//! mints tokens and answers scan redirects.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Token length for generated QR codes. Alphanumeric, so roughly
/// 12 * log2(62) ≈ 71 bits of entropy.
pub const CODE_LENGTH: usize = 12;

/// What a scanned code resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrTarget {
    /// The ticket submission form for a specific unit.
    Unit,
    /// The general visitor/survey form.
    Form,
    /// An arbitrary URL.
    Url,
}

impl QrTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            QrTarget::Unit => "unit",
            QrTarget::Form => "form",
            QrTarget::Url => "url",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "unit" => Ok(QrTarget::Unit),
            "form" => Ok(QrTarget::Form),
            "url" => Ok(QrTarget::Url),
            other => Err(CoreError::Validation(format!(
                "Unknown QR target '{other}' (expected unit, form, or url)"
            ))),
        }
    }
}

/// Mint a new opaque code token.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_alphanumeric_and_sized() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_codes_differ() {
        assert_ne!(generate_code(), generate_code());
    }

    #[test]
    fn target_parse_round_trips() {
        for s in ["unit", "form", "url"] {
            assert_eq!(QrTarget::parse(s).unwrap().as_str(), s);
        }
        assert!(QrTarget::parse("poster").is_err());
    }
}
