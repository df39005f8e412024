//! Number formatting for answers.

use crate::IntentError;

/// Formats an integer with comma thousands separators (`12,345`).
#[must_use]
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Rounds to one decimal place, half away from zero.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Integer part of a PCI score, as shown in answers.
///
/// # Errors
///
/// Returns [`IntentError::InvalidValue`] if the score is not finite.
#[allow(clippy::cast_possible_truncation)]
pub fn pci_label(pci: f64) -> Result<i64, IntentError> {
    if !pci.is_finite() {
        return Err(IntentError::InvalidValue {
            what: format!("PCI score {pci}"),
        });
    }
    Ok(pci.trunc() as i64)
}
