//! Conversion between decimal TON amounts and nanoton.

use crate::error::TonError;

/// Nanoton in one TON.
pub const NANO_PER_TON: u64 = 1_000_000_000;

const DECIMALS: usize = 9;

/// Parses a decimal TON amount ("50", "0.35", "1.000000001") into nanoton.
///
/// Rejects signs, exponents, more than nine fractional digits and values
/// that overflow `u64`.
pub fn to_nano(amount: &str) -> Result<u64, TonError> {
    let amount = amount.trim();
    let (whole, frac) = match amount.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (amount, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(TonError::InvalidAmount(format!("'{amount}' has no digits")));
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(TonError::InvalidAmount(format!("'{amount}' is not a decimal number")));
    }
    if frac.len() > DECIMALS {
        return Err(TonError::InvalidAmount(format!(
            "'{amount}' has more than {DECIMALS} fractional digits"
        )));
    }

    let whole_nano = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(NANO_PER_TON))
            .ok_or_else(|| TonError::InvalidAmount(format!("'{amount}' overflows")))?
    };

    let frac_nano = if frac.is_empty() {
        0
    } else {
        // Right-pad to nine digits: "35" -> "350000000".
        format!("{frac:0<width$}", width = DECIMALS)
            .parse::<u64>()
            .map_err(|e| TonError::InvalidAmount(e.to_string()))?
    };

    whole_nano
        .checked_add(frac_nano)
        .ok_or_else(|| TonError::InvalidAmount(format!("'{amount}' overflows")))
}

/// Renders nanoton as a decimal TON string without trailing zeros.
pub fn from_nano(nano: u64) -> String {
    let whole = nano / NANO_PER_TON;
    let frac = nano % NANO_PER_TON;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:09}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
