//! Decimal amount parsing.
//!
//! Human amounts are parsed exactly from text; digits past the resolution are
//! dropped (floored) so a conversion never spends more than the user typed.

use crate::core::constants::{LAMPORTS_PER_SOL, SOL_DECIMALS};
use crate::error::{Result, WalletError};

/// Parse a decimal string into base units at `decimals` resolution.
///
/// Zero or negative amounts fail with [`WalletError::NonPositiveAmount`].
pub fn parse_base_units(text: &str, decimals: u32) -> Result<u64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(WalletError::InvalidAmount("empty amount".into()));
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(WalletError::InvalidAmount(format!("'{}'", text)));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(WalletError::InvalidAmount(format!("'{}'", text)));
    }

    let scale = 10u64
        .checked_pow(decimals)
        .ok_or_else(|| WalletError::InvalidAmount(format!("resolution {} too large", decimals)))?;

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(scale))
            .ok_or_else(|| WalletError::InvalidAmount(format!("'{}' is too large", text)))?
    };

    // Floor: keep only the digits the resolution can represent
    let kept: String = fraction.chars().take(decimals as usize).collect();
    let fraction_units = if kept.is_empty() {
        0
    } else {
        let padding = decimals as usize - kept.len();
        kept.parse::<u64>()
            .ok()
            .and_then(|f| f.checked_mul(10u64.pow(padding as u32)))
            .ok_or_else(|| WalletError::InvalidAmount(format!("'{}'", text)))?
    };

    let total = whole_units
        .checked_add(fraction_units)
        .ok_or_else(|| WalletError::InvalidAmount(format!("'{}' is too large", text)))?;

    if negative || total == 0 {
        return Err(WalletError::NonPositiveAmount);
    }
    Ok(total)
}

/// Parse a SOL amount into lamports
pub fn sol_to_lamports(text: &str) -> Result<u64> {
    parse_base_units(text, SOL_DECIMALS)
}

/// Render lamports as SOL without trailing zeros
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let fraction = lamports % LAMPORTS_PER_SOL;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = SOL_DECIMALS as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
