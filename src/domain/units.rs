//! Decimal scaling between human amounts and base units

use std::fmt;

use alloy::primitives::U256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("empty amount")]
    Empty,
    #[error("invalid number: {0}")]
    Invalid(String),
    #[error("{got} decimal places exceed the token's {max}")]
    TooPrecise { got: usize, max: u8 },
    #[error("amount overflows 256 bits")]
    Overflow,
}

/// An amount in base units together with the decimals used to display it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount {
    pub raw: U256,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn parse(amount: &str, decimals: u8) -> Result<Self, UnitsError> {
        Ok(Self::new(parse_units(amount, decimals)?, decimals))
    }

    /// Lossy conversion, for callers that want a plain number
    pub fn to_f64(&self) -> f64 {
        format_units(self.raw, self.decimals).parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.raw, self.decimals))
    }
}

fn scale(decimals: u8) -> Result<U256, UnitsError> {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or(UnitsError::Overflow)
}

/// Parse a decimal string ("10", "1.5", ".25") into base units
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (integer_part, decimal_part) = match amount.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (amount, ""),
    };
    if integer_part.is_empty() && decimal_part.is_empty() {
        return Err(UnitsError::Invalid(amount.to_string()));
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer_part) || !all_digits(decimal_part) {
        return Err(UnitsError::Invalid(amount.to_string()));
    }

    let decimal_part = decimal_part.trim_end_matches('0');
    if decimal_part.len() > decimals as usize {
        return Err(UnitsError::TooPrecise {
            got: decimal_part.len(),
            max: decimals,
        });
    }

    let integer = if integer_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(integer_part, 10).map_err(|_| UnitsError::Overflow)?
    };

    let fraction = if decimal_part.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", decimal_part, width = decimals as usize);
        U256::from_str_radix(&padded, 10).map_err(|_| UnitsError::Overflow)?
    };

    // 10^decimals overflows past 77 decimals, leaving room for fractions only
    if integer.is_zero() {
        return Ok(fraction);
    }
    integer
        .checked_mul(scale(decimals)?)
        .and_then(|v| v.checked_add(fraction))
        .ok_or(UnitsError::Overflow)
}

/// Render base units as a decimal string, trimming trailing zeros
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let (whole, frac) = match scale(decimals) {
        Ok(divisor) => (value / divisor, value % divisor),
        Err(_) => (U256::ZERO, value),
    };

    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}
