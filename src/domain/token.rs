//! ERC-20 token metadata and unit conversion.

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest scale `rust_decimal` can represent.
const MAX_DECIMAL_SCALE: u32 = 28;

/// An ERC-20 token on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

impl Token {
    /// Convert a whole-token amount into base units.
    ///
    /// Digits beyond the token's precision are truncated. Returns `None` for
    /// negative amounts.
    #[must_use]
    pub fn to_base_units(&self, amount: Decimal) -> Option<U256> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return None;
        }
        let mantissa = U256::from(amount.mantissa().unsigned_abs());
        let scale = amount.scale();
        let decimals = u32::from(self.decimals);

        let units = if decimals >= scale {
            mantissa.checked_mul(pow10(decimals - scale))?
        } else {
            mantissa / pow10(scale - decimals)
        };
        Some(units)
    }

    /// Convert base units into a whole-token amount.
    ///
    /// Amounts beyond the range of [`Decimal`] saturate at [`Decimal::MAX`];
    /// fractional digits beyond 28 places are dropped.
    #[must_use]
    pub fn from_base_units(&self, units: U256) -> Decimal {
        let decimals = u32::from(self.decimals);
        let (whole, fraction) = units.div_rem(pow10(decimals));

        let Ok(whole) = i128::try_from(whole) else {
            return Decimal::MAX;
        };
        let Ok(whole) = Decimal::try_from_i128_with_scale(whole, 0) else {
            return Decimal::MAX;
        };

        let (fraction, scale) = if decimals > MAX_DECIMAL_SCALE {
            (fraction / pow10(decimals - MAX_DECIMAL_SCALE), MAX_DECIMAL_SCALE)
        } else {
            (fraction, decimals)
        };
        let fraction = i128::try_from(fraction)
            .ok()
            .and_then(|f| Decimal::try_from_i128_with_scale(f, scale).ok())
            .unwrap_or(Decimal::ZERO);

        (whole + fraction).normalize()
    }
}

fn pow10(exponent: u32) -> U256 {
    U256::from(10u64).pow(U256::from(exponent))
}
