//! Steam wallet currency codes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Wallet currency, identified on the wire by its numeric Steam code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Currency {
    Usd,
    Gbp,
    #[default]
    Eur,
    Chf,
    Rub,
    Pln,
    Brl,
    Jpy,
    Nok,
    Idr,
    Myr,
    Php,
    Sgd,
    Thb,
    Vnd,
    Krw,
    Try,
    Uah,
    Mxn,
    Cad,
    Aud,
    Nzd,
}

impl Currency {
    /// Numeric code used by the market endpoints.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Usd => 1,
            Self::Gbp => 2,
            Self::Eur => 3,
            Self::Chf => 4,
            Self::Rub => 5,
            Self::Pln => 6,
            Self::Brl => 7,
            Self::Jpy => 8,
            Self::Nok => 9,
            Self::Idr => 10,
            Self::Myr => 11,
            Self::Php => 12,
            Self::Sgd => 13,
            Self::Thb => 14,
            Self::Vnd => 15,
            Self::Krw => 16,
            Self::Try => 17,
            Self::Uah => 18,
            Self::Mxn => 19,
            Self::Cad => 20,
            Self::Aud => 21,
            Self::Nzd => 22,
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn iso_code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Eur => "EUR",
            Self::Chf => "CHF",
            Self::Rub => "RUB",
            Self::Pln => "PLN",
            Self::Brl => "BRL",
            Self::Jpy => "JPY",
            Self::Nok => "NOK",
            Self::Idr => "IDR",
            Self::Myr => "MYR",
            Self::Php => "PHP",
            Self::Sgd => "SGD",
            Self::Thb => "THB",
            Self::Vnd => "VND",
            Self::Krw => "KRW",
            Self::Try => "TRY",
            Self::Uah => "UAH",
            Self::Mxn => "MXN",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
            Self::Nzd => "NZD",
        }
    }

    /// Formats an amount in the smallest unit as `units.cents ISO`.
    #[must_use]
    pub fn format_cents(self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        format!("{sign}{}.{:02} {}", abs / 100, abs % 100, self.iso_code())
    }
}

impl From<Currency> for u32 {
    fn from(currency: Currency) -> Self {
        currency.code()
    }
}

impl TryFrom<u32> for Currency {
    type Error = ConfigError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => Self::Usd,
            2 => Self::Gbp,
            3 => Self::Eur,
            4 => Self::Chf,
            5 => Self::Rub,
            6 => Self::Pln,
            7 => Self::Brl,
            8 => Self::Jpy,
            9 => Self::Nok,
            10 => Self::Idr,
            11 => Self::Myr,
            12 => Self::Php,
            13 => Self::Sgd,
            14 => Self::Thb,
            15 => Self::Vnd,
            16 => Self::Krw,
            17 => Self::Try,
            18 => Self::Uah,
            19 => Self::Mxn,
            20 => Self::Cad,
            21 => Self::Aud,
            22 => Self::Nzd,
            other => return Err(ConfigError::UnknownCurrency(other)),
        })
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.iso_code())
    }
}
