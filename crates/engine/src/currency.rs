use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code attached to a ledger and its money values.
///
/// The tracker is effectively mono-currency today (default `LKR`), but the
/// engine models currency explicitly so the data model stays future-proof.
///
/// ## Minor units
///
/// Monetary values are stored as an `i64` number of **minor units**.
/// `minor_units()` returns how many decimal digits are used when converting
/// between major units (human input/output, e.g. `10.50 LKR`) and minor units
/// (stored integers, e.g. `1050`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Lkr,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Lkr => "LKR",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Lkr => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LKR" => Ok(Currency::Lkr),
            other => Err(EngineError::InvalidArgument(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
