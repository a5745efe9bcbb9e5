//! Raw instrument descriptors ("active symbols") as supplied upstream.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

/// Minimum price increment as published upstream, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pip {
    Number(f64),
    Text(String),
}

impl Pip {
    /// Number of decimal digits, computed from the textual form as
    /// `len - 2` ("0.001" -> 3). Malformed values yield zero or negative
    /// counts rather than an error.
    ///
    /// Numbers are rendered in plain decimal notation, never with an
    /// exponent, so `1e-7` counts as `"0.0000001"` (7 digits). A feed that
    /// needs the exponent form must send the pip as text.
    pub fn digits(&self) -> i32 {
        let len = self.to_string().chars().count();
        i32::try_from(len).unwrap_or(i32::MAX) - 2
    }
}

impl Default for Pip {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl Display for Pip {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Canonical raw instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "InstrumentWire")]
pub struct Instrument {
    #[serde(rename = "underlying_symbol")]
    pub code: String,
    pub market: String,
    pub market_display_name: Option<String>,
    pub submarket: String,
    pub submarket_display_name: Option<String>,
    pub display_name: Option<String>,
    pub pip: Pip,
    pub is_trading_suspended: bool,
    pub exchange_is_open: bool,
}

impl Instrument {
    pub fn new(
        code: impl Into<String>,
        market: impl Into<String>,
        submarket: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            market: market.into(),
            market_display_name: None,
            submarket: submarket.into(),
            submarket_display_name: None,
            display_name: None,
            pip: Pip::default(),
            is_trading_suspended: false,
            exchange_is_open: true,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_market_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.market_display_name = Some(display_name.into());
        self
    }

    pub fn with_submarket_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.submarket_display_name = Some(display_name.into());
        self
    }

    pub fn with_pip(mut self, pip: Pip) -> Self {
        self.pip = pip;
        self
    }

    pub fn with_exchange_open(mut self, exchange_is_open: bool) -> Self {
        self.exchange_is_open = exchange_is_open;
        self
    }

    pub fn with_trading_suspended(mut self, is_trading_suspended: bool) -> Self {
        self.is_trading_suspended = is_trading_suspended;
        self
    }

    /// True when the instrument cannot currently be traded.
    pub fn is_closed(&self) -> bool {
        !self.exchange_is_open || self.is_trading_suspended
    }
}

/// Upstream payload shape. Older feeds publish the code as `symbol` and the
/// increment as `pip_size`; flags may arrive as booleans or 0/1 integers.
#[derive(Debug, Deserialize)]
struct InstrumentWire {
    #[serde(default)]
    underlying_symbol: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    market: String,
    #[serde(default)]
    market_display_name: Option<String>,
    #[serde(default)]
    submarket: String,
    #[serde(default)]
    submarket_display_name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    pip: Option<Pip>,
    #[serde(default)]
    pip_size: Option<Pip>,
    #[serde(default, deserialize_with = "flag")]
    is_trading_suspended: bool,
    #[serde(default, deserialize_with = "flag")]
    exchange_is_open: bool,
}

impl From<InstrumentWire> for Instrument {
    fn from(wire: InstrumentWire) -> Self {
        let code = non_empty(wire.underlying_symbol)
            .or_else(|| non_empty(wire.symbol))
            .unwrap_or_default();

        Self {
            code,
            market: wire.market,
            market_display_name: non_empty(wire.market_display_name),
            submarket: wire.submarket,
            submarket_display_name: non_empty(wire.submarket_display_name),
            display_name: non_empty(wire.display_name),
            pip: wire.pip.or(wire.pip_size).unwrap_or_default(),
            is_trading_suspended: wire.is_trading_suspended,
            exchange_is_open: wire.exchange_is_open,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}
