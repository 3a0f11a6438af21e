//! Shared enum types that map directly to TradingView wire values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TvError;

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// Chart resolution of a requested bar series.
///
/// Serializes to the literal resolution string sent in `create_series`
/// (minutes as bare numbers, hours suffixed with `H`, then `1D`/`1W`/`1M`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1")]
    Min1,
    #[serde(rename = "3")]
    Min3,
    #[serde(rename = "5")]
    Min5,
    #[serde(rename = "15")]
    Min15,
    #[serde(rename = "30")]
    Min30,
    #[serde(rename = "45")]
    Min45,
    #[serde(rename = "1H")]
    Hour1,
    #[serde(rename = "2H")]
    Hour2,
    #[serde(rename = "3H")]
    Hour3,
    #[serde(rename = "4H")]
    Hour4,
    #[default]
    #[serde(rename = "1D")]
    Daily,
    #[serde(rename = "1W")]
    Weekly,
    #[serde(rename = "1M")]
    Monthly,
}

impl Interval {
    /// Every supported interval, shortest first.
    pub const ALL: [Interval; 13] = [
        Self::Min1,
        Self::Min3,
        Self::Min5,
        Self::Min15,
        Self::Min30,
        Self::Min45,
        Self::Hour1,
        Self::Hour2,
        Self::Hour3,
        Self::Hour4,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
    ];

    /// The resolution string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min1 => "1",
            Self::Min3 => "3",
            Self::Min5 => "5",
            Self::Min15 => "15",
            Self::Min30 => "30",
            Self::Min45 => "45",
            Self::Hour1 => "1H",
            Self::Hour2 => "2H",
            Self::Hour3 => "3H",
            Self::Hour4 => "4H",
            Self::Daily => "1D",
            Self::Weekly => "1W",
            Self::Monthly => "1M",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = TvError;

    /// Parses the wire resolution string. `h`, `d` and `w` suffixes are
    /// accepted in lower case; `m` is not, since `1m` reads as one minute
    /// rather than one month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let code = match code.strip_suffix(['h', 'd', 'w']) {
            Some(count) => format!("{count}{}", &code[count.len()..].to_ascii_uppercase()),
            None => code.to_owned(),
        };
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == code)
            .ok_or_else(|| TvError::InvalidArgument(format!("unknown interval: {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Session mode
// ---------------------------------------------------------------------------

/// Trading session the series is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Regular trading hours only.
    #[default]
    Regular,
    /// Regular plus pre/post-market hours.
    Extended,
}

impl SessionMode {
    pub fn from_extended(extended: bool) -> Self {
        if extended { Self::Extended } else { Self::Regular }
    }
}
