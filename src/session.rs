//! Quote and chart session identifiers.
//!
//! The service multiplexes two logical sessions over one socket: a quote
//! session (symbol metadata) and a chart session (bar series). Each is named
//! by a client-chosen id of the form `<prefix>_<12 lowercase letters>`.
//!
//! Generation takes any [`rand::Rng`], so tests can pass a seeded
//! [`StdRng`](rand::rngs::StdRng) and get deterministic ids.

use std::fmt;

use rand::Rng;

use crate::constants::{CHART_SESSION_PREFIX, QUOTE_SESSION_PREFIX, SESSION_ID_LEN};

/// A generated session id, e.g. `cs_qwertyuiopas`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate `prefix + "_" + 12 random lowercase ASCII letters`.
    pub fn generate<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> Self {
        let suffix: String = (0..SESSION_ID_LEN)
            .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
            .collect();
        Self(format!("{prefix}_{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The pair of session ids a client uses for every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIds {
    /// Quote session (`qs_...`).
    pub quote: SessionId,
    /// Chart session (`cs_...`).
    pub chart: SessionId,
}

impl SessionIds {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            quote: SessionId::generate(QUOTE_SESSION_PREFIX, rng),
            chart: SessionId::generate(CHART_SESSION_PREFIX, rng),
        }
    }
}
