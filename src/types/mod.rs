//! Request and response types for the chart data feed.
//!
//! ## Organization
//!
//! - [`enums`] — Interval and session-mode enumerations
//! - [`historical`] — Historical request, bar, and result types
//! - [`symbol`] — Symbol formatting and symbol-search results
//!
//! All enums are re-exported at the module root via `pub use enums::*`.

pub mod enums;
pub mod historical;
pub mod symbol;

pub use enums::*;
