//! Symbol search endpoint.

use serde::Deserialize;

use crate::client::TvClient;
use crate::error::{Result, TvError};
use crate::types::symbol::SymbolSearchResult;

/// The endpoint has answered both with a bare array and with an object
/// wrapping it, depending on version.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    List(Vec<SymbolSearchResult>),
    Wrapped { symbols: Vec<SymbolSearchResult> },
}

impl TvClient {
    /// Search for symbols matching free text, optionally restricted to an
    /// exchange (pass `""` for all exchanges).
    ///
    /// **Endpoint:** `GET https://symbol-search.tradingview.com/symbol_search/`
    ///
    /// The response highlights matches with `<em>` tags, which are stripped
    /// before the JSON is parsed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tvfeed_rs::TvClient;
    /// # async fn demo(client: &TvClient) -> tvfeed_rs::Result<()> {
    /// for hit in client.search_symbol("NIFTY", "NSE").await? {
    ///     println!("{} — {}", hit.qualified(), hit.description);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_symbol(
        &self,
        text: &str,
        exchange: &str,
    ) -> Result<Vec<SymbolSearchResult>> {
        let url = url::Url::parse_with_params(
            &self.config().search_url,
            [
                ("text", text),
                ("hl", "1"),
                ("exchange", exchange),
                ("lang", "en"),
                ("type", ""),
                ("domain", "production"),
            ],
        )?;
        tracing::debug!(%url, "GET symbol_search");

        let resp = self.http().get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(TvError::HttpStatus { status, body });
        }

        let cleaned = body.replace("<em>", "").replace("</em>", "");
        let results = match serde_json::from_str(&cleaned)? {
            SearchResponse::List(list) => list,
            SearchResponse::Wrapped { symbols } => symbols,
        };

        tracing::debug!(count = results.len(), %text, "symbol search results");
        Ok(results)
    }
}
