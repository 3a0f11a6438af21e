//! Binary to fetch historical bars for one symbol and print them.
//!
//! # Usage
//!
//! ```sh
//! export TV_USERNAME="your-username"      # only needed without a cached token
//! export TV_PASSWORD="your-password"
//! export TV_TOKEN_CACHE="~/.tv_token.json" # optional
//! cargo run --bin tv_hist --features cli -- NIFTY NSE 1D 10 1
//! ```
//!
//! Arguments: `SYMBOL [EXCHANGE] [INTERVAL] [N_BARS] [FUT_CONTRACT]`.

use std::env;

use tvfeed_rs::TvClient;
use tvfeed_rs::config::ClientConfig;
use tvfeed_rs::error::TvError;
use tvfeed_rs::types::Interval;
use tvfeed_rs::types::historical::HistoricalRequest;

const USAGE: &str = "usage: tv_hist SYMBOL [EXCHANGE] [INTERVAL] [N_BARS] [FUT_CONTRACT]";

#[tokio::main]
async fn main() -> tvfeed_rs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let symbol = args.next().ok_or_else(|| TvError::InvalidArgument(USAGE.into()))?;
    let exchange = args.next().unwrap_or_else(|| "NSE".to_owned());
    let interval: Interval = match args.next() {
        Some(s) => s.parse()?,
        None => Interval::Daily,
    };
    let n_bars: u32 = match args.next() {
        Some(s) => s
            .parse()
            .map_err(|_| TvError::InvalidArgument(format!("invalid bar count {s:?}")))?,
        None => 10,
    };
    let fut_contract: Option<u32> = match args.next() {
        Some(s) => Some(
            s.parse()
                .map_err(|_| TvError::InvalidArgument(format!("invalid contract {s:?}")))?,
        ),
        None => None,
    };

    let mut config = ClientConfig {
        username: env::var("TV_USERNAME").ok(),
        password: env::var("TV_PASSWORD").ok(),
        debug: env::var("TV_WS_DEBUG").is_ok(),
        ..ClientConfig::default()
    };
    if let Ok(path) = env::var("TV_TOKEN_CACHE") {
        config.token_cache_path = path.into();
    }

    let client = TvClient::from_config(config).await?;

    let mut req = HistoricalRequest::new(symbol, exchange)
        .interval(interval)
        .n_bars(n_bars);
    req.fut_contract = fut_contract;

    let hist = client.get_hist(&req).await?;

    println!("{} ({} bars)", hist.symbol, hist.len());
    println!(
        "{:<25} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "datetime", "open", "high", "low", "close", "volume"
    );
    for bar in &hist.bars {
        println!(
            "{:<25} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.0}",
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        );
    }

    Ok(())
}
