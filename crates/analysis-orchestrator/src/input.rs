use analysis_core::Ticker;

/// Parse a comma-separated ticker list: trim, upper-case, drop blanks and
/// invalid symbols, dedup in order, keep at most `max`.
pub fn parse_ticker_input(input: &str, max: usize) -> Vec<Ticker> {
    let mut tickers: Vec<Ticker> = Vec::new();

    for raw in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match Ticker::parse(raw) {
            Ok(ticker) if !tickers.contains(&ticker) => tickers.push(ticker),
            Ok(_) => {}
            Err(e) => tracing::warn!("Skipping ticker {:?}: {}", raw, e),
        }
    }

    if tickers.len() > max {
        tracing::info!("Keeping the first {} of {} tickers", max, tickers.len());
        tickers.truncate(max);
    }
    tickers
}
