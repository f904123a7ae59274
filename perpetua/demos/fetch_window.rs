mod common;

use perpetua::{Period, Perpetua, SeriesType, ThrottleConfig};
use tracing_subscriber::fmt::format::FmtSpan;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,perpetua=debug,perpetua_middleware=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    let end = chrono::Utc::now().timestamp_millis() / DAY_MS * DAY_MS;
    let start = end - DAY_MS;

    let perpetua = Perpetua::builder()
        .with_client(common::get_client(start)?)
        .throttle(ThrottleConfig::default())
        .build()?;

    let oi = perpetua
        .fetch_range(SeriesType::OpenInterest, start, end, Some(Period::M5))
        .await?;
    println!(
        "openInterest 5m: {} records in {} calls ({:?})",
        oi.record_count(),
        oi.calls,
        oi.termination
    );
    if let (Some(first), Some(last)) = (oi.records.first(), oi.records.last()) {
        println!("  first: {}", first.as_value());
        println!("  last:  {}", last.as_value());
    }

    let funding = perpetua
        .fetch_range(SeriesType::FundingRate, start - 7 * DAY_MS, end, None)
        .await?;
    println!(
        "fundingRate: {} records over 8 days ({:?})",
        funding.record_count(),
        funding.termination
    );
    if funding.termination.is_partial() {
        eprintln!("warning: window only partially covered");
    }

    Ok(())
}
