mod common;

use std::sync::Arc;

use perpetua::{DataApi, DataQuery, Perpetua, ThrottleConfig};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    let end = chrono::Utc::now().timestamp_millis() / DAY_MS * DAY_MS;
    let start = end - DAY_MS;

    // Pass a query string to try your own, e.g.
    // `dataType=takerVolume&startTime=...&endTime=...&period=1h`.
    let raw = std::env::args().nth(1).unwrap_or_else(|| {
        format!("dataType=openInterest&startTime={start}&endTime={end}&period=15m")
    });

    let perpetua = Perpetua::builder()
        .with_client(common::get_client(start)?)
        .throttle(ThrottleConfig::default())
        .build()?;
    let api = DataApi::new(Arc::new(perpetua));

    let reply = api.handle(&DataQuery::from_query_string(&raw)).await;
    println!("HTTP {}", reply.status);
    if let Some(meta) = &reply.body.meta {
        println!("{}", serde_json::to_string_pretty(meta)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&reply.body)?);
    }
    Ok(())
}
