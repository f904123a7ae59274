use std::sync::Arc;

use perpetua::{BinanceConfig, PerpetuaError, SeriesType, UpstreamClient};
use perpetua_mock::{PagedUpstream, fixtures};

/// Upstream for the demos: the fixture mock when `PERPETUA_DEMOS_USE_MOCK`
/// is set, otherwise the live Binance endpoints without a throttle layer.
pub fn get_client(start: i64) -> Result<Arc<dyn UpstreamClient>, PerpetuaError> {
    if std::env::var("PERPETUA_DEMOS_USE_MOCK").is_ok() {
        println!("--- (Using mock upstream) ---");
        let step = 5 * 60 * 1000;
        let mock = PagedUpstream::new()
            .with_records(
                SeriesType::OpenInterest,
                fixtures::series_records(SeriesType::OpenInterest, start, step, 600),
            )
            .with_records(
                SeriesType::FundingRate,
                fixtures::series_records(
                    SeriesType::FundingRate,
                    start,
                    fixtures::FUNDING_INTERVAL_MS,
                    30,
                ),
            );
        return Ok(Arc::new(mock));
    }
    Ok(Arc::new(perpetua_binance::BinanceClient::new_raw(
        BinanceConfig::default(),
    )?))
}
