//! Shared "grid pipeline" logic.
//!
//! One request carries everything a grid build needs:
//! market lookup -> crop lookup -> fill -> interpolate -> classify
//!
//! Nothing here touches global state; front-ends pass a `GridRequest` and an
//! already-loaded `MarketStore` and decide how to present the result.

use rand::Rng;

use crate::data::{MarketData, MarketStore};
use crate::domain::{GridConfig, PriceRecord};
use crate::error::AppError;
use crate::grid::{GridOutcome, build_grid, jitter_rng};

/// One market/crop selection plus its grid options.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub market: String,
    pub crop: String,
    pub config: GridConfig,
}

/// The resolved selection and its grid.
#[derive(Debug, Clone)]
pub struct GridRun {
    /// Market display name as stored.
    pub market: String,
    /// Crop name as it appears in the data.
    pub crop: String,
    pub n_records: usize,
    pub outcome: GridOutcome,
}

/// Records for a market/crop pair, with names resolved case-insensitively.
pub fn select_records<'a>(
    store: &'a MarketStore,
    market: &str,
    crop: &str,
) -> Result<(&'a MarketData, String, Vec<PriceRecord>), AppError> {
    let data = store.market(market).ok_or_else(|| {
        let known: Vec<&str> = store.market_names().collect();
        AppError::no_data(format!("Unknown market '{market}'. Known markets: {}", known.join(", ")))
    })?;

    let crop_name = data.resolve_crop(crop).ok_or_else(|| {
        AppError::no_data(format!(
            "No crop '{crop}' in market '{}'. Known crops: {}",
            data.name,
            data.crops.join(", ")
        ))
    })?;

    let records = data.crop_records(crop_name);
    Ok((data, crop_name.to_string(), records))
}

/// Run a grid request with an RNG derived from the request's seed.
pub fn run_grid(store: &MarketStore, request: &GridRequest) -> Result<GridRun, AppError> {
    run_grid_with_rng(store, request, &mut jitter_rng(request.config.seed))
}

/// Run a grid request drawing jitter from `rng`.
pub fn run_grid_with_rng<R: Rng + ?Sized>(
    store: &MarketStore,
    request: &GridRequest,
    rng: &mut R,
) -> Result<GridRun, AppError> {
    let (data, crop, records) = select_records(store, &request.market, &request.crop)?;

    tracing::info!(
        market = %data.name,
        crop = %crop,
        records = records.len(),
        price_type = request.config.price_type.column_name(),
        "Building grid"
    );

    let outcome = build_grid(&records, &request.config, rng);

    Ok(GridRun {
        market: data.name.clone(),
        crop,
        n_records: records.len(),
        outcome,
    })
}
