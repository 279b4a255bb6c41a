//! Historical price data: the market-data collaborator boundary.
//!
//! The core only ever consumes a [`PriceSeries`] whose assets share one
//! common date index. Where the prices come from is behind the
//! [`PriceSource`] trait; [`CsvDirSource`] reads one CSV file per asset
//! from a local directory.

use crate::error::{AnnealError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Adjusted-close prices for a fixed asset universe over an aligned
/// date index.
///
/// `prices[row][col]` is the price of `assets[col]` on `dates[row]`.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    /// Ordered asset universe; fixes column indexing.
    pub assets: Vec<String>,
    /// Common date index, ascending.
    pub dates: Vec<NaiveDate>,
    /// One row per date, one column per asset.
    pub prices: Vec<Vec<f64>>,
}

impl PriceSeries {
    /// Number of aligned observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Provider of aligned historical prices for an asset universe.
///
/// The only contract the core places on an implementation: at least 2
/// aligned observations per asset in `[start, end)`, else the run
/// cannot start.
pub trait PriceSource {
    fn fetch(&self, assets: &[String], start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

/// One CSV row of a per-asset price file.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Adj Close", alias = "close", alias = "Close")]
    adj_close: f64,
}

/// Reads `<ASSET>.csv` files (`date,adj_close` columns) from a directory
/// and inner-joins them on the common date index.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn load_asset(
        &self,
        asset: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>> {
        let path = self.dir.join(format!("{asset}.csv"));
        let mut reader = csv::Reader::from_path(&path).map_err(|e| {
            AnnealError::Data(format!("cannot open prices for {asset} at {path:?}: {e}"))
        })?;

        let mut series = BTreeMap::new();
        for record in reader.deserialize() {
            let record: PriceRecord = record?;
            // window is half-open: [start, end)
            if record.date >= start && record.date < end {
                series.insert(record.date, record.adj_close);
            }
        }
        if series.is_empty() {
            return Err(AnnealError::Data(format!(
                "no observations for {asset} in [{start}, {end})"
            )));
        }
        Ok(series)
    }
}

impl PriceSource for CsvDirSource {
    fn fetch(&self, assets: &[String], start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        if assets.is_empty() {
            return Err(AnnealError::Data("empty asset universe".into()));
        }

        let per_asset: Vec<BTreeMap<NaiveDate, f64>> = assets
            .iter()
            .map(|a| self.load_asset(a, start, end))
            .collect::<Result<_>>()?;

        // Inner join: keep only dates present for every asset.
        let mut dates: Vec<NaiveDate> = per_asset[0].keys().copied().collect();
        for series in &per_asset[1..] {
            dates.retain(|d| series.contains_key(d));
        }

        let prices: Vec<Vec<f64>> = dates
            .iter()
            .map(|d| per_asset.iter().map(|s| s[d]).collect())
            .collect();

        Ok(PriceSeries {
            assets: assets.to_vec(),
            dates,
            prices,
        })
    }
}
