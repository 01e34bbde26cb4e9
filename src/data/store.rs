//! Load-once cache of normalized records per market.
//!
//! A market directory holds one CSV per market (`<name>_market_data.csv`) plus
//! an optional `markets_summary.csv`, which is ignored. Files that cannot be read
//! or lack the required columns are skipped with a warning so one bad export
//! does not hide the rest.
//!
//! The store is never mutated after loading; grid requests only borrow it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::PriceRecord;
use crate::error::AppError;
use crate::io::ingest::{NormalizeStats, normalize_records, read_market_csv};

const SUMMARY_FILE: &str = "markets_summary.csv";
const MARKET_SUFFIX: &str = "_market_data.csv";

/// Normalized records of one market.
#[derive(Debug, Clone)]
pub struct MarketData {
    pub name: String,
    pub source: PathBuf,
    /// All commodities, ascending by date.
    pub records: Vec<PriceRecord>,
    /// Sorted, de-duplicated commodity names.
    pub crops: Vec<String>,
    pub stats: NormalizeStats,
}

impl MarketData {
    pub fn new(name: impl Into<String>, source: PathBuf, records: Vec<PriceRecord>, stats: NormalizeStats) -> Self {
        let mut crops: Vec<String> = records
            .iter()
            .map(|r| r.commodity.clone())
            .filter(|c| !c.is_empty())
            .collect();
        crops.sort();
        crops.dedup();

        Self {
            name: name.into(),
            source,
            records,
            crops,
            stats,
        }
    }

    /// Records of one commodity, still in date order.
    pub fn crop_records(&self, crop: &str) -> Vec<PriceRecord> {
        self.records
            .iter()
            .filter(|r| r.commodity == crop)
            .cloned()
            .collect()
    }

    /// Resolve a crop name, exact match first, then ASCII case-insensitive.
    pub fn resolve_crop(&self, crop: &str) -> Option<&str> {
        let crop = crop.trim();
        self.crops
            .iter()
            .find(|c| c.as_str() == crop)
            .or_else(|| self.crops.iter().find(|c| c.eq_ignore_ascii_case(crop)))
            .map(String::as_str)
    }
}

/// All loaded markets keyed by display name.
#[derive(Debug, Clone, Default)]
pub struct MarketStore {
    markets: BTreeMap<String, MarketData>,
}

impl MarketStore {
    pub fn from_markets(markets: impl IntoIterator<Item = MarketData>) -> Self {
        Self {
            markets: markets.into_iter().map(|m| (m.name.clone(), m)).collect(),
        }
    }

    /// Load every market CSV in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, AppError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| AppError::input(format!("Failed to read market directory '{}': {e}", dir.display())))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_market_file(p))
            .collect();
        paths.sort();

        let mut markets = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(market_name_from_file)
            else {
                continue;
            };

            let raw = match read_market_csv(&path, &name) {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Skipping market file");
                    continue;
                }
            };

            let normalized = normalize_records(raw);
            tracing::info!(
                market = %name,
                rows = normalized.stats.rows_read,
                used = normalized.stats.rows_used(),
                "Market loaded"
            );
            markets.push(MarketData::new(name, path, normalized.records, normalized.stats));
        }

        if markets.is_empty() {
            tracing::warn!(dir = %dir.display(), "No usable market files found");
        }

        Ok(Self::from_markets(markets))
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    pub fn market_names(&self) -> impl Iterator<Item = &str> {
        self.markets.keys().map(String::as_str)
    }

    pub fn markets(&self) -> impl Iterator<Item = &MarketData> {
        self.markets.values()
    }

    /// Look up a market, exact match first, then ASCII case-insensitive.
    pub fn market(&self, name: &str) -> Option<&MarketData> {
        let name = name.trim();
        self.markets.get(name).or_else(|| {
            self.markets
                .values()
                .find(|m| m.name.eq_ignore_ascii_case(name))
        })
    }
}

/// Derive a display name from a market file name.
///
/// `navi_mumbai_market_data.csv` -> `Navi Mumbai`.
pub fn market_name_from_file(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(MARKET_SUFFIX)
        .or_else(|| file_name.strip_suffix(".csv"))
        .unwrap_or(file_name);
    title_case(&stem.replace('_', " "))
}

fn is_market_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_file() && name.ends_with(".csv") && name != SUMMARY_FILE
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "State,District,Market,Commodity,Variety,Arrival_Date,Min_Price,Max_Price,Modal_Price";

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn market_names_from_files() {
        assert_eq!(market_name_from_file("navi_mumbai_market_data.csv"), "Navi Mumbai");
        assert_eq!(market_name_from_file("PUNE_market_data.csv"), "Pune");
        assert_eq!(market_name_from_file("kolar.csv"), "Kolar");
        assert_eq!(market_name_from_file("apmc(vashi)_market_data.csv"), "Apmc(Vashi)");
    }

    #[test]
    fn loads_directory_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "pune_market_data.csv",
            &format!(
                "{HEADER}\n\
                 MH,Pune,Pune,Onion,Red,2024-01-10,1000,1400,1200\n\
                 MH,Pune,Pune,Tomato,Local,2024-01-03,500,900,700\n\
                 MH,Pune,Pune,Onion,Red,2024-01-02,900,1300,1100\n\
                 MH,Pune,Pune,Onion,Red,,900,1300,1100\n"
            ),
        );
        write(dir.path(), "broken_market_data.csv", "Commodity,Modal_Price\nOnion,10\n");
        write(dir.path(), "markets_summary.csv", "Market,Total_Records\nPune,3\n");
        write(dir.path(), "notes.txt", "ignore me");

        let store = MarketStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.market_names().collect::<Vec<_>>(), vec!["Pune"]);

        let pune = store.market("pune").unwrap();
        assert_eq!(pune.crops, vec!["Onion".to_string(), "Tomato".to_string()]);
        assert_eq!(pune.stats.rows_read, 4);
        assert_eq!(pune.stats.dropped_bad_date, 1);

        let onion = pune.crop_records("Onion");
        assert_eq!(onion.len(), 2);
        assert!(onion[0].date < onion[1].date);
        assert_eq!(pune.resolve_crop("onion"), Some("Onion"));
        assert_eq!(pune.resolve_crop("Garlic"), None);
    }

    #[test]
    fn missing_directory_is_an_input_error() {
        let err = MarketStore::load_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
