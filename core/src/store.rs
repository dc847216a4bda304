//! CSV persistence layer.
//!
//! RULE: Only store.rs touches the filesystem. Generators build tables
//! in memory (or stream into a writer obtained here); the store owns
//! the directory layout, the CSV encoding, and the run manifest.
//!
//! Layout under the output root:
//!   internal/customers.csv
//!   internal/monthly_usage.csv
//!   internal/support_interactions.csv
//!   internal/campaign_responses.csv
//!   external/zip_demographics.csv
//!   external/economic_indicators.csv
//!   external/competitive_landscape.csv
//!   external/lifestyle_segments.csv
//!   manifest.json
//!
//! Column names are the wire contract consumed by the dashboard and
//! the validation tools — renaming any column is a breaking change.

use crate::{
    campaign::CampaignResponse,
    competitive::CompetitiveMarket,
    config::CATALOG_VERSION,
    customer::CustomerRecord,
    economic::EconomicRecord,
    error::GenResult,
    geography::ZoneRecord,
    interaction::InteractionRecord,
    lifestyle::LifestyleRecord,
    pipeline::DatasetBundle,
    usage::UsageRecord,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

pub const CUSTOMERS_FILE: &str = "internal/customers.csv";
pub const MONTHLY_USAGE_FILE: &str = "internal/monthly_usage.csv";
pub const SUPPORT_INTERACTIONS_FILE: &str = "internal/support_interactions.csv";
pub const CAMPAIGN_RESPONSES_FILE: &str = "internal/campaign_responses.csv";
pub const ZIP_DEMOGRAPHICS_FILE: &str = "external/zip_demographics.csv";
pub const ECONOMIC_INDICATORS_FILE: &str = "external/economic_indicators.csv";
pub const COMPETITIVE_LANDSCAPE_FILE: &str = "external/competitive_landscape.csv";
pub const LIFESTYLE_SEGMENTS_FILE: &str = "external/lifestyle_segments.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Run metadata written next to the tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub seed: u64,
    pub catalog_version: String,
    pub zones: usize,
    pub markets: usize,
    pub customers: usize,
    pub usage_records: usize,
    pub interactions: usize,
    pub campaign_responses: usize,
}

pub struct TableStore {
    root: PathBuf,
}

impl TableStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create internal/ and external/ under the root.
    pub fn prepare_dirs(&self) -> GenResult<()> {
        std::fs::create_dir_all(self.root.join("internal"))?;
        std::fs::create_dir_all(self.root.join("external"))?;
        Ok(())
    }

    /// Persist every materialized table of the bundle plus the manifest.
    /// `usage_records_written` overrides the usage count in the manifest
    /// when the usage table was streamed instead of materialized.
    pub fn write_bundle(
        &self,
        bundle: &DatasetBundle,
        seed: u64,
        usage_records_written: Option<usize>,
    ) -> GenResult<()> {
        self.prepare_dirs()?;

        self.write_table(ZIP_DEMOGRAPHICS_FILE, &bundle.zones)?;
        self.write_table(ECONOMIC_INDICATORS_FILE, &bundle.economics)?;
        self.write_table(COMPETITIVE_LANDSCAPE_FILE, &bundle.markets)?;
        self.write_table(LIFESTYLE_SEGMENTS_FILE, &bundle.lifestyles)?;
        self.write_table(CUSTOMERS_FILE, &bundle.customers)?;
        if usage_records_written.is_none() {
            self.write_table(MONTHLY_USAGE_FILE, &bundle.usage)?;
        }
        self.write_table(SUPPORT_INTERACTIONS_FILE, &bundle.interactions)?;
        self.write_table(CAMPAIGN_RESPONSES_FILE, &bundle.campaigns)?;

        let manifest = RunManifest {
            seed,
            catalog_version: CATALOG_VERSION.to_string(),
            zones: bundle.zones.len(),
            markets: bundle.markets.len(),
            customers: bundle.customers.len(),
            usage_records: usage_records_written.unwrap_or(bundle.usage.len()),
            interactions: bundle.interactions.len(),
            campaign_responses: bundle.campaigns.len(),
        };
        self.write_manifest(&manifest)
    }

    pub fn write_manifest(&self, manifest: &RunManifest) -> GenResult<()> {
        let file = File::create(self.root.join(MANIFEST_FILE))?;
        serde_json::to_writer_pretty(file, manifest)?;
        Ok(())
    }

    pub fn read_manifest(&self) -> GenResult<RunManifest> {
        let file = File::open(self.root.join(MANIFEST_FILE))?;
        Ok(serde_json::from_reader(file)?)
    }

    fn write_table<T: Serialize>(&self, relative: &str, rows: &[T]) -> GenResult<()> {
        let path = self.root.join(relative);
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        log::info!("store: wrote {} rows to {relative}", rows.len());
        Ok(())
    }

    fn read_table<T: DeserializeOwned>(&self, relative: &str) -> GenResult<Vec<T>> {
        let path = self.root.join(relative);
        let mut reader = csv::Reader::from_path(&path)?;
        let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
        log::debug!("store: read {} rows from {relative}", rows.len());
        Ok(rows)
    }

    /// A batched CSV writer for the usage table, for runs too large to
    /// hold the table in memory. Rows arrive in generation order, so
    /// seed-based determinism is preserved.
    pub fn usage_writer(&self) -> GenResult<UsageWriter> {
        self.prepare_dirs()?;
        let writer = csv::Writer::from_path(self.root.join(MONTHLY_USAGE_FILE))?;
        Ok(UsageWriter { inner: writer, rows: 0 })
    }

    pub fn load_zones(&self) -> GenResult<Vec<ZoneRecord>> {
        self.read_table(ZIP_DEMOGRAPHICS_FILE)
    }

    pub fn load_economics(&self) -> GenResult<Vec<EconomicRecord>> {
        self.read_table(ECONOMIC_INDICATORS_FILE)
    }

    pub fn load_markets(&self) -> GenResult<Vec<CompetitiveMarket>> {
        self.read_table(COMPETITIVE_LANDSCAPE_FILE)
    }

    pub fn load_lifestyles(&self) -> GenResult<Vec<LifestyleRecord>> {
        self.read_table(LIFESTYLE_SEGMENTS_FILE)
    }

    pub fn load_customers(&self) -> GenResult<Vec<CustomerRecord>> {
        self.read_table(CUSTOMERS_FILE)
    }

    pub fn load_usage(&self) -> GenResult<Vec<UsageRecord>> {
        self.read_table(MONTHLY_USAGE_FILE)
    }

    pub fn load_interactions(&self) -> GenResult<Vec<InteractionRecord>> {
        self.read_table(SUPPORT_INTERACTIONS_FILE)
    }

    pub fn load_campaigns(&self) -> GenResult<Vec<CampaignResponse>> {
        self.read_table(CAMPAIGN_RESPONSES_FILE)
    }

    /// Load all eight tables back from disk.
    pub fn load_bundle(&self) -> GenResult<DatasetBundle> {
        Ok(DatasetBundle {
            zones: self.load_zones()?,
            economics: self.load_economics()?,
            markets: self.load_markets()?,
            lifestyles: self.load_lifestyles()?,
            customers: self.load_customers()?,
            usage: self.load_usage()?,
            interactions: self.load_interactions()?,
            campaigns: self.load_campaigns()?,
        })
    }
}

pub struct UsageWriter {
    inner: csv::Writer<File>,
    rows: usize,
}

impl UsageWriter {
    pub fn append(&mut self, record: &UsageRecord) -> GenResult<()> {
        self.inner.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and return the number of rows written.
    pub fn finish(mut self) -> GenResult<usize> {
        self.inner.flush()?;
        Ok(self.rows)
    }
}

/// Encode any row slice as CSV bytes. Used by the determinism tests to
/// compare whole tables byte-for-byte without touching the filesystem.
pub fn table_to_csv_bytes<T: Serialize>(rows: &[T]) -> GenResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv buffer flush failed: {e}"))?)
}
