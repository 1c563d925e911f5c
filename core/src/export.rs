//! CSV output: the four flat tables consumed by the analytics exercises.
//!
//! Layout under the output root:
//!   raw/clients.csv
//!   raw/orders.csv
//!   raw/communications.csv
//!   processed/order_ops_fact.csv

use crate::{engine::Dataset, error::GenResult};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

pub const CLIENT_COLUMNS: [&str; 4] = ["client_id", "client_name", "region", "created_date"];

pub const ORDER_COLUMNS: [&str; 11] = [
    "order_id",
    "client_id",
    "order_datetime",
    "expected_delivery_date",
    "delivery_datetime",
    "status",
    "processed_by",
    "entry_timestamp",
    "is_accurate",
    "item_count",
    "order_value_usd",
];

pub const COMMUNICATION_COLUMNS: [&str; 5] = [
    "order_id",
    "email_count",
    "call_count",
    "first_response_time_hours",
    "followup_count",
];

pub const DERIVED_COLUMNS: [&str; 3] = ["is_late", "order_cycle_days", "responded_within_24h"];

/// Orders columns, then communications columns minus the join key,
/// then the derived columns.
pub fn fact_columns() -> Vec<&'static str> {
    ORDER_COLUMNS
        .iter()
        .chain(COMMUNICATION_COLUMNS.iter().skip(1))
        .chain(DERIVED_COLUMNS.iter())
        .copied()
        .collect()
}

/// Anything a finished dataset can be written to.
pub trait DatasetSink {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    fn write(&mut self, dataset: &Dataset) -> GenResult<()>;
}

/// Write one table: header row, then one row per record.
/// The header is written even when `rows` is empty.
pub fn write_table<W: io::Write, R: Serialize>(
    writer: W,
    header: &[&str],
    rows: &[R],
) -> GenResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub struct CsvSink {
    root: PathBuf,
}

impl CsvSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn clients_path(&self) -> PathBuf {
        self.root.join("raw").join("clients.csv")
    }

    pub fn orders_path(&self) -> PathBuf {
        self.root.join("raw").join("orders.csv")
    }

    pub fn communications_path(&self) -> PathBuf {
        self.root.join("raw").join("communications.csv")
    }

    pub fn fact_path(&self) -> PathBuf {
        self.root.join("processed").join("order_ops_fact.csv")
    }

    fn write_file<R: Serialize>(path: &Path, header: &[&str], rows: &[R]) -> GenResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = BufWriter::new(File::create(path)?);
        write_table(file, header, rows)?;
        log::debug!("export: wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

impl DatasetSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&mut self, dataset: &Dataset) -> GenResult<()> {
        Self::write_file(&self.clients_path(), &CLIENT_COLUMNS, &dataset.clients)?;
        Self::write_file(&self.orders_path(), &ORDER_COLUMNS, &dataset.orders)?;
        Self::write_file(
            &self.communications_path(),
            &COMMUNICATION_COLUMNS,
            &dataset.communications,
        )?;
        Self::write_file(&self.fact_path(), &fact_columns(), &dataset.facts)?;
        log::info!("export: CSV tables written under {}", self.root.display());
        Ok(())
    }
}
