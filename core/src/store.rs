//! SQLite persistence layer: optional second sink for the dataset.
//!
//! RULE: Only store.rs talks to the database.
//! Rows are keyed by run_id so several runs can share one file.

use crate::{
    calendar::{format_date, format_datetime},
    engine::Dataset,
    error::GenResult,
    export::DatasetSink,
};
use rusqlite::{params, Connection};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> GenResult<()> {
        upsert_run(&self.conn, run_id, seed, version)
    }

    pub fn run_seed(&self, run_id: &str) -> GenResult<Option<u64>> {
        let mut stmt = self.conn.prepare("SELECT seed FROM run WHERE run_id = ?1")?;
        let mut rows = stmt.query(params![run_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get::<_, i64>(0)? as u64)),
            None => Ok(None),
        }
    }

    // ── Read-back ──────────────────────────────────────────────

    pub fn client_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("clients", run_id)
    }

    pub fn order_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("orders", run_id)
    }

    pub fn communication_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("communications", run_id)
    }

    pub fn fact_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("order_ops_fact", run_id)
    }

    pub fn late_count(&self, run_id: &str) -> GenResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM order_ops_fact WHERE run_id = ?1 AND is_late = 1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// Orders that carry a delivery timestamp, grouped by status.
    pub fn delivered_count_by_status(&self, run_id: &str) -> GenResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM orders
             WHERE run_id = ?1 AND delivery_datetime IS NOT NULL
             GROUP BY status ORDER BY status ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // Table names are internal constants, never user input.
    fn count_rows(&self, table: &str, run_id: &str) -> GenResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE run_id = ?1");
        let n = self.conn.query_row(&sql, params![run_id], |row| row.get(0))?;
        Ok(n)
    }
}

fn upsert_run(conn: &Connection, run_id: &str, seed: u64, version: &str) -> GenResult<()> {
    conn.execute(
        "INSERT INTO run (run_id, seed, version) VALUES (?1, ?2, ?3)
         ON CONFLICT(run_id) DO UPDATE SET seed = excluded.seed, version = excluded.version",
        params![run_id, seed as i64, version],
    )?;
    Ok(())
}

impl DatasetSink for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    /// Replace the run's rows with `dataset` in one transaction.
    fn write(&mut self, dataset: &Dataset) -> GenResult<()> {
        let run_id = dataset.run_id.as_str();
        let tx = self.conn.transaction()?;

        for table in ["order_ops_fact", "communications", "orders", "clients"] {
            tx.execute(
                &format!("DELETE FROM {table} WHERE run_id = ?1"),
                params![run_id],
            )?;
        }
        upsert_run(&tx, run_id, dataset.seed, env!("CARGO_PKG_VERSION"))?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO clients (run_id, client_id, client_name, region, created_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for c in &dataset.clients {
                stmt.execute(params![
                    run_id,
                    c.client_id,
                    c.client_name,
                    c.region.as_str(),
                    format_date(&c.created_date),
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO orders (run_id, order_id, client_id, order_datetime,
                    expected_delivery_date, delivery_datetime, status, processed_by,
                    entry_timestamp, is_accurate, item_count, order_value_usd)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for o in &dataset.orders {
                stmt.execute(params![
                    run_id,
                    o.order_id,
                    o.client_id,
                    format_datetime(&o.order_datetime),
                    format_date(&o.expected_delivery.date()),
                    o.delivery_datetime.as_ref().map(format_datetime),
                    o.status.as_str(),
                    o.processed_by,
                    format_datetime(&o.entry_timestamp),
                    o.is_accurate as i64,
                    o.item_count as i64,
                    o.order_value_usd,
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO communications (run_id, order_id, email_count, call_count,
                    first_response_time_hours, followup_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for c in &dataset.communications {
                stmt.execute(params![
                    run_id,
                    c.order_id,
                    c.email_count as i64,
                    c.call_count as i64,
                    c.first_response_time_hours,
                    c.followup_count as i64,
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO order_ops_fact (run_id, order_id, client_id, order_datetime,
                    expected_delivery_date, delivery_datetime, status, processed_by,
                    entry_timestamp, is_accurate, item_count, order_value_usd,
                    email_count, call_count, first_response_time_hours, followup_count,
                    is_late, order_cycle_days, responded_within_24h)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                         ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            )?;
            for f in &dataset.facts {
                stmt.execute(params![
                    run_id,
                    f.order_id,
                    f.client_id,
                    format_datetime(&f.order_datetime),
                    format_date(&f.expected_delivery.date()),
                    f.delivery_datetime.as_ref().map(format_datetime),
                    f.status.as_str(),
                    f.processed_by,
                    format_datetime(&f.entry_timestamp),
                    f.is_accurate as i64,
                    f.item_count as i64,
                    f.order_value_usd,
                    f.email_count as i64,
                    f.call_count as i64,
                    f.first_response_time_hours,
                    f.followup_count as i64,
                    f.is_late as i64,
                    f.order_cycle_days,
                    f.responded_within_24h as i64,
                ])?;
            }
        }

        tx.commit()?;
        log::info!(
            "store: persisted run {run_id} ({} clients, {} orders)",
            dataset.clients.len(),
            dataset.orders.len()
        );
        Ok(())
    }
}
