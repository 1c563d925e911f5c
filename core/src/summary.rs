//! End-of-run KPIs, written next to the fact table as summary.json.

use crate::{engine::Dataset, error::GenResult, order_subsystem::OrderStatus, types::RunId};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetSummary {
    pub run_id: RunId,
    pub seed: u64,
    pub clients: usize,
    pub orders: usize,
    pub delivered: usize,
    pub pending: usize,
    pub returned: usize,
    pub cancelled: usize,
    pub inaccurate_orders: usize,
    pub late_orders: usize,
    /// Late share among orders that have a delivery timestamp.
    pub late_rate: f64,
    /// Mean order_cycle_days over rows with a delivery; None when there are none.
    pub avg_cycle_days: Option<f64>,
    pub responded_within_24h_rate: f64,
    pub total_order_value_usd: f64,
    pub avg_order_value_usd: f64,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let count_status = |s: OrderStatus| dataset.orders.iter().filter(|o| o.status == s).count();
        let facts = &dataset.facts;

        let cycle_days: Vec<f64> = facts.iter().filter_map(|f| f.order_cycle_days).collect();
        let delivered_rows = cycle_days.len();
        let late_orders = facts.iter().filter(|f| f.is_late == 1).count();
        let responded = facts.iter().filter(|f| f.responded_within_24h == 1).count();
        let total_value: f64 = dataset.orders.iter().map(|o| o.order_value_usd).sum();

        Self {
            run_id: dataset.run_id.clone(),
            seed: dataset.seed,
            clients: dataset.clients.len(),
            orders: dataset.orders.len(),
            delivered: count_status(OrderStatus::Delivered),
            pending: count_status(OrderStatus::Pending),
            returned: count_status(OrderStatus::Returned),
            cancelled: count_status(OrderStatus::Cancelled),
            inaccurate_orders: dataset.orders.iter().filter(|o| o.is_accurate == 0).count(),
            late_orders,
            late_rate: ratio(late_orders, delivered_rows),
            avg_cycle_days: if delivered_rows == 0 {
                None
            } else {
                Some(cycle_days.iter().sum::<f64>() / delivered_rows as f64)
            },
            responded_within_24h_rate: ratio(responded, facts.len()),
            total_order_value_usd: total_value,
            avg_order_value_usd: if dataset.orders.is_empty() {
                0.0
            } else {
                total_value / dataset.orders.len() as f64
            },
        }
    }

    pub fn write_json(&self, path: &Path) -> GenResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
