//! Order & communication generation.
//!
//! DRAW ORDER (fixed, never reordered; reordering changes every row):
//!   categorical stream, per order:
//!     client, order time, expected offset, status, late-tail roll,
//!     delivery offset, rep, entry delay, rushed, accuracy
//!   numeric stream, per order:
//!     item count, order value, email count, call count, response time
//!
//! The `rushed` flag is drawn per order and never persisted. It biases
//! accuracy and first response time.

use crate::{
    calendar::{serialize_date_part, serialize_datetime, serialize_opt_datetime, DateWindow},
    client_subsystem::ClientRecord,
    config::GenConfig,
    numeric::{clamp, round2},
    rng::SubsystemRng,
    types::{EntityId, Timestamp},
};
use chrono::Duration;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Delivered,
    Pending,
    Returned,
    Cancelled,
}

impl OrderStatus {
    /// Same order as `StatusWeights::as_array`.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Delivered,
        OrderStatus::Pending,
        OrderStatus::Returned,
        OrderStatus::Cancelled,
    ];

    /// Only Delivered and Returned orders ever reached the client.
    pub fn has_delivery(&self) -> bool {
        matches!(self, Self::Delivered | Self::Returned)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::Pending => "Pending",
            Self::Returned => "Returned",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderRecord {
    pub order_id: EntityId,
    pub client_id: EntityId,
    #[serde(serialize_with = "serialize_datetime")]
    pub order_datetime: Timestamp,
    /// Full timestamp; only the date part is written out.
    #[serde(rename = "expected_delivery_date", serialize_with = "serialize_date_part")]
    pub expected_delivery: Timestamp,
    #[serde(serialize_with = "serialize_opt_datetime")]
    pub delivery_datetime: Option<Timestamp>,
    pub status: OrderStatus,
    pub processed_by: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub entry_timestamp: Timestamp,
    pub is_accurate: u8,
    pub item_count: u64,
    pub order_value_usd: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommunicationRecord {
    pub order_id: EntityId,
    pub email_count: u64,
    pub call_count: u64,
    pub first_response_time_hours: f64,
    pub followup_count: u64,
}

/// Orders and their 1:1 communication records, in generation order.
#[derive(Debug, Clone, Default)]
pub struct OrderBatch {
    pub orders: Vec<OrderRecord>,
    pub communications: Vec<CommunicationRecord>,
}

pub fn order_id(index: usize) -> EntityId {
    format!("ORD{index:06}")
}

pub struct OrderSubsystem<'a> {
    config: &'a GenConfig,
    window: DateWindow,
    reps: Vec<String>,
}

impl<'a> OrderSubsystem<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self {
            config,
            window: config.order_window(),
            reps: config.rep_ids(),
        }
    }

    /// Generate `n_orders` orders against `clients`, each paired with
    /// one communication record.
    pub fn generate(
        &self,
        clients: &[ClientRecord],
        rng: &mut SubsystemRng,
        numeric: &mut SubsystemRng,
    ) -> OrderBatch {
        assert!(!clients.is_empty(), "orders need at least one client");
        let n = self.config.n_orders;
        let mut batch = OrderBatch {
            orders: Vec::with_capacity(n),
            communications: Vec::with_capacity(n),
        };
        for i in 1..=n {
            let (order, comms) = self.generate_one(i, clients, rng, numeric);
            batch.orders.push(order);
            batch.communications.push(comms);
        }
        log::info!(
            "order: generated {} orders and {} communication records",
            batch.orders.len(),
            batch.communications.len()
        );
        batch
    }

    fn generate_one(
        &self,
        index: usize,
        clients: &[ClientRecord],
        rng: &mut SubsystemRng,
        numeric: &mut SubsystemRng,
    ) -> (OrderRecord, CommunicationRecord) {
        let o = &self.config.order;
        let c = &self.config.comms;
        let order_id = order_id(index);

        let client = rng.pick(clients);
        let order_datetime = self.window.sample(rng);
        let expected_delivery = order_datetime + days_in(rng, o.expected_delivery_days);
        let status = self.pick_status(rng);

        let delivery_datetime = if status.has_delivery() {
            // Late tail vs near-on-time arrival (which may be a day early).
            let offset = if rng.chance(o.late_tail_probability) {
                days_in(rng, o.late_tail_days)
            } else {
                days_in(rng, o.on_time_days)
            };
            Some(expected_delivery + offset)
        } else {
            None
        };

        let processed_by = rng.pick(&self.reps).clone();
        let (lo, hi) = o.entry_delay_minutes;
        let entry_timestamp = order_datetime + Duration::minutes(rng.range_inclusive(lo, hi));

        let rushed = rng.chance(o.rushed_probability);
        let error_rate = if rushed {
            o.error_rate_rushed
        } else {
            o.error_rate_normal
        };
        let is_accurate = if rng.chance(error_rate) { 0 } else { 1 };

        let (lo, hi) = o.item_count_bounds;
        let item_count = clamp(numeric.poisson(o.item_count_lambda), lo, hi);
        let (lo, hi) = o.value_bounds;
        let order_value_usd = round2(clamp(numeric.normal(o.value_mean, o.value_std), lo, hi));

        let (lo, hi) = c.email_bounds;
        let email_count = clamp(numeric.poisson(c.email_lambda), lo, hi);
        let (lo, hi) = c.call_bounds;
        let call_count = clamp(numeric.poisson(c.call_lambda), lo, hi);

        let mut response = numeric.lognormal(c.response_log_mean, c.response_log_sigma);
        if rushed {
            response *= c.rushed_response_multiplier;
        }
        let (lo, hi) = c.response_bounds;
        let first_response_time_hours = round2(clamp(response, lo, hi));

        let (lo, hi) = c.followup_bounds;
        let followup_count = clamp(email_count as i64 + call_count as i64 - 1, lo, hi).max(0) as u64;

        let order = OrderRecord {
            order_id: order_id.clone(),
            client_id: client.client_id.clone(),
            order_datetime,
            expected_delivery,
            delivery_datetime,
            status,
            processed_by,
            entry_timestamp,
            is_accurate,
            item_count,
            order_value_usd,
        };
        let comms = CommunicationRecord {
            order_id,
            email_count,
            call_count,
            first_response_time_hours,
            followup_count,
        };
        (order, comms)
    }

    fn pick_status(&self, rng: &mut SubsystemRng) -> OrderStatus {
        let weights = self.config.status_weights.as_array();
        OrderStatus::ALL[rng.weighted_index(&weights)]
    }
}

fn days_in(rng: &mut SubsystemRng, (lo, hi): (i64, i64)) -> Duration {
    Duration::days(rng.range_inclusive(lo, hi))
}
