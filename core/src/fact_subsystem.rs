//! Fact derivation: the order_ops_fact table.
//!
//! Left join of orders with communications on `order_id`, plus three
//! derived columns. Every order has exactly one communication record;
//! anything else is a join contract violation and is reported, never
//! papered over with null or duplicated rows.

use crate::{
    calendar::{midnight, serialize_date_part, serialize_datetime, serialize_opt_datetime},
    error::{GenError, GenResult},
    order_subsystem::{CommunicationRecord, OrderRecord, OrderStatus},
    types::{EntityId, Timestamp},
};
use serde::Serialize;
use std::collections::HashMap;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FactRecord {
    // ── order columns ──────────────────────────────
    pub order_id: EntityId,
    pub client_id: EntityId,
    #[serde(serialize_with = "serialize_datetime")]
    pub order_datetime: Timestamp,
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

    // ── communication columns ──────────────────────
    pub email_count: u64,
    pub call_count: u64,
    pub first_response_time_hours: f64,
    pub followup_count: u64,

    // ── derived ────────────────────────────────────
    pub is_late: u8,
    pub order_cycle_days: Option<f64>,
    pub responded_within_24h: u8,
}

/// Late means delivered strictly after midnight of the expected date.
pub fn is_late(order: &OrderRecord) -> bool {
    match order.delivery_datetime {
        Some(delivered) => delivered > midnight(order.expected_delivery.date()),
        None => false,
    }
}

/// Fractional days from order placement to delivery.
pub fn order_cycle_days(order: &OrderRecord) -> Option<f64> {
    order
        .delivery_datetime
        .map(|delivered| (delivered - order.order_datetime).num_seconds() as f64 / SECONDS_PER_DAY)
}

pub struct FactSubsystem {
    response_sla_hours: f64,
}

impl FactSubsystem {
    pub fn new(response_sla_hours: f64) -> Self {
        Self { response_sla_hours }
    }

    pub fn responded_in_time(&self, comms: &CommunicationRecord) -> bool {
        comms.first_response_time_hours <= self.response_sla_hours
    }

    /// Join and derive. Output rows follow the order of `orders`.
    pub fn derive(
        &self,
        orders: &[OrderRecord],
        communications: &[CommunicationRecord],
    ) -> GenResult<Vec<FactRecord>> {
        let mut by_order: HashMap<&str, (usize, &CommunicationRecord)> =
            HashMap::with_capacity(communications.len());
        for comms in communications {
            by_order
                .entry(comms.order_id.as_str())
                .and_modify(|(n, _)| *n += 1)
                .or_insert((1, comms));
        }

        let mut facts = Vec::with_capacity(orders.len());
        for order in orders {
            let comms = match by_order.get(order.order_id.as_str()) {
                Some((1, comms)) => *comms,
                Some((n, _)) => {
                    return Err(GenError::JoinMismatch {
                        order_id: order.order_id.clone(),
                        matches: *n,
                    })
                }
                None => {
                    return Err(GenError::JoinMismatch {
                        order_id: order.order_id.clone(),
                        matches: 0,
                    })
                }
            };
            facts.push(self.join_row(order, comms));
        }

        let late = facts.iter().filter(|f| f.is_late == 1).count();
        log::info!("fact: derived {} rows ({late} late)", facts.len());
        Ok(facts)
    }

    fn join_row(&self, order: &OrderRecord, comms: &CommunicationRecord) -> FactRecord {
        FactRecord {
            order_id: order.order_id.clone(),
            client_id: order.client_id.clone(),
            order_datetime: order.order_datetime,
            expected_delivery: order.expected_delivery,
            delivery_datetime: order.delivery_datetime,
            status: order.status,
            processed_by: order.processed_by.clone(),
            entry_timestamp: order.entry_timestamp,
            is_accurate: order.is_accurate,
            item_count: order.item_count,
            order_value_usd: order.order_value_usd,
            email_count: comms.email_count,
            call_count: comms.call_count,
            first_response_time_hours: comms.first_response_time_hours,
            followup_count: comms.followup_count,
            is_late: is_late(order) as u8,
            order_cycle_days: order_cycle_days(order),
            responded_within_24h: self.responded_in_time(comms) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ymd;
    use chrono::Duration;

    fn at(day: u32, hour: i64) -> Timestamp {
        midnight(ymd(2025, 3, day)) + Duration::hours(hour)
    }

    fn order(id: &str, delivered: Option<Timestamp>) -> OrderRecord {
        OrderRecord {
            order_id: id.into(),
            client_id: "C0001".into(),
            order_datetime: at(1, 10),
            expected_delivery: at(4, 10),
            delivery_datetime: delivered,
            status: if delivered.is_some() {
                OrderStatus::Delivered
            } else {
                OrderStatus::Pending
            },
            processed_by: "rep_01".into(),
            entry_timestamp: at(1, 11),
            is_accurate: 1,
            item_count: 3,
            order_value_usd: 120.5,
        }
    }

    fn comms(id: &str, hours: f64) -> CommunicationRecord {
        CommunicationRecord {
            order_id: id.into(),
            email_count: 1,
            call_count: 0,
            first_response_time_hours: hours,
            followup_count: 0,
        }
    }

    #[test]
    fn lateness_compares_against_expected_midnight() {
        // Delivered at 00:00 on the expected date: not late.
        assert!(!is_late(&order("A", Some(at(4, 0)))));
        // Any time later that day counts as late, even before the expected hour.
        assert!(is_late(&order("B", Some(at(4, 1)))));
        // A day early is never late.
        assert!(!is_late(&order("C", Some(at(3, 10)))));
        assert!(!is_late(&order("D", None)));
    }

    #[test]
    fn cycle_days_are_fractional() {
        let o = order("A", Some(at(4, 22)));
        let days = order_cycle_days(&o).unwrap();
        assert!((days - 3.5).abs() < 1e-9, "{days}");
        assert_eq!(order_cycle_days(&order("B", None)), None);
    }

    #[test]
    fn response_flag_includes_the_boundary() {
        let facts = FactSubsystem::new(24.0)
            .derive(
                &[order("A", None), order("B", None)],
                &[comms("A", 24.0), comms("B", 24.01)],
            )
            .unwrap();
        assert_eq!(facts[0].responded_within_24h, 1);
        assert_eq!(facts[1].responded_within_24h, 0);
    }

    #[test]
    fn join_preserves_order_sequence_regardless_of_comms_order() {
        let facts = FactSubsystem::new(24.0)
            .derive(
                &[order("A", None), order("B", None)],
                &[comms("B", 2.0), comms("A", 1.0)],
            )
            .unwrap();
        assert_eq!(facts[0].order_id, "A");
        assert_eq!(facts[0].first_response_time_hours, 1.0);
        assert_eq!(facts[1].order_id, "B");
    }

    #[test]
    fn missing_or_duplicate_comms_is_a_join_mismatch() {
        let subsystem = FactSubsystem::new(24.0);
        let err = subsystem
            .derive(&[order("A", None)], &[comms("B", 1.0)])
            .unwrap_err();
        assert!(matches!(err, GenError::JoinMismatch { matches: 0, .. }));

        let err = subsystem
            .derive(&[order("A", None)], &[comms("A", 1.0), comms("A", 2.0)])
            .unwrap_err();
        assert!(matches!(err, GenError::JoinMismatch { matches: 2, .. }));
    }
}
