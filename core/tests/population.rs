//! Client and order population tests at full scale.

use orderops_core::{config::GenConfig, engine::DatasetEngine, order_subsystem::OrderStatus};
use std::collections::HashSet;

fn full_run() -> orderops_core::engine::Dataset {
    DatasetEngine::new(GenConfig::default())
        .unwrap()
        .generate()
        .unwrap()
}

#[test]
fn client_ids_are_contiguous_c0001_to_c0250() {
    let dataset = full_run();
    assert_eq!(dataset.clients.len(), 250);
    for (i, c) in dataset.clients.iter().enumerate() {
        assert_eq!(c.client_id, format!("C{:04}", i + 1));
    }
    assert_eq!(dataset.clients.first().unwrap().client_id, "C0001");
    assert_eq!(dataset.clients.last().unwrap().client_id, "C0250");
}

#[test]
fn order_ids_are_contiguous_and_reference_known_clients() {
    let dataset = full_run();
    assert_eq!(dataset.orders.len(), 5000);
    let client_ids: HashSet<&str> = dataset.clients.iter().map(|c| c.client_id.as_str()).collect();
    let mut seen = HashSet::new();
    for (i, o) in dataset.orders.iter().enumerate() {
        assert_eq!(o.order_id, format!("ORD{:06}", i + 1));
        assert!(seen.insert(o.order_id.as_str()), "duplicate {}", o.order_id);
        assert!(client_ids.contains(o.client_id.as_str()), "{} -> unknown {}", o.order_id, o.client_id);
    }
    assert_eq!(dataset.orders[0].order_id, "ORD000001");
    assert_eq!(dataset.orders[4999].order_id, "ORD005000");
}

#[test]
fn clients_may_own_many_orders() {
    let dataset = full_run();
    let distinct: HashSet<&str> = dataset.orders.iter().map(|o| o.client_id.as_str()).collect();
    // 5000 draws over 250 clients with replacement.
    assert!(distinct.len() < dataset.orders.len());
    assert!(distinct.len() > 200, "only {} clients referenced", distinct.len());
}

#[test]
fn delivery_present_iff_delivered_or_returned() {
    for o in full_run().orders {
        let terminal = matches!(o.status, OrderStatus::Delivered | OrderStatus::Returned);
        assert_eq!(
            o.delivery_datetime.is_some(),
            terminal,
            "{} status {:?} delivery {:?}",
            o.order_id,
            o.status,
            o.delivery_datetime
        );
    }
}

#[test]
fn order_numeric_fields_stay_in_bounds() {
    let dataset = full_run();
    let config = GenConfig::default();
    let window = config.order_window();
    for o in &dataset.orders {
        assert!((1..=15).contains(&o.item_count), "{} items {}", o.order_id, o.item_count);
        assert!(
            (20.0..=1200.0).contains(&o.order_value_usd),
            "{} value {}",
            o.order_id,
            o.order_value_usd
        );
        assert_eq!(o.order_value_usd, (o.order_value_usd * 100.0).round() / 100.0);
        assert!(o.is_accurate <= 1);
        assert!(o.order_datetime >= window.start && o.order_datetime <= window.end);
        assert!(o.processed_by.starts_with("rep_"));
    }
}

#[test]
fn communication_fields_stay_in_bounds() {
    let dataset = full_run();
    assert_eq!(dataset.communications.len(), dataset.orders.len());
    for c in &dataset.communications {
        assert!(c.email_count <= 5, "{} emails {}", c.order_id, c.email_count);
        assert!(c.call_count <= 3, "{} calls {}", c.order_id, c.call_count);
        assert!(
            (0.2..=72.0).contains(&c.first_response_time_hours),
            "{} response {}",
            c.order_id,
            c.first_response_time_hours
        );
        assert!(c.followup_count <= 10);
    }
}

#[test]
fn status_mix_tracks_weights() {
    let dataset = full_run();
    let n = dataset.orders.len() as f64;
    let share = |s: OrderStatus| dataset.orders.iter().filter(|o| o.status == s).count() as f64 / n;
    assert!((share(OrderStatus::Delivered) - 0.78).abs() < 0.03);
    assert!((share(OrderStatus::Pending) - 0.14).abs() < 0.03);
    assert!(share(OrderStatus::Returned) > 0.0);
    assert!(share(OrderStatus::Cancelled) > 0.0);
}

#[test]
fn accuracy_errors_are_rare() {
    let dataset = full_run();
    let errors = dataset.orders.iter().filter(|o| o.is_accurate == 0).count();
    // Expected rate ≈ 0.15 * 0.06 + 0.85 * 0.02 = 2.6%.
    let rate = errors as f64 / dataset.orders.len() as f64;
    assert!(rate > 0.005 && rate < 0.06, "error rate {rate:.4}");
}
