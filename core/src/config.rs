use crate::{
    calendar::{ymd, DateWindow},
    error::{GenError, GenResult},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Largest day offset accepted for client history and delivery ranges.
pub const MAX_OFFSET_DAYS: i64 = 3650;
/// Largest entry delay accepted, in minutes (two weeks).
pub const MAX_ENTRY_DELAY_MINUTES: i64 = 14 * 24 * 60;

/// Relative weights of the four order statuses. Normalized at draw time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatusWeights {
    pub delivered: f64,
    pub pending: f64,
    pub returned: f64,
    pub cancelled: f64,
}

impl Default for StatusWeights {
    fn default() -> Self {
        Self {
            delivered: 0.78,
            pending: 0.14,
            returned: 0.05,
            cancelled: 0.03,
        }
    }
}

impl StatusWeights {
    /// Weights in `OrderStatus::ALL` order.
    pub fn as_array(&self) -> [f64; 4] {
        [self.delivered, self.pending, self.returned, self.cancelled]
    }
}

/// Order-side model parameters. Day/minute ranges are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrderModelConfig {
    pub expected_delivery_days: (i64, i64),
    pub late_tail_probability: f64,
    pub late_tail_days: (i64, i64),
    pub on_time_days: (i64, i64),
    pub entry_delay_minutes: (i64, i64),
    pub rushed_probability: f64,
    pub error_rate_rushed: f64,
    pub error_rate_normal: f64,
    pub item_count_lambda: f64,
    pub item_count_bounds: (u64, u64),
    pub value_mean: f64,
    pub value_std: f64,
    pub value_bounds: (f64, f64),
}

impl Default for OrderModelConfig {
    fn default() -> Self {
        Self {
            expected_delivery_days: (1, 7),
            late_tail_probability: 0.20,
            late_tail_days: (1, 5),
            on_time_days: (-1, 2),
            entry_delay_minutes: (5, 240),
            rushed_probability: 0.15,
            error_rate_rushed: 0.06,
            error_rate_normal: 0.02,
            item_count_lambda: 3.0,
            item_count_bounds: (1, 15),
            value_mean: 220.0,
            value_std: 90.0,
            value_bounds: (20.0, 1200.0),
        }
    }
}

/// Communication-side model parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommsModelConfig {
    pub email_lambda: f64,
    pub email_bounds: (u64, u64),
    pub call_lambda: f64,
    pub call_bounds: (u64, u64),
    pub response_log_mean: f64,
    pub response_log_sigma: f64,
    pub rushed_response_multiplier: f64,
    pub response_bounds: (f64, f64),
    pub followup_bounds: (i64, i64),
}

impl Default for CommsModelConfig {
    fn default() -> Self {
        Self {
            email_lambda: 1.0,
            email_bounds: (0, 5),
            call_lambda: 0.6,
            call_bounds: (0, 3),
            response_log_mean: 1.1,
            response_log_sigma: 0.6,
            rushed_response_multiplier: 1.2,
            response_bounds: (0.2, 72.0),
            followup_bounds: (0, 10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenConfig {
    pub seed: u64,
    pub n_clients: usize,
    pub n_orders: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Clients are created within this many days before `start_date`.
    pub client_history_days: i64,
    pub rep_count: usize,
    pub status_weights: StatusWeights,
    pub order: OrderModelConfig,
    pub comms: CommsModelConfig,
    pub response_sla_hours: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_clients: 250,
            n_orders: 5000,
            start_date: ymd(2025, 1, 1),
            end_date: ymd(2025, 12, 31),
            client_history_days: 365,
            rep_count: 10,
            status_weights: StatusWeights::default(),
            order: OrderModelConfig::default(),
            comms: CommsModelConfig::default(),
            response_sla_hours: 24.0,
        }
    }
}

impl GenConfig {
    /// Load a JSON config file. Missing keys fall back to the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GenConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Small population for unit and integration tests.
    pub fn default_test() -> Self {
        Self {
            n_clients: 50,
            n_orders: 500,
            ..Self::default()
        }
    }

    /// The window orders are placed in: [start_date, end_date].
    pub fn order_window(&self) -> DateWindow {
        DateWindow::from_dates(self.start_date, self.end_date)
    }

    /// The window clients are created in: [start_date − history, start_date).
    pub fn client_window(&self) -> DateWindow {
        let order_start = self.order_window().start;
        DateWindow::new(order_start - Duration::days(self.client_history_days), order_start)
    }

    pub fn rep_ids(&self) -> Vec<String> {
        (1..=self.rep_count).map(|i| format!("rep_{i:02}")).collect()
    }

    pub fn validate(&self) -> GenResult<()> {
        if self.n_clients == 0 {
            return invalid("n_clients must be > 0");
        }
        if self.n_orders == 0 {
            return invalid("n_orders must be > 0");
        }
        if self.rep_count == 0 {
            return invalid("rep_count must be > 0");
        }
        if self.start_date > self.end_date {
            return invalid(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            ));
        }
        if self.client_history_days <= 0 || self.client_history_days > MAX_OFFSET_DAYS {
            return invalid(format!(
                "client_history_days must be in 1..={MAX_OFFSET_DAYS}"
            ));
        }

        let weights = self.status_weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return invalid("status weights must be finite and non-negative");
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return invalid("status weights must not all be zero");
        }
        if (total - 1.0).abs() > 1e-6 {
            log::warn!("status weights sum to {total:.4}; they will be normalized");
        }

        let o = &self.order;
        check_range("order.expected_delivery_days", o.expected_delivery_days)?;
        check_range("order.late_tail_days", o.late_tail_days)?;
        check_range("order.on_time_days", o.on_time_days)?;
        check_range("order.entry_delay_minutes", o.entry_delay_minutes)?;
        check_range("order.item_count_bounds", o.item_count_bounds)?;
        check_range("order.value_bounds", o.value_bounds)?;
        check_magnitude("order.expected_delivery_days", o.expected_delivery_days, MAX_OFFSET_DAYS)?;
        check_magnitude("order.late_tail_days", o.late_tail_days, MAX_OFFSET_DAYS)?;
        check_magnitude("order.on_time_days", o.on_time_days, MAX_OFFSET_DAYS)?;
        check_magnitude(
            "order.entry_delay_minutes",
            o.entry_delay_minutes,
            MAX_ENTRY_DELAY_MINUTES,
        )?;
        check_probability("order.late_tail_probability", o.late_tail_probability)?;
        check_probability("order.rushed_probability", o.rushed_probability)?;
        check_probability("order.error_rate_rushed", o.error_rate_rushed)?;
        check_probability("order.error_rate_normal", o.error_rate_normal)?;
        if o.expected_delivery_days.0 < 0 {
            return invalid("order.expected_delivery_days must not be negative");
        }
        // Delivery may never precede order placement.
        let earliest = o.expected_delivery_days.0 + o.on_time_days.0.min(o.late_tail_days.0);
        if earliest < 0 {
            return invalid(format!(
                "delivery offsets allow delivery {} day(s) before the order",
                -earliest
            ));
        }
        if !is_non_negative(o.value_std) || !is_non_negative(o.item_count_lambda) {
            return invalid("order distribution parameters must be finite and non-negative");
        }
        if !o.value_mean.is_finite() {
            return invalid("order.value_mean must be finite");
        }
        self.check_calendar_reach()?;

        let c = &self.comms;
        check_range("comms.email_bounds", c.email_bounds)?;
        check_range("comms.call_bounds", c.call_bounds)?;
        check_range("comms.response_bounds", c.response_bounds)?;
        check_range("comms.followup_bounds", c.followup_bounds)?;
        if c.followup_bounds.0 < 0 {
            return invalid("comms.followup_bounds must not be negative");
        }
        if !is_non_negative(c.email_lambda)
            || !is_non_negative(c.call_lambda)
            || !is_non_negative(c.response_log_sigma)
            || !c.response_log_mean.is_finite()
            || !(c.rushed_response_multiplier.is_finite() && c.rushed_response_multiplier > 0.0)
        {
            return invalid("comms distribution parameters out of range");
        }
        Ok(())
    }

    /// Every timestamp the generators can produce must stay inside
    /// chrono's representable range.
    fn check_calendar_reach(&self) -> GenResult<()> {
        let o = &self.order;
        let window = self.order_window();
        let latest_delivery_days =
            o.expected_delivery_days.1 + o.late_tail_days.1.max(o.on_time_days.1);
        let (entry_lo, entry_hi) = o.entry_delay_minutes;
        let reach = [
            window
                .start
                .checked_sub_signed(Duration::days(self.client_history_days)),
            window
                .end
                .checked_add_signed(Duration::days(latest_delivery_days)),
            window.start.checked_add_signed(Duration::minutes(entry_lo)),
            window.end.checked_add_signed(Duration::minutes(entry_hi)),
        ];
        if reach.iter().any(Option::is_none) {
            return invalid(format!(
                "window {} .. {} plus configured offsets leaves the supported calendar range",
                self.start_date, self.end_date
            ));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> GenResult<()> {
    Err(GenError::InvalidConfig {
        reason: reason.into(),
    })
}

fn check_range<T: PartialOrd + std::fmt::Debug>(name: &str, (lo, hi): (T, T)) -> GenResult<()> {
    if lo > hi {
        return invalid(format!("{name}: lower bound {lo:?} exceeds upper bound {hi:?}"));
    }
    Ok(())
}

fn check_magnitude(name: &str, (lo, hi): (i64, i64), max: i64) -> GenResult<()> {
    if lo < -max || hi > max {
        return invalid(format!("{name}: ({lo}, {hi}) exceeds the limit of {max}"));
    }
    Ok(())
}

fn is_non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

fn check_probability(name: &str, p: f64) -> GenResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return invalid(format!("{name}: {p} is not a probability"));
    }
    Ok(())
}
