//! dataset-gen: headless generator for the order-ops dataset.
//!
//! Usage:
//!   dataset-gen
//!   dataset-gen --seed 42 --out-dir ./data
//!   dataset-gen --config gen.json --db dataset.db

use anyhow::{Context, Result};
use orderops_core::{
    config::GenConfig,
    engine::DatasetEngine,
    export::{CsvSink, DatasetSink},
    store::SqliteStore,
    summary::DatasetSummary,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match flag_value(&args, "--config") {
        Some(path) => GenConfig::load(path)?,
        None => GenConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed)?;
    let out_dir = flag_value(&args, "--out-dir").unwrap_or("./data");
    let db = flag_value(&args, "--db");

    let engine = DatasetEngine::new(config)?;
    let config = engine.config();
    println!("Order Ops dataset generator");
    println!("  seed:      {}", config.seed);
    println!("  clients:   {}", config.n_clients);
    println!("  orders:    {}", config.n_orders);
    println!("  window:    {} .. {}", config.start_date, config.end_date);
    println!("  out_dir:   {out_dir}");
    if let Some(db) = db {
        println!("  db:        {db}");
    }
    println!();

    let mut csv_sink = CsvSink::new(out_dir);
    let dataset = match db {
        Some(path) => {
            let mut store = SqliteStore::open(path)?;
            store.migrate()?;
            let mut sinks: [&mut dyn DatasetSink; 2] = [&mut csv_sink, &mut store];
            engine.run(&mut sinks)?
        }
        None => {
            let mut sinks: [&mut dyn DatasetSink; 1] = [&mut csv_sink];
            engine.run(&mut sinks)?
        }
    };

    let summary = DatasetSummary::from_dataset(&dataset);
    let summary_path = Path::new(out_dir).join("processed").join("summary.json");
    summary.write_json(&summary_path)?;
    log::info!("summary written to {}", summary_path.display());

    print_summary(&summary, &csv_sink);
    Ok(())
}

fn print_summary(s: &DatasetSummary, sink: &CsvSink) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {}", s.run_id);
    println!("  clients:         {}", s.clients);
    println!("  orders:          {}", s.orders);
    println!(
        "  by status:       delivered {} | pending {} | returned {} | cancelled {}",
        s.delivered, s.pending, s.returned, s.cancelled
    );
    println!("  inaccurate:      {}", s.inaccurate_orders);
    println!("  late:            {} ({:.1}%)", s.late_orders, s.late_rate * 100.0);
    match s.avg_cycle_days {
        Some(days) => println!("  avg cycle days:  {days:.2}"),
        None => println!("  avg cycle days:  (no deliveries)"),
    }
    println!(
        "  replied <= 24h:  {:.1}%",
        s.responded_within_24h_rate * 100.0
    );
    println!(
        "  order value:     ${:.2} total, ${:.2} avg",
        s.total_order_value_usd, s.avg_order_value_usd
    );
    println!();
    println!("=== OUTPUT ===");
    println!("  {}", sink.clients_path().display());
    println!("  {}", sink.orders_path().display());
    println!("  {}", sink.communications_path().display());
    println!("  {}", sink.fact_path().display());
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Value of `flag` parsed as `T`, or `default` when the flag is absent.
/// A value that does not parse is an error rather than a silent fallback.
fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid value {raw:?} for {flag}")),
        None => Ok(default),
    }
}
