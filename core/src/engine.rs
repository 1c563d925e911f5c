//! The dataset engine: wires the pipeline stages together.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Seeding            (RngBank from the master seed)
//!   2. Client subsystem
//!   3. Order subsystem    (orders + communications)
//!   4. Fact subsystem     (join + derived columns)
//!   5. Sinks              (CSV, optionally SQLite)
//!
//! RULES:
//!   - All randomness flows through the RngBank.
//!   - Each stream is created once per run and consumed in stage order.
//!   - Stages only see the records produced by earlier stages.

use crate::{
    client_subsystem::{ClientRecord, ClientSubsystem},
    config::GenConfig,
    error::GenResult,
    export::DatasetSink,
    fact_subsystem::{FactRecord, FactSubsystem},
    order_subsystem::{CommunicationRecord, OrderRecord, OrderSubsystem},
    rng::{RngBank, StreamSlot},
    types::RunId,
};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub run_id: RunId,
    pub seed: u64,
    pub clients: Vec<ClientRecord>,
    pub orders: Vec<OrderRecord>,
    pub communications: Vec<CommunicationRecord>,
    pub facts: Vec<FactRecord>,
}

pub struct DatasetEngine {
    pub run_id: RunId,
    pub rng_bank: RngBank,
    config: GenConfig,
}

impl DatasetEngine {
    /// Validates the config up front so that generation itself cannot fail.
    pub fn new(config: GenConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self {
            run_id: format!("run-{}", config.seed),
            rng_bank: RngBank::new(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Run stages 1–4. Calling this twice yields identical datasets.
    pub fn generate(&self) -> GenResult<Dataset> {
        let mut categorical = self.rng_bank.for_slot(StreamSlot::Categorical);
        let mut numeric = self.rng_bank.for_slot(StreamSlot::Numeric);
        let mut names = self.rng_bank.for_slot(StreamSlot::Names);
        log::info!(
            "engine: run {} seeded with {} ({} clients, {} orders)",
            self.run_id,
            self.rng_bank.master_seed(),
            self.config.n_clients,
            self.config.n_orders
        );

        let clients = ClientSubsystem::new(&self.config).generate(&mut categorical, &mut names);
        let batch =
            OrderSubsystem::new(&self.config).generate(&clients, &mut categorical, &mut numeric);
        let facts = FactSubsystem::new(self.config.response_sla_hours)
            .derive(&batch.orders, &batch.communications)?;

        Ok(Dataset {
            run_id: self.run_id.clone(),
            seed: self.config.seed,
            clients,
            orders: batch.orders,
            communications: batch.communications,
            facts,
        })
    }

    /// Generate, then hand the dataset to each sink in turn.
    /// A failing sink aborts the run; earlier sinks' output is left as is.
    pub fn run(&self, sinks: &mut [&mut dyn DatasetSink]) -> GenResult<Dataset> {
        let dataset = self.generate()?;
        for sink in sinks.iter_mut() {
            sink.write(&dataset)?;
            log::info!("engine: wrote dataset to {} sink", sink.name());
        }
        Ok(dataset)
    }
}
