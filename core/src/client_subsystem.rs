//! Client population.
//!
//! Generated once, before any order exists. Clients are immutable for
//! the rest of the run; orders reference them by `client_id` only.

use crate::{
    calendar::serialize_date,
    config::GenConfig,
    name_generator::NameGenerator,
    rng::SubsystemRng,
    types::EntityId,
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Region {
    Northeast,
    Midwest,
    South,
    West,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Northeast, Region::Midwest, Region::South, Region::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Northeast => "Northeast",
            Self::Midwest => "Midwest",
            Self::South => "South",
            Self::West => "West",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientRecord {
    pub client_id: EntityId,
    pub client_name: String,
    pub region: Region,
    #[serde(serialize_with = "serialize_date")]
    pub created_date: NaiveDate,
}

pub fn client_id(index: usize) -> EntityId {
    format!("C{index:04}")
}

pub struct ClientSubsystem<'a> {
    config: &'a GenConfig,
}

impl<'a> ClientSubsystem<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    /// Generate exactly `n_clients` records, ids `C0001` upward.
    ///
    /// Per client: name from `names`, then region and creation time
    /// from `rng`, in that order.
    pub fn generate(&self, rng: &mut SubsystemRng, names: &mut SubsystemRng) -> Vec<ClientRecord> {
        let window = self.config.client_window();
        let clients: Vec<ClientRecord> = (1..=self.config.n_clients)
            .map(|i| {
                let client_name = NameGenerator::generate_company_name(names);
                let region = *rng.pick(&Region::ALL);
                let created_at = window.sample_exclusive(rng);
                ClientRecord {
                    client_id: client_id(i),
                    client_name,
                    region,
                    created_date: created_at.date(),
                }
            })
            .collect();
        log::info!("client: generated {} clients", clients.len());
        clients
    }
}
