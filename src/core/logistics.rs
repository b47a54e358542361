use crate::domain::dataset::{LocationRecord, ReferenceDataset};
use crate::domain::model::{Amount, PortHaul, VehicleClass};
use crate::utils::error::Result;
use crate::utils::validation::validate_non_negative_amount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticsRates {
    /// Destination-port expedition, charged in EUR.
    pub expedition_eur: f64,
    /// Onward leg from the destination port, fixed in USD.
    pub expedition_fixed_usd: f64,
}

impl Default for LogisticsRates {
    fn default() -> Self {
        Self {
            expedition_eur: 350.0,
            expedition_fixed_usd: 750.0,
        }
    }
}

impl LogisticsRates {
    pub fn validate(&self) -> Result<()> {
        validate_non_negative_amount("logistics.expedition_eur", self.expedition_eur)?;
        validate_non_negative_amount("logistics.expedition_fixed_usd", self.expedition_fixed_usd)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogisticsBreakdown {
    pub best_port: Option<String>,
    pub port_hauls: Vec<PortHaul>,
    pub inland: Amount,
    pub sea: Amount,
    pub expedition_converted: Amount,
    pub expedition_fixed: Amount,
}

impl LogisticsBreakdown {
    pub fn total(&self) -> Amount {
        self.inland + self.sea + self.expedition_converted + self.expedition_fixed
    }
}

/// Cheapest port with a defined haul cost. Ties go to the port listed first.
pub fn cheapest_port<'a>(record: &LocationRecord, ports: &'a [String]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&'a str, f64)> = None;
    for port in ports {
        let Some(cost) = record.haul_cost(port).value() else {
            continue;
        };
        if best.map_or(true, |(_, current)| cost < current) {
            best = Some((port.as_str(), cost));
        }
    }
    best
}

pub fn logistics(
    record: &LocationRecord,
    dataset: &ReferenceDataset,
    class: VehicleClass,
    eur_usd: Amount,
    rates: &LogisticsRates,
) -> LogisticsBreakdown {
    let port_hauls = dataset
        .ports
        .iter()
        .map(|port| PortHaul {
            port: port.clone(),
            cost: record.haul_cost(port),
        })
        .collect();

    let best = cheapest_port(record, &dataset.ports);
    let (best_port, inland, sea) = match best {
        Some((port, cost)) => {
            tracing::debug!("Cheapest inland route from {}: {} ({:.2})", record.label(), port, cost);
            (
                Some(port.to_string()),
                Amount::known(cost),
                dataset.sea_rate(class, port),
            )
        }
        None => {
            tracing::debug!("No port has a haul cost from {}", record.label());
            (None, Amount::Unknown, Amount::Unknown)
        }
    };

    let rate = eur_usd.value().filter(|r| *r > 0.0);
    let expedition_converted = Amount::from_option(rate.map(|r| rates.expedition_eur * r));

    LogisticsBreakdown {
        best_port,
        port_hauls,
        inland,
        sea,
        expedition_converted,
        expedition_fixed: Amount::known(rates.expedition_fixed_usd),
    }
}
