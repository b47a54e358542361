use crate::domain::model::{Amount, VehicleClass};
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Auctions, yard locations, ports and sea-freight rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDataset {
    #[serde(default)]
    pub auctions: Vec<String>,
    #[serde(default)]
    pub records: Vec<LocationRecord>,
    /// Port iteration order; decides ties between equally cheap routes.
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default, deserialize_with = "lenient_sea_rates")]
    pub sea_rates: HashMap<String, HashMap<String, Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub auction: String,
    pub location: String,
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub zip: Option<String>,
    #[serde(default)]
    pub auction_location: Option<String>,
    /// Inland haul cost from this yard to each port; non-numeric entries are absent.
    #[serde(default, rename = "ports", deserialize_with = "lenient_costs")]
    pub port_costs: HashMap<String, Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationLabel {
    pub location: String,
    pub state: String,
}

impl LocationRecord {
    pub fn label(&self) -> String {
        format!("{} ({})", self.location, self.state)
    }

    pub fn haul_cost(&self, port: &str) -> Amount {
        Amount::from_option(self.port_costs.get(port).copied().flatten())
    }

    /// "Auction location • City, ST ZIP"
    pub fn details(&self) -> String {
        let name = self
            .auction_location
            .as_deref()
            .unwrap_or(self.location.as_str());
        format!(
            "{} • {}, {} {}",
            name,
            self.city,
            self.state,
            self.zip.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    fn is_auction(&self, auction: &str) -> bool {
        self.auction.to_lowercase() == auction.to_lowercase()
    }
}

/// Parses "Name (ST)" into its location and two-letter state code.
pub fn parse_location_label(label: &str) -> Option<LocationLabel> {
    static LABEL_RE: OnceLock<Regex> = OnceLock::new();
    let re = LABEL_RE.get_or_init(|| {
        Regex::new(r"^(.*)\s\(([A-Z]{2})\)$").expect("location label pattern is valid")
    });

    let caps = re.captures(label.trim())?;
    Some(LocationLabel {
        location: caps[1].trim().to_string(),
        state: caps[2].trim().to_string(),
    })
}

impl ReferenceDataset {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let dataset: ReferenceDataset = serde_json::from_slice(bytes)?;
        Ok(dataset)
    }

    /// Auction and location match case-insensitively; state must match exactly.
    pub fn find_record(&self, auction: &str, location: &str, state: &str) -> Option<&LocationRecord> {
        let location = location.to_lowercase();
        self.records.iter().find(|r| {
            r.is_auction(auction) && r.location.to_lowercase() == location && r.state == state
        })
    }

    pub fn resolve_label(&self, auction: &str, label: &str) -> Option<&LocationRecord> {
        if auction.trim().is_empty() {
            return None;
        }
        let parsed = parse_location_label(label)?;
        self.find_record(auction, &parsed.location, &parsed.state)
    }

    pub fn states_for_auction(&self, auction: &str) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.is_auction(auction))
            .map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn location_labels(&self, auction: &str, state: Option<&str>) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.is_auction(auction))
            .filter(|r| state.map_or(true, |s| r.state == s))
            .map(LocationRecord::label)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn sea_rate(&self, class: VehicleClass, port: &str) -> Amount {
        Amount::from_option(
            self.sea_rates
                .get(class.sea_rate_key())
                .and_then(|rates| rates.get(port))
                .copied()
                .flatten(),
        )
    }
}

impl Validate for ReferenceDataset {
    fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(QuoteError::DatasetError {
                message: "dataset contains no location records".to_string(),
            });
        }
        if self.ports.is_empty() {
            return Err(QuoteError::DatasetError {
                message: "dataset lists no ports".to_string(),
            });
        }
        for class in [VehicleClass::Suv, VehicleClass::Standard] {
            if !self.sea_rates.contains_key(class.sea_rate_key()) {
                tracing::warn!(
                    "⚠️ No sea rates for vehicle class {} (key \"{}\"); sea freight will be unknown",
                    class,
                    class.sea_rate_key()
                );
            }
        }
        Ok(())
    }
}

fn number_or_none(value: serde_json::Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn lenient_costs<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, serde_json::Value> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(port, value)| (port, number_or_none(value)))
        .collect())
}

fn lenient_sea_rates<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<String, HashMap<String, Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, HashMap<String, serde_json::Value>> =
        HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(class, rates)| {
            let rates = rates
                .into_iter()
                .map(|(port, value)| (port, number_or_none(value)))
                .collect();
            (class, rates)
        })
        .collect())
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
