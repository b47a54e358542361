use serde::{Deserialize, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// A monetary line item that is either computed or explicitly unknown.
///
/// `Unknown` is absorbing: any arithmetic touching it yields `Unknown`, so a
/// total is only ever known when every addend is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Known(f64),
    Unknown,
}

impl Amount {
    /// Non-finite values collapse to `Unknown`.
    pub fn known(value: f64) -> Self {
        if value.is_finite() {
            Amount::Known(value)
        } else {
            Amount::Unknown
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map(Amount::known).unwrap_or(Amount::Unknown)
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Amount::Known(v) => Some(v),
            Amount::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Amount::Known(_))
    }

    pub fn is_unknown(self) -> bool {
        !self.is_known()
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Amount::Known(v) => Amount::known(f(v)),
            Amount::Unknown => Amount::Unknown,
        }
    }

    pub fn zip_with(self, other: Amount, f: impl FnOnce(f64, f64) -> f64) -> Self {
        match (self, other) {
            (Amount::Known(a), Amount::Known(b)) => Amount::known(f(a, b)),
            _ => Amount::Unknown,
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Mul<f64> for Amount {
    type Output = Amount;

    fn mul(self, rhs: f64) -> Amount {
        self.map(|v| v * rhs)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::Known(0.0), |acc, item| acc + item)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Known(v) => write!(f, "{:.2}", v),
            Amount::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Amount::Known(v) => serializer.serialize_some(v),
            Amount::Unknown => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gas,
    Diesel,
    Electric,
    /// Anything else; customs treats it like gas.
    #[serde(untagged)]
    Other(String),
}

impl FuelType {
    pub fn is_electric(&self) -> bool {
        matches!(self, FuelType::Electric)
    }
}

impl FromStr for FuelType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "gas" => FuelType::Gas,
            "diesel" => FuelType::Diesel,
            "electric" => FuelType::Electric,
            _ => FuelType::Other(s.trim().to_string()),
        })
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Gas => f.write_str("gas"),
            FuelType::Diesel => f.write_str("diesel"),
            FuelType::Electric => f.write_str("electric"),
            FuelType::Other(name) => f.write_str(name),
        }
    }
}

/// Coarse grouping that selects the sea-freight column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Suv,
    Standard,
}

impl VehicleClass {
    /// Key into the dataset's `seaRates` map (cars per container).
    pub fn sea_rate_key(self) -> &'static str {
        match self {
            VehicleClass::Suv => "3",
            VehicleClass::Standard => "4",
        }
    }
}

impl FromStr for VehicleClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suv" => Ok(VehicleClass::Suv),
            "standard" | "sedan" => Ok(VehicleClass::Standard),
            other => Err(format!(
                "unknown vehicle class '{}', expected suv, sedan or standard",
                other
            )),
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleClass::Suv => f.write_str("SUV"),
            VehicleClass::Standard => f.write_str("Sedan"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub fuel: FuelType,
    pub model_year: Option<i32>,
    /// Engine displacement in cc, or battery capacity in kWh for electric vehicles.
    pub engine_or_battery: Option<f64>,
}

impl VehicleProfile {
    pub fn new(fuel: FuelType, model_year: Option<i32>, engine_or_battery: Option<f64>) -> Self {
        Self {
            fuel,
            model_year,
            engine_or_battery,
        }
    }

    /// Years since the model year, floored at zero. `None` when the year is
    /// missing or not after 1900.
    pub fn age(&self, current_year: i32) -> Option<i32> {
        self.model_year
            .filter(|year| *year > 1900)
            .map(|year| (current_year - year).max(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInputs {
    pub auction: String,
    /// "Location (ST)" as produced by the location listing.
    pub location_label: String,
    pub vehicle_class: VehicleClass,
    pub purchase_price: Option<f64>,
    pub vehicle: VehicleProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortHaul {
    pub port: String,
    pub cost: Amount,
}

/// Fully itemized landed cost. Built fresh for every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub auction: Option<String>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub details: Option<String>,
    pub vehicle_class: Option<VehicleClass>,
    pub fee_bearing: bool,
    pub best_port: Option<String>,
    pub port_hauls: Vec<PortHaul>,
    pub purchase_price: Amount,
    pub auction_fee: Amount,
    pub inland_haul: Amount,
    pub sea_freight: Amount,
    pub expedition_converted: Amount,
    pub expedition_fixed: Amount,
    pub customs_duty: Amount,
    pub excise: Amount,
    pub vat: Amount,
    pub customs_total: Amount,
    pub logistics_total: Amount,
    pub grand_total: Amount,
}

impl Quote {
    /// The quote for an unresolvable location: nothing is known.
    pub fn unknown() -> Self {
        Self {
            auction: None,
            location: None,
            state: None,
            details: None,
            vehicle_class: None,
            fee_bearing: false,
            best_port: None,
            port_hauls: Vec::new(),
            purchase_price: Amount::Unknown,
            auction_fee: Amount::Unknown,
            inland_haul: Amount::Unknown,
            sea_freight: Amount::Unknown,
            expedition_converted: Amount::Unknown,
            expedition_fixed: Amount::Unknown,
            customs_duty: Amount::Unknown,
            excise: Amount::Unknown,
            vat: Amount::Unknown,
            customs_total: Amount::Unknown,
            logistics_total: Amount::Unknown,
            grand_total: Amount::Unknown,
        }
    }

    /// Labelled monetary lines in display order.
    pub fn line_items(&self) -> Vec<(&'static str, Amount)> {
        vec![
            ("purchase_price", self.purchase_price),
            ("auction_fee", self.auction_fee),
            ("inland_haul", self.inland_haul),
            ("sea_freight", self.sea_freight),
            ("expedition_converted", self.expedition_converted),
            ("expedition_fixed", self.expedition_fixed),
            ("customs_duty", self.customs_duty),
            ("excise", self.excise),
            ("vat", self.vat),
            ("customs_total", self.customs_total),
            ("logistics_total", self.logistics_total),
            ("grand_total", self.grand_total),
        ]
    }
}
