use crate::app::report::OutputFormat;
use crate::domain::model::{FuelType, QuoteInputs, VehicleClass, VehicleProfile};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_location, validate_non_empty_string, validate_path, validate_positive_amount,
    Validate,
};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "landed-cost")]
#[command(about = "Landed cost of an auction vehicle: auction fee, shipping and import customs")]
pub struct CliConfig {
    /// Path to the tariff TOML file (built-in defaults when missing)
    #[arg(short, long, global = true, default_value = "tariff.toml")]
    pub config: String,

    /// Reference dataset path or URL (overrides [dataset].source)
    #[arg(long, global = true)]
    pub dataset: Option<String>,

    /// Skip the live EUR/USD lookup and use the fallback rate
    #[arg(long, global = true)]
    pub offline: bool,

    /// Use this EUR/USD rate instead of fetching one
    #[arg(long, global = true)]
    pub rate: Option<f64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Itemized landed cost for one vehicle
    Quote(QuoteArgs),
    /// List auctions in the reference dataset
    Auctions,
    /// List states with yards for an auction
    States {
        #[arg(long)]
        auction: String,
    },
    /// List "Location (ST)" labels for an auction
    Locations {
        #[arg(long)]
        auction: String,
        #[arg(long)]
        state: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    #[arg(long)]
    pub auction: String,

    /// Location label, e.g. "Dallas (TX)"
    #[arg(long)]
    pub location: String,

    /// suv, sedan or standard
    #[arg(long, default_value = "sedan")]
    pub vehicle_class: VehicleClass,

    /// Purchase price in USD
    #[arg(long)]
    pub price: Option<f64>,

    /// gas, diesel or electric
    #[arg(long, default_value = "gas")]
    pub fuel: FuelType,

    #[arg(long)]
    pub year: Option<i32>,

    /// Engine size in cc, or battery capacity in kWh for electric vehicles
    #[arg(long)]
    pub engine: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl QuoteArgs {
    pub fn inputs(&self) -> QuoteInputs {
        QuoteInputs {
            auction: self.auction.clone(),
            location_label: self.location.clone(),
            vehicle_class: self.vehicle_class,
            purchase_price: self.price,
            vehicle: VehicleProfile::new(self.fuel.clone(), self.year, self.engine),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("config", &self.config)?;
        if let Some(dataset) = &self.dataset {
            validate_location("dataset", dataset)?;
        }
        if let Some(rate) = self.rate {
            validate_positive_amount("rate", rate)?;
        }
        match &self.command {
            Command::Quote(args) => {
                validate_non_empty_string("auction", &args.auction)?;
                validate_non_empty_string("location", &args.location)?;
            }
            Command::States { auction } | Command::Locations { auction, .. } => {
                validate_non_empty_string("auction", auction)?;
            }
            Command::Auctions => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote_command() {
        let config = CliConfig::try_parse_from([
            "landed-cost",
            "--offline",
            "quote",
            "--auction",
            "Copart",
            "--location",
            "Dallas (TX)",
            "--vehicle-class",
            "suv",
            "--price",
            "5000",
            "--fuel",
            "diesel",
            "--year",
            "2019",
            "--engine",
            "2200",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(config.offline);
        assert!(config.validate().is_ok());
        let Command::Quote(args) = &config.command else {
            panic!("expected quote command");
        };
        assert_eq!(args.format, OutputFormat::Json);

        let inputs = args.inputs();
        assert_eq!(inputs.vehicle_class, VehicleClass::Suv);
        assert_eq!(inputs.purchase_price, Some(5000.0));
        assert_eq!(inputs.vehicle.fuel, FuelType::Diesel);
        assert_eq!(inputs.vehicle.model_year, Some(2019));
        assert_eq!(inputs.vehicle.engine_or_battery, Some(2200.0));
    }

    #[test]
    fn test_quote_defaults_and_blank_inputs() {
        let config = CliConfig::try_parse_from([
            "landed-cost",
            "quote",
            "--auction",
            "IAAI",
            "--location",
            "Dallas (TX)",
        ])
        .unwrap();

        let Command::Quote(args) = &config.command else {
            panic!("expected quote command");
        };
        assert_eq!(args.format, OutputFormat::Table);
        let inputs = args.inputs();
        assert_eq!(inputs.vehicle_class, VehicleClass::Standard);
        assert_eq!(inputs.vehicle.fuel, FuelType::Gas);
        assert_eq!(inputs.purchase_price, None);
        assert_eq!(inputs.vehicle.model_year, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config = CliConfig::try_parse_from([
            "landed-cost",
            "locations",
            "--auction",
            "Copart",
            "--state",
            "TX",
            "--rate",
            "1.1",
            "--dataset",
            "https://example.com/data.json",
        ])
        .unwrap();

        assert_eq!(config.rate, Some(1.1));
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.command,
            Command::Locations { ref state, .. } if state.as_deref() == Some("TX")
        ));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(CliConfig::try_parse_from([
            "landed-cost",
            "quote",
            "--auction",
            "Copart",
            "--location",
            "Dallas (TX)",
            "--vehicle-class",
            "truck",
        ])
        .is_err());

        let negative_rate =
            CliConfig::try_parse_from(["landed-cost", "--rate=-1", "auctions"]).unwrap();
        assert!(negative_rate.validate().is_err());

        let blank_auction =
            CliConfig::try_parse_from(["landed-cost", "states", "--auction", " "]).unwrap();
        assert!(blank_auction.validate().is_err());
    }
}
