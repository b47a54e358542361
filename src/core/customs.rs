use crate::domain::model::{Amount, FuelType, VehicleProfile};
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_amount, validate_range, validate_non_negative_amount};
use serde::{Deserialize, Serialize};

/// Import customs constants (approximate Ukrainian rules). Excise rates are in EUR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomsRates {
    /// Duty rate for combustion vehicles.
    pub ice_duty_rate: f64,
    pub electric_duty_rate: f64,
    pub vat_rate: f64,
    /// EUR per 1000 cc per year of age.
    pub gas_excise_eur: f64,
    pub diesel_excise_eur: f64,
    /// EUR per kWh of battery capacity.
    pub electric_excise_eur_per_kwh: f64,
    /// Fixed conversion used for excise; independent of the live rate.
    pub eur_to_usd: f64,
}

impl Default for CustomsRates {
    fn default() -> Self {
        Self {
            ice_duty_rate: 0.10,
            electric_duty_rate: 0.0,
            vat_rate: 0.20,
            gas_excise_eur: 50.0,
            diesel_excise_eur: 75.0,
            electric_excise_eur_per_kwh: 1.0,
            eur_to_usd: 1.08,
        }
    }
}

impl CustomsRates {
    pub fn duty_rate(&self, fuel: &FuelType) -> f64 {
        if fuel.is_electric() {
            self.electric_duty_rate
        } else {
            self.ice_duty_rate
        }
    }

    /// Unrecognized fuels are charged at the gas rate rather than rejected.
    pub fn excise_base_eur(&self, fuel: &FuelType) -> f64 {
        match fuel {
            FuelType::Diesel => self.diesel_excise_eur,
            FuelType::Gas | FuelType::Electric => self.gas_excise_eur,
            FuelType::Other(name) => {
                tracing::warn!(
                    "⚠️ Unrecognized fuel type '{}', using the gas excise rate",
                    name
                );
                self.gas_excise_eur
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_range("customs.ice_duty_rate", self.ice_duty_rate, 0.0, 1.0)?;
        validate_range("customs.electric_duty_rate", self.electric_duty_rate, 0.0, 1.0)?;
        validate_range("customs.vat_rate", self.vat_rate, 0.0, 1.0)?;
        validate_non_negative_amount("customs.gas_excise_eur", self.gas_excise_eur)?;
        validate_non_negative_amount("customs.diesel_excise_eur", self.diesel_excise_eur)?;
        validate_non_negative_amount(
            "customs.electric_excise_eur_per_kwh",
            self.electric_excise_eur_per_kwh,
        )?;
        validate_positive_amount("customs.eur_to_usd", self.eur_to_usd)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CustomsBreakdown {
    pub duty: Amount,
    pub excise: Amount,
    pub vat: Amount,
    pub total: Amount,
}

impl CustomsBreakdown {
    pub fn unknown() -> Self {
        Self {
            duty: Amount::Unknown,
            excise: Amount::Unknown,
            vat: Amount::Unknown,
            total: Amount::Unknown,
        }
    }
}

/// Excise in USD, or `Unknown` when a required vehicle attribute is missing.
pub fn excise(vehicle: &VehicleProfile, rates: &CustomsRates, current_year: i32) -> Amount {
    let size = vehicle.engine_or_battery.filter(|v| v.is_finite());

    if vehicle.fuel.is_electric() {
        let Some(kwh) = size.filter(|v| *v >= 0.0) else {
            tracing::debug!("Excise unknown: electric vehicle without battery capacity");
            return Amount::Unknown;
        };
        return Amount::known(kwh * rates.electric_excise_eur_per_kwh * rates.eur_to_usd);
    }

    let Some(cc) = size.filter(|v| *v > 0.0) else {
        tracing::debug!("Excise unknown: engine size missing or not positive");
        return Amount::Unknown;
    };
    let Some(age) = vehicle.age(current_year) else {
        tracing::debug!("Excise unknown: model year missing or implausible");
        return Amount::Unknown;
    };

    let base_rate = rates.excise_base_eur(&vehicle.fuel);
    let excise_eur = base_rate * (cc / 1000.0) * f64::from(age);
    tracing::debug!(
        "Excise: {} EUR x {} cc / 1000 x {} years = {:.2} EUR",
        base_rate,
        cc,
        age,
        excise_eur
    );
    Amount::known(excise_eur * rates.eur_to_usd)
}

/// Duty, excise and VAT on `taxable_base` (purchase price plus auction fee).
///
/// Duty and VAT are only reported together with excise: if any precondition
/// fails, the whole breakdown is unknown.
pub fn customs(
    taxable_base: Amount,
    vehicle: &VehicleProfile,
    rates: &CustomsRates,
    current_year: i32,
) -> CustomsBreakdown {
    let Some(base) = taxable_base.value() else {
        return CustomsBreakdown::unknown();
    };

    let excise = excise(vehicle, rates, current_year);
    if excise.is_unknown() {
        return CustomsBreakdown::unknown();
    }

    let duty = Amount::known(base * rates.duty_rate(&vehicle.fuel));
    let vat = (Amount::known(base) + duty + excise) * rates.vat_rate;
    let total = duty + excise + vat;

    CustomsBreakdown {
        duty,
        excise,
        vat,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2025;

    fn approx(amount: Amount, expected: f64) {
        let value = amount.value().expect("amount should be known");
        assert!(
            (value - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            value
        );
    }

    #[test]
    fn test_gas_vehicle_five_years_old() {
        let vehicle = VehicleProfile::new(FuelType::Gas, Some(YEAR - 5), Some(2000.0));
        let result = customs(Amount::Known(5000.0), &vehicle, &CustomsRates::default(), YEAR);

        approx(result.duty, 500.0);
        approx(result.excise, 540.0);
        approx(result.vat, 1208.0);
        approx(result.total, 2248.0);
    }

    #[test]
    fn test_electric_vehicle() {
        let vehicle = VehicleProfile::new(FuelType::Electric, None, Some(75.0));
        let result = customs(Amount::Known(8000.0), &vehicle, &CustomsRates::default(), YEAR);

        assert_eq!(result.duty, Amount::Known(0.0));
        approx(result.excise, 81.0);
        approx(result.vat, 1616.2);
        approx(result.total, 1697.2);
    }

    #[test]
    fn test_electric_duty_is_zero_for_any_base() {
        let vehicle = VehicleProfile::new(FuelType::Electric, Some(2024), Some(60.0));
        for base in [0.0, 1.0, 999.99, 25_000.0, 1_000_000.0] {
            let result = customs(Amount::Known(base), &vehicle, &CustomsRates::default(), YEAR);
            assert_eq!(result.duty, Amount::Known(0.0));
        }
    }

    #[test]
    fn test_new_combustion_vehicle_has_no_excise() {
        for fuel in [FuelType::Gas, FuelType::Diesel] {
            for cc in [999.0, 2000.0, 6200.0] {
                let vehicle = VehicleProfile::new(fuel.clone(), Some(YEAR), Some(cc));
                assert_eq!(
                    excise(&vehicle, &CustomsRates::default(), YEAR),
                    Amount::Known(0.0)
                );
            }
        }
    }

    #[test]
    fn test_diesel_uses_diesel_rate() {
        let vehicle = VehicleProfile::new(FuelType::Diesel, Some(YEAR - 2), Some(1500.0));
        // 75 x 1.5 x 2 = 225 EUR
        approx(excise(&vehicle, &CustomsRates::default(), YEAR), 225.0 * 1.08);
    }

    #[test]
    fn test_unrecognized_fuel_falls_back_to_gas_rate() {
        let vehicle = VehicleProfile::new(
            FuelType::Other("lpg".to_string()),
            Some(YEAR - 5),
            Some(2000.0),
        );
        let result = customs(Amount::Known(5000.0), &vehicle, &CustomsRates::default(), YEAR);
        approx(result.duty, 500.0);
        approx(result.total, 2248.0);
    }

    #[test]
    fn test_missing_attributes_make_everything_unknown() {
        let rates = CustomsRates::default();
        let cases = [
            VehicleProfile::new(FuelType::Gas, None, Some(2000.0)),
            VehicleProfile::new(FuelType::Gas, Some(1899), Some(2000.0)),
            VehicleProfile::new(FuelType::Gas, Some(2020), None),
            VehicleProfile::new(FuelType::Gas, Some(2020), Some(0.0)),
            VehicleProfile::new(FuelType::Diesel, Some(2020), Some(-1.0)),
            VehicleProfile::new(FuelType::Electric, None, None),
            VehicleProfile::new(FuelType::Electric, None, Some(-5.0)),
            VehicleProfile::new(FuelType::Electric, None, Some(f64::NAN)),
        ];
        for vehicle in &cases {
            assert_eq!(
                customs(Amount::Known(5000.0), vehicle, &rates, YEAR),
                CustomsBreakdown::unknown(),
                "{:?}",
                vehicle
            );
        }
    }

    #[test]
    fn test_unknown_base_is_unknown() {
        let vehicle = VehicleProfile::new(FuelType::Gas, Some(2020), Some(2000.0));
        assert_eq!(
            customs(Amount::Unknown, &vehicle, &CustomsRates::default(), YEAR),
            CustomsBreakdown::unknown()
        );
    }

    #[test]
    fn test_electric_with_zero_capacity_is_known() {
        let vehicle = VehicleProfile::new(FuelType::Electric, None, Some(0.0));
        let result = customs(Amount::Known(1000.0), &vehicle, &CustomsRates::default(), YEAR);
        approx(result.total, 200.0);
    }

    #[test]
    fn test_default_rates_are_valid() {
        assert!(CustomsRates::default().validate().is_ok());
        let broken = CustomsRates {
            vat_rate: 1.5,
            ..CustomsRates::default()
        };
        assert!(broken.validate().is_err());
    }
}
