use crate::core::customs::customs;
use crate::core::logistics::logistics;
use crate::core::tariff::Tariff;
use crate::domain::dataset::ReferenceDataset;
use crate::domain::model::{Amount, Quote, QuoteInputs};

/// Immutable inputs shared by every quote in a process.
#[derive(Debug, Clone, Copy)]
pub struct QuoteContext<'a> {
    pub dataset: &'a ReferenceDataset,
    pub tariff: &'a Tariff,
    /// Live EUR→USD rate, resolved once before any quote is built.
    pub eur_usd: Amount,
    pub current_year: i32,
}

/// Builds an itemized landed-cost quote. Pure: the same inputs and context
/// always give the same quote.
pub fn build_quote(ctx: &QuoteContext<'_>, inputs: &QuoteInputs) -> Quote {
    let Some(record) = ctx
        .dataset
        .resolve_label(&inputs.auction, &inputs.location_label)
    else {
        tracing::debug!(
            "No location record for auction '{}' and label '{}'",
            inputs.auction,
            inputs.location_label
        );
        return Quote::unknown();
    };

    let price = Amount::from_option(inputs.purchase_price.filter(|p| *p >= 0.0));
    let fee_bearing = ctx.tariff.auction_fee.is_fee_bearing(&record.auction);

    // Non-fee-bearing auctions contribute zero; a fee-bearing auction's
    // unknown fee stays unknown.
    let auction_fee = if fee_bearing {
        ctx.tariff.auction_fee.fee(price)
    } else {
        Amount::Known(0.0)
    };

    let route = logistics(
        record,
        ctx.dataset,
        inputs.vehicle_class,
        ctx.eur_usd,
        &ctx.tariff.logistics,
    );
    let logistics_total = route.total();

    let taxable_base = price + auction_fee;
    let duties = customs(
        taxable_base,
        &inputs.vehicle,
        &ctx.tariff.customs,
        ctx.current_year,
    );

    let grand_total = price + auction_fee + logistics_total + duties.total;

    Quote {
        auction: Some(record.auction.clone()),
        location: Some(record.location.clone()),
        state: Some(record.state.clone()),
        details: Some(record.details()),
        vehicle_class: Some(inputs.vehicle_class),
        fee_bearing,
        best_port: route.best_port,
        port_hauls: route.port_hauls,
        purchase_price: price,
        auction_fee,
        inland_haul: route.inland,
        sea_freight: route.sea,
        expedition_converted: route.expedition_converted,
        expedition_fixed: route.expedition_fixed,
        customs_duty: duties.duty,
        excise: duties.excise,
        vat: duties.vat,
        customs_total: duties.total,
        logistics_total,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FuelType, VehicleClass, VehicleProfile};

    const YEAR: i32 = 2025;

    fn dataset() -> ReferenceDataset {
        serde_json::from_value(serde_json::json!({
            "auctions": ["Copart", "IAAI"],
            "records": [
                {
                    "auction": "Copart", "location": "Dallas", "state": "TX", "city": "Wilmer",
                    "zip": "75172", "ports": {"Houston": 300, "Savannah": 700}
                },
                {
                    "auction": "IAAI", "location": "Dallas", "state": "TX", "city": "Grand Prairie",
                    "ports": {"Houston": 300}
                },
                {
                    "auction": "Copart", "location": "Remote", "state": "ND", "city": "Bismarck",
                    "ports": {"Houston": null, "Savannah": null}
                }
            ],
            "ports": ["Houston", "Savannah"],
            "seaRates": {"3": {"Houston": 1450, "Savannah": 1500}, "4": {"Houston": 1150, "Savannah": 1200}}
        }))
        .unwrap()
    }

    fn inputs(auction: &str, label: &str) -> QuoteInputs {
        QuoteInputs {
            auction: auction.to_string(),
            location_label: label.to_string(),
            vehicle_class: VehicleClass::Standard,
            purchase_price: Some(999.99),
            vehicle: VehicleProfile::new(FuelType::Gas, Some(YEAR - 5), Some(2000.0)),
        }
    }

    fn approx(amount: Amount, expected: f64) {
        let value = amount.value().expect("amount should be known");
        assert!((value - expected).abs() < 1e-6, "expected {}, got {}", expected, value);
    }

    #[test]
    fn test_full_quote_at_fee_bearing_auction() {
        let data = dataset();
        let tariff = Tariff::default();
        let ctx = QuoteContext {
            dataset: &data,
            tariff: &tariff,
            eur_usd: Amount::Known(1.1794),
            current_year: YEAR,
        };

        let quote = build_quote(&ctx, &inputs("copart", "Dallas (TX)"));

        assert!(quote.fee_bearing);
        approx(quote.auction_fee, 470.0);
        assert_eq!(quote.best_port.as_deref(), Some("Houston"));
        approx(quote.inland_haul, 300.0);
        approx(quote.sea_freight, 1150.0);
        approx(quote.expedition_converted, 350.0 * 1.1794);
        approx(quote.expedition_fixed, 750.0);

        // taxable base 1469.99: duty 147.0, excise 540, VAT 0.2 x (1469.99 + 146.999 + 540)
        approx(quote.customs_duty, 146.999);
        approx(quote.excise, 540.0);
        let vat = 0.2 * (1469.99 + 146.999 + 540.0);
        approx(quote.vat, vat);
        approx(quote.customs_total, 146.999 + 540.0 + vat);

        let logistics_total = 300.0 + 1150.0 + 350.0 * 1.1794 + 750.0;
        approx(quote.logistics_total, logistics_total);
        approx(
            quote.grand_total,
            999.99 + 470.0 + logistics_total + 146.999 + 540.0 + vat,
        );
    }

    #[test]
    fn test_non_fee_bearing_auction_contributes_zero_fee() {
        let data = dataset();
        let tariff = Tariff::default();
        let ctx = QuoteContext {
            dataset: &data,
            tariff: &tariff,
            eur_usd: Amount::Known(1.1794),
            current_year: YEAR,
        };

        let quote = build_quote(&ctx, &inputs("IAAI", "Dallas (TX)"));
        assert!(!quote.fee_bearing);
        assert_eq!(quote.auction_fee, Amount::Known(0.0));
        approx(quote.customs_duty, 99.999);
        assert!(quote.grand_total.is_known());
    }

    #[test]
    fn test_unresolvable_location_is_entirely_unknown() {
        let data = dataset();
        let tariff = Tariff::default();
        let ctx = QuoteContext {
            dataset: &data,
            tariff: &tariff,
            eur_usd: Amount::Known(1.1794),
            current_year: YEAR,
        };

        for (auction, label) in [
            ("Copart", "Houston (TX)"),
            ("Copart", "Dallas"),
            ("Manheim", "Dallas (TX)"),
            ("", "Dallas (TX)"),
        ] {
            let quote = build_quote(&ctx, &inputs(auction, label));
            assert_eq!(quote, Quote::unknown());
            assert!(quote.line_items().iter().all(|(_, amount)| amount.is_unknown()));
        }
    }

    #[test]
    fn test_location_without_routes_has_unknown_total() {
        let data = dataset();
        let tariff = Tariff::default();
        let ctx = QuoteContext {
            dataset: &data,
            tariff: &tariff,
            eur_usd: Amount::Known(1.1794),
            current_year: YEAR,
        };

        let quote = build_quote(&ctx, &inputs("Copart", "Remote (ND)"));
        assert_eq!(quote.best_port, None);
        assert_eq!(quote.sea_freight, Amount::Unknown);
        assert_eq!(quote.logistics_total, Amount::Unknown);
        assert!(quote.auction_fee.is_known());
        assert!(quote.customs_total.is_known());
        assert_eq!(quote.grand_total, Amount::Unknown);
    }

    #[test]
    fn test_each_missing_input_makes_grand_total_unknown() {
        let data = dataset();
        let tariff = Tariff::default();
        let known_rate = QuoteContext {
            dataset: &data,
            tariff: &tariff,
            eur_usd: Amount::Known(1.1794),
            current_year: YEAR,
        };
        let baseline = inputs("Copart", "Dallas (TX)");
        assert!(build_quote(&known_rate, &baseline).grand_total.is_known());

        let mut no_price = baseline.clone();
        no_price.purchase_price = None;
        let quote = build_quote(&known_rate, &no_price);
        assert_eq!(quote.auction_fee, Amount::Unknown);
        assert_eq!(quote.customs_total, Amount::Unknown);
        assert_eq!(quote.grand_total, Amount::Unknown);

        let mut negative_price = inputs("IAAI", "Dallas (TX)");
        negative_price.purchase_price = Some(-5000.0);
        let quote = build_quote(&known_rate, &negative_price);
        assert_eq!(quote.purchase_price, Amount::Unknown);
        assert_eq!(quote.auction_fee, Amount::Known(0.0));
        assert_eq!(quote.customs_duty, Amount::Unknown);
        assert_eq!(quote.grand_total, Amount::Unknown);

        let mut no_record = baseline.clone();
        no_record.location_label = "Nowhere (ZZ)".to_string();
        assert_eq!(build_quote(&known_rate, &no_record).grand_total, Amount::Unknown);

        let no_rate = QuoteContext {
            eur_usd: Amount::Unknown,
            ..known_rate
        };
        let quote = build_quote(&no_rate, &baseline);
        assert_eq!(quote.expedition_converted, Amount::Unknown);
        assert_eq!(quote.grand_total, Amount::Unknown);

        let mut no_engine = baseline.clone();
        no_engine.vehicle.engine_or_battery = None;
        assert_eq!(build_quote(&known_rate, &no_engine).grand_total, Amount::Unknown);

        let mut no_year = baseline.clone();
        no_year.vehicle.model_year = None;
        assert_eq!(build_quote(&known_rate, &no_year).grand_total, Amount::Unknown);
    }

    #[test]
    fn test_unknown_fee_propagates_for_fee_bearing_auction() {
        let data = dataset();
        let tariff = Tariff::default();
        let ctx = QuoteContext {
            dataset: &data,
            tariff: &tariff,
            eur_usd: Amount::Known(1.1794),
            current_year: YEAR,
        };
        let mut gap_price = inputs("Copart", "Dallas (TX)");
        gap_price.purchase_price = Some(49.995);

        let quote = build_quote(&ctx, &gap_price);
        assert_eq!(quote.auction_fee, Amount::Unknown);
        assert_eq!(quote.customs_total, Amount::Unknown);
        assert_eq!(quote.grand_total, Amount::Unknown);
    }

    #[test]
    fn test_build_quote_is_idempotent() {
        let data = dataset();
        let tariff = Tariff::default();
        let ctx = QuoteContext {
            dataset: &data,
            tariff: &tariff,
            eur_usd: Amount::Known(1.1794),
            current_year: YEAR,
        };
        let request = inputs("Copart", "Dallas (TX)");

        let first = build_quote(&ctx, &request);
        let second = build_quote(&ctx, &request);
        assert_eq!(first, second);
        for ((_, a), (_, b)) in first.line_items().iter().zip(second.line_items().iter()) {
            assert_eq!(
                a.value().map(f64::to_bits),
                b.value().map(f64::to_bits)
            );
        }
    }
}
