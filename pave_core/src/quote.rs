//! # Customer Quotes
//!
//! A [`Quote`] is the customer-facing document built from an estimate: one
//! line per billable service, sales tax, and a 30-day validity window.
//!
//! Line items are priced from the contractor's standard service list
//! ([`Service`]), not from the estimate's internal material costs.
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use pave_core::calculations::sealcoat::{estimate, SealcoatInput};
//! use pave_core::quote::{CustomerInfo, Quote};
//! use pave_core::rates::RateConfig;
//!
//! let input = SealcoatInput::new(5000.0).with_second_coat();
//! let result = estimate(&input, &RateConfig::default()).unwrap();
//!
//! let customer = CustomerInfo::named("Patrick County Schools");
//! let quote = Quote::from_estimate(&input, &result, customer, Utc::now()).unwrap();
//!
//! // 1st coat, 2nd coat, sand charge
//! assert_eq!(quote.line_items.len(), 3);
//! println!("{}: ${:.2}", quote.quote_number, quote.total());
//! ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::sealcoat::{SealcoatInput, SealcoatResult};
use crate::errors::CalcResult;
use crate::units::round2;

/// Days a quote stays valid after issue
pub const QUOTE_VALID_DAYS: i64 = 30;

/// Default sales tax (%), Virginia
pub const DEFAULT_SALES_TAX_PERCENT: f64 = 5.75;

/// Standard billable services and their list prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    FirstCoat,
    SecondCoat,
    ThirdCoat,
    CrackSealing,
    Patching,
    Striping,
    OilSpotPriming,
    SandCharge,
    PolymerCharge,
}

impl Service {
    /// Every service, in the order they appear on a quote
    pub const ALL: [Service; 9] = [
        Service::FirstCoat,
        Service::SecondCoat,
        Service::ThirdCoat,
        Service::CrackSealing,
        Service::Patching,
        Service::Striping,
        Service::OilSpotPriming,
        Service::SandCharge,
        Service::PolymerCharge,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Service::FirstCoat => "1st Coat of Sealcoating",
            Service::SecondCoat => "2nd Coat of Sealcoating",
            Service::ThirdCoat => "3rd Coat of Sealcoating",
            Service::CrackSealing => "Crack Sealing - Hot melt applied",
            Service::Patching => "Potholes, patches, repairs",
            Service::Striping => "Handicap spots, Parking Lines, Curbs",
            Service::OilSpotPriming => "Oil spot priming - special treatment",
            Service::SandCharge => "Sand Charge - improves durability",
            Service::PolymerCharge => "Polymer Additive Charge",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Service::FirstCoat | Service::SecondCoat | Service::ThirdCoat => "Sq. Feet",
            Service::CrackSealing => "Linear Feet",
            Service::Patching | Service::Striping => "Flat Rate",
            Service::OilSpotPriming => "Per Spot",
            Service::SandCharge | Service::PolymerCharge => "Per Sq. Ft.",
        }
    }

    /// List price per unit (USD)
    pub fn default_unit_price(&self) -> f64 {
        match self {
            Service::FirstCoat => 0.08,
            Service::SecondCoat | Service::ThirdCoat => 0.05,
            Service::CrackSealing => 1.25,
            Service::Patching => 150.00,
            Service::Striping => 200.00,
            Service::OilSpotPriming => 15.00,
            Service::SandCharge => 0.02,
            Service::PolymerCharge => 0.015,
        }
    }

    fn coat(index: usize) -> Service {
        match index {
            0 => Service::FirstCoat,
            1 => Service::SecondCoat,
            _ => Service::ThirdCoat,
        }
    }
}

/// One priced line on a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    pub id: Uuid,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
}

impl QuoteLineItem {
    /// Line for a standard service at its list price.
    pub fn from_service(service: Service, quantity: f64) -> Self {
        QuoteLineItem::custom(service.description(), service.unit(), quantity, service.default_unit_price())
    }

    /// Free-form line.
    pub fn custom(
        description: impl Into<String>,
        unit: impl Into<String>,
        quantity: f64,
        unit_price: f64,
    ) -> Self {
        QuoteLineItem {
            id: Uuid::new_v4(),
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
        }
    }

    /// Extended price, quantity × unit price
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub site_location: String,
}

impl CustomerInfo {
    /// Customer with only a name filled in.
    pub fn named(name: impl Into<String>) -> Self {
        CustomerInfo {
            name: name.into(),
            ..CustomerInfo::default()
        }
    }
}

/// Customer quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// `Q` followed by six digits
    pub quote_number: String,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub customer: CustomerInfo,
    pub line_items: Vec<QuoteLineItem>,
    pub sales_tax_percent: f64,
    pub notes: String,
    /// Estimated days to complete the work
    pub completion_days: u64,
}

impl Quote {
    /// Create an empty quote issued at `issued`.
    pub fn new(customer: CustomerInfo, issued: DateTime<Utc>) -> Self {
        let date = issued.date_naive();
        Quote {
            quote_number: quote_number(issued),
            date,
            valid_until: date + Duration::days(QUOTE_VALID_DAYS),
            customer,
            line_items: Vec::new(),
            sales_tax_percent: DEFAULT_SALES_TAX_PERCENT,
            notes: String::new(),
            completion_days: 1,
        }
    }

    /// Build a quote from an estimate.
    ///
    /// Adds a line for each coat that was applied, oil-spot priming when
    /// spots were counted, and sand / polymer charges when those additives
    /// are in the mix. The customer's site location defaults to the job
    /// location.
    ///
    /// # Errors
    ///
    /// Returns the input's validation error if the area is missing.
    pub fn from_estimate(
        input: &SealcoatInput,
        result: &SealcoatResult,
        mut customer: CustomerInfo,
        issued: DateTime<Utc>,
    ) -> CalcResult<Self> {
        let area = input.validate()?;

        if customer.site_location.trim().is_empty() {
            customer.site_location = input.job_location.clone();
        }

        let mut quote = Quote::new(customer, issued);
        quote.completion_days = result.logistics.work_days.max(1);

        let coat_sq_ft = [
            result.coverage.first_coat_sq_ft,
            result.coverage.second_coat_sq_ft,
            result.coverage.third_coat_sq_ft,
        ];
        for (n, sq_ft) in coat_sq_ft.into_iter().enumerate() {
            if sq_ft > 0.0 {
                quote.add_item(QuoteLineItem::from_service(Service::coat(n), sq_ft));
            }
        }

        if input.oil_spot_count > 0 {
            quote.add_item(QuoteLineItem::from_service(
                Service::OilSpotPriming,
                f64::from(input.oil_spot_count),
            ));
        }
        if input.sand.enabled && result.materials.sand_bags > 0 {
            quote.add_item(QuoteLineItem::from_service(Service::SandCharge, area));
        }
        if input.polymer.enabled && result.materials.polymer_buckets > 0 {
            quote.add_item(QuoteLineItem::from_service(Service::PolymerCharge, area));
        }

        tracing::info!(
            quote_number = %quote.quote_number,
            lines = quote.line_items.len(),
            "quote built from estimate"
        );
        Ok(quote)
    }

    /// Append a line item, returning its id.
    pub fn add_item(&mut self, item: QuoteLineItem) -> Uuid {
        let id = item.id;
        self.line_items.push(item);
        id
    }

    /// Remove a line item by id.
    ///
    /// A quote always keeps at least one line; removing the last one is
    /// refused and returns `None`.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<QuoteLineItem> {
        if self.line_items.len() <= 1 {
            return None;
        }
        let index = self.line_items.iter().position(|item| item.id == *id)?;
        Some(self.line_items.remove(index))
    }

    /// Get a line item by id.
    pub fn get_item(&self, id: &Uuid) -> Option<&QuoteLineItem> {
        self.line_items.iter().find(|item| item.id == *id)
    }

    /// Sum of line totals
    pub fn subtotal(&self) -> f64 {
        round2(self.line_items.iter().map(QuoteLineItem::total).sum())
    }

    pub fn sales_tax(&self) -> f64 {
        round2(self.subtotal() * (self.sales_tax_percent / 100.0))
    }

    pub fn total(&self) -> f64 {
        round2(self.subtotal() + self.sales_tax())
    }
}

/// `Q` + last six digits of the issue time in Unix milliseconds.
fn quote_number(issued: DateTime<Utc>) -> String {
    format!("Q{:06}", issued.timestamp_millis().rem_euclid(1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::sealcoat::estimate;
    use crate::rates::RateConfig;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_quote_number_and_dates() {
        let quote = Quote::new(CustomerInfo::named("Acme"), issued());
        // 1741944600000 ms
        assert_eq!(quote.quote_number, "Q600000");
        assert_eq!(quote.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(quote.valid_until, NaiveDate::from_ymd_opt(2025, 4, 13).unwrap());
        assert_eq!(quote.sales_tax_percent, 5.75);
    }

    #[test]
    fn test_quote_number_pads() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_042).unwrap();
        assert_eq!(quote_number(at), "Q000042");
    }

    #[test]
    fn test_from_estimate_lines() {
        let input = SealcoatInput::new(5000.0)
            .with_second_coat()
            .with_polymer(3.0)
            .with_oil_spots(10);
        let result = estimate(&input, &RateConfig::default()).unwrap();
        let quote = Quote::from_estimate(&input, &result, CustomerInfo::named("Acme"), issued()).unwrap();

        let descriptions: Vec<&str> = quote.line_items.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                Service::FirstCoat.description(),
                Service::SecondCoat.description(),
                Service::OilSpotPriming.description(),
                Service::SandCharge.description(),
                Service::PolymerCharge.description(),
            ]
        );

        // 400 + 250 + 150 + 100 + 75
        assert_eq!(quote.subtotal(), 975.0);
        assert_eq!(quote.sales_tax(), 56.06);
        assert_eq!(quote.total(), 1031.06);
    }

    #[test]
    fn test_tiny_area_keeps_sand_line() {
        // 0.1 sq ft -> 0.00432 lb of sand, rounds to 0 but still one bag
        let tiny = SealcoatInput::new(0.1);
        let result = estimate(&tiny, &RateConfig::default()).unwrap();
        assert_eq!(result.materials.sand_lbs, 0.0);
        assert_eq!(result.materials.sand_bags, 1);

        let quote = Quote::from_estimate(&tiny, &result, CustomerInfo::named("Acme"), issued()).unwrap();
        assert!(quote
            .line_items
            .iter()
            .any(|l| l.description == Service::SandCharge.description()));
    }

    #[test]
    fn test_sand_line_follows_sand_option() {
        let input = SealcoatInput::new(5000.0).without_sand();
        let result = estimate(&input, &RateConfig::default()).unwrap();
        let quote = Quote::from_estimate(&input, &result, CustomerInfo::named("Acme"), issued()).unwrap();
        assert_eq!(quote.line_items.len(), 1);
    }

    #[test]
    fn test_from_estimate_site_location() {
        let mut input = SealcoatInput::new(2000.0);
        input.job_location = "Rear lot, 12 Main St".to_string();
        let result = estimate(&input, &RateConfig::default()).unwrap();

        let quote = Quote::from_estimate(&input, &result, CustomerInfo::named("Acme"), issued()).unwrap();
        assert_eq!(quote.customer.site_location, "Rear lot, 12 Main St");
        assert_eq!(quote.completion_days, 1);

        let mut customer = CustomerInfo::named("Acme");
        customer.site_location = "Front lot".to_string();
        let quote = Quote::from_estimate(&input, &result, customer, issued()).unwrap();
        assert_eq!(quote.customer.site_location, "Front lot");
    }

    #[test]
    fn test_from_estimate_requires_area() {
        let good = SealcoatInput::new(2000.0);
        let result = estimate(&good, &RateConfig::default()).unwrap();
        let err = Quote::from_estimate(&SealcoatInput::default(), &result, CustomerInfo::default(), issued())
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_add_remove_items() {
        let mut quote = Quote::new(CustomerInfo::default(), issued());
        let first = quote.add_item(QuoteLineItem::from_service(Service::CrackSealing, 300.0));
        let second = quote.add_item(QuoteLineItem::custom("Mobilization", "Flat Rate", 1.0, 250.0));

        assert_eq!(quote.subtotal(), 625.0);
        assert!(quote.get_item(&second).is_some());

        let removed = quote.remove_item(&second).unwrap();
        assert_eq!(removed.description, "Mobilization");
        assert!(quote.remove_item(&first).is_none(), "last line must stay");
        assert_eq!(quote.line_items.len(), 1);
    }

    #[test]
    fn test_service_catalog() {
        assert_eq!(Service::ALL.len(), 9);
        for service in Service::ALL {
            assert!(!service.description().is_empty());
            assert!(service.default_unit_price() > 0.0);
        }
    }

    #[test]
    fn test_quote_serialization() {
        let mut quote = Quote::new(CustomerInfo::named("Acme"), issued());
        quote.add_item(QuoteLineItem::from_service(Service::Patching, 2.0));
        let json = serde_json::to_string(&quote).unwrap();
        assert!(json.contains("\"date\":\"2025-03-14\""));

        let roundtrip: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, quote);
    }
}
