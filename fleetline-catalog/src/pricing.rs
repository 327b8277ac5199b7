use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Reverse;
use thiserror::Error;

/// Pickup and return as entered on the car-detail page. Any field may
/// still be unset while the user is filling the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPeriod {
    pub pickup_date: Option<NaiveDate>,
    pub pickup_time: Option<NaiveTime>,
    pub return_date: Option<NaiveDate>,
    pub return_time: Option<NaiveTime>,
}

impl RentalPeriod {
    /// All four fields present; gates the "proceed to booking" action
    pub fn is_complete(&self) -> bool {
        self.pickup_date.is_some()
            && self.pickup_time.is_some()
            && self.return_date.is_some()
            && self.return_time.is_some()
    }

    pub fn pickup(&self) -> Option<NaiveDateTime> {
        Some(self.pickup_date?.and_time(self.pickup_time?))
    }

    pub fn return_at(&self) -> Option<NaiveDateTime> {
        Some(self.return_date?.and_time(self.return_time?))
    }
}

/// Step discount on the daily rate, applied once `min_days` whole days
/// are booked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub min_days: i64,
    /// Fraction taken off the daily rate (0.04 = 4%)
    pub discount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_tiers")]
    pub discount_tiers: Vec<DiscountTier>,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_tiers() -> Vec<DiscountTier> {
    vec![
        DiscountTier { min_days: 8, discount: 0.04 },
        DiscountTier { min_days: 4, discount: 0.02 },
    ]
}

#[derive(Debug, Error, PartialEq)]
pub enum PricingConfigError {
    #[error("Discount for {min_days}+ days must be in [0, 1), got {discount}")]
    InvalidDiscount { min_days: i64, discount: f64 },
    #[error("Tier threshold must not be negative, got {0}")]
    NegativeMinDays(i64),
}

impl PricingConfig {
    /// Rejects tiers that would produce a zero, negative or inflated rate
    pub fn validate(&self) -> Result<(), PricingConfigError> {
        for tier in &self.discount_tiers {
            if tier.min_days < 0 {
                return Err(PricingConfigError::NegativeMinDays(tier.min_days));
            }
            if !(0.0..1.0).contains(&tier.discount) {
                return Err(PricingConfigError::InvalidDiscount {
                    min_days: tier.min_days,
                    discount: tier.discount,
                });
            }
        }
        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            discount_tiers: default_tiers(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalQuote {
    pub days: i64,
    /// Remainder hours, 0-23
    pub hours: i64,
    pub effective_price_per_day: f64,
    pub total_price: i64,
}

/// Rental duration and price calculator
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        let mut config = config;
        config.discount_tiers.sort_by_key(|t| Reverse(t.min_days));
        Self { config }
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    /// Discount for a whole-day count. Remainder hours never move a
    /// rental into a higher tier.
    pub fn discount_for(&self, days: i64) -> f64 {
        self.config
            .discount_tiers
            .iter()
            .find(|t| days >= t.min_days)
            .map(|t| t.discount)
            .unwrap_or(0.0)
    }

    /// Quote for a form state; `None` until all four fields are set and
    /// return is after pickup.
    pub fn quote(&self, period: &RentalPeriod, base_price_per_day: f64) -> Option<RentalQuote> {
        self.quote_between(period.pickup()?, period.return_at()?, base_price_per_day)
    }

    pub fn quote_between(
        &self,
        pickup: NaiveDateTime,
        return_at: NaiveDateTime,
        base_price_per_day: f64,
    ) -> Option<RentalQuote> {
        if !base_price_per_day.is_finite() || base_price_per_day <= 0.0 {
            return None;
        }
        if return_at <= pickup {
            return None;
        }

        let elapsed_hours = (return_at - pickup).num_hours();
        if elapsed_hours == 0 {
            return None;
        }

        let days = elapsed_hours / 24;
        let hours = elapsed_hours % 24;

        let rate = base_price_per_day * (1.0 - self.discount_for(days));
        let total = days as f64 * rate + (hours as f64 / 24.0) * rate;

        Some(RentalQuote {
            days,
            hours,
            effective_price_per_day: rate,
            total_price: total.round() as i64,
        })
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
