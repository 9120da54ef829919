use serde::{Deserialize, Serialize};

const LONG_STAY_DISCOUNT: f64 = 0.10;
const LONG_STAY_THRESHOLD_DAYS: i64 = 7;

/// Charge computation strategy attached to a patient at admission. Pure:
/// the same rate and stay length always produce the same total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPolicy {
    Standard,
    LongStayDiscount,
}

impl BillingPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard Billing",
            Self::LongStayDiscount => "Long Stay Discount Billing",
        }
    }

    /// Total charge for a stay. The discount variant takes a flat 10% off
    /// the whole stay once it reaches seven days; shorter stays are billed
    /// at the standard rate.
    pub fn compute_total(self, daily_rate: f64, days_stayed: i64) -> f64 {
        let total = daily_rate * days_stayed as f64;
        match self {
            Self::Standard => total,
            Self::LongStayDiscount => {
                if days_stayed >= LONG_STAY_THRESHOLD_DAYS {
                    total * (1.0 - LONG_STAY_DISCOUNT)
                } else {
                    total
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_is_linear() {
        assert_eq!(BillingPolicy::Standard.compute_total(1000.0, 5), 5000.0);
    }

    #[test]
    fn discount_applies_to_the_whole_stay_at_seven_days() {
        assert_eq!(
            BillingPolicy::LongStayDiscount.compute_total(1000.0, 7),
            6300.0
        );
    }

    #[test]
    fn discount_is_withheld_below_the_threshold() {
        assert_eq!(
            BillingPolicy::LongStayDiscount.compute_total(1000.0, 6),
            6000.0
        );
    }
}
