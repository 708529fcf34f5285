//! Year-end balance records produced by the contribution and distribution
//! steps. Schedules are lists of these.
use super::PaymentFrequency;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionBalance {
    pub year: i32,
    pub balance: f64,
    pub interest_accrued: f64,
    pub weighted_growth_rate: f64,
    pub self_contribution_pct: f64,
    pub employer_contribution_pct: f64,
    pub current_salary: f64,
    pub cola_pct: f64,
    pub self_contribution: f64,
    pub employer_contribution: f64,
    pub contribution_frequency: PaymentFrequency,
}

impl ContributionBalance {
    pub fn total_contribution(&self) -> f64 {
        self.self_contribution + self.employer_contribution
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBalance {
    pub year: i32,
    pub balance: f64,
    pub interest_accrued: f64,
    pub weighted_growth_rate: f64,
    pub annual_distribution: f64,
    pub inflation_rate: f64,
    pub distribution_frequency: PaymentFrequency,
}

impl DistributionBalance {
    /// Amount paid per distribution period.
    pub fn periodic_distribution(&self) -> f64 {
        self.annual_distribution / self.distribution_frequency.annual_frequency() as f64
    }
}

/// Either kind of entry in a merged retirement schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Balance {
    Contribution(ContributionBalance),
    Distribution(DistributionBalance),
}

impl Balance {
    pub fn balance_type(&self) -> &'static str {
        match self {
            Balance::Contribution(_) => "contribution",
            Balance::Distribution(_) => "distribution",
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Balance::Contribution(b) => b.year,
            Balance::Distribution(b) => b.year,
        }
    }

    pub fn balance(&self) -> f64 {
        match self {
            Balance::Contribution(b) => b.balance,
            Balance::Distribution(b) => b.balance,
        }
    }

    pub fn interest_accrued(&self) -> f64 {
        match self {
            Balance::Contribution(b) => b.interest_accrued,
            Balance::Distribution(b) => b.interest_accrued,
        }
    }

    pub fn weighted_growth_rate(&self) -> f64 {
        match self {
            Balance::Contribution(b) => b.weighted_growth_rate,
            Balance::Distribution(b) => b.weighted_growth_rate,
        }
    }
}

impl From<ContributionBalance> for Balance {
    fn from(value: ContributionBalance) -> Self {
        Balance::Contribution(value)
    }
}

impl From<DistributionBalance> for Balance {
    fn from(value: DistributionBalance) -> Self {
        Balance::Distribution(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn distribution() -> DistributionBalance {
        DistributionBalance {
            year: 2040,
            balance: 500_000.0,
            interest_accrued: 18_000.0,
            weighted_growth_rate: 0.04,
            annual_distribution: 48_000.0,
            inflation_rate: 0.029,
            distribution_frequency: PaymentFrequency::Monthly,
        }
    }

    #[test]
    fn test_periodic_distribution() {
        assert_relative_eq!(distribution().periodic_distribution(), 4000.0);
    }

    #[test]
    fn test_tagged_serialization() {
        let entry = Balance::from(distribution());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "distribution");
        assert_eq!(json["annualDistribution"], 48_000.0);
        assert_eq!(json["distributionFrequency"], "MONTHLY");

        let back: Balance = serde_json::from_value(json).unwrap();
        assert_eq!(back.balance_type(), "distribution");
        assert_eq!(back.year(), 2040);
    }
}
