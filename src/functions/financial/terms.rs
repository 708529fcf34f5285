//! Plain inputs for the financial functions and models. Each deserializes
//! from camelCase JSON so scenarios can be stored next to a context config.
use super::PaymentFrequency;
use serde::{Deserialize, Serialize};

/// Inputs to a single contribution-balance step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionBalanceTerms {
    pub current_salary: f64,
    pub cola_pct: f64,
    pub current_balance: f64,
    pub self_contribution_pct: f64,
    pub employer_contribution_pct: f64,
    pub weighted_growth_rate: f64,
    pub contribution_frequency: PaymentFrequency,
    pub current_year: i32,
    pub end_year: i32,
}

/// Inputs to a single distribution-balance step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBalanceTerms {
    pub current_balance: f64,
    pub annualized_base: f64,
    pub inflation_rate: f64,
    pub interest_rate: f64,
    pub retirement_year: i32,
    pub current_year: i32,
    pub frequency: PaymentFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionModelTerms {
    pub current_age: i32,
    pub retirement_age: i32,
    pub current_salary: f64,
    pub self_contribution_pct: f64,
    pub employer_contribution_pct: f64,
    pub current_balance: f64,
    pub cola_pct: f64,
    pub weighted_growth_rate: f64,
    pub contribution_frequency: PaymentFrequency,
}

/// `duration` is in years; zero or less means "distribute until depleted"
/// using `annualized_distribution`, or 4% of the starting balance when that
/// is zero too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionModelTerms {
    pub starting_balance: f64,
    pub retirement_year: i32,
    pub interest_rate: f64,
    pub frequency: PaymentFrequency,
    pub inflation_rate: f64,
    pub duration: i32,
    pub annualized_distribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementTerms {
    pub current_age: i32,
    pub retirement_age: i32,
    pub current_salary: f64,
    pub current_balance: f64,
    pub self_contribution_pct: f64,
    pub employer_contribution_pct: f64,
    pub cola_pct: f64,
    pub weighted_growth_rate: f64,
    pub contribution_frequency: PaymentFrequency,
    pub post_retirement_interest: f64,
    pub distribution_frequency: PaymentFrequency,
    pub inflation_rate: f64,
    pub duration: i32,
    pub annualized_last_salary_pct: f64,
}

impl RetirementTerms {
    pub fn contribution_terms(&self) -> ContributionModelTerms {
        ContributionModelTerms {
            current_age: self.current_age,
            retirement_age: self.retirement_age,
            current_salary: self.current_salary,
            self_contribution_pct: self.self_contribution_pct,
            employer_contribution_pct: self.employer_contribution_pct,
            current_balance: self.current_balance,
            cola_pct: self.cola_pct,
            weighted_growth_rate: self.weighted_growth_rate,
            contribution_frequency: self.contribution_frequency,
        }
    }
}
