//! Financial function library: amortization, growth blending, retirement
//! balances and the retirement models built on them.
pub mod amortize;
pub mod balance;
pub mod contribution;
pub mod distribution;
pub mod retirement;
pub mod terms;

pub use balance::{Balance, ContributionBalance, DistributionBalance};
pub use retirement::{DepletionOutcome, RetirementContributionModel, RetirementDistributionModel, RetirementModel};
pub use terms::{
    ContributionBalanceTerms, ContributionModelTerms, DistributionBalanceTerms, DistributionModelTerms, RetirementTerms,
};

use crate::compute::{FunctionType, LazyFunction};
use crate::error::FunctionError;
use crate::parameter::{Parameter, ParameterList};
use crate::provider::{crate_version, Context, FunctionProvider, ParameterFactory, Provider, Version};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub const FINANCIAL_PROVIDER: &str = "Financial";

// Parameter names.
pub const CURRENT_AGE: &str = "currentAge";
pub const RETIREMENT_AGE: &str = "retirementAge";
pub const CURRENT_SALARY: &str = "currentSalary";
pub const EMPLOYEE_CONTRIBUTION_PCT: &str = "employeeContributionPct";
pub const EMPLOYER_CONTRIBUTION_PCT: &str = "employerContributionPct";
pub const CURRENT_RETIREMENT_BALANCE: &str = "currentRetirementBalance";
pub const COLA_PCT: &str = "colaRatePct";
pub const WEIGHTED_GROWTH_RATE: &str = "weightedGrowthRate";
pub const INFLATION_RATE: &str = "inflationRate";
pub const PREVIOUS_BALANCE: &str = "previousBalance";
pub const CURRENT_YEAR: &str = "currentYear";
pub const END_YEAR: &str = "endYear";
pub const STOCK_GROWTH_RATE: &str = "stockGrowthRate";
pub const TREASURY_YIELD: &str = "treasuryYield";
pub const INVESTMENT_RATIO: &str = "investmentRatio";
pub const POST_RETIREMENT_INTEREST: &str = "postRetirementInterest";
pub const RETIREMENT_DURATION: &str = "retirementDuration";
pub const RETIREMENT_START_YEAR: &str = "retirementStartYear";
pub const DISTRIBUTION_FREQUENCY: &str = "distributionFrequency";
pub const ANNUALIZED_DISTRIBUTION: &str = "annualizedDistribution";
pub const LAST_SALARY_PCT: &str = "annualizedLastSalaryPct";
pub const CONTRIBUTION_FREQUENCY: &str = "contributionFrequency";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinancialFunctionType {
    RetirementContributionModel,
    ContributionBalanceFunction,
    ContributionSchedule,
    ContributionBalance,
    RetirementDistributionModel,
    DistributionBalanceFunction,
    DistributionSchedule,
    DistributionYears,
    DistributionLastYear,
    WeightedGrowth,
    TotalInterest,
    TotalSelfContribution,
    TotalEmployerContribution,
    LastSalary,
    Amortize,
    RetirementModel,
    RetirementSchedule,
    RetirementDepletionYear,
    RetirementIncomePct,
    RetirementAnnualDistribution,
    RetirementYear,
    TotalDistributions,
}

impl FinancialFunctionType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RetirementContributionModel => "retirementContributionModel",
            Self::ContributionBalanceFunction => "calculateContributionFunction",
            Self::ContributionSchedule => "contributionSchedule",
            Self::ContributionBalance => "contributionBalance",
            Self::RetirementDistributionModel => "retirementDistributionModel",
            Self::DistributionBalanceFunction => "calculateDistributionFunction",
            Self::DistributionSchedule => "distributionSchedule",
            Self::DistributionYears => "distributionLengthYears",
            Self::DistributionLastYear => "distributionLastYear",
            Self::WeightedGrowth => "calculateWeightedGrowthRate",
            Self::TotalInterest => "totalInterest",
            Self::TotalSelfContribution => "totalSelfContribution",
            Self::TotalEmployerContribution => "totalEmplContribution",
            Self::LastSalary => "lastSalary",
            Self::Amortize => "amortize",
            Self::RetirementModel => "retirementModel",
            Self::RetirementSchedule => "retirementSchedule",
            Self::RetirementDepletionYear => "retirementDepletionYear",
            Self::RetirementIncomePct => "retirementIncomePct",
            Self::RetirementAnnualDistribution => "retirementBaseAnnualDistribution",
            Self::RetirementYear => "retirementYear",
            Self::TotalDistributions => "totalDistributions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RetirementContributionModel => "Retirement Contribution Estimates",
            Self::ContributionBalanceFunction => "Calculate Contribution Balance",
            Self::ContributionSchedule => "Contribution Schedule",
            Self::ContributionBalance => "Contribution Balance",
            Self::RetirementDistributionModel => "Retirement Distribution Estimates",
            Self::DistributionBalanceFunction => "Calculate Distribution Balance",
            Self::DistributionSchedule => "Distribution Schedule",
            Self::DistributionYears => "Distribution Number of Years",
            Self::DistributionLastYear => "Distribution Last Year",
            Self::WeightedGrowth => "Weighted Growth Rate",
            Self::TotalInterest => "Total Interest Accrued",
            Self::TotalSelfContribution => "Total Self Contribution",
            Self::TotalEmployerContribution => "Total Employer Contribution",
            Self::LastSalary => "Last Salary",
            Self::Amortize => "Amortization Value",
            Self::RetirementModel => "Retirement Model",
            Self::RetirementSchedule => "Retirement Schedule",
            Self::RetirementDepletionYear => "Retirement Depletion Year",
            Self::RetirementIncomePct => "Retirement Income Replacement Percentage",
            Self::RetirementAnnualDistribution => "Base Retirement Annual Distribution",
            Self::RetirementYear => "Retirement Year",
            Self::TotalDistributions => "Total Distributions",
        }
    }

    pub fn function_type(&self) -> FunctionType {
        FunctionType::new(self.name(), self.label())
    }
}

/// Payments per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
    SemiMonthly,
    BiWeekly,
    Weekly,
}

impl PaymentFrequency {
    pub fn annual_frequency(&self) -> u32 {
        match self {
            PaymentFrequency::Annual => 1,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::SemiMonthly => 24,
            PaymentFrequency::BiWeekly => 26,
            PaymentFrequency::Weekly => 52,
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}/yr)", self, self.annual_frequency())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialProvider;

impl FinancialProvider {
    pub fn functions(&self, ctx: &Context) -> FinancialFunctions {
        FinancialFunctions { ctx: ctx.clone() }
    }
}

impl Provider for FinancialProvider {
    fn provider_name(&self) -> &str {
        FINANCIAL_PROVIDER
    }

    fn provider_version(&self) -> Version {
        crate_version()
    }
}

impl FunctionProvider for FinancialProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory for financial functions and models.
#[derive(Debug, Clone)]
pub struct FinancialFunctions {
    ctx: Context,
}

impl FinancialFunctions {
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    fn parameters(&self) -> &ParameterFactory {
        self.ctx.factories().parameter_factory()
    }

    fn build<T, F>(&self, kind: FinancialFunctionType, parameters: Vec<Parameter>, evaluator: F) -> Arc<LazyFunction<T>>
    where
        T: Clone,
        F: Fn(&ParameterList) -> Result<T, FunctionError> + Send + Sync + 'static,
    {
        Arc::new(LazyFunction::new(kind.function_type(), None, parameters.into_iter().collect(), evaluator))
    }
}

/// Frequency stored as a generic parameter.
fn frequency_of(p: &ParameterList, name: &str) -> Result<PaymentFrequency, FunctionError> {
    p.generic::<PaymentFrequency>(name).copied()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::provider::ContextConfig;
    use chrono::NaiveDate;

    pub fn financial_on(year: i32, month: u32, day: u32) -> FinancialFunctions {
        let config = ContextConfig {
            today: NaiveDate::from_ymd_opt(year, month, day),
            ..ContextConfig::default()
        };
        Context::from_config(config).unwrap().financial().unwrap()
    }

    pub fn financial() -> FinancialFunctions {
        financial_on(2024, 7, 1)
    }
}
