//! Distribution-phase balance step.
use super::balance::DistributionBalance;
use super::terms::DistributionBalanceTerms;
use super::FinancialFunctionType as Kind;
use super::{
    frequency_of, FinancialFunctions, ANNUALIZED_DISTRIBUTION, CURRENT_RETIREMENT_BALANCE, CURRENT_YEAR,
    DISTRIBUTION_FREQUENCY, INFLATION_RATE, RETIREMENT_START_YEAR, WEIGHTED_GROWTH_RATE,
};
use crate::compute::LazyFunction;
use std::sync::Arc;

pub type DistributionBalanceFunction = LazyFunction<DistributionBalance>;

/// Pays the inflation-adjusted distribution for `current_year` and grows what
/// is left. A balance smaller than the distribution is paid out in full and
/// earns nothing.
pub fn next_distribution(terms: &DistributionBalanceTerms) -> DistributionBalance {
    let years_retired = terms.current_year - terms.retirement_year;
    let estimate = terms.annualized_base * (1.0 + terms.inflation_rate).powi(years_retired);
    let (paid, interest) = if estimate < terms.current_balance {
        (estimate, (terms.current_balance - estimate) * terms.interest_rate)
    } else {
        (terms.current_balance, 0.0)
    };

    DistributionBalance {
        year: terms.current_year,
        balance: terms.current_balance - paid + interest,
        interest_accrued: interest,
        weighted_growth_rate: terms.interest_rate,
        annual_distribution: paid,
        inflation_rate: terms.inflation_rate,
        distribution_frequency: terms.frequency,
    }
}

impl FinancialFunctions {
    pub fn distribution_balance(&self, terms: &DistributionBalanceTerms) -> Arc<DistributionBalanceFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.scalar(CURRENT_RETIREMENT_BALANCE, None, terms.current_balance),
            pf.scalar(ANNUALIZED_DISTRIBUTION, None, terms.annualized_base),
            pf.scalar(INFLATION_RATE, None, terms.inflation_rate),
            pf.scalar(WEIGHTED_GROWTH_RATE, None, terms.interest_rate),
            pf.scalar(RETIREMENT_START_YEAR, None, terms.retirement_year),
            pf.scalar(CURRENT_YEAR, None, terms.current_year),
            pf.generic(DISTRIBUTION_FREQUENCY, None, terms.frequency),
        ];
        self.build(Kind::DistributionBalanceFunction, params, |p| {
            Ok(next_distribution(&DistributionBalanceTerms {
                current_balance: p.get_double(CURRENT_RETIREMENT_BALANCE)?,
                annualized_base: p.get_double(ANNUALIZED_DISTRIBUTION)?,
                inflation_rate: p.get_double(INFLATION_RATE)?,
                interest_rate: p.get_double(WEIGHTED_GROWTH_RATE)?,
                retirement_year: p.get_integer(RETIREMENT_START_YEAR)?,
                current_year: p.get_integer(CURRENT_YEAR)?,
                frequency: frequency_of(p, DISTRIBUTION_FREQUENCY)?,
            }))
        })
    }
}
