//! Contribution-phase balance steps.
//!
//! A step from a previous balance either rolls the account forward a full
//! year or, when the target year is the current calendar year, credits only
//! the part of the year that is still ahead.
use super::balance::ContributionBalance;
use super::terms::ContributionBalanceTerms;
use super::FinancialFunctionType as Kind;
use super::{
    frequency_of, FinancialFunctions, COLA_PCT, CONTRIBUTION_FREQUENCY, CURRENT_RETIREMENT_BALANCE, CURRENT_SALARY,
    CURRENT_YEAR, EMPLOYEE_CONTRIBUTION_PCT, EMPLOYER_CONTRIBUTION_PCT, END_YEAR, PREVIOUS_BALANCE,
    WEIGHTED_GROWTH_RATE,
};
use crate::compute::LazyFunction;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

pub type ContributionBalanceFunction = LazyFunction<ContributionBalance>;

/// Starting point: the current balance with nothing credited yet.
pub fn opening_balance(terms: &ContributionBalanceTerms) -> ContributionBalance {
    ContributionBalance {
        year: terms.current_year,
        balance: terms.current_balance,
        interest_accrued: 0.0,
        weighted_growth_rate: terms.weighted_growth_rate,
        self_contribution_pct: terms.self_contribution_pct,
        employer_contribution_pct: terms.employer_contribution_pct,
        current_salary: terms.current_salary,
        cola_pct: terms.cola_pct,
        self_contribution: 0.0,
        employer_contribution: 0.0,
        contribution_frequency: terms.contribution_frequency,
    }
}

pub fn advance(previous: &ContributionBalance, end_year: i32, today: NaiveDate) -> ContributionBalance {
    if end_year == today.year() {
        remainder_of_year(previous, today)
    } else {
        next_year(previous)
    }
}

fn days_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 31).map_or(365, |d| d.ordinal())
}

/// Credits the periods left after `today`. Salary and year are unchanged.
fn remainder_of_year(previous: &ContributionBalance, today: NaiveDate) -> ContributionBalance {
    let per_year = previous.contribution_frequency.annual_frequency() as f64;
    let remaining_share = 1.0 - f64::from(today.ordinal()) / f64::from(days_in_year(today.year()));
    let remaining_periods = (remaining_share * per_year).floor();
    let periodic_salary = previous.current_salary / per_year;

    let self_contribution = remaining_periods * periodic_salary * previous.self_contribution_pct;
    let employer_contribution = remaining_periods * periodic_salary * previous.employer_contribution_pct;
    let interest = previous.balance * previous.weighted_growth_rate * remaining_share;

    ContributionBalance {
        balance: previous.balance + interest + self_contribution + employer_contribution,
        interest_accrued: interest,
        self_contribution,
        employer_contribution,
        ..previous.clone()
    }
}

/// Full year: salary grows by COLA, then contributions and interest post.
fn next_year(previous: &ContributionBalance) -> ContributionBalance {
    let salary = previous.current_salary * (1.0 + previous.cola_pct);
    let interest = previous.balance * previous.weighted_growth_rate;
    let self_contribution = salary * previous.self_contribution_pct;
    let employer_contribution = salary * previous.employer_contribution_pct;

    ContributionBalance {
        year: previous.year + 1,
        balance: previous.balance + interest + self_contribution + employer_contribution,
        interest_accrued: interest,
        current_salary: salary,
        self_contribution,
        employer_contribution,
        ..previous.clone()
    }
}

impl FinancialFunctions {
    /// One step from the opening balance described by `terms` to `terms.end_year`.
    pub fn contribution_balance(&self, terms: &ContributionBalanceTerms) -> Arc<ContributionBalanceFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.scalar(CURRENT_SALARY, None, terms.current_salary),
            pf.scalar(COLA_PCT, None, terms.cola_pct),
            pf.scalar(CURRENT_RETIREMENT_BALANCE, None, terms.current_balance),
            pf.scalar(EMPLOYEE_CONTRIBUTION_PCT, None, terms.self_contribution_pct),
            pf.scalar(EMPLOYER_CONTRIBUTION_PCT, None, terms.employer_contribution_pct),
            pf.scalar(WEIGHTED_GROWTH_RATE, None, terms.weighted_growth_rate),
            pf.generic(CONTRIBUTION_FREQUENCY, None, terms.contribution_frequency),
            pf.scalar(CURRENT_YEAR, None, terms.current_year),
            pf.scalar(END_YEAR, None, terms.end_year),
        ];
        let today = self.ctx.today();
        self.build(Kind::ContributionBalanceFunction, params, move |p| {
            let terms = ContributionBalanceTerms {
                current_salary: p.get_double(CURRENT_SALARY)?,
                cola_pct: p.get_double(COLA_PCT)?,
                current_balance: p.get_double(CURRENT_RETIREMENT_BALANCE)?,
                self_contribution_pct: p.get_double(EMPLOYEE_CONTRIBUTION_PCT)?,
                employer_contribution_pct: p.get_double(EMPLOYER_CONTRIBUTION_PCT)?,
                weighted_growth_rate: p.get_double(WEIGHTED_GROWTH_RATE)?,
                contribution_frequency: frequency_of(p, CONTRIBUTION_FREQUENCY)?,
                current_year: p.get_integer(CURRENT_YEAR)?,
                end_year: p.get_integer(END_YEAR)?,
            };
            Ok(advance(&opening_balance(&terms), terms.end_year, today))
        })
    }

    /// One step from an already computed balance.
    pub fn contribution_balance_from(
        &self,
        previous: &ContributionBalance,
        end_year: i32,
    ) -> Arc<ContributionBalanceFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.generic(PREVIOUS_BALANCE, None, previous.clone()),
            pf.scalar(END_YEAR, None, end_year),
        ];
        let today = self.ctx.today();
        self.build(Kind::ContributionBalanceFunction, params, move |p| {
            let previous = p.generic::<ContributionBalance>(PREVIOUS_BALANCE)?;
            Ok(advance(previous, p.get_integer(END_YEAR)?, today))
        })
    }
}
