//! Retirement models: contribution phase, distribution phase and the
//! composite model that chains one into the other.
//!
//! Schedules are materialized eagerly. Each year needs the previous year's
//! balance as data, so the steps are computed in order and the resulting
//! records are stored as generic coefficients.
use super::balance::{Balance, ContributionBalance, DistributionBalance};
use super::terms::{
    ContributionBalanceTerms, ContributionModelTerms, DistributionBalanceTerms, DistributionModelTerms,
    RetirementTerms,
};
use super::FinancialFunctionType as Kind;
use super::{
    amortize::amortize, frequency_of, FinancialFunctions, ANNUALIZED_DISTRIBUTION, COLA_PCT, CONTRIBUTION_FREQUENCY,
    CURRENT_AGE, CURRENT_RETIREMENT_BALANCE, CURRENT_SALARY, DISTRIBUTION_FREQUENCY, EMPLOYEE_CONTRIBUTION_PCT,
    EMPLOYER_CONTRIBUTION_PCT, INFLATION_RATE, LAST_SALARY_PCT, POST_RETIREMENT_INTEREST, RETIREMENT_AGE,
    RETIREMENT_DURATION, RETIREMENT_START_YEAR, WEIGHTED_GROWTH_RATE,
};
use crate::compute::{CoefficientSet, Model, ModelState};
use crate::error::FunctionError;
use crate::parameter::{Parameter, ParameterList, Parameterized, Value};
use crate::store::Scalar;
use chrono::Datelike;
use serde::Serialize;

/// Share of the starting balance paid per year when neither a duration nor
/// an annualized distribution is given.
const DEFAULT_WITHDRAWAL_RATE: f64 = 0.04;

fn schedule_of<'a, T: 'static>(model: &'a dyn Model, kind: Kind) -> Option<&'a [T]> {
    model
        .coefficient_value(kind.name())
        .and_then(|v| v.as_generic::<Vec<T>>().ok())
        .map(Vec::as_slice)
}

fn scalar_of(model: &dyn Model, kind: Kind) -> Option<Scalar> {
    model.coefficient_scalar(kind.name()).ok()
}

// ---------------------------------------------------------------------------
// Contribution phase
// ---------------------------------------------------------------------------

pub struct RetirementContributionModel {
    state: ModelState,
    functions: FinancialFunctions,
}

impl RetirementContributionModel {
    fn terms(&self) -> Result<ContributionModelTerms, FunctionError> {
        let p = self.parameters();
        Ok(ContributionModelTerms {
            current_age: p.get_integer(CURRENT_AGE)?,
            retirement_age: p.get_integer(RETIREMENT_AGE)?,
            current_salary: p.get_double(CURRENT_SALARY)?,
            self_contribution_pct: p.get_double(EMPLOYEE_CONTRIBUTION_PCT)?,
            employer_contribution_pct: p.get_double(EMPLOYER_CONTRIBUTION_PCT)?,
            current_balance: p.get_double(CURRENT_RETIREMENT_BALANCE)?,
            cola_pct: p.get_double(COLA_PCT)?,
            weighted_growth_rate: p.get_double(WEIGHTED_GROWTH_RATE)?,
            contribution_frequency: frequency_of(p, CONTRIBUTION_FREQUENCY)?,
        })
    }

    /// Current-year entry followed by one entry per year until retirement.
    pub fn schedule(&self) -> Option<&[ContributionBalance]> {
        schedule_of(self, Kind::ContributionSchedule)
    }

    pub fn balance(&self) -> Option<Scalar> {
        scalar_of(self, Kind::ContributionBalance)
    }

    pub fn total_interest(&self) -> Option<Scalar> {
        scalar_of(self, Kind::TotalInterest)
    }

    pub fn total_self_contribution(&self) -> Option<Scalar> {
        scalar_of(self, Kind::TotalSelfContribution)
    }

    pub fn total_employer_contribution(&self) -> Option<Scalar> {
        scalar_of(self, Kind::TotalEmployerContribution)
    }

    pub fn last_salary(&self) -> Option<Scalar> {
        scalar_of(self, Kind::LastSalary)
    }
}

impl Parameterized for RetirementContributionModel {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn variable(&self) -> Option<&str> {
        None
    }

    fn parameters(&self) -> &ParameterList {
        self.state.parameters()
    }
}

impl Model for RetirementContributionModel {
    fn solve(&mut self) -> Result<(), FunctionError> {
        self.state.begin_solve()?;
        let terms = self.terms()?;
        let years = terms.retirement_age - terms.current_age;
        if years < 0 {
            return Err(FunctionError::MathError(format!(
                "retirement age {} is before current age {}",
                terms.retirement_age, terms.current_age
            )));
        }

        let f = &self.functions;
        let current_year = f.context().today().year();
        let opening = ContributionBalanceTerms {
            current_salary: terms.current_salary,
            cola_pct: terms.cola_pct,
            current_balance: terms.current_balance,
            self_contribution_pct: terms.self_contribution_pct,
            employer_contribution_pct: terms.employer_contribution_pct,
            weighted_growth_rate: terms.weighted_growth_rate,
            contribution_frequency: terms.contribution_frequency,
            current_year,
            end_year: current_year,
        };

        let mut latest = f.contribution_balance(&opening).compute()?;
        let mut schedule = Vec::with_capacity(years as usize + 1);
        schedule.push(latest.clone());
        for year in current_year + 1..=current_year + years {
            latest = f.contribution_balance_from(&latest, year).compute()?;
            schedule.push(latest.clone());
        }

        // Totals cover the full years only. The opening entry is excluded.
        let full_years = &schedule[1..];
        let interest: f64 = full_years.iter().map(|b| b.interest_accrued).sum();
        let self_total: f64 = full_years.iter().map(|b| b.self_contribution).sum();
        let employer_total: f64 = full_years.iter().map(|b| b.employer_contribution).sum();

        let s = &mut self.state;
        s.set_value(&Kind::ContributionBalance.function_type(), Scalar::from(latest.balance));
        s.set_value(&Kind::TotalSelfContribution.function_type(), Scalar::from(self_total));
        s.set_value(&Kind::TotalEmployerContribution.function_type(), Scalar::from(employer_total));
        s.set_value(&Kind::TotalInterest.function_type(), Scalar::from(interest));
        s.set_value(&Kind::LastSalary.function_type(), Scalar::from(latest.current_salary));
        s.set_value(&Kind::ContributionSchedule.function_type(), Value::generic(schedule));
        Ok(())
    }

    fn coefficient_set(&self) -> &CoefficientSet {
        self.state.coefficients()
    }
}

// ---------------------------------------------------------------------------
// Distribution phase
// ---------------------------------------------------------------------------

/// How the distribution loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DepletionOutcome {
    /// The balance reached zero in `year`.
    Depleted { year: i32 },
    /// The iteration cap was hit first.
    NotDepleted { last_year: i32, remaining_balance: f64 },
}

pub struct RetirementDistributionModel {
    state: ModelState,
    functions: FinancialFunctions,
    outcome: Option<DepletionOutcome>,
}

impl RetirementDistributionModel {
    fn terms(&self) -> Result<DistributionModelTerms, FunctionError> {
        let p = self.parameters();
        Ok(DistributionModelTerms {
            starting_balance: p.get_double(CURRENT_RETIREMENT_BALANCE)?,
            retirement_year: p.get_integer(RETIREMENT_START_YEAR)?,
            interest_rate: p.get_double(POST_RETIREMENT_INTEREST)?,
            frequency: frequency_of(p, DISTRIBUTION_FREQUENCY)?,
            inflation_rate: p.get_double(INFLATION_RATE)?,
            duration: p.get_integer(RETIREMENT_DURATION)?,
            annualized_distribution: p.get_double(ANNUALIZED_DISTRIBUTION)?,
        })
    }

    /// First-year distribution before inflation adjustments.
    pub fn base_annual_distribution(terms: &DistributionModelTerms) -> Result<f64, FunctionError> {
        if terms.duration <= 0 {
            return Ok(if terms.annualized_distribution > 0.0 {
                terms.annualized_distribution
            } else {
                terms.starting_balance * DEFAULT_WITHDRAWAL_RATE
            });
        }
        let effective_rate = terms.interest_rate * (1.0 - terms.interest_rate) - terms.inflation_rate;
        let periodic = amortize(terms.starting_balance, effective_rate, terms.frequency, terms.duration)?;
        Ok(periodic * terms.frequency.annual_frequency() as f64)
    }

    pub fn outcome(&self) -> Option<DepletionOutcome> {
        self.outcome
    }

    pub fn schedule(&self) -> Option<&[DistributionBalance]> {
        schedule_of(self, Kind::DistributionSchedule)
    }

    pub fn years(&self) -> Option<Scalar> {
        scalar_of(self, Kind::DistributionYears)
    }

    pub fn last_year(&self) -> Option<Scalar> {
        scalar_of(self, Kind::DistributionLastYear)
    }

    pub fn base_annual(&self) -> Option<Scalar> {
        scalar_of(self, Kind::RetirementAnnualDistribution)
    }

    pub fn total_interest(&self) -> Option<Scalar> {
        scalar_of(self, Kind::TotalInterest)
    }

    pub fn total_distributions(&self) -> Option<Scalar> {
        scalar_of(self, Kind::TotalDistributions)
    }
}

impl Parameterized for RetirementDistributionModel {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn variable(&self) -> Option<&str> {
        None
    }

    fn parameters(&self) -> &ParameterList {
        self.state.parameters()
    }
}

impl Model for RetirementDistributionModel {
    fn solve(&mut self) -> Result<(), FunctionError> {
        self.state.begin_solve()?;
        let terms = self.terms()?;
        let base_annual = Self::base_annual_distribution(&terms)?;
        let cap = self.functions.context().config().max_distribution_years;

        let mut balance = terms.starting_balance;
        let mut year = terms.retirement_year;
        let mut schedule = Vec::new();
        while balance > 0.0 && schedule.len() < cap as usize {
            year += 1;
            let step = self
                .functions
                .distribution_balance(&DistributionBalanceTerms {
                    current_balance: balance,
                    annualized_base: base_annual,
                    inflation_rate: terms.inflation_rate,
                    interest_rate: terms.interest_rate,
                    retirement_year: terms.retirement_year,
                    current_year: year,
                    frequency: terms.frequency,
                })
                .compute()?;
            balance = step.balance;
            schedule.push(step);
        }

        let outcome = if balance > 0.0 {
            DepletionOutcome::NotDepleted { last_year: year, remaining_balance: balance }
        } else {
            DepletionOutcome::Depleted { year }
        };
        let interest: f64 = schedule.iter().map(|b| b.interest_accrued).sum();
        let distributed: f64 = schedule.iter().map(|b| b.annual_distribution).sum();

        let s = &mut self.state;
        s.set_value(&Kind::DistributionYears.function_type(), Scalar::from(year - terms.retirement_year));
        s.set_value(&Kind::RetirementAnnualDistribution.function_type(), Scalar::from(base_annual));
        s.set_value(&Kind::DistributionLastYear.function_type(), Scalar::from(year));
        s.set_value(&Kind::TotalInterest.function_type(), Scalar::from(interest));
        s.set_value(&Kind::TotalDistributions.function_type(), Scalar::from(distributed));
        s.set_value(&Kind::DistributionSchedule.function_type(), Value::generic(schedule));
        self.outcome = Some(outcome);
        Ok(())
    }

    fn coefficient_set(&self) -> &CoefficientSet {
        self.state.coefficients()
    }
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

pub struct RetirementModel {
    state: ModelState,
    functions: FinancialFunctions,
    contribution: Option<RetirementContributionModel>,
    distribution: Option<RetirementDistributionModel>,
}

impl RetirementModel {
    fn terms(&self) -> Result<RetirementTerms, FunctionError> {
        let p = self.parameters();
        Ok(RetirementTerms {
            current_age: p.get_integer(CURRENT_AGE)?,
            retirement_age: p.get_integer(RETIREMENT_AGE)?,
            current_salary: p.get_double(CURRENT_SALARY)?,
            current_balance: p.get_double(CURRENT_RETIREMENT_BALANCE)?,
            self_contribution_pct: p.get_double(EMPLOYEE_CONTRIBUTION_PCT)?,
            employer_contribution_pct: p.get_double(EMPLOYER_CONTRIBUTION_PCT)?,
            cola_pct: p.get_double(COLA_PCT)?,
            weighted_growth_rate: p.get_double(WEIGHTED_GROWTH_RATE)?,
            contribution_frequency: frequency_of(p, CONTRIBUTION_FREQUENCY)?,
            post_retirement_interest: p.get_double(POST_RETIREMENT_INTEREST)?,
            distribution_frequency: frequency_of(p, DISTRIBUTION_FREQUENCY)?,
            inflation_rate: p.get_double(INFLATION_RATE)?,
            duration: p.get_integer(RETIREMENT_DURATION)?,
            annualized_last_salary_pct: p.get_double(LAST_SALARY_PCT)?,
        })
    }

    pub fn contribution_model(&self) -> Option<&RetirementContributionModel> {
        self.contribution.as_ref()
    }

    pub fn distribution_model(&self) -> Option<&RetirementDistributionModel> {
        self.distribution.as_ref()
    }

    /// Contribution entries followed by distribution entries.
    pub fn schedule(&self) -> Option<&[Balance]> {
        schedule_of(self, Kind::RetirementSchedule)
    }

    pub fn retirement_year(&self) -> Option<Scalar> {
        scalar_of(self, Kind::RetirementYear)
    }

    pub fn depletion_year(&self) -> Option<Scalar> {
        scalar_of(self, Kind::RetirementDepletionYear)
    }

    pub fn income_replacement(&self) -> Option<Scalar> {
        scalar_of(self, Kind::RetirementIncomePct)
    }

    pub fn total_interest(&self) -> Option<Scalar> {
        scalar_of(self, Kind::TotalInterest)
    }

    fn copy_from(&mut self, child: &dyn Model, kinds: &[Kind]) -> Result<(), FunctionError> {
        for kind in kinds {
            let coefficient = child
                .get_coefficient(kind.name())
                .ok_or_else(|| FunctionError::MissingCoefficient { name: kind.name().to_string() })?;
            self.state.set_coefficient(coefficient.clone());
        }
        Ok(())
    }
}

impl Parameterized for RetirementModel {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn variable(&self) -> Option<&str> {
        None
    }

    fn parameters(&self) -> &ParameterList {
        self.state.parameters()
    }
}

impl Model for RetirementModel {
    fn solve(&mut self) -> Result<(), FunctionError> {
        self.state.begin_solve()?;
        let terms = self.terms()?;
        let f = self.functions.clone();

        let mut contribution = f.retirement_contribution_model(&terms.contribution_terms());
        contribution.solve()?;
        let last_salary = contribution.coefficient_scalar(Kind::LastSalary.name())?.as_double();
        if last_salary == 0.0 {
            return Err(FunctionError::MathError("income replacement is undefined for a zero salary".into()));
        }
        let retirement_balance = contribution.coefficient_scalar(Kind::ContributionBalance.name())?.as_double();
        let retirement_year = f.context().today().year() + (terms.retirement_age - terms.current_age);

        let mut distribution = f.retirement_distribution_model(&DistributionModelTerms {
            starting_balance: retirement_balance,
            retirement_year,
            interest_rate: terms.post_retirement_interest,
            frequency: terms.distribution_frequency,
            inflation_rate: terms.inflation_rate,
            duration: terms.duration,
            annualized_distribution: last_salary * terms.annualized_last_salary_pct,
        });
        distribution.solve()?;

        let base_annual = distribution.coefficient_scalar(Kind::RetirementAnnualDistribution.name())?.as_double();
        let total_interest = contribution.coefficient_scalar(Kind::TotalInterest.name())?.as_double()
            + distribution.coefficient_scalar(Kind::TotalInterest.name())?.as_double();
        let depletion_year = distribution.coefficient_scalar(Kind::DistributionLastYear.name())?;

        let mut schedule: Vec<Balance> = Vec::new();
        schedule.extend(contribution.schedule().unwrap_or_default().iter().cloned().map(Balance::from));
        schedule.extend(distribution.schedule().unwrap_or_default().iter().cloned().map(Balance::from));

        self.state.set_value(&Kind::RetirementSchedule.function_type(), Value::generic(schedule));
        self.state.set_value(&Kind::RetirementIncomePct.function_type(), Scalar::from(base_annual / last_salary));
        self.state.set_value(&Kind::RetirementDepletionYear.function_type(), depletion_year);
        self.state.set_value(&Kind::RetirementYear.function_type(), Scalar::from(retirement_year));
        self.state.set_value(&Kind::TotalInterest.function_type(), Scalar::from(total_interest));
        self.copy_from(
            &contribution,
            &[Kind::ContributionBalance, Kind::TotalSelfContribution, Kind::TotalEmployerContribution, Kind::LastSalary],
        )?;
        self.copy_from(
            &distribution,
            &[Kind::TotalDistributions, Kind::DistributionYears, Kind::RetirementAnnualDistribution],
        )?;

        self.contribution = Some(contribution);
        self.distribution = Some(distribution);
        Ok(())
    }

    fn coefficient_set(&self) -> &CoefficientSet {
        self.state.coefficients()
    }
}

// ---------------------------------------------------------------------------
// Factory methods
// ---------------------------------------------------------------------------

impl FinancialFunctions {
    pub fn retirement_contribution_model(&self, terms: &ContributionModelTerms) -> RetirementContributionModel {
        let pf = self.parameters();
        let params: ParameterList = vec![
            pf.scalar(CURRENT_AGE, None, terms.current_age),
            pf.scalar(RETIREMENT_AGE, None, terms.retirement_age),
            pf.scalar(CURRENT_SALARY, None, terms.current_salary),
            pf.scalar(EMPLOYEE_CONTRIBUTION_PCT, None, terms.self_contribution_pct),
            pf.scalar(EMPLOYER_CONTRIBUTION_PCT, None, terms.employer_contribution_pct),
            pf.scalar(CURRENT_RETIREMENT_BALANCE, None, terms.current_balance),
            pf.scalar(COLA_PCT, None, terms.cola_pct),
            pf.scalar(WEIGHTED_GROWTH_RATE, None, terms.weighted_growth_rate),
            pf.generic(CONTRIBUTION_FREQUENCY, None, terms.contribution_frequency),
        ]
        .into_iter()
        .collect();
        RetirementContributionModel {
            state: ModelState::new(Kind::RetirementContributionModel.name(), params),
            functions: self.clone(),
        }
    }

    pub fn retirement_distribution_model(&self, terms: &DistributionModelTerms) -> RetirementDistributionModel {
        let pf = self.parameters();
        let params: ParameterList = vec![
            pf.scalar(CURRENT_RETIREMENT_BALANCE, None, terms.starting_balance),
            pf.scalar(RETIREMENT_START_YEAR, None, terms.retirement_year),
            pf.scalar(POST_RETIREMENT_INTEREST, None, terms.interest_rate),
            pf.generic(DISTRIBUTION_FREQUENCY, None, terms.frequency),
            pf.scalar(INFLATION_RATE, None, terms.inflation_rate),
            pf.scalar(RETIREMENT_DURATION, None, terms.duration),
            pf.scalar(ANNUALIZED_DISTRIBUTION, None, terms.annualized_distribution),
        ]
        .into_iter()
        .collect();
        RetirementDistributionModel {
            state: ModelState::new(Kind::RetirementDistributionModel.name(), params),
            functions: self.clone(),
            outcome: None,
        }
    }

    pub fn retirement_model(&self, terms: &RetirementTerms) -> RetirementModel {
        let pf = self.parameters();
        let params = vec![
            pf.scalar(CURRENT_AGE, None, terms.current_age),
            pf.scalar(RETIREMENT_AGE, None, terms.retirement_age),
            pf.scalar(CURRENT_SALARY, None, terms.current_salary),
            pf.scalar(CURRENT_RETIREMENT_BALANCE, None, terms.current_balance),
            pf.scalar(EMPLOYEE_CONTRIBUTION_PCT, None, terms.self_contribution_pct),
            pf.scalar(EMPLOYER_CONTRIBUTION_PCT, None, terms.employer_contribution_pct),
            pf.scalar(COLA_PCT, None, terms.cola_pct),
            pf.scalar(WEIGHTED_GROWTH_RATE, None, terms.weighted_growth_rate),
            pf.generic(CONTRIBUTION_FREQUENCY, None, terms.contribution_frequency),
            pf.scalar(POST_RETIREMENT_INTEREST, None, terms.post_retirement_interest),
            pf.generic(DISTRIBUTION_FREQUENCY, None, terms.distribution_frequency),
            pf.scalar(INFLATION_RATE, None, terms.inflation_rate),
            pf.scalar(RETIREMENT_DURATION, None, terms.duration),
            pf.scalar(LAST_SALARY_PCT, None, terms.annualized_last_salary_pct),
        ];
        self.retirement_model_with(params.into_iter().collect())
    }

    /// Retirement model over caller-assembled parameters, checked against the
    /// context's duplicate policy.
    pub fn retirement_model_from(
        &self,
        parameters: impl IntoIterator<Item = Parameter>,
    ) -> Result<RetirementModel, FunctionError> {
        let list = self.context().bind(parameters)?;
        Ok(self.retirement_model_with(list))
    }

    fn retirement_model_with(&self, parameters: ParameterList) -> RetirementModel {
        RetirementModel {
            state: ModelState::new(Kind::RetirementModel.name(), parameters),
            functions: self.clone(),
            contribution: None,
            distribution: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{financial, financial_on};
    use super::super::PaymentFrequency;
    use super::*;
    use crate::provider::{Context, ContextConfig};
    use approx::assert_relative_eq;

    fn contribution_terms() -> ContributionModelTerms {
        ContributionModelTerms {
            current_age: 32,
            retirement_age: 67,
            current_salary: 85_000.0,
            self_contribution_pct: 0.10,
            employer_contribution_pct: 0.04,
            current_balance: 20_000.0,
            cola_pct: 0.02,
            weighted_growth_rate: 0.07,
            contribution_frequency: PaymentFrequency::SemiMonthly,
        }
    }

    fn distribution_terms() -> DistributionModelTerms {
        DistributionModelTerms {
            starting_balance: 1_000_000.0,
            retirement_year: 2033,
            interest_rate: 0.04,
            frequency: PaymentFrequency::Monthly,
            inflation_rate: 0.029,
            duration: 30,
            annualized_distribution: 0.0,
        }
    }

    fn retirement_terms() -> RetirementTerms {
        RetirementTerms {
            current_age: 32,
            retirement_age: 65,
            current_salary: 52_095.0,
            current_balance: 26_932.0,
            self_contribution_pct: 0.10,
            employer_contribution_pct: 0.03,
            cola_pct: 0.03,
            weighted_growth_rate: 0.09203168503741728,
            contribution_frequency: PaymentFrequency::SemiMonthly,
            post_retirement_interest: 0.04,
            distribution_frequency: PaymentFrequency::Monthly,
            inflation_rate: 0.029,
            duration: 0,
            annualized_last_salary_pct: 0.0,
        }
    }

    #[test]
    fn test_contribution_schedule() {
        let mut model = financial().retirement_contribution_model(&contribution_terms());
        model.solve().unwrap();

        let schedule = model.schedule().unwrap();
        assert_eq!(schedule.len(), 36);
        assert!(schedule.iter().zip(2024..).all(|(b, year)| b.year == year));
        assert_relative_eq!(model.last_salary().unwrap().as_double(), 169_990.61, epsilon = 0.1);

        let balance = model.balance().unwrap().as_double();
        assert_relative_eq!(balance, schedule[35].balance);
        // The opening entry's balance plus the full-year credits is the final balance.
        let credited = model.total_interest().unwrap().as_double()
            + model.total_self_contribution().unwrap().as_double()
            + model.total_employer_contribution().unwrap().as_double();
        assert_relative_eq!(schedule[0].balance + credited, balance, max_relative = 1e-12);
    }

    #[test]
    fn test_contribution_totals_skip_opening_year() {
        let mut model = financial().retirement_contribution_model(&ContributionModelTerms {
            current_age: 32,
            retirement_age: 34,
            current_salary: 100_000.0,
            self_contribution_pct: 0.10,
            employer_contribution_pct: 0.0,
            current_balance: 0.0,
            cola_pct: 0.0,
            weighted_growth_rate: 0.05,
            contribution_frequency: PaymentFrequency::Monthly,
        });
        model.solve().unwrap();

        let schedule = model.schedule().unwrap();
        assert_eq!(schedule.len(), 3);
        assert!(schedule[0].self_contribution > 0.0);
        assert_relative_eq!(model.total_self_contribution().unwrap().as_double(), 20_000.0, epsilon = 1e-9);
        let later_interest = schedule[1].interest_accrued + schedule[2].interest_accrued;
        assert_relative_eq!(model.total_interest().unwrap().as_double(), later_interest, epsilon = 1e-9);
        assert_relative_eq!(model.total_employer_contribution().unwrap().as_double(), 0.0);
    }

    #[test]
    fn test_contribution_guards() {
        let f = financial();
        let mut backwards = f.retirement_contribution_model(&ContributionModelTerms {
            retirement_age: 30,
            ..contribution_terms()
        });
        assert!(matches!(backwards.solve(), Err(FunctionError::MathError(_))));
        assert!(matches!(backwards.solve(), Err(FunctionError::AlreadySolved { .. })));
    }

    #[test]
    fn test_distribution_depletes_over_duration() {
        let mut model = financial().retirement_distribution_model(&distribution_terms());
        model.solve().unwrap();

        assert_eq!(model.years().unwrap().as_int(), 30);
        assert_relative_eq!(model.base_annual().unwrap().as_double(), 38_266.91, epsilon = 0.05);
        assert_eq!(model.outcome(), Some(DepletionOutcome::Depleted { year: 2063 }));
        assert_eq!(model.last_year().unwrap().as_int(), 2063);

        let schedule = model.schedule().unwrap();
        assert_eq!(schedule.len(), 30);
        assert_relative_eq!(schedule[29].balance, 0.0);
        let paid: f64 = schedule.iter().map(|b| b.annual_distribution).sum();
        assert_relative_eq!(model.total_distributions().unwrap().as_double(), paid);
    }

    #[test]
    fn test_base_distribution_without_duration() {
        let terms = DistributionModelTerms { duration: 0, ..distribution_terms() };
        assert_relative_eq!(RetirementDistributionModel::base_annual_distribution(&terms).unwrap(), 40_000.0);
        let annualized = DistributionModelTerms { annualized_distribution: 55_000.0, ..terms };
        assert_relative_eq!(RetirementDistributionModel::base_annual_distribution(&annualized).unwrap(), 55_000.0);
    }

    #[test]
    fn test_distribution_stops_at_cap() {
        let config = ContextConfig { max_distribution_years: 50, ..ContextConfig::default() };
        let f = Context::from_config(config).unwrap().financial().unwrap();
        let mut model = f.retirement_distribution_model(&DistributionModelTerms {
            interest_rate: 0.10,
            inflation_rate: 0.0,
            duration: 0,
            annualized_distribution: 1_000.0,
            ..distribution_terms()
        });
        model.solve().unwrap();

        assert_eq!(model.schedule().unwrap().len(), 50);
        match model.outcome() {
            Some(DepletionOutcome::NotDepleted { last_year, remaining_balance }) => {
                assert_eq!(last_year, 2083);
                assert!(remaining_balance > 1_000_000.0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_retirement_model_composes_children() {
        let mut model = financial_on(2024, 3, 15).retirement_model(&retirement_terms());
        model.solve().unwrap();

        let contribution = model.contribution_model().unwrap();
        let distribution = model.distribution_model().unwrap();
        let years = distribution.years().unwrap().as_int();
        assert!(years > 0);

        assert_eq!(model.retirement_year().unwrap().as_int(), 2024 + 33);
        assert_eq!(model.depletion_year().unwrap().as_int(), 2024 + 33 + years);

        let schedule = model.schedule().unwrap();
        assert_eq!(schedule.len(), 34 + years as usize);
        assert!(schedule.iter().zip(2024..).all(|(b, year)| b.year() == year));
        assert_eq!(schedule[33].balance_type(), "contribution");
        assert_eq!(schedule[34].balance_type(), "distribution");

        // No duration and no salary share: 4% of the balance at retirement.
        let retirement_balance = contribution.balance().unwrap().as_double();
        let last_salary = contribution.last_salary().unwrap().as_double();
        assert_relative_eq!(
            model.income_replacement().unwrap().as_double(),
            retirement_balance * 0.04 / last_salary,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            model.total_interest().unwrap().as_double(),
            contribution.total_interest().unwrap().as_double() + distribution.total_interest().unwrap().as_double()
        );
        assert_eq!(
            model.coefficient_scalar("totalDistributions").unwrap(),
            distribution.total_distributions().unwrap()
        );
        assert_eq!(model.coefficients().count(), 12);
    }

    #[test]
    fn test_retirement_model_from_json_terms() {
        let json = serde_json::json!({
            "currentAge": 60, "retirementAge": 62, "currentSalary": 100000.0,
            "currentBalance": 500000.0, "selfContributionPct": 0.1,
            "employerContributionPct": 0.05, "colaPct": 0.0,
            "weightedGrowthRate": 0.05, "contributionFrequency": "MONTHLY",
            "postRetirementInterest": 0.04, "distributionFrequency": "MONTHLY",
            "inflationRate": 0.02, "duration": 20, "annualizedLastSalaryPct": 0.6
        });
        let terms: RetirementTerms = serde_json::from_value(json).unwrap();
        let mut model = financial().retirement_model(&terms);
        model.solve().unwrap();

        let distribution = model.distribution_model().unwrap();
        assert!(matches!(distribution.outcome(), Some(DepletionOutcome::Depleted { .. })));
        assert!(model.income_replacement().unwrap().as_double() > 0.0);
        assert!(matches!(model.solve(), Err(FunctionError::AlreadySolved { .. })));
    }

    #[test]
    fn test_zero_salary_fails_before_distribution() {
        let mut model = financial().retirement_model(&RetirementTerms { current_salary: 0.0, ..retirement_terms() });
        assert!(matches!(model.solve(), Err(FunctionError::MathError(_))));
        assert!(model.contribution_model().is_none());
        assert!(model.distribution_model().is_none());
    }

    #[test]
    fn test_strict_context_rejects_duplicate_terms() {
        let config = ContextConfig { strict_parameters: true, ..ContextConfig::default() };
        let ctx = Context::from_config(config).unwrap();
        let f = ctx.financial().unwrap();
        let pf = ctx.factories().parameter_factory();
        let params = vec![pf.scalar(CURRENT_AGE, None, 30), pf.scalar(CURRENT_AGE, None, 31)];
        assert!(matches!(f.retirement_model_from(params), Err(FunctionError::DuplicateParameter { .. })));

        let mut incomplete = f.retirement_model_from(vec![pf.scalar(CURRENT_AGE, None, 30)]).unwrap();
        assert_eq!(incomplete.solve(), Err(FunctionError::missing(RETIREMENT_AGE)));
    }
}
