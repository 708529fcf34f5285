//! Amortized payments and blended growth rates.
use super::FinancialFunctionType as Kind;
use super::{
    frequency_of, FinancialFunctions, PaymentFrequency, CURRENT_RETIREMENT_BALANCE, DISTRIBUTION_FREQUENCY,
    INVESTMENT_RATIO, POST_RETIREMENT_INTEREST, RETIREMENT_DURATION, STOCK_GROWTH_RATE, TREASURY_YIELD,
};
use crate::compute::ScalarFunction;
use crate::error::FunctionError;
use crate::store::Scalar;
use std::sync::Arc;

/// Level payment that pays `amount` down to zero over `years` at `rate`,
/// compounded `frequency` times a year.
pub fn amortize(amount: f64, rate: f64, frequency: PaymentFrequency, years: i32) -> Result<f64, FunctionError> {
    let per_year = frequency.annual_frequency() as f64;
    let periods = years as f64 * per_year;
    if periods <= 0.0 {
        return Err(FunctionError::MathError(format!("cannot amortize over {} years", years)));
    }
    let r = rate / per_year;
    if r == 0.0 {
        return Ok(amount / periods);
    }
    let growth = (1.0 + r).powf(periods);
    Ok(amount / ((growth - 1.0) / (r * growth)))
}

/// Growth of a stock / treasury split, `ratio` being the stock share.
pub fn weighted_growth(stock_growth: f64, treasury_yield: f64, ratio: f64) -> f64 {
    stock_growth * ratio + treasury_yield * (1.0 - ratio)
}

impl FinancialFunctions {
    pub fn amortize(&self, amount: f64, rate: f64, frequency: PaymentFrequency, years: i32) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.scalar(CURRENT_RETIREMENT_BALANCE, None, amount),
            pf.scalar(POST_RETIREMENT_INTEREST, None, rate),
            pf.generic(DISTRIBUTION_FREQUENCY, None, frequency),
            pf.scalar(RETIREMENT_DURATION, None, years),
        ];
        self.build(Kind::Amortize, params, |p| {
            amortize(
                p.get_double(CURRENT_RETIREMENT_BALANCE)?,
                p.get_double(POST_RETIREMENT_INTEREST)?,
                frequency_of(p, DISTRIBUTION_FREQUENCY)?,
                p.get_integer(RETIREMENT_DURATION)?,
            )
            .map(Scalar::from)
        })
    }

    pub fn weighted_growth(&self, stock_growth: f64, treasury_yield: f64, ratio: f64) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.scalar(STOCK_GROWTH_RATE, None, stock_growth),
            pf.scalar(TREASURY_YIELD, None, treasury_yield),
            pf.scalar(INVESTMENT_RATIO, None, ratio),
        ];
        self.build(Kind::WeightedGrowth, params, |p| {
            Ok(Scalar::from(weighted_growth(
                p.get_double(STOCK_GROWTH_RATE)?,
                p.get_double(TREASURY_YIELD)?,
                p.get_double(INVESTMENT_RATIO)?,
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::financial;
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_amortize_monthly_mortgage_style() {
        let payment = financial().amortize(1_000_000.0, 0.04, PaymentFrequency::Monthly, 30);
        assert_relative_eq!(payment.compute().unwrap().as_double(), 4774.15, epsilon = 0.01);
    }

    #[rstest]
    #[case(1200.0, 0.0, PaymentFrequency::Monthly, 1, 100.0)]
    #[case(1000.0, 0.0, PaymentFrequency::Annual, 4, 250.0)]
    fn test_amortize_at_zero_rate(
        #[case] amount: f64,
        #[case] rate: f64,
        #[case] frequency: PaymentFrequency,
        #[case] years: i32,
        #[case] expected: f64,
    ) {
        assert_relative_eq!(amortize(amount, rate, frequency, years).unwrap(), expected);
    }

    #[test]
    fn test_amortize_without_periods_fails() {
        assert!(matches!(amortize(1000.0, 0.04, PaymentFrequency::Annual, 0), Err(FunctionError::MathError(_))));
        let f = financial().amortize(1000.0, 0.04, PaymentFrequency::Annual, -3);
        assert!(f.compute().is_err());
    }

    #[test]
    fn test_weighted_growth() {
        let f = financial().weighted_growth(0.1, 0.03, 0.8);
        assert_relative_eq!(f.compute().unwrap().as_double(), 0.086, epsilon = 1e-12);
        assert_relative_eq!(weighted_growth(0.1, 0.03, 0.0), 0.03);
    }
}
