use super::outcome::{ensure_finite, Computation, InsufficientInput};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROPERTY_TAX_RATE: f64 = 0.012;
pub const DEFAULT_INSURANCE_RATE: f64 = 0.003;
/// Longest loan term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 50;

/// Annual escrow heuristics applied to the property price (not the loan).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscrowPolicy {
    pub property_tax_rate: f64,
    pub insurance_rate: f64,
}

impl Default for EscrowPolicy {
    fn default() -> Self {
        Self {
            property_tax_rate: DEFAULT_PROPERTY_TAX_RATE,
            insurance_rate: DEFAULT_INSURANCE_RATE,
        }
    }
}

impl EscrowPolicy {
    pub fn monthly_taxes(&self, property_price: f64) -> f64 {
        property_price * self.property_tax_rate / 12.0
    }

    pub fn monthly_insurance(&self, property_price: f64) -> f64 {
        property_price * self.insurance_rate / 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyFinancials {
    pub price: f64,
    pub surface_area: f64,
    pub down_payment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_years: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    /// Finances the part of the price not covered by the down payment.
    pub fn from_financials(
        financials: &PropertyFinancials,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> Computation<Self> {
        ensure_finite(&[financials.price, financials.down_payment])?;
        if financials.price < 0.0 || financials.down_payment < 0.0 {
            return Err(InsufficientInput::NegativePrice);
        }
        if financials.down_payment > financials.price {
            return Err(InsufficientInput::DownPaymentExceedsPrice);
        }

        Ok(Self::new(
            financials.price - financials.down_payment,
            annual_rate_percent,
            term_years,
        ))
    }

    pub fn number_of_payments(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    fn validate(&self) -> Computation<()> {
        ensure_finite(&[self.principal, self.annual_rate_percent])?;
        if self.principal <= 0.0 {
            return Err(InsufficientInput::NonPositivePrincipal);
        }
        if !(0.0..=100.0).contains(&self.annual_rate_percent) {
            return Err(InsufficientInput::RateOutOfRange);
        }
        if self.term_years == 0 {
            return Err(InsufficientInput::NonPositiveTerm);
        }
        if self.term_years > MAX_TERM_YEARS {
            return Err(InsufficientInput::TermOutOfRange);
        }
        Ok(())
    }

    /// Fixed-rate monthly principal and interest.
    pub fn monthly_payment(&self) -> Computation<f64> {
        self.validate()?;
        annuity_payment(
            self.principal,
            self.monthly_rate(),
            self.number_of_payments(),
        )
    }
}

/// `P * r * (1+r)^n / ((1+r)^n - 1)`, or `P / n` when `r == 0`.
///
/// Rates too small to move `1 + r` off 1.0 are `NonFinite`, as is any
/// payment that leaves the finite range.
fn annuity_payment(principal: f64, monthly_rate: f64, payments: u32) -> Computation<f64> {
    let n = f64::from(payments);
    if monthly_rate == 0.0 {
        return Ok(principal / n);
    }
    let growth = (1.0 + monthly_rate).powf(n);
    if !growth.is_finite() || growth - 1.0 <= 0.0 {
        return Err(InsufficientInput::NonFinite);
    }
    let payment = principal * monthly_rate * growth / (growth - 1.0);
    ensure_finite(&[payment])?;
    Ok(payment)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_principal_and_interest: f64,
    pub monthly_taxes_estimate: f64,
    pub monthly_insurance_estimate: f64,
    pub total_monthly_payment: f64,
    pub total_interest_over_term: f64,
    pub total_paid_over_term: f64,
    pub number_of_payments: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MortgageCalculator {
    escrow: EscrowPolicy,
}

impl MortgageCalculator {
    pub fn new(escrow: EscrowPolicy) -> Self {
        Self { escrow }
    }

    pub fn escrow(&self) -> &EscrowPolicy {
        &self.escrow
    }

    pub fn quote(&self, terms: &LoanTerms, property_price: f64) -> Computation<AmortizationResult> {
        ensure_finite(&[property_price])?;
        if property_price < 0.0 {
            return Err(InsufficientInput::NegativePrice);
        }

        let monthly = terms.monthly_payment()?;
        let payments = terms.number_of_payments();
        let taxes = self.escrow.monthly_taxes(property_price);
        let insurance = self.escrow.monthly_insurance(property_price);
        let total_paid = monthly * f64::from(payments);

        Ok(AmortizationResult {
            monthly_principal_and_interest: monthly,
            monthly_taxes_estimate: taxes,
            monthly_insurance_estimate: insurance,
            total_monthly_payment: monthly + taxes + insurance,
            total_interest_over_term: total_paid - terms.principal,
            total_paid_over_term: total_paid,
            number_of_payments: payments,
        })
    }
}

/// Loan principal as a percentage of the property price.
pub fn loan_to_value(principal: f64, property_price: f64) -> Computation<f64> {
    ensure_finite(&[principal, property_price])?;
    if property_price <= 0.0 {
        return Err(InsufficientInput::NonPositiveReference);
    }
    if principal < 0.0 {
        return Err(InsufficientInput::NonPositivePrincipal);
    }
    Ok(principal / property_price * 100.0)
}

/// Year-by-year breakdown of a fixed-rate loan.
pub fn amortization_schedule(terms: &LoanTerms) -> Computation<Vec<AmortizationYear>> {
    let monthly = terms.monthly_payment()?;
    let rate = terms.monthly_rate();
    let mut balance = terms.principal;
    let mut years = Vec::with_capacity(terms.term_years as usize);

    for year in 1..=terms.term_years {
        let mut interest_paid = 0.0;
        let mut principal_paid = 0.0;
        for _ in 0..12 {
            let interest = balance * rate;
            let principal = (monthly - interest).min(balance);
            interest_paid += interest;
            principal_paid += principal;
            balance -= principal;
        }

        if year == terms.term_years || balance < 0.005 {
            balance = 0.0;
        }

        years.push(AmortizationYear {
            year,
            interest_paid,
            principal_paid,
            remaining_balance: balance,
        });
    }

    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> MortgageCalculator {
        MortgageCalculator::default()
    }

    #[test]
    fn quote_matches_reference_annuity() {
        let terms = LoanTerms::new(240_000.0, 3.5, 25);
        let quote = calculator().quote(&terms, 300_000.0).expect("valid terms");

        assert!((quote.monthly_principal_and_interest - 1201.50).abs() < 0.01);
        assert!((quote.monthly_principal_and_interest - 1201.81).abs() < 0.5);
        assert_eq!(quote.number_of_payments, 300);
        assert!((quote.monthly_taxes_estimate - 300.0).abs() < 1e-9);
        assert!((quote.monthly_insurance_estimate - 75.0).abs() < 1e-9);
        assert!(
            (quote.total_monthly_payment
                - (quote.monthly_principal_and_interest + 300.0 + 75.0))
                .abs()
                < 1e-9
        );
        assert!(
            (quote.total_paid_over_term - quote.monthly_principal_and_interest * 300.0).abs()
                < 1e-6
        );
        assert!((quote.total_interest_over_term - (quote.total_paid_over_term - 240_000.0)).abs() < 1e-6);
    }

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let terms = LoanTerms::new(240_000.0, 0.0, 25);
        let payment = terms.monthly_payment().expect("zero rate is defined");
        assert_eq!(payment, 240_000.0 / (25.0 * 12.0));

        let quote = calculator().quote(&terms, 240_000.0).expect("quote");
        assert!(quote.total_interest_over_term.abs() < 1e-6);
    }

    #[test]
    fn out_of_domain_terms_are_insufficient() {
        let calc = calculator();
        assert_eq!(
            calc.quote(&LoanTerms::new(0.0, 3.0, 20), 100_000.0),
            Err(InsufficientInput::NonPositivePrincipal)
        );
        assert_eq!(
            calc.quote(&LoanTerms::new(100_000.0, -1.0, 20), 100_000.0),
            Err(InsufficientInput::RateOutOfRange)
        );
        assert_eq!(
            calc.quote(&LoanTerms::new(100_000.0, 120.0, 20), 100_000.0),
            Err(InsufficientInput::RateOutOfRange)
        );
        assert_eq!(
            calc.quote(&LoanTerms::new(100_000.0, 3.0, 0), 100_000.0),
            Err(InsufficientInput::NonPositiveTerm)
        );
        assert_eq!(
            calc.quote(&LoanTerms::new(f64::NAN, 3.0, 20), 100_000.0),
            Err(InsufficientInput::NonFinite)
        );
    }

    #[test]
    fn payments_never_leave_the_finite_range() {
        let calc = calculator();
        assert_eq!(
            calc.quote(&LoanTerms::new(100_000.0, 100.0, 1000), 100_000.0),
            Err(InsufficientInput::TermOutOfRange)
        );
        assert_eq!(
            calc.quote(&LoanTerms::new(100_000.0, 1e-300, 25), 100_000.0),
            Err(InsufficientInput::NonFinite)
        );
        assert_eq!(
            amortization_schedule(&LoanTerms::new(100_000.0, 3.0, u32::MAX)),
            Err(InsufficientInput::TermOutOfRange)
        );

        let steepest = calc
            .quote(&LoanTerms::new(100_000.0, 100.0, MAX_TERM_YEARS), 100_000.0)
            .expect("longest term at the highest rate is still finite");
        assert!(steepest.monthly_principal_and_interest.is_finite());
        assert!(steepest.total_paid_over_term.is_finite());
    }

    #[test]
    fn quote_is_bit_identical_across_calls() {
        let terms = LoanTerms::new(187_500.0, 4.15, 20);
        let first = calculator().quote(&terms, 250_000.0).expect("quote");
        let second = calculator().quote(&terms, 250_000.0).expect("quote");
        assert_eq!(
            first.monthly_principal_and_interest.to_bits(),
            second.monthly_principal_and_interest.to_bits()
        );
        assert_eq!(first, second);
    }

    #[test]
    fn escrow_rates_are_configurable() {
        let calc = MortgageCalculator::new(EscrowPolicy {
            property_tax_rate: 0.024,
            insurance_rate: 0.0,
        });
        let quote = calc
            .quote(&LoanTerms::new(100_000.0, 2.0, 15), 120_000.0)
            .expect("quote");
        assert!((quote.monthly_taxes_estimate - 240.0).abs() < 1e-9);
        assert_eq!(quote.monthly_insurance_estimate, 0.0);
    }

    #[test]
    fn financials_reject_oversized_down_payment() {
        let financials = PropertyFinancials {
            price: 200_000.0,
            surface_area: 80.0,
            down_payment: 250_000.0,
        };
        assert_eq!(
            LoanTerms::from_financials(&financials, 3.0, 20),
            Err(InsufficientInput::DownPaymentExceedsPrice)
        );

        let financials = PropertyFinancials {
            down_payment: 40_000.0,
            ..financials
        };
        let terms = LoanTerms::from_financials(&financials, 3.0, 20).expect("terms");
        assert_eq!(terms.principal, 160_000.0);
        let ltv = loan_to_value(terms.principal, financials.price).expect("ltv");
        assert!((ltv - 80.0).abs() < 1e-9);
    }

    #[test]
    fn schedule_pays_off_the_loan() {
        let terms = LoanTerms::new(150_000.0, 3.2, 15);
        let schedule = amortization_schedule(&terms).expect("schedule");

        assert_eq!(schedule.len(), 15);
        assert_eq!(schedule.last().map(|row| row.remaining_balance), Some(0.0));

        let principal_total: f64 = schedule.iter().map(|row| row.principal_paid).sum();
        assert!((principal_total - 150_000.0).abs() < 1.0);
        assert!(schedule[0].interest_paid > schedule[14].interest_paid);
    }
}
