use crate::error::{LoanError, Result};
use chrono::{Months, NaiveDate};
use log::{debug, trace, warn};
use std::fmt;

const PMTS_PER_YEAR: u32 = 12;

/// The three inputs of a fixed-rate installment loan.
///
/// `annual_rate` is a percentage (`8.0` means 8% per year) and `term` is the
/// number of monthly payments.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate: f64,
    pub term: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate: f64, term: u32) -> Result<Self> {
        let terms = Self {
            principal,
            annual_rate,
            term,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Same as `new`, with the term given in years of monthly payments.
    pub fn from_years(principal: f64, annual_rate: f64, years: u32) -> Result<Self> {
        Self::new(principal, annual_rate, years.saturating_mul(PMTS_PER_YEAR))
    }

    pub fn validate(&self) -> Result<()> {
        let err = if !(self.principal.is_finite() && self.principal > 0.) {
            LoanError::InvalidPrincipal {
                principal: self.principal,
            }
        } else if !(self.annual_rate.is_finite() && self.annual_rate >= 0.) {
            LoanError::InvalidRate {
                annual_rate: self.annual_rate,
            }
        } else if self.term == 0 {
            LoanError::InvalidTerm { term: self.term }
        } else {
            return Ok(());
        };
        warn!("rejected loan terms {:?}: {}", self, err);
        Err(err)
    }

    pub fn amortize(&self) -> Result<AmortizationResult> {
        self.validate()?;

        let rate = periodic_rate(self.annual_rate);
        let pmt_amount = pmt_amount(self.principal, rate, self.term);
        debug!(
            "principal {}, periodic rate {}, term {}, payment {}",
            self.principal, rate, self.term, pmt_amount
        );

        let schedule = build_schedule(self.principal, rate, self.term, pmt_amount);
        Ok(AmortizationResult::new(*self, pmt_amount, schedule))
    }
}

/// One row of the amortization schedule.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodRecord {
    pub pmt_number: u32,
    pub pmt_amount: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub end_balance: f64,
}

impl PeriodRecord {
    pub fn new(
        pmt_number: u32,
        pmt_amount: f64,
        principal_paid: f64,
        interest_paid: f64,
        end_balance: f64,
    ) -> Self {
        Self {
            pmt_number,
            pmt_amount,
            principal_paid,
            interest_paid,
            end_balance,
        }
    }
}

impl fmt::Display for PeriodRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pmt number {}, payment ${:.4}, principal paid ${:.4}, interest paid ${:.4}, ending balance ${:.4}",
            self.pmt_number,
            self.pmt_amount,
            self.principal_paid,
            self.interest_paid,
            self.end_balance
        )
    }
}

/// Payment, totals, schedule and the running totals used for charting.
///
/// The three cumulative series are indexed like the schedule: element `i`
/// covers payments `1..=i + 1`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationResult {
    terms: LoanTerms,
    pmt_amount: f64,
    total_interest: f64,
    total_payable: f64,
    schedule: Vec<PeriodRecord>,
    cumulative_interest: Vec<f64>,
    cumulative_principal: Vec<f64>,
    cumulative_paid: Vec<f64>,
}

impl AmortizationResult {
    fn new(terms: LoanTerms, pmt_amount: f64, schedule: Vec<PeriodRecord>) -> Self {
        let total_interest: f64 = schedule.iter().map(|pmt| pmt.interest_paid).sum();
        let total_payable = terms.principal + total_interest;

        let cumulative_interest = running_total(schedule.iter().map(|pmt| pmt.interest_paid));
        let cumulative_principal = running_total(schedule.iter().map(|pmt| pmt.principal_paid));
        let cumulative_paid = cumulative_interest
            .iter()
            .zip(&cumulative_principal)
            .map(|(interest, principal)| interest + principal)
            .collect();

        debug!(
            "total interest {}, total payable {}",
            total_interest, total_payable
        );

        Self {
            terms,
            pmt_amount,
            total_interest,
            total_payable,
            schedule,
            cumulative_interest,
            cumulative_principal,
            cumulative_paid,
        }
    }

    pub fn get_terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn get_principal(&self) -> f64 {
        self.terms.principal
    }

    pub fn get_pmt_amount(&self) -> f64 {
        self.pmt_amount
    }

    pub fn get_total_interest(&self) -> f64 {
        self.total_interest
    }

    pub fn get_total_payable(&self) -> f64 {
        self.total_payable
    }

    /// Total interest as a percentage of the principal.
    pub fn get_interest_ratio(&self) -> f64 {
        self.total_interest / self.terms.principal * 100.
    }

    pub fn get_pmt_count(&self) -> usize {
        self.schedule.len()
    }

    pub fn get_schedule(&self) -> &[PeriodRecord] {
        &self.schedule
    }

    /// `pmt_number` is 1-based.
    pub fn get_pmt_detail(&self, pmt_number: usize) -> Option<&PeriodRecord> {
        pmt_number
            .checked_sub(1)
            .and_then(|idx| self.schedule.get(idx))
    }

    pub fn get_pmt_info(&self, pmt_number: usize) -> String {
        match self.get_pmt_detail(pmt_number) {
            Some(pmt) => pmt.to_string(),
            None => "No payment information.".to_string(),
        }
    }

    pub fn get_cumulative_interest(&self) -> &[f64] {
        &self.cumulative_interest
    }

    pub fn get_cumulative_principal(&self) -> &[f64] {
        &self.cumulative_principal
    }

    pub fn get_cumulative_paid(&self) -> &[f64] {
        &self.cumulative_paid
    }

    /// Due date of every payment, one month apart starting at `first_pmt_date`.
    ///
    /// Each date is offset from `first_pmt_date` rather than from the previous
    /// due date, so a loan starting on the 31st goes back to the 31st in every
    /// month that has one. Returns `None` if a date falls outside chrono's range.
    pub fn due_dates(&self, first_pmt_date: NaiveDate) -> Option<Vec<NaiveDate>> {
        self.schedule
            .iter()
            .map(|pmt| first_pmt_date.checked_add_months(Months::new(pmt.pmt_number - 1)))
            .collect()
    }

    pub fn show_amortization(&self) {
        for pmt in &self.schedule {
            println!("{}", pmt);
        }
    }
}

/// Validates the inputs and computes the payment and the full schedule.
pub fn compute_schedule(
    principal: f64,
    annual_rate: f64,
    term: u32,
) -> Result<AmortizationResult> {
    LoanTerms::new(principal, annual_rate, term)?.amortize()
}

/// Monthly rate as a decimal, from an annual percentage.
pub fn periodic_rate(annual_rate: f64) -> f64 {
    (annual_rate / 100.) / PMTS_PER_YEAR as f64
}

/// Level payment that repays `principal` over `term` periods at `rate` per period.
pub fn pmt_amount(principal: f64, rate: f64, term: u32) -> f64 {
    if rate == 0. {
        return principal / term as f64;
    }

    let factor = (1. + rate).powf(term as f64);
    if factor.is_infinite() {
        // the annuity converges to interest-only as the term grows
        return principal * rate;
    }
    (principal * rate * factor) / (factor - 1.)
}

// Folds the balance over the periods. The last period takes up whatever
// floating point residue is left so the loan ends at exactly zero.
fn build_schedule(principal: f64, rate: f64, term: u32, pmt_amount: f64) -> Vec<PeriodRecord> {
    (1..=term)
        .scan(principal, |balance, pmt_number| {
            let interest_paid = *balance * rate;
            let mut principal_paid = pmt_amount - interest_paid;
            *balance -= principal_paid;

            if pmt_number == term {
                trace!("final period residue {}", balance);
                principal_paid += *balance;
                *balance = 0.;
            }
            trace!(
                "pmt # {}, principal {}, interest {}, end bal {}",
                pmt_number,
                principal_paid,
                interest_paid,
                balance
            );

            Some(PeriodRecord::new(
                pmt_number,
                pmt_amount,
                principal_paid,
                interest_paid,
                *balance,
            ))
        })
        .collect()
}

fn running_total(amounts: impl Iterator<Item = f64>) -> Vec<f64> {
    amounts
        .scan(0., |total, amt| {
            *total += amt;
            Some(*total)
        })
        .collect()
}
