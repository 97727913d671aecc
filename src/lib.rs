//! Fixed-rate installment loan calculations: the periodic payment (EMI) and
//! the period-by-period amortization schedule behind it.
//!
//! ```
//! use emi::loan::compute_schedule;
//!
//! let loan = compute_schedule(120000., 0., 24).unwrap();
//! assert_eq!(loan.get_pmt_amount(), 5000.);
//! assert_eq!(loan.get_schedule().last().map(|pmt| pmt.end_balance), Some(0.));
//! ```

pub mod error;
pub mod loan;

pub use error::{LoanError, Result};
pub use loan::{compute_schedule, AmortizationResult, LoanTerms, PeriodRecord};
