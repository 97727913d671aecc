use chrono::NaiveDate;
use clap::Parser;
use emi::loan::*;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use std::process;

/// Monthly installment (EMI) calculator with a full amortization table
#[derive(Parser, Debug)]
#[command(name = "emi", version, about)]
struct Args {
    /// Loan amount (principal)
    #[arg(short, long, default_value_t = 500000., allow_negative_numbers = true)]
    principal: f64,

    /// Annual interest rate in percent (8.0 means 8%)
    #[arg(short, long, default_value_t = 8.0, allow_negative_numbers = true)]
    rate: f64,

    /// Loan term in years
    #[arg(short, long, default_value_t = 10)]
    years: u32,

    /// Loan term in months, overrides --years
    #[arg(short, long)]
    months: Option<u32>,

    /// Date of the first payment (YYYY-MM-DD), adds a due date to every row
    #[arg(short = 'd', long)]
    first_payment: Option<NaiveDate>,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() {
    let args = Args::parse();

    SimpleLogger::new()
        .with_level(args.log_level)
        .init()
        .unwrap();

    let terms = match args.months {
        Some(months) => LoanTerms::new(args.principal, args.rate, months),
        None => LoanTerms::from_years(args.principal, args.rate, args.years),
    };
    let loan = match terms.and_then(|terms| terms.amortize()) {
        Ok(loan) => loan,
        Err(e) => {
            error!("{}", e);
            eprintln!("Please check the loan details: {}", e);
            process::exit(2);
        }
    };
    info!(
        "amortized {} over {} months at {}%",
        loan.get_principal(),
        loan.get_pmt_count(),
        loan.get_terms().annual_rate
    );

    show_summary(&loan);
    println!();

    match args.first_payment {
        Some(first_pmt_date) => match loan.due_dates(first_pmt_date) {
            Some(dates) => {
                for (date, pmt) in dates.iter().zip(loan.get_schedule()) {
                    println!("{}: {}", date, pmt);
                }
            }
            None => {
                error!("due dates starting {} are out of range", first_pmt_date);
                loan.show_amortization();
            }
        },
        None => loan.show_amortization(),
    }
}

fn show_summary(loan: &AmortizationResult) {
    println!("Monthly EMI:          ${:.2}", loan.get_pmt_amount());
    println!("Total payable amount: ${:.2}", loan.get_total_payable());
    println!("Total interest paid:  ${:.2}", loan.get_total_interest());
    println!("Total payments:       {} months", loan.get_pmt_count());
    println!(
        "The total interest paid amounts to {:.1}% of the principal.",
        loan.get_interest_ratio()
    );
}

// verifies that types can implement the gated traits below
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<LoanTerms>();
    is_normal::<PeriodRecord>();
    is_normal::<AmortizationResult>();
    is_normal::<emi::LoanError>();
}

#[test]
fn cli_defaults() {
    let args = Args::parse_from(["emi"]);
    assert_eq!(args.principal, 500000.);
    assert_eq!(args.rate, 8.0);
    assert_eq!(args.years, 10);
    assert_eq!(args.months, None);
    assert_eq!(args.log_level, LevelFilter::Info);

    let args = Args::parse_from(["emi", "-m", "24", "-r", "0", "-d", "2024-03-01"]);
    assert_eq!(args.months, Some(24));
    assert_eq!(args.rate, 0.);
    assert_eq!(args.first_payment, NaiveDate::from_ymd_opt(2024, 3, 1));
}
