use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LoanError {
    #[error("invalid principal: {principal} (must be a positive amount)")]
    InvalidPrincipal { principal: f64 },

    #[error("invalid annual rate: {annual_rate}% (must not be negative)")]
    InvalidRate { annual_rate: f64 },

    #[error("invalid term: {term} periods (must be at least one)")]
    InvalidTerm { term: u32 },
}

pub type Result<T> = std::result::Result<T, LoanError>;

#[cfg(test)]
mod tests {
    use super::LoanError;
    use test_log::test;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LoanError::InvalidPrincipal { principal: -5. }.to_string(),
            "invalid principal: -5 (must be a positive amount)"
        );
        assert_eq!(
            LoanError::InvalidRate { annual_rate: -0.5 }.to_string(),
            "invalid annual rate: -0.5% (must not be negative)"
        );
        assert_eq!(
            LoanError::InvalidTerm { term: 0 }.to_string(),
            "invalid term: 0 periods (must be at least one)"
        );
    }
}
