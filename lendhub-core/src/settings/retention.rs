use serde::Deserialize;

/// Privacy/retention policy.
///
/// Borrower data on closed loans is redacted once the loan has been closed
/// for longer than the window; the loan record itself is kept.
#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct RetentionSettings {
    pub closed_loan_days: u32,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        RetentionSettings {
            closed_loan_days: 90,
        }
    }
}

impl RetentionSettings {
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::days(self.closed_loan_days as i64)
    }
}
