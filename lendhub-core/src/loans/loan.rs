use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What is being lent out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanTarget {
    Item(Uuid),
    Bundle(Uuid),
}

/// Contact data of the person holding the loan.
///
/// This is the only personal data the service stores; the retention sweep
/// and the privacy endpoints redact it in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct Borrower {
    pub name: String,
    pub email: String,
}

pub const REDACTED: &str = "redacted";

impl Borrower {
    pub fn redact(&mut self) {
        self.name = REDACTED.to_string();
        self.email = REDACTED.to_string();
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
}

/// One lending transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema, utoipa::ToResponse)]
pub struct Loan {
    pub id: Uuid,
    pub target: LoanTarget,
    pub location_id: String,
    pub borrower: Borrower,
    pub status: LoanStatus,
    pub opened_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymized_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn new(
        target: LoanTarget,
        location_id: &str,
        borrower: Borrower,
        due_at: DateTime<Utc>,
    ) -> Self {
        Loan {
            id: Uuid::new_v4(),
            target,
            location_id: location_id.to_string(),
            borrower,
            status: LoanStatus::Active,
            opened_at: Utc::now(),
            due_at,
            closed_at: None,
            anonymized_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, LoanStatus::Active | LoanStatus::Overdue)
    }

    pub fn close(&mut self) {
        self.status = LoanStatus::Returned;
        self.closed_at = Some(Utc::now());
    }

    pub fn mark_overdue(&mut self) {
        if self.status == LoanStatus::Active {
            self.status = LoanStatus::Overdue;
        }
    }

    /// Redact the borrower in place. Only meaningful on closed loans; the
    /// loan record itself stays for inventory statistics.
    pub fn anonymize(&mut self) {
        self.borrower.redact();
        self.anonymized_at = Some(Utc::now());
    }

    pub fn is_anonymized(&self) -> bool {
        self.anonymized_at.is_some()
    }
}
