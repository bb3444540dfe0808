use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::loan::{Loan, LoanStatus};

#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct LoanVec {
    pub loans: Vec<Loan>,
}

/// Shared, concurrency-safe loan ledger
#[derive(Debug, Clone, Default)]
pub struct SharedLoanBook {
    loans: Arc<RwLock<HashMap<Uuid, Loan>>>,
}

impl SharedLoanBook {
    pub fn new() -> SharedLoanBook {
        SharedLoanBook::default()
    }

    pub async fn add_loan(&self, loan: Loan) {
        self.loans.write().await.insert(loan.id, loan);
    }

    pub async fn get_loan(&self, id: &Uuid) -> Option<Loan> {
        self.loans.read().await.get(id).cloned()
    }

    /// Apply a mutation to one loan; returns the updated loan if it exists.
    pub async fn update_loan<F>(&self, id: &Uuid, mutate: F) -> Option<Loan>
    where
        F: FnOnce(&mut Loan),
    {
        let mut loans = self.loans.write().await;
        let loan = loans.get_mut(id)?;
        mutate(loan);
        Some(loan.clone())
    }

    /// Apply a mutation to every loan matching the predicate; returns the
    /// updated loans.
    pub async fn update_loans_where<P, F>(&self, predicate: P, mut mutate: F) -> Vec<Loan>
    where
        P: Fn(&Loan) -> bool,
        F: FnMut(&mut Loan),
    {
        let mut loans = self.loans.write().await;
        let mut updated = Vec::new();
        for loan in loans.values_mut() {
            if predicate(loan) {
                mutate(loan);
                updated.push(loan.clone());
            }
        }
        updated
    }

    pub async fn get_loans(&self, location: Option<&str>, status: Option<LoanStatus>) -> LoanVec {
        let loans = self.loans.read().await;
        let mut loans: Vec<Loan> = loans
            .values()
            .filter(|loan| location.is_none_or(|l| loan.location_id == l))
            .filter(|loan| status.is_none_or(|s| loan.status == s))
            .cloned()
            .collect();
        loans.sort_by_key(|loan| loan.opened_at);
        LoanVec { loans }
    }

    /// Every loan held for a borrower email, for subject-access export.
    pub async fn loans_for_email(&self, email: &str) -> Vec<Loan> {
        let loans = self.loans.read().await;
        let mut loans: Vec<Loan> = loans
            .values()
            .filter(|loan| loan.borrower.email.eq_ignore_ascii_case(email))
            .cloned()
            .collect();
        loans.sort_by_key(|loan| loan.opened_at);
        loans
    }

    pub async fn len(&self) -> usize {
        self.loans.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.loans.read().await.is_empty()
    }
}
