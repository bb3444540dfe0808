use chrono::Utc;
use tracing::instrument;

use crate::{app_state::SharedAppState, notification::notify::notify_all};
use lendhub_core::{
    loans::loan::LoanStatus,
    notification_types::{Message, MessageType},
};

/// Redact borrower data on loans that have been closed for longer than
/// the configured retention window. The loan records themselves stay.
#[instrument(skip(app_state))]
pub async fn run_retention_sweep(app_state: SharedAppState) {
    let cutoff = Utc::now() - app_state.settings.retention.window();

    let anonymized = app_state
        .loans
        .update_loans_where(
            |loan| {
                loan.status == LoanStatus::Returned
                    && !loan.is_anonymized()
                    && loan.closed_at.is_some_and(|closed| closed < cutoff)
            },
            |loan| loan.anonymize(),
        )
        .await;

    if anonymized.is_empty() {
        return;
    }

    tracing::info!("Retention sweep anonymized {} loans", anonymized.len());
    let msg = Message::new(
        MessageType::RetentionCompleted,
        &format!("{} loans anonymized", anonymized.len()),
        None,
    );
    notify_all(&app_state, &msg).await;
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use lendhub_core::loans::loan::{Borrower, Loan, LoanStatus, LoanTarget, REDACTED};
    use lendhub_core::loans::shared_loan_book::SharedLoanBook;
    use uuid::Uuid;

    fn closed_loan(closed_days_ago: i64) -> Loan {
        let mut loan = Loan::new(
            LoanTarget::Item(Uuid::new_v4()),
            "loc-1",
            Borrower {
                name: "Someone".to_string(),
                email: "someone@example.org".to_string(),
            },
            Utc::now() - Duration::days(closed_days_ago + 7),
        );
        loan.close();
        loan.closed_at = Some(Utc::now() - Duration::days(closed_days_ago));
        loan
    }

    #[tokio::test]
    async fn test_sweep_only_touches_loans_outside_the_window() {
        let book = SharedLoanBook::new();
        let old = closed_loan(120);
        let recent = closed_loan(10);
        let old_id = old.id;
        let recent_id = recent.id;
        book.add_loan(old).await;
        book.add_loan(recent).await;

        let cutoff = Utc::now() - Duration::days(90);
        let anonymized = book
            .update_loans_where(
                |l| {
                    l.status == LoanStatus::Returned
                        && !l.is_anonymized()
                        && l.closed_at.is_some_and(|closed| closed < cutoff)
                },
                |l| l.anonymize(),
            )
            .await;

        assert_eq!(anonymized.len(), 1);
        let old = book.get_loan(&old_id).await.unwrap();
        assert!(old.is_anonymized());
        assert_eq!(old.borrower.email, REDACTED);

        let recent = book.get_loan(&recent_id).await.unwrap();
        assert!(!recent.is_anonymized());
        assert_eq!(recent.borrower.email, "someone@example.org");
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let book = SharedLoanBook::new();
        book.add_loan(closed_loan(120)).await;

        let cutoff = Utc::now() - Duration::days(90);
        let predicate = |l: &Loan| {
            l.status == LoanStatus::Returned
                && !l.is_anonymized()
                && l.closed_at.is_some_and(|closed| closed < cutoff)
        };

        let first = book
            .update_loans_where(predicate, |l| l.anonymize())
            .await;
        let second = book
            .update_loans_where(predicate, |l| l.anonymize())
            .await;

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }
}
