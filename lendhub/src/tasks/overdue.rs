use chrono::Utc;
use tracing::instrument;

use crate::{app_state::SharedAppState, notification::notify::notify_all};
use lendhub_core::{
    loans::loan::LoanStatus,
    notification_types::{Message, MessageType},
};

/// Flip active loans past their due date to overdue and notify for each.
#[instrument(skip(app_state))]
pub async fn check_overdue_loans(app_state: SharedAppState) {
    let now = Utc::now();
    let flipped = app_state
        .loans
        .update_loans_where(
            |loan| loan.status == LoanStatus::Active && loan.due_at < now,
            |loan| loan.mark_overdue(),
        )
        .await;

    if flipped.is_empty() {
        return;
    }

    tracing::info!("Marked {} loans as overdue", flipped.len());
    for loan in &flipped {
        let msg = Message::new(
            MessageType::LoanOverdue,
            &loan.id.to_string(),
            Some(loan.location_id.clone()),
        );
        notify_all(&app_state, &msg).await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use lendhub_core::loans::loan::{Borrower, Loan, LoanStatus, LoanTarget};
    use lendhub_core::loans::shared_loan_book::SharedLoanBook;
    use uuid::Uuid;

    fn loan(due_offset_days: i64) -> Loan {
        Loan::new(
            LoanTarget::Item(Uuid::new_v4()),
            "loc-1",
            Borrower {
                name: "Someone".to_string(),
                email: "someone@example.org".to_string(),
            },
            Utc::now() + Duration::days(due_offset_days),
        )
    }

    #[tokio::test]
    async fn test_only_past_due_loans_flip() {
        let book = SharedLoanBook::new();
        book.add_loan(loan(-1)).await;
        book.add_loan(loan(7)).await;

        let now = Utc::now();
        let flipped = book
            .update_loans_where(
                |l| l.status == LoanStatus::Active && l.due_at < now,
                |l| l.mark_overdue(),
            )
            .await;

        assert_eq!(flipped.len(), 1);
        assert_eq!(
            book.get_loans(None, Some(LoanStatus::Overdue))
                .await
                .loans
                .len(),
            1
        );
        assert_eq!(
            book.get_loans(None, Some(LoanStatus::Active))
                .await
                .loans
                .len(),
            1
        );
    }
}
