pub mod loan;
pub mod shared_loan_book;

pub use loan::{Borrower, Loan, LoanStatus, LoanTarget};
pub use shared_loan_book::{LoanVec, SharedLoanBook};
