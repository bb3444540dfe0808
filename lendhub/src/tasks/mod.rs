pub mod overdue;
pub mod retention;
pub mod scheduler;
