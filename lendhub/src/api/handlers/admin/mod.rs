pub mod assignments;
pub mod permissions;
pub mod roles;
