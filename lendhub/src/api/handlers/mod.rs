pub mod admin;
pub mod bundles;
pub mod health;
pub mod info;
pub mod items;
pub mod loans;
pub mod locations;
pub mod login;
pub mod me;
pub mod privacy;
