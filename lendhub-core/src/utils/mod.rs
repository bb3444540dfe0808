pub mod slugify;
