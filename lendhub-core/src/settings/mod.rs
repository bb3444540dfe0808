pub mod api_server;
pub mod notification_services;
pub mod retention;
pub mod scheduler_interval;
