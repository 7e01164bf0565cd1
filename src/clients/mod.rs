pub mod auth;
pub mod http;
pub mod notifications;
pub mod rbmq;
