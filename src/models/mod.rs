pub mod content;
pub mod identifiers;
pub mod message;
pub mod notification;
pub mod retry;
pub mod validation;
