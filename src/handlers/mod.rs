pub mod console_handlers;
pub mod health_handlers;
