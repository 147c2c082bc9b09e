pub mod error;
pub mod request_context;
