pub mod error;
pub mod logger;
pub mod nullable;
pub mod validation;
