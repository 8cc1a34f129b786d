// Sample records and the supported target range
pub mod sample;

// Domain-specific error types
pub mod errors;
