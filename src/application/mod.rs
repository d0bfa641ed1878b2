// Application layer - Use cases and repository ports
pub mod session_filter;
pub mod telemetry_repository;
