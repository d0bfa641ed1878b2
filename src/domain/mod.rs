// Domain layer - Record model and pure analysis engines
pub mod analysis;
pub mod balance;
pub mod selection;
pub mod spectrum;
pub mod stats;
pub mod telemetry;
pub mod travel;
pub mod velocity;
