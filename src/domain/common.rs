use uuid::Uuid;

/// Monetary amount in integer minor currency units (e.g. cents).
///
/// Every balance, event amount, and statement figure in the engine is a
/// `MinorUnits` value; arithmetic never introduces fractional cents.
pub type MinorUnits = i64;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;
