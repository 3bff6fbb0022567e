pub mod engine;
pub mod snapshot;

pub use engine::{ProjectionEngine, SUPPORTED_HORIZONS};
pub use snapshot::{
    decode_snapshot, encode_snapshot, is_schema_version_compatible, read_snapshot, write_snapshot,
    BalanceBasis, DailyBalances, ProjectionSnapshot, SCHEMA_VERSION,
};
