//! Tempsafe Core: reading data model and unified error type
//!
//! Every other tempsafe crate consumes these types; nothing here classifies
//! or aggregates.

pub mod data_model;
pub mod error;

pub use data_model::{GoodsType, LocationFilter, Period, Reading, ReadingCategory};
pub use error::{EngineError, Result};

/// Engine version reported by the API health endpoint
pub const TEMPSAFE_VERSION: &str = "1.0.0";
