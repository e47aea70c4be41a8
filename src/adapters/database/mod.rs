//! Record source abstraction layer
//!
//! This module provides trait-based abstractions over the store the
//! chargebacks are read from.

pub mod factory;
pub mod traits;

pub use factory::create_record_source;
pub use traits::{read_chunk, RecordSource, RecordStreamReader};
