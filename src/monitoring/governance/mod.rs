//! Label and cardinality governance

mod cardinality;
mod labels;

#[cfg(test)]
mod tests;

pub use cardinality::CardinalityTracker;
pub use labels::{
    LabelError, LabelErrorReason, LabelGovernor, LabelPolicy, RESERVED_LABEL_KEYS,
    is_reserved_key,
};
