//! Contest allocation: predicted scores in, normalized capital weights out,
//! one persisted result document per decision cycle.

pub mod error;
pub mod optimizer;
pub mod store;

pub use error::ContestError;
pub use optimizer::{optimize, WEIGHT_SUM_TOLERANCE};
pub use store::{read_document, ResultStore};
