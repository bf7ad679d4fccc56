pub mod errors;

pub use errors::{SigrunError, SigrunResult};
