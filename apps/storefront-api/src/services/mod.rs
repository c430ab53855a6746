//! Services that span several requests or outlive a single lock.

pub mod checkout;

pub use checkout::{OrderSubmitter, SubmissionRequest};
