pub mod client;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod response;

pub use client::{HttpStore, SaveReceipt, SheetStore, Submission};
pub use response::Dataset;
