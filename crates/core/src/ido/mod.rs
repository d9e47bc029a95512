pub mod client;
pub mod error;

pub use client::{IdoClient, LoadRequest, RecordCap, RecordSource};
pub use error::IdoError;
