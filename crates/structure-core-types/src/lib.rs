//! Types shared by every Structure crate
//!
//! - `RequestId` / `RequestContext` correlate a repository write with its
//!   log events and errors
//! - `schema` holds the log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId};
