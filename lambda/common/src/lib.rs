//! Shared record access for the trip planner lambdas.
//!
//! Every handler is a single translation from a request to one store
//! operation; this crate holds the pieces they share: the [`store::RecordStore`]
//! seam, the partial update builder, the entity handlers and the response
//! envelope.

pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod item;
pub mod request;
pub mod response;
pub mod schema;
pub mod store;
pub mod update;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::CollectionConfig;
pub use error::{Error, Result};
pub use item::{Item, KeyAttr, RecordKey};
