//! Routes changes to subordinate resources back to the resources that own them.
//!
//! A `KafkaSource` is realized through resources it owns (e.g. a
//! `ConsumerGroup`). When one of those changes, the owning source must be
//! reconciled again. The index watches subordinates, selects the ones owned by
//! the configured kind, and hands the owners' keys to a work queue:
//!
//! ```text
//! [ ConsumerGroup ] --ownerReferences--> [ KafkaSource ] -> work queue
//! ```
//!
//! Owner kinds are matched without regard to ASCII case. Owner references are
//! always in the subordinate's namespace, so every key is namespaced.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod index;
pub mod metrics;
mod owner;
mod resource_id;


pub use self::{
    index::{Index, SharedIndex},
    metrics::IndexMetrics,
    owner::{Enqueue, EnqueueError, OwnerKind},
    resource_id::ResourceId,
};
