//! Condition bookkeeping for resource statuses.
//!
//! A resource's status is a list of named, tri-state [`Condition`]s. A
//! [`ConditionSet`] declares which of those conditions a resource's readiness
//! depends on, and a [`ConditionManager`] is the only way to mutate them: every
//! mark operation recomputes the aggregate (`Ready` or `Succeeded`) condition
//! before returning, so readers never observe an aggregate that disagrees with
//! its dependents.
//!
//! ```text
//! [ SinkProvided ] ─┐
//! [ Deployed     ] ─┤
//! [ ...          ] ─┴─> [ Ready ]
//! ```
//!
//! Statuses are single-writer: a manager holds the only mutable borrow of the
//! status it manages for as long as it lives.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod condition;
mod condition_set;
mod manager;


pub use self::{
    condition::{
        Condition, ConditionStatus, ConditionType, InvalidConditionStatus, Severity,
    },
    condition_set::{ConditionSet, SharedConditionSet},
    manager::{ConditionManager, ConditionsAccessor},
};
