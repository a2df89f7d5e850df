#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod source;

#[cfg(test)]
mod tests;

pub use self::source::{condition_set, SourceConditions, SourceStatusManager};
