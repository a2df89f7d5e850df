#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use kafka_source_controller_core as core;
pub use kafka_source_controller_k8s_api as k8s;
pub use kafka_source_controller_k8s_index as index;
pub use kafka_source_controller_k8s_status as status;

mod args;
mod requeue;

pub use self::args::Args;
