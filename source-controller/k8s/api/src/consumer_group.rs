use kafka_source_controller_core::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of consumers reading on behalf of a user-facing resource.
///
/// Consumer groups are created by the controllers of the resources they serve
/// (e.g. `KafkaSource`) and carry an owner reference back to them.
#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "internal.kafka.eventing.knative.dev",
    version = "v1alpha1",
    kind = "ConsumerGroup",
    status = "ConsumerGroupStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerGroupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Selects the dispatcher pods that may be scheduled consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerGroupStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}
