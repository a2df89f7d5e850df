use crate::duck::Destination;
use kafka_source_controller_core::{Condition, ConditionsAccessor};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reads events from a set of Kafka topics and delivers them to a sink.
#[derive(Clone, Debug, PartialEq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "sources.knative.dev",
    version = "v1",
    kind = "KafkaSource",
    status = "KafkaSourceStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KafkaSourceSpec {
    pub bootstrap_servers: Vec<String>,
    pub topics: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_group: Option<String>,

    /// Number of consumers that read from the topics concurrently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumers: Option<i32>,

    pub sink: Destination,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaSourceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Kept sorted by condition type.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink_uri: Option<String>,

    #[serde(default, rename = "sinkCACerts", skip_serializing_if = "Option::is_none")]
    pub sink_ca_certs: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink_audience: Option<String>,

    /// Replicas of the receive adapter, as last observed while available.
    #[serde(default)]
    pub consumers: i32,

    /// Summary of the partitions claimed by the consumer group.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub claims: String,
}

impl ConditionsAccessor for KafkaSourceStatus {
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }
}
