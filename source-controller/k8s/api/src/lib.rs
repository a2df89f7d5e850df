#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod consumer_group;
pub mod duck;
pub mod source;
pub mod workload;

pub use self::{
    consumer_group::{ConsumerGroup, ConsumerGroupSpec, ConsumerGroupStatus},
    duck::{Addressable, Destination, KReference},
    source::{KafkaSource, KafkaSourceSpec, KafkaSourceStatus},
    workload::deployment_is_available,
};
pub use k8s_openapi::{
    api::{
        self,
        apps::v1::{Deployment, DeploymentCondition, DeploymentSpec, DeploymentStatus},
    },
    apimachinery::{
        self,
        pkg::apis::meta::v1::{ObjectMeta, OwnerReference},
    },
};
pub use kafka_source_controller_core::{Condition, ConditionStatus, ConditionType};
pub use kube::{Resource, ResourceExt};
