use chrono::{DateTime, Utc};
use kafka_source_controller_core::{
    Condition, ConditionManager, ConditionSet, ConditionType, SharedConditionSet,
};
use kafka_source_controller_k8s_api::{
    deployment_is_available, Addressable, Deployment, KafkaSourceStatus,
};
use std::{fmt, sync::Arc};

/// True when the source has resolved its sink to an address.
pub const SINK_PROVIDED: ConditionType = ConditionType::from_static("SinkProvided");

/// True when the source's receive adapter Deployment is available.
pub const DEPLOYED: ConditionType = ConditionType::from_static("Deployed");

/// True when the source is configured with a valid key type for the key
/// deserializer. Informational: it does not gate readiness.
pub const KEY_TYPE_CORRECT: ConditionType = ConditionType::from_static("KeyTypeCorrect");

/// True when the source's Kafka configuration established a connection.
pub const CONNECTION_ESTABLISHED: ConditionType =
    ConditionType::from_static("ConnectionEstablished");

/// True when the initial offsets of all claims have been committed.
pub const INITIAL_OFFSETS_COMMITTED: ConditionType =
    ConditionType::from_static("InitialOffsetsCommitted");

/// True when the source's OIDC identity has been created.
pub const OIDC_IDENTITY_CREATED: ConditionType = ConditionType::from_static("OIDCIdentityCreated");

pub const SINK_EMPTY: &str = "SinkEmpty";
pub const DEPLOYMENT_UNAVAILABLE: &str = "DeploymentUnavailable";

/// The conditions a `KafkaSource` must satisfy to be ready, in the order their
/// reasons take precedence.
pub fn condition_set() -> ConditionSet {
    ConditionSet::living([
        SINK_PROVIDED,
        DEPLOYED,
        CONNECTION_ESTABLISHED,
        INITIAL_OFFSETS_COMMITTED,
        OIDC_IDENTITY_CREATED,
    ])
}

/// Builds [`SourceStatusManager`]s from the condition set currently in
/// effect.
#[derive(Clone, Debug)]
pub struct SourceConditions {
    set: SharedConditionSet,
    deployment_available_default: bool,
}

/// Records the outcome of each step of a `KafkaSource` reconciliation on its
/// status.
#[derive(Debug)]
pub struct SourceStatusManager<'s> {
    set: Arc<ConditionSet>,
    status: &'s mut KafkaSourceStatus,
    now: DateTime<Utc>,
    deployment_available_default: bool,
}

// === impl SourceConditions ===

impl SourceConditions {
    pub fn new(set: SharedConditionSet) -> Self {
        Self {
            set,
            deployment_available_default: false,
        }
    }

    /// Whether a Deployment that does not report an `Available` condition is
    /// treated as available. Defaults to false.
    pub fn with_deployment_available_default(mut self, available: bool) -> Self {
        self.deployment_available_default = available;
        self
    }

    pub fn shared_set(&self) -> &SharedConditionSet {
        &self.set
    }

    pub fn manage<'s>(&self, status: &'s mut KafkaSourceStatus) -> SourceStatusManager<'s> {
        self.manage_at(status, Utc::now())
    }

    /// Like [`Self::manage`], stamping every transition with `now`.
    pub fn manage_at<'s>(
        &self,
        status: &'s mut KafkaSourceStatus,
        now: DateTime<Utc>,
    ) -> SourceStatusManager<'s> {
        SourceStatusManager {
            set: self.set.load(),
            status,
            now,
            deployment_available_default: self.deployment_available_default,
        }
    }
}

impl Default for SourceConditions {
    fn default() -> Self {
        Self::new(condition_set().into())
    }
}

// === impl SourceStatusManager ===

impl SourceStatusManager<'_> {
    fn conditions(&mut self) -> ConditionManager<'_, KafkaSourceStatus> {
        self.set.manage_at(&mut *self.status, self.now)
    }

    pub fn get_condition(&self, type_: &ConditionType) -> Option<Condition> {
        self.status
            .conditions
            .iter()
            .find(|c| c.type_ == *type_)
            .cloned()
    }

    pub fn get_top_level_condition(&self) -> Option<Condition> {
        self.get_condition(self.set.happy())
    }

    /// Returns true if the source is ready overall.
    pub fn is_ready(&self) -> bool {
        self.get_top_level_condition().is_some_and(|c| c.is_true())
    }

    /// Sets every unset condition to `Unknown`.
    pub fn initialize_conditions(&mut self) {
        self.conditions().initialize_conditions();
    }

    /// Records the resolved sink. A sink that resolved to an empty address is
    /// still pending rather than failed.
    pub fn mark_sink(&mut self, addr: &Addressable) {
        match addr.resolved_url() {
            Some(url) => {
                self.status.sink_uri = Some(url.to_string());
                self.status.sink_ca_certs = addr.ca_certs.clone();
                self.status.sink_audience = addr.audience.clone();
                self.conditions().mark_true(&SINK_PROVIDED);
            }
            None => {
                self.conditions()
                    .mark_unknown(&SINK_PROVIDED, SINK_EMPTY, "Sink has resolved to empty.");
            }
        }
    }

    pub fn mark_no_sink(&mut self, reason: &str, message: impl fmt::Display) {
        self.conditions().mark_false(&SINK_PROVIDED, reason, message);
    }

    /// Records whether the receive adapter Deployment is available, and if so
    /// how many consumers it runs.
    pub fn mark_deployed(&mut self, deployment: &Deployment) {
        let status = deployment.status.clone().unwrap_or_default();
        if deployment_is_available(&status, self.deployment_available_default) {
            self.conditions().mark_true(&DEPLOYED);
            self.status.consumers = status.replicas.unwrap_or(0);
            return;
        }

        // The Deployment's own conditions don't say much more than this, so
        // just name it.
        let name = deployment.metadata.name.as_deref().unwrap_or_default();
        tracing::debug!(%name, "Deployment unavailable");
        self.conditions().mark_false(
            &DEPLOYED,
            DEPLOYMENT_UNAVAILABLE,
            format_args!("The Deployment '{name}' is unavailable."),
        );
    }

    pub fn mark_deploying(&mut self, reason: &str, message: impl fmt::Display) {
        self.conditions().mark_unknown(&DEPLOYED, reason, message);
    }

    pub fn mark_not_deployed(&mut self, reason: &str, message: impl fmt::Display) {
        self.conditions().mark_false(&DEPLOYED, reason, message);
    }

    pub fn mark_key_type_correct(&mut self) {
        self.conditions().mark_true(&KEY_TYPE_CORRECT);
    }

    pub fn mark_key_type_incorrect(&mut self, reason: &str, message: impl fmt::Display) {
        self.conditions().mark_false(&KEY_TYPE_CORRECT, reason, message);
    }

    pub fn mark_connection_established(&mut self) {
        self.conditions().mark_true(&CONNECTION_ESTABLISHED);
    }

    pub fn mark_connection_not_established(&mut self, reason: &str, message: impl fmt::Display) {
        self.conditions()
            .mark_false(&CONNECTION_ESTABLISHED, reason, message);
    }

    pub fn mark_initial_offset_committed(&mut self) {
        self.conditions().mark_true(&INITIAL_OFFSETS_COMMITTED);
    }

    pub fn mark_initial_offset_not_committed(&mut self, reason: &str, message: impl fmt::Display) {
        self.conditions()
            .mark_false(&INITIAL_OFFSETS_COMMITTED, reason, message);
    }

    pub fn mark_oidc_identity_created_succeeded(&mut self) {
        self.conditions().mark_true(&OIDC_IDENTITY_CREATED);
    }

    /// The identity exists, but was created through a path worth reporting
    /// (e.g. the feature is disabled and no identity was needed).
    pub fn mark_oidc_identity_created_succeeded_with_reason(
        &mut self,
        reason: &str,
        message: impl fmt::Display,
    ) {
        self.conditions()
            .mark_true_with_reason(&OIDC_IDENTITY_CREATED, reason, message);
    }

    pub fn mark_oidc_identity_created_failed(&mut self, reason: &str, message: impl fmt::Display) {
        self.conditions()
            .mark_false(&OIDC_IDENTITY_CREATED, reason, message);
    }

    pub fn mark_oidc_identity_created_unknown(&mut self, reason: &str, message: impl fmt::Display) {
        self.conditions()
            .mark_unknown(&OIDC_IDENTITY_CREATED, reason, message);
    }

    /// Records the consumer group's summary of claimed partitions.
    pub fn update_consumer_group_status(&mut self, claims: impl Into<String>) {
        self.status.claims = claims.into();
    }
}
