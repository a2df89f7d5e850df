use crate::{
    condition_set,
    source::{
        CONNECTION_ESTABLISHED, DEPLOYED, DEPLOYMENT_UNAVAILABLE, INITIAL_OFFSETS_COMMITTED,
        KEY_TYPE_CORRECT, OIDC_IDENTITY_CREATED, SINK_EMPTY, SINK_PROVIDED,
    },
    SourceConditions,
};
use chrono::{DateTime, Utc};
use kafka_source_controller_core::{ConditionSet, ConditionStatus, ConditionType};
use kafka_source_controller_k8s_api::{
    Addressable, Deployment, DeploymentCondition, DeploymentStatus, KafkaSourceStatus, ObjectMeta,
};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

const DEPENDENTS: [ConditionType; 5] = [
    SINK_PROVIDED,
    DEPLOYED,
    CONNECTION_ESTABLISHED,
    INITIAL_OFFSETS_COMMITTED,
    OIDC_IDENTITY_CREATED,
];

#[fixture]
fn conditions() -> SourceConditions {
    SourceConditions::default()
}

fn now() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

fn valid_sink() -> Addressable {
    Addressable {
        name: None,
        url: Some("http://sink.ns-0.svc.cluster.local".to_string()),
        ca_certs: Some("-----BEGIN CERTIFICATE-----".to_string()),
        audience: Some("sink-audience".to_string()),
    }
}

fn deployment(available: Option<&str>, replicas: i32) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            namespace: Some("ns-0".to_string()),
            name: Some("kafkasource-adapter".to_string()),
            ..Default::default()
        },
        status: Some(DeploymentStatus {
            replicas: Some(replicas),
            conditions: available.map(|status| {
                vec![DeploymentCondition {
                    type_: "Available".to_string(),
                    status: status.to_string(),
                    ..Default::default()
                }]
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn ready_source(conditions: &SourceConditions) -> KafkaSourceStatus {
    let mut status = KafkaSourceStatus::default();
    let mut source = conditions.manage_at(&mut status, now());
    source.initialize_conditions();
    source.mark_sink(&valid_sink());
    source.mark_deployed(&deployment(Some("True"), 3));
    source.mark_connection_established();
    source.mark_initial_offset_committed();
    source.mark_oidc_identity_created_succeeded();
    status
}

#[rstest]
fn initialized_source_is_unknown(conditions: SourceConditions) {
    let mut status = KafkaSourceStatus::default();
    let mut source = conditions.manage_at(&mut status, now());
    source.initialize_conditions();

    for type_ in DEPENDENTS.iter() {
        let condition = source.get_condition(type_).expect("condition must be initialized");
        assert_eq!(condition.status, ConditionStatus::Unknown, "{type_}");
    }
    let ready = source.get_condition(&ConditionType::READY).unwrap();
    assert_eq!(ready.status, ConditionStatus::Unknown);
    assert!(!source.is_ready());

    // KeyTypeCorrect is not part of the condition set.
    assert_eq!(source.get_condition(&KEY_TYPE_CORRECT), None);
    assert_eq!(status.conditions.len(), 6);
}

#[rstest]
fn all_dependents_true_is_ready(conditions: SourceConditions) {
    let status = ready_source(&conditions);

    let ready = status
        .conditions
        .iter()
        .find(|c| c.type_ == ConditionType::READY)
        .unwrap();
    assert_eq!(ready.status, ConditionStatus::True);
    assert_eq!(ready.reason, "");
    assert_eq!(ready.message, "");
    assert_eq!(
        status.sink_uri.as_deref(),
        Some("http://sink.ns-0.svc.cluster.local")
    );
    assert_eq!(
        status.sink_ca_certs.as_deref(),
        Some("-----BEGIN CERTIFICATE-----")
    );
    assert_eq!(status.sink_audience.as_deref(), Some("sink-audience"));
    assert_eq!(status.consumers, 3);

    let mut status = status;
    assert!(conditions.manage_at(&mut status, now()).is_ready());
}

#[rstest]
fn connection_failure_surfaces_on_ready(conditions: SourceConditions) {
    let mut status = KafkaSourceStatus::default();
    let mut source = conditions.manage_at(&mut status, now());
    source.initialize_conditions();
    source.mark_sink(&valid_sink());
    source.mark_deployed(&deployment(Some("True"), 1));
    source.mark_connection_not_established("DialTimeout", "could not reach broker");
    source.mark_initial_offset_committed();
    source.mark_oidc_identity_created_succeeded();

    assert!(!source.is_ready());
    let ready = source.get_condition(&ConditionType::READY).unwrap();
    assert_eq!(ready.status, ConditionStatus::False);
    assert_eq!(ready.reason, "DialTimeout");
    assert_eq!(ready.message, "could not reach broker");
}

#[rstest]
fn empty_sink_is_pending(conditions: SourceConditions) {
    let mut status = KafkaSourceStatus::default();
    let mut source = conditions.manage_at(&mut status, now());
    source.initialize_conditions();
    source.mark_sink(&Addressable {
        url: Some(String::new()),
        ..Default::default()
    });

    let sink = source.get_condition(&SINK_PROVIDED).unwrap();
    assert_eq!(sink.status, ConditionStatus::Unknown);
    assert_eq!(sink.reason, SINK_EMPTY);
    assert_eq!(sink.message, "Sink has resolved to empty.");

    let ready = source.get_condition(&ConditionType::READY).unwrap();
    assert_eq!(ready.status, ConditionStatus::Unknown);
    assert_eq!(ready.reason, SINK_EMPTY);
    assert_eq!(status.sink_uri, None);
}

#[rstest]
fn sink_can_be_lost(conditions: SourceConditions) {
    let mut status = ready_source(&conditions);
    let mut source = conditions.manage_at(&mut status, now());
    source.mark_no_sink("NotFound", format_args!("sink {} not found", "ns-0/sink"));

    assert!(!source.is_ready());
    let ready = source.get_condition(&ConditionType::READY).unwrap();
    assert_eq!(ready.status, ConditionStatus::False);
    assert_eq!(ready.reason, "NotFound");
    assert_eq!(ready.message, "sink ns-0/sink not found");
}

#[rstest]
#[case::unavailable(Some("False"), false)]
#[case::unknown(Some("Unknown"), false)]
#[case::no_condition(None, false)]
fn unavailable_deployment_is_named(
    conditions: SourceConditions,
    #[case] available: Option<&str>,
    #[case] default: bool,
) {
    let conditions = conditions.with_deployment_available_default(default);
    let mut status = KafkaSourceStatus::default();
    let mut source = conditions.manage_at(&mut status, now());
    source.mark_deployed(&deployment(available, 2));

    let deployed = source.get_condition(&DEPLOYED).unwrap();
    assert_eq!(deployed.status, ConditionStatus::False);
    assert_eq!(deployed.reason, DEPLOYMENT_UNAVAILABLE);
    assert_eq!(
        deployed.message,
        "The Deployment 'kafkasource-adapter' is unavailable."
    );
    assert_eq!(status.consumers, 0);
}

#[rstest]
fn deployment_availability_default_is_configurable(conditions: SourceConditions) {
    let conditions = conditions.with_deployment_available_default(true);
    let mut status = KafkaSourceStatus::default();
    let mut source = conditions.manage_at(&mut status, now());
    source.mark_deployed(&deployment(None, 4));

    assert!(source.get_condition(&DEPLOYED).unwrap().is_true());
    assert_eq!(status.consumers, 4);
}

#[rstest]
fn deploying_is_unknown(conditions: SourceConditions) {
    let mut status = ready_source(&conditions);
    let mut source = conditions.manage_at(&mut status, now());
    source.mark_deploying("Rollout", "waiting for rollout");

    let ready = source.get_condition(&ConditionType::READY).unwrap();
    assert_eq!(ready.status, ConditionStatus::Unknown);
    assert_eq!(ready.reason, "Rollout");

    source.mark_not_deployed("Forbidden", "cannot create deployment");
    let ready = source.get_condition(&ConditionType::READY).unwrap();
    assert_eq!(ready.status, ConditionStatus::False);
    assert_eq!(ready.reason, "Forbidden");
}

#[rstest]
fn key_type_does_not_gate_readiness(conditions: SourceConditions) {
    let mut status = ready_source(&conditions);
    let mut source = conditions.manage_at(&mut status, now());
    source.mark_key_type_incorrect("UnknownKeyType", "key type 'float' is not supported");
    assert!(source.is_ready());

    let key_type = source.get_condition(&KEY_TYPE_CORRECT).unwrap();
    assert_eq!(key_type.status, ConditionStatus::False);
    assert_eq!(key_type.reason, "UnknownKeyType");

    source.mark_key_type_correct();
    assert!(source.get_condition(&KEY_TYPE_CORRECT).unwrap().is_true());
    assert!(source.is_ready());
}

#[rstest]
fn offsets_not_committed_blocks_readiness(conditions: SourceConditions) {
    let mut status = ready_source(&conditions);
    let mut source = conditions.manage_at(&mut status, now());
    source.mark_initial_offset_not_committed("OffsetsNotCommitted", "3 claims pending");

    let ready = source.get_condition(&ConditionType::READY).unwrap();
    assert_eq!(ready.status, ConditionStatus::False);
    assert_eq!(ready.reason, "OffsetsNotCommitted");
}

#[rstest]
#[case::succeeded(None, ConditionStatus::True, "", true)]
#[case::succeeded_with_reason(Some(ConditionStatus::True), ConditionStatus::True, "Disabled", true)]
#[case::failed(Some(ConditionStatus::False), ConditionStatus::False, "Disabled", false)]
#[case::unknown(Some(ConditionStatus::Unknown), ConditionStatus::Unknown, "Disabled", false)]
fn oidc_identity_outcomes(
    conditions: SourceConditions,
    #[case] outcome: Option<ConditionStatus>,
    #[case] expected: ConditionStatus,
    #[case] reason: &str,
    #[case] ready: bool,
) {
    let mut status = ready_source(&conditions);
    let mut source = conditions.manage_at(&mut status, now());
    let message = "authentication.oidc feature not enabled";
    match outcome {
        None => source.mark_oidc_identity_created_succeeded(),
        Some(ConditionStatus::True) => {
            source.mark_oidc_identity_created_succeeded_with_reason("Disabled", message)
        }
        Some(ConditionStatus::False) => source.mark_oidc_identity_created_failed("Disabled", message),
        Some(ConditionStatus::Unknown) => {
            source.mark_oidc_identity_created_unknown("Disabled", message)
        }
    }

    let identity = source.get_condition(&OIDC_IDENTITY_CREATED).unwrap();
    assert_eq!(identity.status, expected);
    assert_eq!(identity.reason, reason);
    assert_eq!(source.is_ready(), ready);
}

#[rstest]
fn consumer_group_claims_are_recorded(conditions: SourceConditions) {
    let mut status = KafkaSourceStatus::default();
    conditions
        .manage_at(&mut status, now())
        .update_consumer_group_status("topic-0: 0,1,2");
    assert_eq!(status.claims, "topic-0: 0,1,2");
}

#[test]
fn replaced_condition_set_applies_to_later_managers() {
    let conditions = SourceConditions::default();
    let mut status = KafkaSourceStatus::default();
    let mut source = conditions.manage_at(&mut status, now());
    source.mark_sink(&valid_sink());
    assert!(!source.is_ready());

    conditions
        .shared_set()
        .replace(ConditionSet::living([SINK_PROVIDED]));
    assert_eq!(
        condition_set().dependents().len(),
        5,
        "the default set is unaffected"
    );

    let mut source = conditions.manage_at(&mut status, now());
    source.mark_sink(&valid_sink());
    assert!(source.is_ready());
}
