use k8s_openapi::api::apps::v1::DeploymentStatus;

const AVAILABLE: &str = "Available";

/// Checks whether a Deployment reports itself available.
///
/// Deployments that do not (yet) carry an `Available` condition are
/// considered available iff `default` is true.
pub fn deployment_is_available(status: &DeploymentStatus, default: bool) -> bool {
    let conditions = status
        .conditions
        .iter()
        .flatten()
        .map(|c| (c.type_.as_str(), c.status.as_str()));
    condition_is_true(conditions, AVAILABLE, default)
}

/// Looks up the first condition of type `type_` in a list of `(type, status)`
/// pairs and reports whether its status is `"True"`, or `default` if there is
/// no such condition.
pub fn condition_is_true<'c>(
    conditions: impl IntoIterator<Item = (&'c str, &'c str)>,
    type_: &str,
    default: bool,
) -> bool {
    conditions
        .into_iter()
        .find(|(t, _)| *t == type_)
        .map(|(_, status)| status == "True")
        .unwrap_or(default)
}
