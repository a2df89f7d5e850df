use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The resolved address of a sink.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Addressable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// PEM encoded CA certificates used to verify the sink's TLS endpoint.
    #[serde(default, rename = "CACerts", skip_serializing_if = "Option::is_none")]
    pub ca_certs: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

/// Where a source delivers events: either an object reference resolved to an
/// address by the controller, or a literal URI, or both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<KReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, rename = "CACerts", skip_serializing_if = "Option::is_none")]
    pub ca_certs: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

/// A reference to an object in the same namespace, unless one is given.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KReference {
    pub kind: String,
    pub name: String,
    pub api_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

// === impl Addressable ===

impl Addressable {
    /// Returns the address URL if one was resolved and it is not empty.
    pub fn resolved_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_url() {
        for (addr, expected) in [
            (Addressable::default(), None),
            (
                Addressable {
                    url: Some(String::new()),
                    ..Default::default()
                },
                None,
            ),
            (
                Addressable {
                    url: Some("http://sink.ns.svc.cluster.local".to_string()),
                    ..Default::default()
                },
                Some("http://sink.ns.svc.cluster.local"),
            ),
        ] {
            assert_eq!(addr.resolved_url(), expected, "{addr:?}");
        }
    }
}
