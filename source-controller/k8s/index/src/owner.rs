use crate::ResourceId;
use kafka_source_controller_k8s_api::{Resource, ResourceExt};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Selects subordinate resources by the kind of their direct owners.
///
/// The kind is normalized once, when the filter is built, and compared
/// ASCII-case-insensitively against each owner reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerKind(String);

/// Accepts owner keys for re-evaluation.
pub trait Enqueue {
    fn enqueue(&self, id: ResourceId) -> Result<(), EnqueueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnqueueError {
    #[error("work queue is full")]
    Full(ResourceId),

    #[error("work queue is closed")]
    Closed(ResourceId),
}

// === impl OwnerKind ===

impl OwnerKind {
    pub fn new(kind: impl AsRef<str>) -> Self {
        Self(kind.as_ref().to_ascii_lowercase())
    }

    /// Selects resources owned by a `K`.
    pub fn of<K: Resource<DynamicType = ()>>() -> Self {
        Self::new(K::kind(&()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn matches_kind(&self, kind: &str) -> bool {
        kind.eq_ignore_ascii_case(&self.0)
    }

    /// Returns true if any of the resource's owner references is of this kind.
    pub fn matches<R: Resource>(&self, resource: &R) -> bool {
        resource
            .owner_references()
            .iter()
            .any(|owner| self.matches_kind(&owner.kind))
    }

    /// Returns a key for each owner reference of this kind, in reference order.
    ///
    /// Owner references never cross namespaces, so every key is in the
    /// resource's namespace. Cluster-scoped resources have no such owners.
    pub fn route<R: Resource>(&self, resource: &R) -> Vec<ResourceId> {
        let Some(namespace) = resource.namespace() else {
            return Vec::new();
        };
        resource
            .owner_references()
            .iter()
            .filter(|owner| self.matches_kind(&owner.kind))
            .map(|owner| ResourceId::new(namespace.clone(), owner.name.clone()))
            .collect()
    }

    /// Enqueues every owner of this kind, returning how many were accepted.
    pub fn enqueue<R: Resource>(&self, resource: &R, queue: &impl Enqueue) -> usize {
        let mut accepted = 0;
        for id in self.route(resource) {
            match queue.enqueue(id) {
                Ok(()) => accepted += 1,
                Err(error) => tracing::warn!(kind = %self.0, %error, "Failed to enqueue owner"),
            }
        }
        accepted
    }
}

// === impl Enqueue ===

impl Enqueue for mpsc::Sender<ResourceId> {
    fn enqueue(&self, id: ResourceId) -> Result<(), EnqueueError> {
        self.try_send(id).map_err(|error| match error {
            TrySendError::Full(id) => EnqueueError::Full(id),
            TrySendError::Closed(id) => EnqueueError::Closed(id),
        })
    }
}

impl Enqueue for mpsc::UnboundedSender<ResourceId> {
    fn enqueue(&self, id: ResourceId) -> Result<(), EnqueueError> {
        self.send(id).map_err(|error| EnqueueError::Closed(error.0))
    }
}

// === impl EnqueueError ===

impl EnqueueError {
    pub fn id(&self) -> &ResourceId {
        match self {
            Self::Full(id) | Self::Closed(id) => id,
        }
    }
}
