use crate::{Enqueue, EnqueueError, IndexMetrics, OwnerKind, ResourceId};
use ahash::AHashMap as HashMap;
use kafka_source_controller_k8s_api::ResourceExt;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

pub type SharedIndex = Arc<RwLock<Index>>;

/// Tracks the owners of each subordinate resource so that an owner is
/// re-evaluated both when a subordinate starts and stops referencing it.
#[derive(Debug)]
pub struct Index {
    owner_kind: OwnerKind,
    queue: mpsc::Sender<ResourceId>,
    owners: HashMap<ResourceId, Vec<ResourceId>>,
    metrics: IndexMetrics,
}

impl Index {
    pub fn new(
        owner_kind: OwnerKind,
        queue: mpsc::Sender<ResourceId>,
        metrics: IndexMetrics,
    ) -> Self {
        Self {
            owner_kind,
            queue,
            owners: HashMap::default(),
            metrics,
        }
    }

    pub fn shared(
        owner_kind: OwnerKind,
        queue: mpsc::Sender<ResourceId>,
        metrics: IndexMetrics,
    ) -> SharedIndex {
        Arc::new(RwLock::new(Self::new(owner_kind, queue, metrics)))
    }

    pub fn owner_kind(&self) -> &OwnerKind {
        &self.owner_kind
    }

    /// Returns the recorded owners of the given subordinate.
    pub fn owners(&self, subordinate: &ResourceId) -> &[ResourceId] {
        self.owners
            .get(subordinate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The number of subordinates with at least one owner of the indexed kind.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    fn enqueue(&self, id: ResourceId) {
        match self.queue.enqueue(id) {
            Ok(()) => self.metrics.enqueued(self.owner_kind.as_str()),
            Err(error) => {
                self.metrics.dropped(self.owner_kind.as_str());
                match error {
                    EnqueueError::Full(ref id) => {
                        tracing::warn!(owner = %id, "Work queue full; dropping owner")
                    }
                    EnqueueError::Closed(ref id) => {
                        tracing::debug!(owner = %id, "Work queue closed; dropping owner")
                    }
                }
            }
        }
    }
}

impl<R> kubert::index::IndexNamespacedResource<R> for Index
where
    R: ResourceExt<DynamicType = ()>,
{
    fn apply(&mut self, resource: R) {
        self.metrics.applied(&R::kind(&()));

        let Some(namespace) = resource.namespace() else {
            tracing::debug!(name = %resource.name_any(), "Ignoring resource without a namespace");
            return;
        };
        let id = ResourceId::new(namespace, resource.name_unchecked());

        let owners = self.owner_kind.route(&resource);
        let previous = if owners.is_empty() {
            self.owners.remove(&id)
        } else {
            self.owners.insert(id.clone(), owners.clone())
        }
        .unwrap_or_default();

        // Owners that were dropped by this update must also observe the change.
        let removed = previous
            .into_iter()
            .filter(|owner| !owners.contains(owner))
            .collect::<Vec<_>>();
        tracing::trace!(subordinate = %id, ?owners, ?removed, "Applied");

        for owner in owners.into_iter().chain(removed) {
            self.enqueue(owner);
        }
        self.metrics.set_size(self.owners.len());
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.metrics.deleted(&R::kind(&()));

        let id = ResourceId::new(namespace, name);
        if let Some(owners) = self.owners.remove(&id) {
            tracing::trace!(subordinate = %id, ?owners, "Deleted");
            for owner in owners {
                self.enqueue(owner);
            }
        }
        self.metrics.set_size(self.owners.len());
    }
}
