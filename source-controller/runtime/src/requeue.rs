use crate::{
    index::ResourceId,
    k8s::{ConditionType, KafkaSource},
};
use std::collections::BTreeSet;
use tokio::sync::mpsc;
use tracing::{debug, info, warn, Instrument};

/// Consumes owner keys produced by the ownership index.
///
/// Keys that arrive while a batch is pending are coalesced so that a burst of
/// subordinate updates re-evaluates each source once.
pub(crate) struct Requeue {
    client: kube::Client,
    rx: mpsc::Receiver<ResourceId>,
}

impl Requeue {
    pub(crate) fn new(client: kube::Client, rx: mpsc::Receiver<ResourceId>) -> Self {
        Self { client, rx }
    }

    pub(crate) async fn run(mut self) {
        while let Some(id) = self.rx.recv().await {
            for id in coalesce(id, &mut self.rx) {
                let span = tracing::info_span!("kafkasource", ns = %id.namespace, name = %id.name);
                self.observe(id).instrument(span).await;
            }
        }
        debug!("Work queue closed");
    }

    async fn observe(&self, id: ResourceId) {
        let api = kube::Api::<KafkaSource>::namespaced(self.client.clone(), &id.namespace);
        let source = match api.get_opt(&id.name).await {
            Ok(Some(source)) => source,
            Ok(None) => {
                debug!("Source no longer exists");
                return;
            }
            Err(error) => {
                warn!(%error, "Failed to fetch source");
                return;
            }
        };

        let ready = source.status.as_ref().and_then(|status| {
            status
                .conditions
                .iter()
                .find(|c| c.type_ == ConditionType::READY)
        });
        match ready {
            Some(ready) => info!(
                status = %ready.status,
                reason = %ready.reason,
                message = %ready.message,
                "Source requires reconciliation"
            ),
            None => info!("Source requires reconciliation; readiness not yet reported"),
        }
    }
}

fn coalesce(first: ResourceId, rx: &mut mpsc::Receiver<ResourceId>) -> BTreeSet<ResourceId> {
    let mut batch = BTreeSet::from([first]);
    while let Ok(id) = rx.try_recv() {
        batch.insert(id);
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(ns: &str, name: &str) -> ResourceId {
        ResourceId::new(ns.to_string(), name.to_string())
    }

    #[test]
    fn pending_keys_are_coalesced() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.try_send(id("ns-0", "b")).unwrap();
        tx.try_send(id("ns-0", "a")).unwrap();
        tx.try_send(id("ns-0", "b")).unwrap();

        let batch = coalesce(id("ns-1", "a"), &mut rx);
        assert_eq!(
            batch.into_iter().collect::<Vec<_>>(),
            vec![id("ns-0", "a"), id("ns-0", "b"), id("ns-1", "a")]
        );
        assert!(rx.try_recv().is_err());
    }
}
