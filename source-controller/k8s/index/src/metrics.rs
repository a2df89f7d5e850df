use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family, gauge::Gauge},
    registry::Registry,
};

#[derive(Clone, Debug)]
pub struct IndexMetrics {
    applies: Family<SubordinateLabels, Counter>,
    deletes: Family<SubordinateLabels, Counter>,
    enqueued: Family<OwnerLabels, Counter>,
    dropped: Family<OwnerLabels, Counter>,
    tracked: Gauge,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct SubordinateLabels {
    kind: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct OwnerLabels {
    owner_kind: String,
}

impl IndexMetrics {
    pub fn register(prom: &mut Registry) -> Self {
        let applies = Family::default();
        prom.register(
            "index_applies",
            "Count of subordinate resource updates observed by the index",
            applies.clone(),
        );

        let deletes = Family::default();
        prom.register(
            "index_deletes",
            "Count of subordinate resource deletions observed by the index",
            deletes.clone(),
        );

        let enqueued = Family::default();
        prom.register(
            "owners_enqueued",
            "Count of owner keys handed to the work queue",
            enqueued.clone(),
        );

        let dropped = Family::default();
        prom.register(
            "owners_dropped",
            "Count of owner keys the work queue refused",
            dropped.clone(),
        );

        let tracked = Gauge::default();
        prom.register(
            "index_size",
            "Gauge of the number of owned subordinate resources in the index",
            tracked.clone(),
        );

        Self {
            applies,
            deletes,
            enqueued,
            dropped,
            tracked,
        }
    }

    pub(crate) fn applied(&self, kind: &str) {
        self.applies
            .get_or_create(&SubordinateLabels {
                kind: kind.to_string(),
            })
            .inc();
    }

    pub(crate) fn deleted(&self, kind: &str) {
        self.deletes
            .get_or_create(&SubordinateLabels {
                kind: kind.to_string(),
            })
            .inc();
    }

    pub(crate) fn enqueued(&self, owner_kind: &str) {
        self.enqueued
            .get_or_create(&OwnerLabels {
                owner_kind: owner_kind.to_string(),
            })
            .inc();
    }

    pub(crate) fn dropped(&self, owner_kind: &str) {
        self.dropped
            .get_or_create(&OwnerLabels {
                owner_kind: owner_kind.to_string(),
            })
            .inc();
    }

    pub(crate) fn set_size(&self, size: usize) {
        self.tracked.set(size as i64);
    }

    #[cfg(test)]
    pub(crate) fn enqueued_count(&self, owner_kind: &str) -> u64 {
        self.enqueued
            .get_or_create(&OwnerLabels {
                owner_kind: owner_kind.to_string(),
            })
            .get()
    }

    #[cfg(test)]
    pub(crate) fn dropped_count(&self, owner_kind: &str) -> u64 {
        self.dropped
            .get_or_create(&OwnerLabels {
                owner_kind: owner_kind.to_string(),
            })
            .get()
    }

    #[cfg(test)]
    pub(crate) fn size(&self) -> i64 {
        self.tracked.get()
    }
}
