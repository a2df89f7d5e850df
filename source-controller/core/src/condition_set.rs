use crate::{ConditionManager, ConditionType, ConditionsAccessor, Severity};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Declares the conditions a kind of resource depends on to be happy.
///
/// The aggregate condition (`Ready` or `Succeeded`) is never set directly; it
/// is derived from the dependents, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionSet {
    happy: ConditionType,
    dependents: Vec<ConditionType>,
}

/// A handle to the condition set currently in effect for a kind of resource.
///
/// Handles are cheap to clone and are passed explicitly to whatever builds
/// condition managers. `load` holds the read lock only long enough to clone the
/// current set, so managers always work from a consistent snapshot and a
/// `replace` never interleaves with a mark operation in progress.
#[derive(Clone, Debug)]
pub struct SharedConditionSet(Arc<RwLock<Arc<ConditionSet>>>);

// === impl ConditionSet ===

impl ConditionSet {
    /// Creates a set for a long-running resource, whose aggregate is `Ready`.
    pub fn living(dependents: impl IntoIterator<Item = ConditionType>) -> Self {
        Self::new(ConditionType::READY, dependents)
    }

    /// Creates a set for a run-to-completion resource, whose aggregate is
    /// `Succeeded`.
    pub fn batch(dependents: impl IntoIterator<Item = ConditionType>) -> Self {
        Self::new(ConditionType::SUCCEEDED, dependents)
    }

    /// Duplicate dependents and the aggregate type itself are dropped from the
    /// dependent list; the first occurrence keeps its position.
    pub fn new(happy: ConditionType, dependents: impl IntoIterator<Item = ConditionType>) -> Self {
        let mut deps = Vec::<ConditionType>::new();
        for dependent in dependents {
            if dependent != happy && !deps.contains(&dependent) {
                deps.push(dependent);
            }
        }
        Self {
            happy,
            dependents: deps,
        }
    }

    pub fn happy(&self) -> &ConditionType {
        &self.happy
    }

    pub fn dependents(&self) -> &[ConditionType] {
        &self.dependents
    }

    /// The aggregate condition followed by the dependents.
    pub fn declared(&self) -> impl Iterator<Item = &ConditionType> {
        std::iter::once(&self.happy).chain(self.dependents.iter())
    }

    pub fn is_declared(&self, type_: &ConditionType) -> bool {
        self.declared().any(|t| t == type_)
    }

    /// Declared conditions gate readiness; anything else is informational.
    pub fn severity(&self, type_: &ConditionType) -> Severity {
        if self.is_declared(type_) {
            Severity::Error
        } else {
            Severity::Info
        }
    }

    /// Manages `status`, stamping transitions with the current time.
    pub fn manage<'a, S: ConditionsAccessor>(&'a self, status: &'a mut S) -> ConditionManager<'a, S> {
        self.manage_at(status, Utc::now())
    }

    /// Manages `status`, stamping transitions with `now`.
    pub fn manage_at<'a, S: ConditionsAccessor>(
        &'a self,
        status: &'a mut S,
        now: DateTime<Utc>,
    ) -> ConditionManager<'a, S> {
        ConditionManager::new(self, status, now)
    }
}

// === impl SharedConditionSet ===

impl SharedConditionSet {
    pub fn new(set: ConditionSet) -> Self {
        Self(Arc::new(RwLock::new(Arc::new(set))))
    }

    /// Returns the condition set currently in effect.
    pub fn load(&self) -> Arc<ConditionSet> {
        self.0.read().clone()
    }

    /// Swaps in a new condition set, returning the one it replaced.
    ///
    /// Managers created before the swap keep using the set they loaded.
    pub fn replace(&self, set: ConditionSet) -> Arc<ConditionSet> {
        let set = Arc::new(set);
        tracing::info!(happy = %set.happy, dependents = ?set.dependents, "Replacing condition set");
        std::mem::replace(&mut *self.0.write(), set)
    }
}

impl From<ConditionSet> for SharedConditionSet {
    fn from(set: ConditionSet) -> Self {
        Self::new(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const A: ConditionType = ConditionType::from_static("A");
    const B: ConditionType = ConditionType::from_static("B");

    #[test]
    fn drops_duplicate_and_aggregate_dependents() {
        let set = ConditionSet::living([A, ConditionType::READY, B, A]);
        assert_eq!(set.happy(), &ConditionType::READY);
        assert_eq!(set.dependents(), &[A, B]);
        assert_eq!(
            set.declared().cloned().collect::<Vec<_>>(),
            vec![ConditionType::READY, A, B]
        );
    }

    #[test]
    fn undeclared_conditions_are_informational() {
        let set = ConditionSet::batch([A]);
        assert_eq!(set.happy(), &ConditionType::SUCCEEDED);
        assert_eq!(set.severity(&A), Severity::Error);
        assert_eq!(set.severity(&ConditionType::SUCCEEDED), Severity::Error);
        assert_eq!(set.severity(&B), Severity::Info);
    }

    #[test]
    fn replace_is_observed_by_later_loads() {
        let shared = SharedConditionSet::new(ConditionSet::living([A]));
        let before = shared.load();

        let previous = shared.replace(ConditionSet::living([A, B]));
        assert_eq!(previous, before);
        assert_eq!(before.dependents(), &[A]);
        assert_eq!(shared.load().dependents(), &[A, B]);

        // Clones observe the same set.
        let clone = shared.clone();
        clone.replace(ConditionSet::living([B]));
        assert_eq!(shared.load().dependents(), &[B]);
    }
}
