use crate::{Condition, ConditionSet, ConditionStatus, ConditionType};
use chrono::{DateTime, Utc};
use std::fmt;

/// Exposes the condition list of a resource status.
pub trait ConditionsAccessor {
    fn conditions(&self) -> &[Condition];

    fn conditions_mut(&mut self) -> &mut Vec<Condition>;
}

/// Mutates the conditions of a single status according to a [`ConditionSet`].
///
/// Every mark operation recomputes the aggregate condition before returning.
pub struct ConditionManager<'a, S> {
    set: &'a ConditionSet,
    status: &'a mut S,
    now: DateTime<Utc>,
}

// === impl ConditionManager ===

impl<'a, S: ConditionsAccessor> ConditionManager<'a, S> {
    pub(crate) fn new(set: &'a ConditionSet, status: &'a mut S, now: DateTime<Utc>) -> Self {
        Self { set, status, now }
    }

    pub fn get_condition(&self, type_: &ConditionType) -> Option<Condition> {
        self.status
            .conditions()
            .iter()
            .find(|c| c.type_ == *type_)
            .cloned()
    }

    pub fn get_top_level_condition(&self) -> Option<Condition> {
        self.get_condition(self.set.happy())
    }

    pub fn is_happy(&self) -> bool {
        self.get_top_level_condition()
            .map(|c| c.is_true())
            .unwrap_or(false)
    }

    /// Sets every declared condition that is not yet present to `Unknown`.
    ///
    /// Conditions that are already present are left as they are.
    pub fn initialize_conditions(&mut self) {
        let missing = self
            .set
            .declared()
            .filter(|t| !self.status.conditions().iter().any(|c| c.type_ == **t))
            .cloned()
            .collect::<Vec<_>>();
        for type_ in missing {
            self.set_condition(type_, ConditionStatus::Unknown, String::new(), String::new());
        }
        self.recompute();
    }

    pub fn mark_true(&mut self, type_: &ConditionType) {
        self.mark(type_, ConditionStatus::True, String::new(), String::new());
    }

    /// Marks a condition `True` while keeping diagnostic context about how it
    /// got there.
    pub fn mark_true_with_reason(
        &mut self,
        type_: &ConditionType,
        reason: &str,
        message: impl fmt::Display,
    ) {
        self.mark(
            type_,
            ConditionStatus::True,
            reason.to_string(),
            message.to_string(),
        );
    }

    pub fn mark_false(&mut self, type_: &ConditionType, reason: &str, message: impl fmt::Display) {
        self.mark(
            type_,
            ConditionStatus::False,
            reason.to_string(),
            message.to_string(),
        );
    }

    pub fn mark_unknown(&mut self, type_: &ConditionType, reason: &str, message: impl fmt::Display) {
        self.mark(
            type_,
            ConditionStatus::Unknown,
            reason.to_string(),
            message.to_string(),
        );
    }

    fn mark(
        &mut self,
        type_: &ConditionType,
        status: ConditionStatus,
        reason: String,
        message: String,
    ) {
        self.set_condition(type_.clone(), status, reason, message);
        self.recompute();
    }

    // Upserts a condition, keeping the list sorted by type. The transition
    // time only moves when the status value changes.
    fn set_condition(
        &mut self,
        type_: ConditionType,
        status: ConditionStatus,
        reason: String,
        message: String,
    ) {
        let severity = self.set.severity(&type_);
        let conditions = self.status.conditions_mut();
        // Statuses read back from the API server are not guaranteed to be
        // sorted, so existing entries are found by scanning.
        match conditions.iter().position(|c| c.type_ == type_) {
            Some(idx) => {
                let existing = &mut conditions[idx];
                if existing.status != status || existing.last_transition_time.is_none() {
                    existing.last_transition_time = Some(self.now);
                }
                existing.status = status;
                existing.severity = severity;
                existing.reason = reason;
                existing.message = message;
            }
            None => {
                let idx = conditions.partition_point(|c| c.type_ < type_);
                conditions.insert(
                    idx,
                    Condition {
                        type_,
                        status,
                        severity,
                        last_transition_time: Some(self.now),
                        reason,
                        message,
                    },
                );
            }
        }
    }

    // Derives the aggregate from the dependents, in declaration order: any
    // missing or Unknown dependent makes the aggregate Unknown, otherwise any
    // False dependent makes it False, otherwise it is True.
    fn recompute(&mut self) {
        let (status, reason, message) = {
            let conditions = self.status.conditions();
            let lookup = |t: &ConditionType| conditions.iter().find(|c| c.type_ == *t);

            let unknown = self.set.dependents().iter().find_map(|t| match lookup(t) {
                None => Some((String::new(), String::new())),
                Some(c) if c.is_unknown() => Some((c.reason.clone(), c.message.clone())),
                Some(_) => None,
            });
            let failed = || {
                self.set
                    .dependents()
                    .iter()
                    .filter_map(|t| lookup(t))
                    .find(|c| c.is_false())
                    .map(|c| (c.reason.clone(), c.message.clone()))
            };

            if let Some((reason, message)) = unknown {
                (ConditionStatus::Unknown, reason, message)
            } else if let Some((reason, message)) = failed() {
                (ConditionStatus::False, reason, message)
            } else {
                (ConditionStatus::True, String::new(), String::new())
            }
        };

        tracing::debug!(condition = %self.set.happy(), %status, %reason, "Recomputed aggregate");
        self.set_condition(self.set.happy().clone(), status, reason, message);
    }
}

impl<S> fmt::Debug for ConditionManager<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionManager")
            .field("set", &self.set)
            .field("now", &self.now)
            .finish()
    }
}
