//! Structured result of a mutation.

use std::collections::BTreeMap;

/// `{ success, errors, entity }` as handed back to the caller of a mutation.
///
/// Only rejections are folded into the outcome; not-found, concurrency and
/// storage errors stay errors so the caller can tell them apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationOutcome<T> {
    pub success: bool,
    pub errors: Option<BTreeMap<String, String>>,
    pub entity: Option<T>,
}

impl<T> MutationOutcome<T> {
    pub fn applied(entity: T) -> Self {
        Self {
            success: true,
            errors: None,
            entity: Some(entity),
        }
    }

    pub fn rejected(errors: BTreeMap<String, String>) -> Self {
        Self {
            success: false,
            errors: Some(errors),
            entity: None,
        }
    }
}
