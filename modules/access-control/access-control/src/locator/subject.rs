//! Subject locator compositions.

use std::sync::{Arc, OnceLock};

use access_control_sdk::{SubjectLocator, Value};
use tracing::debug;

/// Every non-null subject of every member, in registration order.
#[derive(Clone, Default)]
pub struct ChainSubjectLocator {
    locators: Vec<Arc<dyn SubjectLocator>>,
}

impl ChainSubjectLocator {
    #[must_use]
    pub fn new(locators: Vec<Arc<dyn SubjectLocator>>) -> Self {
        Self { locators }
    }
}

impl SubjectLocator for ChainSubjectLocator {
    fn find_subjects(&self) -> Vec<Value> {
        self.locators
            .iter()
            .flat_map(|locator| locator.find_subjects())
            .filter(|subject| !subject.is_null())
            .collect()
    }
}

/// Locates nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSubjectLocator;

impl SubjectLocator for NullSubjectLocator {
    fn find_subjects(&self) -> Vec<Value> {
        Vec::new()
    }
}

/// Always the same subjects, e.g. a service identity.
#[derive(Debug, Clone, Default)]
pub struct StaticSubjectLocator {
    subjects: Vec<Value>,
}

impl StaticSubjectLocator {
    #[must_use]
    pub fn new(subjects: Vec<Value>) -> Self {
        Self { subjects }
    }
}

impl SubjectLocator for StaticSubjectLocator {
    fn find_subjects(&self) -> Vec<Value> {
        self.subjects.clone()
    }
}

/// Locates subjects once through the decorated locator and keeps them for
/// its own lifetime.
///
/// Scope an instance to one logical request; for a cache that travels with
/// the evaluation context instead, see
/// [`SubjectCache`](access_control_sdk::SubjectCache).
pub struct MemoryCacheSubjectLocator {
    decorated: Arc<dyn SubjectLocator>,
    current: OnceLock<Vec<Value>>,
}

impl MemoryCacheSubjectLocator {
    #[must_use]
    pub fn new(decorated: Arc<dyn SubjectLocator>) -> Self {
        Self {
            decorated,
            current: OnceLock::new(),
        }
    }
}

impl SubjectLocator for MemoryCacheSubjectLocator {
    fn find_subjects(&self) -> Vec<Value> {
        self.current
            .get_or_init(|| {
                let subjects = self.decorated.find_subjects();
                debug!(count = subjects.len(), "Subjects located");
                subjects
            })
            .clone()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl SubjectLocator for Counting {
        fn find_subjects(&self) -> Vec<Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            vec![Value::from(format!("call-{n}"))]
        }
    }

    #[test]
    fn chain_keeps_order_and_drops_nulls() {
        let chain = ChainSubjectLocator::new(vec![
            Arc::new(StaticSubjectLocator::new(vec!["a".into(), Value::Null])),
            Arc::new(NullSubjectLocator),
            Arc::new(StaticSubjectLocator::new(vec!["b".into(), "c".into()])),
        ]);
        assert_eq!(
            chain.find_subjects(),
            vec![Value::from("a"), Value::from("b"), Value::from("c")]
        );
    }

    #[test]
    fn memory_cache_locates_once() {
        let counting = Arc::new(Counting::default());
        let cached = MemoryCacheSubjectLocator::new(counting.clone());

        assert_eq!(cached.find_subjects(), vec![Value::from("call-0")]);
        assert_eq!(cached.find_subjects(), vec![Value::from("call-0")]);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }
}
