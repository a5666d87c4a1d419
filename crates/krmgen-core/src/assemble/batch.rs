//! Continue-on-error batch execution
//!
//! Runs an operation over every item, backfilling a missing namespace first.
//! A failing item is recorded with its index and the batch moves on; the
//! same contract the generated `CreateAll`/`DeleteAll` helpers follow.

use serde_json::Value;

/// Objects that may carry a namespace
pub trait Namespaced {
    fn namespace(&self) -> Option<&str>;
    fn set_namespace(&mut self, namespace: &str);
}

impl Namespaced for Value {
    fn namespace(&self) -> Option<&str> {
        self.get("metadata")?.get("namespace")?.as_str().filter(|ns| !ns.is_empty())
    }

    fn set_namespace(&mut self, namespace: &str) {
        let Some(object) = self.as_object_mut() else {
            return;
        };
        let metadata = object
            .entry("metadata")
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Some(metadata) = metadata.as_object_mut() {
            metadata.insert("namespace".to_string(), Value::String(namespace.to_string()));
        }
    }
}

/// One failed item
#[derive(Debug)]
pub struct BatchFailure<E> {
    pub index: usize,
    pub error: E,
}

/// Outcome of a batch run
#[derive(Debug)]
pub struct BatchReport<E> {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure<E>>,
}

impl<E> BatchReport<E> {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Apply `op` to every item, never stopping at a failure
pub fn run_batch<T, E, F>(items: &mut [T], namespace: Option<&str>, mut op: F) -> BatchReport<E>
where
    T: Namespaced,
    E: std::fmt::Display,
    F: FnMut(usize, &T) -> Result<(), E>,
{
    let mut report = BatchReport {
        attempted: 0,
        succeeded: 0,
        failures: Vec::new(),
    };

    for (index, item) in items.iter_mut().enumerate() {
        if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
            if item.namespace().is_none() {
                item.set_namespace(ns);
            }
        }

        report.attempted += 1;
        match op(index, item) {
            Ok(()) => report.succeeded += 1,
            Err(error) => {
                tracing::error!(index, %error, "batch item failed, continuing");
                report.failures.push(BatchFailure { index, error });
            }
        }
    }

    report
}
