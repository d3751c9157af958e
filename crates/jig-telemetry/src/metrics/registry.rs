// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Registry for managing metrics.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock,
    },
};

/// Identifies a metric as `namespace.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId {
    /// Grouping, e.g. `"assets"`.
    pub namespace: String,
    /// Metric name within the namespace, e.g. `"cache_hits"`.
    pub name: String,
}

impl MetricId {
    /// Creates a new id.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

#[derive(Debug)]
struct Counter {
    description: String,
    value: AtomicU64,
}

/// Central registry for counters.
///
/// Registration is idempotent: asking for an existing id returns a handle
/// to the same counter. Handles update the value without touching the
/// registry lock.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    counters: RwLock<BTreeMap<MetricId, Arc<Counter>>>,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a counter (or finds the existing one) and returns a handle to it.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> CounterHandle {
        let id = MetricId::new(namespace, name);
        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        let counter = counters
            .entry(id.clone())
            .or_insert_with(|| {
                Arc::new(Counter {
                    description: description.into(),
                    value: AtomicU64::new(0),
                })
            })
            .clone();
        CounterHandle { id, counter }
    }

    /// The current value of a counter, if registered.
    pub fn counter_value(&self, id: &MetricId) -> Option<u64> {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters.get(id).map(|c| c.value.load(Ordering::Relaxed))
    }

    /// The description given when a counter was first registered.
    pub fn description(&self, id: &MetricId) -> Option<String> {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters.get(id).map(|c| c.description.clone())
    }

    /// All counters in `namespace`, sorted by name.
    pub fn namespace_snapshot(&self, namespace: &str) -> Vec<(MetricId, u64)> {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters
            .iter()
            .filter(|(id, _)| id.namespace == namespace)
            .map(|(id, c)| (id.clone(), c.value.load(Ordering::Relaxed)))
            .collect()
    }

    /// Get the total number of metrics
    pub fn metric_count(&self) -> usize {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Handle for efficient counter operations
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    counter: Arc<Counter>,
}

impl CounterHandle {
    /// Increment the counter by 1, returning the new value.
    pub fn increment(&self) -> u64 {
        self.increment_by(1)
    }

    /// Increment the counter by a specific amount, returning the new value.
    pub fn increment_by(&self, amount: u64) -> u64 {
        self.counter.value.fetch_add(amount, Ordering::Relaxed) + amount
    }

    /// Get the current counter value
    pub fn get(&self) -> u64 {
        self.counter.value.load(Ordering::Relaxed)
    }

    /// Get the metric ID
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
