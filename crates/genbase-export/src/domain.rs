//! Recognized domain containers: labeled datasets and their parts.
//!
//! These carry internal bookkeeping (provider registries, inverse label
//! indices) that never leaves the process; the serializer exports only their
//! semantic surface.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::array::NumericArray;
use crate::value::Value;

/// Identifier of an [`Instance`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstanceId {
    Int(i64),
    Str(String),
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceId::Int(i) => write!(f, "{i}"),
            InstanceId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for InstanceId {
    fn from(v: i64) -> Self {
        InstanceId::Int(v)
    }
}

impl From<i32> for InstanceId {
    fn from(v: i32) -> Self {
        InstanceId::Int(v.into())
    }
}

impl From<&str> for InstanceId {
    fn from(v: &str) -> Self {
        InstanceId::Str(v.to_owned())
    }
}

impl From<String> for InstanceId {
    fn from(v: String) -> Self {
        InstanceId::Str(v)
    }
}

impl From<&InstanceId> for Value {
    fn from(id: &InstanceId) -> Self {
        match id {
            InstanceId::Int(i) => Value::Int(*i),
            InstanceId::Str(s) => Value::Str(s.clone()),
        }
    }
}

/// A single data point: raw data, an optional feature vector and a
/// human-readable representation.
#[derive(Debug, Clone)]
pub struct Instance {
    identifier: InstanceId,
    data: Value,
    vector: Option<NumericArray>,
    representation: Value,
    extra: IndexMap<String, Value>,
}

impl Instance {
    /// New instance whose representation is its data.
    pub fn new(identifier: impl Into<InstanceId>, data: impl Into<Value>) -> Self {
        let data = data.into();
        Self {
            identifier: identifier.into(),
            representation: data.clone(),
            data,
            vector: None,
            extra: IndexMap::new(),
        }
    }

    pub fn with_vector(mut self, vector: NumericArray) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn with_representation(mut self, representation: impl Into<Value>) -> Self {
        self.representation = representation.into();
        self
    }

    /// Adds a further attribute. Names starting with `_` are kept internal.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn identifier(&self) -> &InstanceId {
        &self.identifier
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn vector(&self) -> Option<&NumericArray> {
        self.vector.as_ref()
    }

    pub fn representation(&self) -> &Value {
        &self.representation
    }

    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.extra
    }
}

/// An ordered collection of instances keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct InstanceProvider {
    instances: IndexMap<InstanceId, Arc<Instance>>,
}

impl InstanceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `instance`, replacing any instance with the same identifier.
    pub fn add(&mut self, instance: Instance) -> Arc<Instance> {
        let instance = Arc::new(instance);
        self.instances
            .insert(instance.identifier().clone(), instance.clone());
        instance
    }

    pub fn get(&self, id: &InstanceId) -> Option<&Arc<Instance>> {
        self.instances.get(id)
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    pub fn discard(&mut self, id: &InstanceId) -> Option<Arc<Instance>> {
        self.instances.shift_remove(id)
    }

    pub fn key_list(&self) -> Vec<InstanceId> {
        self.instances.keys().cloned().collect()
    }

    /// All instances in insertion order.
    pub fn all_data(&self) -> impl Iterator<Item = &Arc<Instance>> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl FromIterator<Instance> for InstanceProvider {
    fn from_iter<I: IntoIterator<Item = Instance>>(iter: I) -> Self {
        let mut provider = InstanceProvider::new();
        for instance in iter {
            provider.add(instance);
        }
        provider
    }
}

/// Label assignments for instances, over a known label set.
#[derive(Debug, Clone, Default)]
pub struct LabelProvider {
    labelset: BTreeSet<String>,
    labeldict: IndexMap<InstanceId, BTreeSet<String>>,
    label_index: HashMap<String, BTreeSet<InstanceId>>,
}

impl LabelProvider {
    pub fn new<I, S>(labelset: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labelset: labelset.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn labelset(&self) -> &BTreeSet<String> {
        &self.labelset
    }

    pub fn labeldict(&self) -> &IndexMap<InstanceId, BTreeSet<String>> {
        &self.labeldict
    }

    /// Replaces the labels of `id`. Unknown labels join the label set.
    pub fn set_labels<I, S>(&mut self, id: impl Into<InstanceId>, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        if let Some(previous) = self.labeldict.get(&id).cloned() {
            self.unindex(&id, &previous);
        }
        let labels: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        self.index(&id, &labels);
        self.labeldict.insert(id, labels);
    }

    pub fn add_labels<I, S>(&mut self, id: impl Into<InstanceId>, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        let labels: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        self.index(&id, &labels);
        self.labeldict.entry(id).or_default().extend(labels);
    }

    pub fn remove_labels<I, S>(&mut self, id: impl Into<InstanceId>, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        let labels: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        if let Some(current) = self.labeldict.get_mut(&id) {
            current.retain(|label| !labels.contains(label));
        }
        self.unindex(&id, &labels);
    }

    pub fn get_labels(&self, id: &InstanceId) -> BTreeSet<String> {
        self.labeldict.get(id).cloned().unwrap_or_default()
    }

    pub fn get_instances_by_label(&self, label: &str) -> BTreeSet<InstanceId> {
        self.label_index.get(label).cloned().unwrap_or_default()
    }

    fn index(&mut self, id: &InstanceId, labels: &BTreeSet<String>) {
        for label in labels {
            self.labelset.insert(label.clone());
            self.label_index
                .entry(label.clone())
                .or_default()
                .insert(id.clone());
        }
    }

    fn unindex(&mut self, id: &InstanceId, labels: &BTreeSet<String>) {
        for label in labels {
            if let Some(ids) = self.label_index.get_mut(label) {
                ids.remove(id);
            }
        }
    }
}

/// A labeled dataset: the instances, their labels, and named sub-providers
/// (train/test splits and the like).
#[derive(Debug, Clone)]
pub struct Environment {
    dataset: Arc<InstanceProvider>,
    labels: Arc<LabelProvider>,
    named_providers: IndexMap<String, Arc<InstanceProvider>>,
}

impl Environment {
    pub fn new(dataset: InstanceProvider, labels: LabelProvider) -> Self {
        Self {
            dataset: Arc::new(dataset),
            labels: Arc::new(labels),
            named_providers: IndexMap::new(),
        }
    }

    pub fn dataset(&self) -> &Arc<InstanceProvider> {
        &self.dataset
    }

    pub fn labels(&self) -> &Arc<LabelProvider> {
        &self.labels
    }

    pub fn set_named_provider(&mut self, name: impl Into<String>, provider: InstanceProvider) {
        self.named_providers.insert(name.into(), Arc::new(provider));
    }

    pub fn named_provider(&self, name: &str) -> Option<&Arc<InstanceProvider>> {
        self.named_providers.get(name)
    }

    /// Sub-provider holding the given dataset instances. Unknown
    /// identifiers are skipped.
    pub fn create_bucket(&self, ids: &[InstanceId]) -> InstanceProvider {
        ids.iter()
            .filter_map(|id| self.dataset.get(id))
            .map(|instance| instance.as_ref().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_index_tracks_assignments() {
        let mut labels = LabelProvider::new(["pos", "neg"]);
        labels.set_labels(1, ["pos"]);
        labels.set_labels(2, ["pos", "extra"]);
        assert!(labels.labelset().contains("extra"));
        assert_eq!(
            labels.get_instances_by_label("pos"),
            BTreeSet::from([InstanceId::Int(1), InstanceId::Int(2)])
        );

        labels.set_labels(2, ["neg"]);
        assert_eq!(
            labels.get_instances_by_label("pos"),
            BTreeSet::from([InstanceId::Int(1)])
        );
        assert_eq!(
            labels.get_instances_by_label("neg"),
            BTreeSet::from([InstanceId::Int(2)])
        );

        labels.remove_labels(1, ["pos"]);
        assert!(labels.get_labels(&InstanceId::Int(1)).is_empty());
        assert!(labels.get_instances_by_label("pos").is_empty());

        labels.add_labels(1, ["neg"]);
        assert_eq!(labels.get_labels(&InstanceId::Int(1)), BTreeSet::from(["neg".to_owned()]));
    }

    #[test]
    fn provider_keeps_insertion_order() {
        let provider: InstanceProvider = [
            Instance::new("b", "second"),
            Instance::new("a", "first"),
        ]
        .into_iter()
        .collect();
        assert_eq!(provider.key_list(), vec![InstanceId::from("b"), InstanceId::from("a")]);
        assert_eq!(provider.get(&"a".into()).unwrap().data(), &Value::from("first"));
    }

    #[test]
    fn bucket_holds_selected_instances() {
        let dataset: InstanceProvider = (0..4).map(|i| Instance::new(i, format!("doc {i}"))).collect();
        let env = Environment::new(dataset, LabelProvider::new(["x"]));
        let bucket = env.create_bucket(&[InstanceId::Int(2), InstanceId::Int(9), InstanceId::Int(0)]);
        assert_eq!(bucket.key_list(), vec![InstanceId::Int(2), InstanceId::Int(0)]);
    }
}
