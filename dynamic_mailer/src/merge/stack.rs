//! Ordered accumulation of merge layers.

use std::borrow::Cow;

use super::{ConfigMap, LayerProvenance, MergeLayer, deep_merge};

/// Builder that accumulates [`MergeLayer`] instances in precedence order.
///
/// Layers pushed later win. [`LayerStack::merge`] folds the layers with
/// [`deep_merge`], so the stack never mutates the mappings it was given.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: Vec<MergeLayer<'static>>,
}

impl LayerStack {
    /// Create an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Push a defaults layer.
    pub fn push_defaults(&mut self, value: ConfigMap) {
        self.push_layer(MergeLayer::defaults(Cow::Owned(value)));
    }

    /// Push a variant contribution layer.
    pub fn push_variant(&mut self, value: ConfigMap) {
        self.push_layer(MergeLayer::variant(Cow::Owned(value)));
    }

    /// Push an arbitrary layer.
    pub fn push_layer(&mut self, layer: MergeLayer<'_>) {
        self.layers.push(layer.into_owned());
    }

    /// Borrow the accumulated layers, lowest precedence first.
    #[must_use]
    pub fn layers(&self) -> &[MergeLayer<'static>] {
        &self.layers
    }

    /// Provenances of the layers that define `key` at the top level.
    #[must_use]
    pub fn sources_of(&self, key: &str) -> Vec<LayerProvenance> {
        self.layers
            .iter()
            .filter(|layer| layer.value().contains_key(key))
            .map(MergeLayer::provenance)
            .collect()
    }

    /// Fold every layer into a single mapping.
    #[must_use]
    pub fn merge(&self) -> ConfigMap {
        self.layers
            .iter()
            .fold(ConfigMap::new(), |acc, layer| deep_merge(&acc, layer.value()))
    }
}

impl IntoIterator for LayerStack {
    type Item = MergeLayer<'static>;
    type IntoIter = std::vec::IntoIter<MergeLayer<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}
