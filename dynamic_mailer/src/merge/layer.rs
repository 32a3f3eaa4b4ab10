//! Layer metadata for configuration merges.

use std::borrow::Cow;

use super::ConfigMap;

/// Provenance of a merge layer, in ascending precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[non_exhaustive]
pub enum LayerProvenance {
    /// Static defaults registered for the variant prefix.
    Defaults,
    /// Values contributed by the variant: the result of its options hook, or
    /// the call-site options when the hook passes them through.
    Variant,
}

/// Representation of a configuration layer.
#[derive(Clone, Debug)]
pub struct MergeLayer<'a> {
    provenance: LayerProvenance,
    value: Cow<'a, ConfigMap>,
}

impl<'a> MergeLayer<'a> {
    /// Construct a layer holding static defaults.
    #[must_use]
    pub const fn defaults(value: Cow<'a, ConfigMap>) -> Self {
        Self {
            provenance: LayerProvenance::Defaults,
            value,
        }
    }

    /// Construct a layer holding a variant contribution.
    #[must_use]
    pub const fn variant(value: Cow<'a, ConfigMap>) -> Self {
        Self {
            provenance: LayerProvenance::Variant,
            value,
        }
    }

    /// Returns the provenance of the layer.
    #[must_use]
    pub const fn provenance(&self) -> LayerProvenance {
        self.provenance
    }

    /// Borrow the layer's mapping.
    #[must_use]
    pub fn value(&self) -> &ConfigMap {
        &self.value
    }

    /// Returns an owned mapping representing the layer.
    #[must_use]
    pub fn into_value(self) -> ConfigMap {
        self.value.into_owned()
    }

    /// Convert this layer into a `'static` owned variant.
    #[must_use]
    pub fn into_owned(self) -> MergeLayer<'static> {
        MergeLayer {
            provenance: self.provenance,
            value: Cow::Owned(self.value.into_owned()),
        }
    }
}
