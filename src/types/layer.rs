use std::fmt;

/// Grade-separation level (z-level) of a street or sidewalk.
///
/// `Unknown` never agrees with anything, itself included: any consensus that
/// involves an unknown layer is itself unknown. For that reason `Layer` does
/// not implement `PartialEq`; use [`Layer::matches`] or [`Layer::value`].
#[derive(Debug, Clone, Copy, Default)]
pub enum Layer {
    #[default]
    Unknown,
    Value(i32),
}

impl Layer {
    /// Get the known z-level, if any.
    #[inline]
    pub fn value(self) -> Option<i32> {
        match self {
            Layer::Value(z) => Some(z),
            Layer::Unknown => None,
        }
    }

    #[inline] pub fn is_unknown(self) -> bool { matches!(self, Layer::Unknown) }

    /// Returns `true` only if both layers are known and equal.
    #[inline]
    pub fn matches(self, other: Layer) -> bool {
        matches!((self, other), (Layer::Value(a), Layer::Value(b)) if a == b)
    }

    /// The layer shared by both sides, or `Unknown` if they disagree.
    #[inline]
    pub fn consensus(self, other: Layer) -> Layer {
        if self.matches(other) { self } else { Layer::Unknown }
    }

    /// The layer shared by 100% of `layers`. An empty input is `Unknown`.
    pub fn consensus_of(layers: impl IntoIterator<Item = Layer>) -> Layer {
        let mut layers = layers.into_iter();
        let Some(first) = layers.next() else { return Layer::Unknown };
        layers.fold(first, Layer::consensus)
    }
}

impl From<i32> for Layer {
    fn from(z: i32) -> Self { Layer::Value(z) }
}

impl From<Option<i32>> for Layer {
    fn from(z: Option<i32>) -> Self { z.map_or(Layer::Unknown, Layer::Value) }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Value(z) => write!(f, "{z}"),
            Layer::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_never_matches() {
        assert!(!Layer::Unknown.matches(Layer::Unknown));
        assert!(!Layer::Unknown.matches(Layer::Value(0)));
        assert!(!Layer::Value(0).matches(Layer::Unknown));
        assert!(Layer::Value(1).matches(Layer::Value(1)));
        assert!(!Layer::Value(1).matches(Layer::Value(0)));
    }

    #[test]
    fn consensus_requires_full_agreement() {
        assert_eq!(Layer::consensus_of([Layer::Value(0), Layer::Value(0)]).value(), Some(0));
        assert_eq!(Layer::consensus_of([Layer::Value(1)]).value(), Some(1));

        // Any disagreement or unknown input makes the result unknown
        assert!(Layer::consensus_of([Layer::Value(0), Layer::Value(1)]).is_unknown());
        assert!(Layer::consensus_of([Layer::Value(0), Layer::Unknown]).is_unknown());
        assert!(Layer::consensus_of([Layer::Unknown, Layer::Unknown]).is_unknown());
        assert!(Layer::consensus_of(std::iter::empty()).is_unknown());
    }

    #[test]
    fn display() {
        assert_eq!(Layer::Value(-1).to_string(), "-1");
        assert_eq!(Layer::Unknown.to_string(), "unknown");
    }
}
