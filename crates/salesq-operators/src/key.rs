//! Hashable row keys for joins and grouping.

use std::hash::{Hash, Hasher};

use salesq_core::types::Scalar;

/// A tuple of scalars usable as a HashMap key.
///
/// Constructors reject NULLs: a key containing NULL never equals anything
/// (inner-join and group semantics are decided by the caller), so callers
/// use `try_new` and handle `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowKey(Vec<Scalar>);

impl RowKey {
    /// Build a key from scalars; returns `None` if any component is NULL.
    pub fn try_new(values: Vec<Scalar>) -> Option<Self> {
        if values.iter().any(|v| v.is_null()) {
            return None;
        }
        Some(Self(values))
    }

    pub fn values(&self) -> &[Scalar] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Scalar> {
        self.0
    }
}

impl Eq for RowKey {}

impl Hash for RowKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in &self.0 {
            match v {
                // unreachable per try_new, but keep the hash total
                Scalar::Null => 0u8.hash(state),
                Scalar::I64(i) => {
                    1u8.hash(state);
                    i.hash(state);
                }
                Scalar::F64(f) => {
                    2u8.hash(state);
                    f.to_bits().hash(state);
                }
                Scalar::Str(s) => {
                    3u8.hash(state);
                    s.hash(state);
                }
            }
        }
    }
}
