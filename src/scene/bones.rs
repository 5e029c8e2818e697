use glam::Mat4;
use log::debug;
use rustc_hash::FxHashMap;

use crate::MAX_BONES;
use crate::errors::{Result, TendonError};

/// Outcome of registering a bone name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneInsert {
    /// First time this name was seen; it received a new index.
    Added(usize),
    /// The name was already registered; the earlier offset is kept.
    Existing(usize),
}

impl BoneInsert {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            BoneInsert::Added(index) | BoneInsert::Existing(index) => index,
        }
    }
}

/// Bone name to `(offset matrix, index)` mapping for one model.
///
/// Indices are dense and assigned in first-encounter order; a name seen
/// again keeps its first offset.
#[derive(Debug, Clone)]
pub struct BoneTable {
    names: Vec<String>,
    offsets: Vec<Mat4>,
    lookup: FxHashMap<String, usize>,
    max_bones: usize,
}

impl Default for BoneTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BoneTable {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(MAX_BONES)
    }

    /// Creates a table holding at most `max_bones` entries (never more than [`MAX_BONES`]).
    #[must_use]
    pub fn with_limit(max_bones: usize) -> Self {
        Self {
            names: Vec::new(),
            offsets: Vec::new(),
            lookup: FxHashMap::default(),
            max_bones: max_bones.min(MAX_BONES),
        }
    }

    pub fn insert(&mut self, name: &str, offset: Mat4) -> Result<BoneInsert> {
        if let Some(&index) = self.lookup.get(name) {
            debug!("Bone '{name}' is already registered as {index}");
            return Ok(BoneInsert::Existing(index));
        }

        if self.names.len() >= self.max_bones {
            return Err(TendonError::BoneLimitExceeded {
                count: self.names.len() + 1,
                max: self.max_bones,
            });
        }

        let index = self.names.len();
        self.names.push(name.to_string());
        self.offsets.push(offset);
        self.lookup.insert(name.to_string(), index);
        Ok(BoneInsert::Added(index))
    }

    #[inline]
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn offset(&self, index: usize) -> Option<&Mat4> {
        self.offsets.get(index)
    }

    /// Offset matrices indexed by bone index.
    #[inline]
    #[must_use]
    pub fn offsets(&self) -> &[Mat4] {
        &self.offsets
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn max_bones(&self) -> usize {
        self.max_bones
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_offset_wins() {
        let mut table = BoneTable::new();
        let first = Mat4::from_translation(glam::Vec3::X);

        assert_eq!(table.insert("hip", first).unwrap(), BoneInsert::Added(0));
        assert_eq!(table.insert("knee", Mat4::IDENTITY).unwrap(), BoneInsert::Added(1));
        assert_eq!(table.insert("hip", Mat4::ZERO).unwrap(), BoneInsert::Existing(0));

        assert_eq!(table.len(), 2);
        assert_eq!(*table.offset(0).unwrap(), first);
    }

    #[test]
    fn limit_is_enforced() {
        let mut table = BoneTable::with_limit(2);
        table.insert("a", Mat4::IDENTITY).unwrap();
        table.insert("b", Mat4::IDENTITY).unwrap();

        // Re-registering does not count against the limit
        assert!(table.insert("a", Mat4::IDENTITY).is_ok());
        assert!(matches!(
            table.insert("c", Mat4::IDENTITY),
            Err(TendonError::BoneLimitExceeded { count: 3, max: 2 })
        ));
    }

    #[test]
    fn limit_never_exceeds_uniform_array() {
        assert_eq!(BoneTable::with_limit(10_000).max_bones(), MAX_BONES);
    }
}
