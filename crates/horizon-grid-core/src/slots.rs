//! Slot sets: ordered groups of cell indices built from an include list or
//! a half-open range, minus a blacklist.

use crate::error::{LayoutError, LayoutResult};

/// Builder for a [`SlotSet`].
///
/// # Example
///
/// ```
/// use horizon_grid_core::SlotSet;
///
/// let slots = SlotSet::builder().range(0, 9).exclude([4]).build().unwrap();
/// assert_eq!(slots.len(), 8);
/// assert!(!slots.contains(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlotsBuilder {
    include: Option<Vec<usize>>,
    start: Option<usize>,
    end: Option<usize>,
    exclude: Vec<usize>,
}

impl SlotsBuilder {
    /// Use an explicit list of indices. Takes precedence over a range.
    pub fn include(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.include
            .get_or_insert_with(Vec::new)
            .extend(indices);
        self
    }

    /// Set the inclusive start of the range.
    pub fn start(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the exclusive end of the range.
    pub fn end(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }

    /// Set a half-open `[start, end)` range.
    pub fn range(self, start: usize, end: usize) -> Self {
        self.start(start).end(end)
    }

    /// Remove indices from the result.
    pub fn exclude(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.exclude.extend(indices);
        self
    }

    /// Resolve the slot set.
    pub fn build(self) -> LayoutResult<SlotSet> {
        let source: Vec<usize> = match (self.include, self.start, self.end) {
            (Some(include), _, _) => include,
            (None, Some(start), Some(end)) => {
                if start >= end {
                    return Err(LayoutError::InvalidRange {
                        start: start as i64,
                        end: end as i64,
                    });
                }
                (start..end).collect()
            }
            _ => return Err(LayoutError::MissingSlotSource),
        };

        let indices = source
            .into_iter()
            .filter(|index| !self.exclude.contains(index))
            .collect();
        Ok(SlotSet { indices })
    }
}

/// An ordered, immutable set of cell indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotSet {
    indices: Vec<usize>,
}

impl SlotSet {
    pub fn builder() -> SlotsBuilder {
        SlotsBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.indices.iter()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.indices
    }
}

impl IntoIterator for SlotSet {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}

impl<'a> IntoIterator for &'a SlotSet {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}
