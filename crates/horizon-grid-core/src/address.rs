//! Conversions between 2-D cell positions and linear cell indices.
//!
//! Indices are row-major: `index = row * row_width + column`. The helpers in
//! this module are pure and never look at a live grid.

use crate::error::{LayoutError, LayoutResult};
use crate::grid::{HOTBAR_RAW_START, SECONDARY_COLUMNS, SECONDARY_SIZE};

/// Convert a row/column pair to a linear index.
#[inline]
pub fn to_index(row: usize, column: usize, row_width: usize) -> usize {
    row * row_width + column
}

/// Convert a linear index back to a `(row, column)` pair.
///
/// # Panics
///
/// Panics if `row_width` is zero.
#[inline]
pub fn to_position(index: usize, row_width: usize) -> (usize, usize) {
    (index / row_width, index % row_width)
}

/// Inclusive ascending range `[start..=end]`.
///
/// Fails if either bound is negative or `start > end`.
pub fn range(start: i64, end: i64) -> LayoutResult<Vec<usize>> {
    if start < 0 || end < 0 || start > end {
        return Err(LayoutError::InvalidRange { start, end });
    }
    Ok((start as usize..=end as usize).collect())
}

/// Group the indices of a `row_count × column_width` grid by row.
pub fn group_rows(row_count: usize, column_width: usize) -> Vec<Vec<usize>> {
    (0..row_count)
        .map(|row| {
            (0..column_width)
                .map(|column| to_index(row, column, column_width))
                .collect()
        })
        .collect()
}

/// Group the indices of a `row_count × column_width` grid by column.
pub fn group_columns(row_count: usize, column_width: usize) -> Vec<Vec<usize>> {
    (0..column_width)
        .map(|column| {
            (0..row_count)
                .map(|row| to_index(row, column, column_width))
                .collect()
        })
        .collect()
}

/// The border of a grid given its rows.
///
/// Contains the first and last row entirely, plus the first and last index
/// of every interior row, in row-major order.
pub fn border_indices(rows: &[Vec<usize>]) -> Vec<usize> {
    let mut border = Vec::new();
    let last = rows.len().saturating_sub(1);
    for (i, row) in rows.iter().enumerate() {
        if i == 0 || i == last {
            border.extend(row.iter().copied());
        } else if let (Some(&first), Some(&end)) = (row.first(), row.last()) {
            border.push(first);
            if end != first {
                border.push(end);
            }
        }
    }
    border
}

/// Map a raw secondary-region index to the unified index space.
///
/// The raw layout lists the three storage rows first and the hotbar last;
/// the unified layout puts the hotbar at row 0. Returns `None` outside the
/// secondary region.
pub fn secondary_to_unified(raw: usize) -> Option<usize> {
    if raw >= SECONDARY_SIZE {
        return None;
    }
    Some(if raw < HOTBAR_RAW_START {
        raw + SECONDARY_COLUMNS
    } else {
        raw - HOTBAR_RAW_START
    })
}

/// Inverse of [`secondary_to_unified`].
pub fn unified_to_secondary(unified: usize) -> Option<usize> {
    if unified >= SECONDARY_SIZE {
        return None;
    }
    Some(if unified < SECONDARY_COLUMNS {
        unified + HOTBAR_RAW_START
    } else {
        unified - SECONDARY_COLUMNS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_position_inverse() {
        for index in 0..54 {
            let (row, column) = to_position(index, 9);
            assert_eq!(to_index(row, column, 9), index);
        }
        assert_eq!(to_position(10, 9), (1, 1));
    }

    #[test]
    fn test_range() {
        let values = range(3, 7).unwrap();
        assert_eq!(values, vec![3, 4, 5, 6, 7]);
        assert_eq!(range(4, 4).unwrap(), vec![4]);
        assert!(range(5, 4).is_err());
        assert!(range(-1, 4).is_err());
    }

    #[test]
    fn test_group_rows_and_columns() {
        let rows = group_rows(2, 3);
        assert_eq!(rows, vec![vec![0, 1, 2], vec![3, 4, 5]]);
        let columns = group_columns(2, 3);
        assert_eq!(columns, vec![vec![0, 3], vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn test_border_indices() {
        let border = border_indices(&group_rows(3, 9));
        assert_eq!(border.len(), 9 + 2 + 9);
        assert!(border.contains(&9));
        assert!(border.contains(&17));
        assert!(!border.contains(&13));

        assert_eq!(border_indices(&group_rows(1, 3)), vec![0, 1, 2]);
        assert!(border_indices(&[]).is_empty());
    }

    #[test]
    fn test_secondary_normalisation() {
        assert_eq!(secondary_to_unified(0), Some(9));
        assert_eq!(secondary_to_unified(26), Some(35));
        assert_eq!(secondary_to_unified(27), Some(0));
        assert_eq!(secondary_to_unified(35), Some(8));
        assert_eq!(secondary_to_unified(36), None);
    }

    #[test]
    fn test_secondary_normalisation_is_bijective() {
        let mut seen = [false; SECONDARY_SIZE];
        for unified in 0..SECONDARY_SIZE {
            let raw = unified_to_secondary(unified).unwrap();
            assert_eq!(secondary_to_unified(raw), Some(unified));
            seen[raw] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
