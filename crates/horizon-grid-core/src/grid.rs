//! Grid types, regions and cell references.
//!
//! A grid is a fixed rectangle of cells owned by the framework (the
//! *primary* region). Every viewer also owns a fixed 4×9 *secondary* region
//! that is shown below the primary grid and can receive clicks.

use std::fmt;

use crate::error::{LayoutError, LayoutResult};

/// Number of rows in the secondary region.
pub const SECONDARY_ROWS: usize = 4;
/// Number of columns in the secondary region.
pub const SECONDARY_COLUMNS: usize = 9;
/// Total number of cells in the secondary region.
pub const SECONDARY_SIZE: usize = SECONDARY_ROWS * SECONDARY_COLUMNS;
/// First raw index of the hotbar row inside the secondary region.
pub const HOTBAR_RAW_START: usize = 27;

/// The shape family of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// 1 to 6 rows of 9 cells.
    Chest,
    /// 3×3 cells.
    Dispenser,
    /// 1×5 cells.
    Hopper,
    /// 1×3 cells with a text input line.
    Anvil,
    /// Any other rectangle.
    Custom,
}

impl GridKind {
    /// Lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Dispenser => "dispenser",
            Self::Hopper => "hopper",
            Self::Anvil => "anvil",
            Self::Custom => "custom",
        }
    }
}

/// A fixed-size grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridType {
    kind: GridKind,
    rows: usize,
    columns: usize,
}

impl GridType {
    /// A 3×3 dispenser grid.
    pub const DISPENSER: Self = Self {
        kind: GridKind::Dispenser,
        rows: 3,
        columns: 3,
    };

    /// A 1×5 hopper grid.
    pub const HOPPER: Self = Self {
        kind: GridKind::Hopper,
        rows: 1,
        columns: 5,
    };

    /// A 1×3 anvil grid. This is the only kind that captures text input.
    pub const ANVIL: Self = Self {
        kind: GridKind::Anvil,
        rows: 1,
        columns: 3,
    };

    /// A chest grid with `rows` rows of nine cells.
    pub fn chest(rows: usize) -> LayoutResult<Self> {
        if !(1..=6).contains(&rows) {
            return Err(LayoutError::InvalidGridSize { rows, columns: 9 });
        }
        Ok(Self {
            kind: GridKind::Chest,
            rows,
            columns: 9,
        })
    }

    /// A custom rectangle. Both dimensions must be non-zero.
    pub fn custom(rows: usize, columns: usize) -> LayoutResult<Self> {
        if rows == 0 || columns == 0 {
            return Err(LayoutError::InvalidGridSize { rows, columns });
        }
        Ok(Self {
            kind: GridKind::Custom,
            rows,
            columns,
        })
    }

    /// Resolve a grid from its configuration name.
    ///
    /// `rows` and `columns` are only consulted for `chest` and `custom`.
    pub fn from_name(name: &str, rows: Option<usize>, columns: Option<usize>) -> LayoutResult<Self> {
        match name {
            "chest" => Self::chest(rows.unwrap_or(3)),
            "dispenser" => Ok(Self::DISPENSER),
            "hopper" => Ok(Self::HOPPER),
            "anvil" => Ok(Self::ANVIL),
            "custom" => Self::custom(rows.unwrap_or(0), columns.unwrap_or(0)),
            other => Err(LayoutError::UnknownGridKind(other.to_string())),
        }
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells in the primary region.
    pub fn size(&self) -> usize {
        self.rows * self.columns
    }

    /// Whether this grid intercepts text input events.
    pub fn captures_text(&self) -> bool {
        self.kind == GridKind::Anvil
    }

    /// Check whether a raw view index falls inside the primary region.
    pub fn is_primary(&self, raw: usize) -> bool {
        raw < self.size()
    }

    /// Check whether a raw view index falls inside the secondary region.
    pub fn is_secondary(&self, raw: usize) -> bool {
        raw >= self.size() && raw < self.size() + SECONDARY_SIZE
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}x{})", self.kind.name(), self.rows, self.columns)
    }
}

/// Which of the two cell regions a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// The framework-defined grid.
    Primary,
    /// The viewer's own fixed 4×9 grid, in unified index space.
    Secondary,
}

/// A reference to one cell in either region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub region: Region,
    pub index: usize,
}

impl Cell {
    /// A cell in the primary grid.
    pub const fn primary(index: usize) -> Self {
        Self {
            region: Region::Primary,
            index,
        }
    }

    /// A cell in the secondary region, addressed by unified index.
    pub const fn secondary(index: usize) -> Self {
        Self {
            region: Region::Secondary,
            index,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.region == Region::Primary
    }

    pub fn is_secondary(&self) -> bool {
        self.region == Region::Secondary
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            Region::Primary => write!(f, "primary#{}", self.index),
            Region::Secondary => write!(f, "secondary#{}", self.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chest_rows_validated() {
        assert_eq!(GridType::chest(6).unwrap().size(), 54);
        assert!(GridType::chest(0).is_err());
        assert!(GridType::chest(7).is_err());
    }

    #[test]
    fn test_regions_of_raw_indices() {
        let grid = GridType::chest(3).unwrap();
        assert!(grid.is_primary(26));
        assert!(grid.is_secondary(27));
        assert!(grid.is_secondary(27 + 35));
        assert!(!grid.is_secondary(27 + 36));
    }

    #[test]
    fn test_grid_from_name() {
        assert_eq!(GridType::from_name("anvil", None, None).unwrap(), GridType::ANVIL);
        assert_eq!(GridType::from_name("chest", Some(2), None).unwrap().size(), 18);
        assert!(matches!(
            GridType::from_name("barrel", None, None),
            Err(LayoutError::UnknownGridKind(_))
        ));
        assert!(GridType::ANVIL.captures_text());
        assert!(!GridType::HOPPER.captures_text());
    }
}
