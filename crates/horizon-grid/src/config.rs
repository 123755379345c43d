//! TOML view configuration.
//!
//! A [`ViewConfig`] carries the settings half of a view definition so that
//! titles, grid shapes, cooldowns and flags can live in a config file while
//! the component tree stays in code.
//!
//! ```toml
//! title = "<gold>Warps"
//! global-cooldown-ms = 100
//! cell-cooldown-ms = 500
//! flags = ["allow-secondary-interaction"]
//! disabled-interactions = ["drop", "drop-all"]
//!
//! [grid]
//! kind = "chest"
//! rows = 4
//! ```

use std::path::Path;

use horizon_grid_core::{Flag, GridType};
use serde::{Deserialize, Serialize};

use crate::definition::ViewBuilder;
use crate::error::{Error, Result};
use crate::event::InteractionType;

/// The grid section of a view config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GridSpec {
    /// One of `chest`, `dispenser`, `hopper`, `anvil` or `custom`.
    pub kind: String,
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub columns: Option<usize>,
}

impl GridSpec {
    pub fn resolve(&self) -> Result<GridType> {
        Ok(GridType::from_name(&self.kind, self.rows, self.columns)?)
    }
}

/// View settings loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ViewConfig {
    /// Title markup, parsed when a session opens.
    pub title: Option<String>,
    pub grid: Option<GridSpec>,
    pub global_cooldown_ms: Option<i64>,
    pub cell_cooldown_ms: Option<i64>,
    pub flags: Vec<String>,
    pub disabled_interactions: Vec<InteractionType>,
}

impl ViewConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            target: "horizon_grid::session",
            path = %path.display(),
            "loaded view config"
        );
        Ok(config)
    }

    /// Copy the configured settings onto `builder`.
    ///
    /// Settings absent from the config leave the builder untouched. Flags
    /// and the grid kind are validated before anything is applied.
    pub fn apply(&self, builder: &mut ViewBuilder) -> Result<()> {
        let flags = self
            .flags
            .iter()
            .map(|name| Flag::new(name))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let grid = self.grid.as_ref().map(GridSpec::resolve).transpose()?;

        if let Some(grid) = grid {
            builder.grid(grid);
        }
        if let Some(title) = &self.title {
            builder.title_markup(title.clone());
        }
        if let Some(ms) = self.global_cooldown_ms {
            builder.global_cooldown_ms(ms);
        }
        if let Some(ms) = self.cell_cooldown_ms {
            builder.cell_cooldown_ms(ms);
        }
        for flag in flags {
            builder.flag(flag);
        }
        for &interaction in &self.disabled_interactions {
            builder.disable(interaction);
        }
        Ok(())
    }
}
