//! View definitions.
//!
//! A [`ViewDefinition`] is the immutable template a session is opened
//! from: the grid shape, the component tree and the session settings.
//! Every open deep-copies the definition, so per-viewer changes made in
//! [`Component::modify_definition`] never leak into other sessions.

use std::collections::HashSet;
use std::fmt;

use horizon_grid_core::{ComponentId, Flag, FlagSet, GridType};

use crate::component::{Component, Tree};
use crate::content::{RichText, Title};
use crate::error::{Error, Result};
use crate::event::InteractionType;

/// Settings of a view definition that components may adjust per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSettings {
    pub grid: Option<GridType>,
    pub title: Title,
    /// Minimum time between any two accepted clicks.
    pub global_cooldown_ms: i64,
    /// Minimum time between two accepted clicks on the same cell.
    pub cell_cooldown_ms: i64,
    pub flags: FlagSet,
    /// Interaction types that are always blocked.
    pub disabled: HashSet<InteractionType>,
}

impl ViewSettings {
    /// Check the settings can be opened.
    pub fn validate(&self) -> Result<()> {
        if self.grid.is_none() {
            return Err(Error::invalid_definition("no grid type set"));
        }
        if self.global_cooldown_ms < 0 {
            return Err(Error::invalid_definition(format!(
                "negative global cooldown: {}ms",
                self.global_cooldown_ms
            )));
        }
        if self.cell_cooldown_ms < 0 {
            return Err(Error::invalid_definition(format!(
                "negative cell cooldown: {}ms",
                self.cell_cooldown_ms
            )));
        }
        Ok(())
    }
}

/// A template for opening sessions.
#[derive(Clone, Default)]
pub struct ViewDefinition {
    pub(crate) settings: ViewSettings,
    pub(crate) tree: Tree,
    pub(crate) root: Option<ComponentId>,
}

impl ViewDefinition {
    pub fn builder() -> ViewBuilder {
        ViewBuilder::default()
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    /// Check the definition can be opened: a grid type and a root
    /// component are set and both cooldowns are non-negative.
    pub fn validate(&self) -> Result<()> {
        match self.root {
            Some(root) if self.tree.contains(root) => {}
            _ => return Err(Error::invalid_definition("no root component set")),
        }
        self.settings.validate()
    }

    /// Deep-copy this definition and let every component adjust the copy's
    /// settings.
    pub(crate) fn instantiate(&self) -> Result<Self> {
        let mut copy = self.clone();
        let Some(root) = copy.root else {
            return Err(Error::invalid_definition("no root component set"));
        };
        let settings = &mut copy.settings;
        copy.tree
            .traverse_mut(root, |_, component| component.modify_definition(settings))?;
        Ok(copy)
    }
}

impl fmt::Debug for ViewDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDefinition")
            .field("settings", &self.settings)
            .field("components", &self.tree.len())
            .field("root", &self.root)
            .finish()
    }
}

/// Builds a [`ViewDefinition`].
///
/// # Example
///
/// ```
/// use horizon_grid::{Pane, ViewDefinition};
/// use horizon_grid_core::{Flag, GridType};
///
/// let mut builder = ViewDefinition::builder();
/// builder
///     .grid(GridType::chest(3).unwrap())
///     .title_markup("<gold>Shop")
///     .cell_cooldown_ms(250)
///     .flag(Flag::ALLOW_SECONDARY_INTERACTION);
/// let root = builder.root(Pane::new());
/// let definition = builder.build();
///
/// assert_eq!(definition.root(), Some(root));
/// assert!(definition.validate().is_ok());
/// ```
#[derive(Default)]
pub struct ViewBuilder {
    definition: ViewDefinition,
}

impl ViewBuilder {
    pub fn grid(&mut self, grid: GridType) -> &mut Self {
        self.definition.settings.grid = Some(grid);
        self
    }

    pub fn title(&mut self, title: impl Into<RichText>) -> &mut Self {
        self.definition.settings.title = Title::Text(title.into());
        self
    }

    /// Set a title that is parsed by the registry's markup parser on open.
    pub fn title_markup(&mut self, markup: impl Into<String>) -> &mut Self {
        self.definition.settings.title = Title::Markup(markup.into());
        self
    }

    pub fn global_cooldown_ms(&mut self, ms: i64) -> &mut Self {
        self.definition.settings.global_cooldown_ms = ms;
        self
    }

    pub fn cell_cooldown_ms(&mut self, ms: i64) -> &mut Self {
        self.definition.settings.cell_cooldown_ms = ms;
        self
    }

    pub fn flag(&mut self, flag: Flag) -> &mut Self {
        self.definition.settings.flags.insert(flag);
        self
    }

    pub fn disable(&mut self, interaction: InteractionType) -> &mut Self {
        self.definition.settings.disabled.insert(interaction);
        self
    }

    /// Mutable access to all settings at once.
    pub fn settings_mut(&mut self) -> &mut ViewSettings {
        &mut self.definition.settings
    }

    /// Insert the root component, replacing any previous root.
    pub fn root<C: Component>(&mut self, component: C) -> ComponentId {
        let id = self.definition.tree.insert(Box::new(component));
        self.definition.root = Some(id);
        id
    }

    /// Insert `component` as a child of `parent`.
    pub fn child<C: Component>(&mut self, parent: ComponentId, component: C) -> Result<ComponentId> {
        let id = self.definition.tree.insert(Box::new(component));
        if let Err(err) = self.definition.tree.add_child(parent, id) {
            if let Err(cleanup) = self.definition.tree.remove(id) {
                tracing::warn!(
                    target: "horizon_grid::definition",
                    ?id,
                    %cleanup,
                    "failed to drop unattached component"
                );
            }
            return Err(err.into());
        }
        Ok(id)
    }

    /// Name a component for lookup with [`Tree::find_by_name`].
    pub fn name(&mut self, id: ComponentId, name: impl Into<String>) -> Result<&mut Self> {
        self.definition.tree.set_name(id, name)?;
        Ok(self)
    }

    /// Direct access to the tree being built.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.definition.tree
    }

    pub fn build(self) -> ViewDefinition {
        self.definition
    }
}
