//! Logging and debugging facilities for Horizon Grid.
//!
//! Each subsystem logs under its own `tracing` target (see [`targets`]).
//! [`TreeDebug`] prints a component tree and [`PerfSpan`] times tree-wide
//! work.
//!
//! # Subscribers
//!
//! Horizon Grid never installs a subscriber. To see logs, install one in
//! your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_grid=debug,horizon_grid_core=trace")
//!     .init();
//! ```
//!
//! # Printing a tree
//!
//! ```ignore
//! use horizon_grid_core::logging::TreeDebug;
//!
//! let output = TreeDebug::new().format_subtree(&tree, root)?;
//! println!("{output}");
//! ```

use std::fmt::Write as FmtWrite;

use crate::error::TreeResult;
use crate::tree::{ComponentId, ComponentTree, TreeNode};

/// `tracing` targets, one per subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_grid_core";
    /// Component tree mutations.
    pub const TREE: &str = "horizon_grid_core::tree";
    /// Flag interning.
    pub const FLAG: &str = "horizon_grid_core::flag";
    /// Session lifecycle.
    pub const SESSION: &str = "horizon_grid::session";
    /// Click, drag and text input routing.
    pub const ROUTING: &str = "horizon_grid::routing";
    /// Pagination rebuilds and navigation.
    pub const PAGINATION: &str = "horizon_grid::pagination";
    /// Session registry and history.
    pub const REGISTRY: &str = "horizon_grid::registry";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `|`, `+--` and `` `-- `` branches.
    Ascii,
    /// Box-drawing branches.
    #[default]
    Unicode,
    /// Compact single-line prefixes.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Whether to show component IDs.
    pub show_ids: bool,
    /// Append the short type name.
    pub show_types: bool,
    /// Whether to show effective priorities.
    pub show_priorities: bool,
    /// Deepest level printed; the root is level 0.
    pub max_depth: Option<usize>,
    /// Spaces added per nesting level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_types: true,
            show_priorities: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_priorities: true,
            ..Default::default()
        }
    }

    /// Options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
            show_priorities: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing component trees.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree<N: TreeNode>(
        &self,
        tree: &ComponentTree<N>,
        root: ComponentId,
    ) -> TreeResult<String> {
        let mut output = String::new();
        self.format_into(tree, root, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_into<N: TreeNode>(
        &self,
        tree: &ComponentTree<N>,
        id: ComponentId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> TreeResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        output.push_str(&self.build_prefix(depth, is_last));

        let name = tree.name(id)?;
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });

        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if self.options.show_types {
            let type_name = tree.type_name(id)?;
            let short = type_name.rsplit("::").next().unwrap_or(type_name);
            let _ = write!(output, " ({short})");
        }
        if self.options.show_priorities {
            let _ = write!(output, " <{:?}>", tree.priority(id)?);
        }
        output.push('\n');

        let children = tree.children(id)?;
        let count = children.len();
        for (i, &child) in children.iter().enumerate() {
            self.format_into(tree, child, depth + 1, i + 1 == count, output)?;
        }
        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time tree-wide rebuilds.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_grid::perf", "perf", operation);
        Self {
            _span: span.entered(),
        }
    }
}
