use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use horizon_grid_core::Cell;

use crate::component::{Component, ViewContext};
use crate::element::Item;

/// Produces the item for one cell.
pub type Producer = Arc<dyn Fn(&ViewContext<'_>) -> Item + Send + Sync>;

#[derive(Clone)]
struct Entry {
    producer: Producer,
    stateful: bool,
}

/// A table of cell producers.
///
/// Every producer renders when the session opens. Stateful producers also
/// re-render on every update, so they can reflect changing state.
///
/// ```
/// use horizon_grid::{CellContent, CellProducers, Item};
///
/// let producers = CellProducers::new()
///     .produce(0, |_| Item::new(CellContent::new("compass")))
///     .stateful(4, |cx| {
///         Item::new(CellContent::new("clock").with_label(cx.input_text().to_string()))
///     });
/// assert!(producers.is_stateful(4));
/// assert!(!producers.is_stateful(0));
/// ```
#[derive(Clone, Default)]
pub struct CellProducers {
    entries: BTreeMap<usize, Entry>,
}

impl CellProducers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `producer` into primary cell `index` once, on open.
    pub fn produce<F>(self, index: usize, producer: F) -> Self
    where
        F: Fn(&ViewContext<'_>) -> Item + Send + Sync + 'static,
    {
        self.insert(index, Arc::new(producer), false)
    }

    /// Render `producer` into primary cell `index` on open and every update.
    pub fn stateful<F>(self, index: usize, producer: F) -> Self
    where
        F: Fn(&ViewContext<'_>) -> Item + Send + Sync + 'static,
    {
        self.insert(index, Arc::new(producer), true)
    }

    fn insert(mut self, index: usize, producer: Producer, stateful: bool) -> Self {
        self.entries.insert(index, Entry { producer, stateful });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_stateful(&self, index: usize) -> bool {
        self.entries.get(&index).is_some_and(|entry| entry.stateful)
    }

    fn render(&self, cx: &mut ViewContext<'_>, stateful_only: bool) {
        for (&index, entry) in &self.entries {
            if stateful_only && !entry.stateful {
                continue;
            }
            let item = (entry.producer)(&*cx);
            cx.set_item(Cell::primary(index), item);
        }
    }
}

impl Component for CellProducers {
    fn on_open(&mut self, cx: &mut ViewContext<'_>) {
        self.render(cx, false);
    }

    fn on_update(&mut self, cx: &mut ViewContext<'_>) {
        self.render(cx, true);
    }
}

impl fmt::Debug for CellProducers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(index, entry)| (index, entry.stateful)))
            .finish()
    }
}
