//! Paged rendering of item collections.
//!
//! A [`Paginated`] component slices a list of items into pages sized to the
//! cells it owns and renders the current page onto them. Two layouts are
//! supported:
//!
//! - **Paged**: one cell set; each step shows exactly one page.
//! - **Scrolling**: several equally sized cell columns; column `i` shows
//!   page `current + i`, giving a sliding window of consecutive pages.
//!
//! Mutating the items does not render. The component rebuilds and renders
//! on every session update, so call [`Session::update`] (or use
//! [`append_items`], which does it for you) after changing the items.
//!
//! # Example
//!
//! ```
//! use horizon_grid::pagination::{self, Paginated};
//! use horizon_grid::{CellContent, Item, SessionRegistry, ViewDefinition, ViewerId};
//! use horizon_grid_core::GridType;
//!
//! let numbers = Paginated::paged(0..9, |n: &u32| {
//!     Item::new(CellContent::new("paper").with_label(n.to_string()))
//! })
//! .unwrap()
//! .with_items(0..20);
//!
//! let mut builder = ViewDefinition::builder();
//! builder.grid(GridType::chest(2).unwrap());
//! let list = builder.root(numbers);
//!
//! let registry = SessionRegistry::default();
//! let session = registry.open(ViewerId::random(), &builder.build()).unwrap();
//! let mut session = session.lock();
//!
//! pagination::to_page::<u32>(&mut session, list, 3).unwrap();
//! let list = session.component::<Paginated<u32>>(list).unwrap();
//! assert!(list.is_last_page());
//! assert_eq!(list.page(3).unwrap(), &[18, 19]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use horizon_grid_core::{Cell, ComponentId, LayoutError, LayoutResult, Priority};

use crate::component::{Component, ViewContext};
use crate::element::Item;
use crate::error::{Error, Result};
use crate::session::{Session, SessionState};

/// Turns an item into what its cell shows.
pub type Renderer<T> = Arc<dyn Fn(&T) -> Item + Send + Sync>;

/// Orders items before every rebuild.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

#[derive(Debug, Clone)]
enum Layout {
    Paged(Vec<usize>),
    Scrolling(Vec<Vec<usize>>),
}

/// A component rendering items across one or more cell sets, paged.
#[derive(Clone)]
pub struct Paginated<T> {
    layout: Layout,
    items: Vec<T>,
    pages: Vec<Range<usize>>,
    current: usize,
    renderer: Renderer<T>,
    comparator: Option<Comparator<T>>,
    filler: Item,
}

impl<T: Clone + Send + Sync + 'static> Paginated<T> {
    /// Render one page at a time onto `cells` (primary indices).
    pub fn paged<F>(cells: impl IntoIterator<Item = usize>, renderer: F) -> LayoutResult<Self>
    where
        F: Fn(&T) -> Item + Send + Sync + 'static,
    {
        let cells: Vec<usize> = cells.into_iter().collect();
        if cells.is_empty() {
            return Err(LayoutError::EmptyCellSet);
        }
        Ok(Self::with_layout(Layout::Paged(cells), Arc::new(renderer)))
    }

    /// Render consecutive pages side by side, one per column.
    ///
    /// Every column must hold the same number of cells.
    pub fn scrolling<F>(columns: Vec<Vec<usize>>, renderer: F) -> LayoutResult<Self>
    where
        F: Fn(&T) -> Item + Send + Sync + 'static,
    {
        let expected = match columns.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(LayoutError::EmptyCellSet),
        };
        if let Some((column, cells)) = columns
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(LayoutError::UnevenColumns {
                column,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self::with_layout(Layout::Scrolling(columns), Arc::new(renderer)))
    }

    fn with_layout(layout: Layout, renderer: Renderer<T>) -> Self {
        let mut paginated = Self {
            layout,
            items: Vec::new(),
            pages: Vec::new(),
            current: 1,
            renderer,
            comparator: None,
            filler: Item::empty(),
        };
        paginated.rebuild();
        paginated
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.items.extend(items);
        self.rebuild();
        self
    }

    /// Keep items sorted by `comparator`. The sort is stable.
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self.rebuild();
        self
    }

    /// What cells without an item show. Defaults to an empty cell.
    pub fn with_filler(mut self, filler: Item) -> Self {
        self.filler = filler;
        self
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    /// Remove every item matching `predicate`.
    pub fn remove_items<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(|item| !predicate(item));
    }

    pub fn set_items(&mut self, items: impl IntoIterator<Item = T>) {
        self.items = items.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    // =========================================================================
    // Pages
    // =========================================================================

    /// Capacity of one page: the cell set, or one scrolling column.
    pub fn items_per_page(&self) -> usize {
        match &self.layout {
            Layout::Paged(cells) => cells.len(),
            Layout::Scrolling(columns) => columns.first().map_or(0, Vec::len),
        }
    }

    /// Total number of pages. Zero when there are no items.
    pub fn pages(&self) -> usize {
        self.pages.len()
    }

    /// The items on page `page` (1-based).
    pub fn page(&self, page: usize) -> Option<&[T]> {
        let range = self.pages.get(page.checked_sub(1)?)?;
        self.items.get(range.clone())
    }

    /// The current page (1-based).
    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn is_first_page(&self) -> bool {
        self.current <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current >= self.pages()
    }

    pub fn has_next_page(&self) -> bool {
        self.current < self.pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current > 1 && self.pages() > 0
    }

    /// Move to `page` without rendering.
    ///
    /// Fails with [`Error::PageOutOfRange`] outside `1..=pages()`, leaving
    /// the current page unchanged.
    pub fn set_page(&mut self, page: usize) -> Result<()> {
        let total = self.pages();
        if page == 0 || page > total {
            return Err(Error::PageOutOfRange { page, total });
        }
        self.current = page;
        Ok(())
    }

    /// Sort the items and re-slice them into pages.
    ///
    /// The current page is clamped to the new page count.
    pub fn rebuild(&mut self) {
        if let Some(comparator) = &self.comparator {
            self.items.sort_by(|a, b| comparator(a, b));
        }
        let per_page = self.items_per_page().max(1);
        let count = self.items.len();
        self.pages = (0..count)
            .step_by(per_page)
            .map(|start| start..(start + per_page).min(count))
            .collect();
        self.current = self.current.clamp(1, self.pages.len().max(1));
        tracing::debug!(
            target: "horizon_grid::pagination",
            items = count,
            pages = self.pages.len(),
            current = self.current,
            "rebuilt pages"
        );
    }

    /// Render the current page (or window of pages) onto the session.
    pub fn render(&self, state: &mut SessionState) {
        match &self.layout {
            Layout::Paged(cells) => self.render_page(state, cells, self.current),
            Layout::Scrolling(columns) => {
                for (offset, cells) in columns.iter().enumerate() {
                    self.render_page(state, cells, self.current + offset);
                }
            }
        }
    }

    fn render_page(&self, state: &mut SessionState, cells: &[usize], page: usize) {
        let items = self.page(page).unwrap_or(&[]);
        for (position, &index) in cells.iter().enumerate() {
            let item = match items.get(position) {
                Some(value) => (self.renderer)(value),
                None => self.filler.clone(),
            };
            state.set_item(Cell::primary(index), item);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Component for Paginated<T> {
    fn priority(&self) -> Priority {
        Priority::High
    }

    fn on_update(&mut self, cx: &mut ViewContext<'_>) {
        self.rebuild();
        self.render(cx);
    }
}

impl<T: fmt::Debug> fmt::Debug for Paginated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginated")
            .field("layout", &self.layout)
            .field("items", &self.items)
            .field("pages", &self.pages.len())
            .field("current", &self.current)
            .finish()
    }
}

fn current_page<T: Clone + Send + Sync + 'static>(session: &Session, id: ComponentId) -> Result<(usize, usize)> {
    session
        .component::<Paginated<T>>(id)
        .map(|paginated| (paginated.current_page(), paginated.pages()))
        .ok_or_else(|| Error::component_mismatch::<Paginated<T>>(id))
}

/// Navigate the pagination component `id` to `page`, then update the
/// session.
pub fn to_page<T: Clone + Send + Sync + 'static>(session: &mut Session, id: ComponentId, page: usize) -> Result<()> {
    session.with_component::<Paginated<T>, _, _>(id, |paginated, _| paginated.set_page(page))??;
    session.update();
    Ok(())
}

/// Navigate to the next page. Guard with [`Paginated::has_next_page`].
pub fn next_page<T: Clone + Send + Sync + 'static>(session: &mut Session, id: ComponentId) -> Result<()> {
    let (current, _) = current_page::<T>(session, id)?;
    to_page::<T>(session, id, current + 1)
}

/// Navigate to the previous page. Guard with
/// [`Paginated::has_previous_page`].
pub fn previous_page<T: Clone + Send + Sync + 'static>(session: &mut Session, id: ComponentId) -> Result<()> {
    let (current, total) = current_page::<T>(session, id)?;
    match current.checked_sub(1) {
        Some(page) => to_page::<T>(session, id, page),
        None => Err(Error::PageOutOfRange { page: 0, total }),
    }
}

/// Append items to the pagination component `id`, then rebuild and render
/// the session in the same call.
///
/// This is the hand-off point for items loaded asynchronously.
pub fn append_items<T, I>(session: &mut Session, id: ComponentId, items: I) -> Result<()>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
{
    session.with_component::<Paginated<T>, _, _>(id, |paginated, _| paginated.add_items(items))?;
    session.update();
    Ok(())
}
