use std::fmt;
use std::marker::PhantomData;

use horizon_grid_core::{Cell, ComponentId, Priority};

use crate::component::{Component, ViewContext};
use crate::content::CellContent;
use crate::element::Item;
use crate::pagination::{self, Paginated};

/// Previous/next controls for a [`Paginated`] component.
///
/// Each button is shown only while its direction is possible. The buttons
/// read the pagination state during update, so they have low priority and
/// should be siblings of (or nested after) the component they control.
pub struct PageButtons<T> {
    target: ComponentId,
    previous: (usize, CellContent),
    next: (usize, CellContent),
    _items: PhantomData<fn() -> T>,
}

impl<T: Clone + Send + Sync + 'static> PageButtons<T> {
    /// Buttons for the pagination component `target`, placed on primary
    /// cells `previous.0` and `next.0`.
    pub fn new(target: ComponentId, previous: (usize, CellContent), next: (usize, CellContent)) -> Self {
        Self {
            target,
            previous,
            next,
            _items: PhantomData,
        }
    }

    pub fn target(&self) -> ComponentId {
        self.target
    }

    fn previous_item(&self) -> Item {
        let target = self.target;
        Item::new(self.previous.1.clone()).on_click(move |cx| {
            if let Err(err) = pagination::previous_page::<T>(cx.session_mut(), target) {
                tracing::warn!(target: "horizon_grid::pagination", %err, "previous page failed");
            }
        })
    }

    fn next_item(&self) -> Item {
        let target = self.target;
        Item::new(self.next.1.clone()).on_click(move |cx| {
            if let Err(err) = pagination::next_page::<T>(cx.session_mut(), target) {
                tracing::warn!(target: "horizon_grid::pagination", %err, "next page failed");
            }
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Component for PageButtons<T> {
    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn on_update(&mut self, cx: &mut ViewContext<'_>) {
        let Some(paginated) = cx.component::<Paginated<T>>(self.target) else {
            tracing::warn!(
                target: "horizon_grid::pagination",
                target_id = ?self.target,
                "page buttons bound to a missing pagination component"
            );
            return;
        };
        let (has_previous, has_next) = (paginated.has_previous_page(), paginated.has_next_page());

        let previous = Cell::primary(self.previous.0);
        if has_previous {
            cx.set_item(previous, self.previous_item());
        } else {
            cx.clear(previous);
        }

        let next = Cell::primary(self.next.0);
        if has_next {
            cx.set_item(next, self.next_item());
        } else {
            cx.clear(next);
        }
    }
}

impl<T> Clone for PageButtons<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            previous: self.previous.clone(),
            next: self.next.clone(),
            _items: PhantomData,
        }
    }
}

impl<T> fmt::Debug for PageButtons<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageButtons")
            .field("target", &self.target)
            .field("previous", &self.previous.0)
            .field("next", &self.next.0)
            .finish()
    }
}
