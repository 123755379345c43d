//! Click and drag routing.
//!
//! Routing resolves every raw interaction to at most one handler call.
//! Events start cancelled; only an explicit flag or a handler lets them
//! through. The order of checks for a click is:
//!
//! 1. Cursor clicks stop unless `convert-cursor-to-outside` is set, in
//!    which case they continue as outside clicks.
//! 2. Outside clicks are allowed or close the session per flag, otherwise
//!    stop.
//! 3. Secondary-region indices are normalised to the unified index space.
//! 4. The global and per-cell cooldowns must both have elapsed; a blocked
//!    click notifies [`Component::on_cooldown`](crate::Component::on_cooldown).
//! 5. Secondary-region clicks are allowed or close the session per flag.
//! 6. Disabled interaction types stop.
//! 7. The cell's handler runs, if any.

use std::time::Instant;

use horizon_grid_core::address::secondary_to_unified;
use horizon_grid_core::{Cell, ComponentId, Flag};

use crate::component::ViewContext;
use crate::definition::ViewDefinition;
use crate::element::{CellElement, Element};
use crate::error::Result;
use crate::event::{ClickEvent, DragEvent, InteractionType, RawSlot, ViewerId};
use crate::session::{Session, SessionState};

/// How an interaction was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The viewer has no open session; nothing was touched.
    Ignored,
    /// Stopped by region rules. The event stays cancelled.
    Blocked,
    /// Let through by a flag.
    Allowed,
    /// A flag closed the session.
    Closed,
    /// Suppressed by a cooldown.
    CoolingDown,
    /// The interaction type is disabled for this session.
    Disabled,
    /// The cell has no handler.
    NoHandler,
    /// The cell's handler ran.
    Handled,
}

/// Context passed to click handlers.
pub struct ClickContext<'a> {
    session: &'a mut Session,
    event: &'a mut ClickEvent,
    cell: Cell,
    raw: usize,
}

impl<'a> ClickContext<'a> {
    pub(crate) fn new(session: &'a mut Session, event: &'a mut ClickEvent, cell: Cell, raw: usize) -> Self {
        Self {
            session,
            event,
            cell,
            raw,
        }
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        self.session
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        self.session.state_mut()
    }

    pub fn event(&self) -> &ClickEvent {
        self.event
    }

    pub fn viewer(&self) -> ViewerId {
        self.event.viewer()
    }

    pub fn interaction(&self) -> InteractionType {
        self.event.interaction()
    }

    /// The clicked cell, with secondary indices in unified space.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// The raw view index the click landed on.
    pub fn raw_index(&self) -> usize {
        self.raw
    }

    /// Let the click through to the host.
    pub fn allow(&mut self) {
        self.event.set_cancelled(false);
    }

    pub fn cancel(&mut self) {
        self.event.set_cancelled(true);
    }

    /// The clicked cell as a live element.
    pub fn element(&mut self) -> Element<'_> {
        Element::Cell(CellElement::new(self.session.state_mut(), self.cell))
    }

    /// Run `f` on a component of this session with a view context.
    pub fn with_component<T, R, F>(&mut self, id: ComponentId, f: F) -> Result<R>
    where
        T: 'static,
        F: FnOnce(&mut T, &mut ViewContext<'_>) -> R,
    {
        self.session.with_component(id, f)
    }

    /// Rebuild and re-render the session.
    pub fn update(&mut self) {
        self.session.update();
    }

    /// Close the session after the handler returns.
    pub fn close(&mut self) {
        self.session.state_mut().request_close();
    }

    /// Open another view after the handler returns.
    pub fn open(&mut self, definition: ViewDefinition) {
        self.session.state_mut().request_open(definition);
    }

    /// Go back in history after the handler returns.
    pub fn back(&mut self) {
        self.session.state_mut().request_back();
    }

    /// Go forward in history after the handler returns.
    pub fn forward(&mut self) {
        self.session.state_mut().request_forward();
    }
}

/// Route a click within an open session.
pub(crate) fn route_click(session: &mut Session, event: &mut ClickEvent, now: Instant) -> ClickOutcome {
    event.set_cancelled(true);

    let raw = match event.slot() {
        RawSlot::Index(raw) => raw,
        RawSlot::Cursor if !session.state().has_flag(Flag::CONVERT_CURSOR_TO_OUTSIDE) => {
            tracing::trace!(target: "horizon_grid::routing", "cursor click blocked");
            return ClickOutcome::Blocked;
        }
        RawSlot::Cursor | RawSlot::Outside => {
            event.set_slot(RawSlot::Outside);
            return route_outside(session, event);
        }
    };

    let grid = session.state().grid();
    let cell = if grid.is_primary(raw) {
        Cell::primary(raw)
    } else if let Some(unified) = raw.checked_sub(grid.size()).and_then(secondary_to_unified) {
        Cell::secondary(unified)
    } else {
        tracing::trace!(target: "horizon_grid::routing", raw, "click beyond both regions");
        return ClickOutcome::Blocked;
    };

    if session.state().is_cooling_down(cell, now) {
        tracing::trace!(target: "horizon_grid::routing", %cell, "click suppressed by cooldown");
        session.cooldown_triggered(cell);
        return ClickOutcome::CoolingDown;
    }
    session.state_mut().stamp_click(cell, now);

    if cell.is_secondary() {
        let state = session.state_mut();
        if state.has_flag(Flag::ALLOW_SECONDARY_INTERACTION) {
            event.set_cancelled(false);
            return ClickOutcome::Allowed;
        }
        if state.has_flag(Flag::CLOSE_ON_SECONDARY_INTERACTION) {
            state.request_close();
            return ClickOutcome::Closed;
        }
    }

    if session.state().disabled_interactions().contains(&event.interaction()) {
        tracing::trace!(
            target: "horizon_grid::routing",
            interaction = ?event.interaction(),
            "interaction disabled"
        );
        return ClickOutcome::Disabled;
    }

    let Some(handler) = session.state().handler(cell) else {
        return ClickOutcome::NoHandler;
    };
    tracing::trace!(target: "horizon_grid::routing", %cell, raw, "dispatching click");
    let mut cx = ClickContext::new(session, event, cell, raw);
    handler(&mut cx);
    ClickOutcome::Handled
}

fn route_outside(session: &mut Session, event: &mut ClickEvent) -> ClickOutcome {
    let state = session.state_mut();
    if state.has_flag(Flag::ALLOW_OUTSIDE_INTERACTION) {
        event.set_cancelled(false);
        ClickOutcome::Allowed
    } else if state.has_flag(Flag::CLOSE_ON_OUTSIDE_INTERACTION) {
        state.request_close();
        ClickOutcome::Closed
    } else {
        ClickOutcome::Blocked
    }
}

/// Route a drag within an open session.
///
/// A drag touching the primary region needs `allow-drag`. A drag confined
/// to the secondary region is also allowed by
/// `allow-secondary-interaction`. A disabled [`InteractionType::Drag`]
/// always blocks.
pub(crate) fn route_drag(session: &mut Session, event: &mut DragEvent) -> ClickOutcome {
    event.set_cancelled(true);
    let state = session.state();
    if state.disabled_interactions().contains(&InteractionType::Drag) {
        return ClickOutcome::Disabled;
    }

    let grid = state.grid();
    let touches_primary = event.raw_slots().iter().any(|&raw| grid.is_primary(raw));
    let allowed = state.has_flag(Flag::ALLOW_DRAG)
        || (!touches_primary && state.has_flag(Flag::ALLOW_SECONDARY_INTERACTION));
    if allowed {
        event.set_cancelled(false);
        ClickOutcome::Allowed
    } else {
        ClickOutcome::Blocked
    }
}
