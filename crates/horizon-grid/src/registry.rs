//! The session registry.
//!
//! [`SessionRegistry`] maps each viewer to their active session and keeps
//! an append-only history of the sessions they opened. It is the entry
//! point for host events: clicks, drags, text input, client-side closes
//! and disconnects.
//!
//! The registry is explicit state: create one, pass it by reference, and
//! [`disable`](SessionRegistry::disable) it on shutdown. Its maps tolerate
//! concurrent access, so a disconnect may arrive from another thread than
//! normal event dispatch.
//!
//! # History
//!
//! Every open appends to the viewer's history unless
//! [`OpenOptions::record_history`] is off. [`back`](SessionRegistry::back)
//! and [`forward`](SessionRegistry::forward) reopen the adjacent entry
//! without appending. Opening a new view from the middle of the history
//! appends at the end and keeps every later entry, so
//! [`next`](SessionRegistry::next) can return a session that was opened
//! before the one now active.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use horizon_grid_core::Flag;
use parking_lot::{Mutex, RwLock};

use crate::content::{MarkupParser, PlainMarkup};
use crate::definition::ViewDefinition;
use crate::error::{Error, Result};
use crate::event::{ClickEvent, DragEvent, TextInputEvent, ViewerId};
use crate::routing::{route_click, route_drag, ClickOutcome};
use crate::session::{Navigation, Session, SharedSession};
use crate::surface::{Display, MemoryDisplay};

/// Options for [`SessionRegistry::open_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Append the new session to the viewer's history.
    pub record_history: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            record_history: true,
        }
    }
}

/// Process-wide session state, keyed by viewer.
pub struct SessionRegistry {
    enabled: AtomicBool,
    active: RwLock<HashMap<ViewerId, SharedSession>>,
    history: RwLock<HashMap<ViewerId, Vec<SharedSession>>>,
    display: Arc<dyn Display>,
    markup: Arc<dyn MarkupParser>,
}

impl SessionRegistry {
    /// Create an enabled registry that opens surfaces on `display`.
    pub fn new(display: impl Display + 'static) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            active: RwLock::new(HashMap::new()),
            history: RwLock::new(HashMap::new()),
            display: Arc::new(display),
            markup: Arc::new(PlainMarkup),
        }
    }

    /// Use `markup` to resolve markup titles.
    pub fn with_markup(mut self, markup: impl MarkupParser + 'static) -> Self {
        self.markup = Arc::new(markup);
        self
    }

    pub fn markup(&self) -> &dyn MarkupParser {
        self.markup.as_ref()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
        tracing::debug!(target: "horizon_grid::registry", "registry enabled");
    }

    /// Close every active session and forget all history. Opening fails
    /// with [`Error::RegistryDisabled`] until the registry is re-enabled.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        let sessions: Vec<_> = self.active.write().drain().collect();
        self.history.write().clear();
        for (_, session) in &sessions {
            session.lock().close();
        }
        tracing::debug!(
            target: "horizon_grid::registry",
            closed = sessions.len(),
            "registry disabled"
        );
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(Error::RegistryDisabled)
        }
    }

    // =========================================================================
    // Opening and closing
    // =========================================================================

    /// Open `definition` for `viewer`, recording it in history.
    pub fn open(&self, viewer: ViewerId, definition: &ViewDefinition) -> Result<SharedSession> {
        self.open_with(viewer, definition, OpenOptions::default())
    }

    /// Open `definition` for `viewer`.
    ///
    /// The definition is validated, deep-copied and adjusted by its
    /// components. Any session the viewer already has open is closed before
    /// the new one's open callbacks run.
    pub fn open_with(
        &self,
        viewer: ViewerId,
        definition: &ViewDefinition,
        options: OpenOptions,
    ) -> Result<SharedSession> {
        self.open_session(viewer, definition, options, None)
    }

    fn open_session(
        &self,
        viewer: ViewerId,
        definition: &ViewDefinition,
        options: OpenOptions,
        replacing: Option<&SharedSession>,
    ) -> Result<SharedSession> {
        self.ensure_enabled()?;
        definition.validate()?;
        let instance = definition.instantiate()?;

        let grid = instance
            .settings()
            .grid
            .ok_or_else(|| Error::invalid_definition("no grid type set"))?;
        let title = instance.settings().title.resolve(self.markup.as_ref());
        let surface = self.display.create(viewer, grid, &title);
        let session = Arc::new(Mutex::new(Session::new(viewer, instance, title, surface)?));

        self.activate(viewer, &session, options.record_history, replacing)?;
        Ok(session)
    }

    /// Make a previously opened session active again.
    ///
    /// A closed session gets a fresh surface. The history is not changed.
    pub fn reopen(&self, viewer: ViewerId, session: &SharedSession) -> Result<()> {
        self.reopen_session(viewer, session, None)
    }

    fn reopen_session(
        &self,
        viewer: ViewerId,
        session: &SharedSession,
        replacing: Option<&SharedSession>,
    ) -> Result<()> {
        self.ensure_enabled()?;
        {
            let mut guard = session.lock();
            if !guard.is_open() {
                let surface = self.display.create(viewer, guard.grid(), guard.title());
                guard.attach_surface(surface);
            }
        }
        self.activate(viewer, session, false, replacing)
    }

    /// Install `session` as the viewer's active session.
    ///
    /// With `replacing` set, the swap only happens while that session is
    /// still the active one; otherwise the viewer closed it or left in the
    /// meantime and [`Error::NotOpen`] is returned. The check, the history
    /// append and the insert happen under one write lock on the active map.
    fn activate(
        &self,
        viewer: ViewerId,
        session: &SharedSession,
        record: bool,
        replacing: Option<&SharedSession>,
    ) -> Result<()> {
        let id = session.lock().id();
        let previous = {
            let mut active = self.active.write();
            let current = active.get(&viewer).cloned();
            if let Some(expected) = replacing {
                if !current
                    .as_ref()
                    .is_some_and(|current| Arc::ptr_eq(current, expected))
                {
                    return Err(Error::NotOpen(viewer));
                }
            }
            if let Some(current) = &current {
                if Arc::ptr_eq(current, session) {
                    return Err(Error::AlreadyOpen(id));
                }
            }
            if record {
                self.history
                    .write()
                    .entry(viewer)
                    .or_default()
                    .push(Arc::clone(session));
            }
            active.insert(viewer, Arc::clone(session));
            current
        };

        if let Some(previous) = previous {
            previous.lock().close();
        }
        session.lock().open();
        Ok(())
    }

    /// Close the viewer's active session.
    pub fn close(&self, viewer: ViewerId) -> Result<()> {
        let session = self.active(viewer).ok_or(Error::NotOpen(viewer))?;
        self.close_session(viewer, &session);
        Ok(())
    }

    fn close_session(&self, viewer: ViewerId, session: &SharedSession) -> bool {
        let closed = session.lock().close();
        let mut active = self.active.write();
        if active
            .get(&viewer)
            .is_some_and(|current| Arc::ptr_eq(current, session))
        {
            active.remove(&viewer);
        }
        closed
    }

    /// The viewer closed the grid on their side. Returns `false` if they
    /// had no open session.
    pub fn handle_grid_closed(&self, viewer: ViewerId) -> bool {
        match self.active(viewer) {
            Some(session) => {
                self.close_session(viewer, &session);
                true
            }
            None => false,
        }
    }

    /// The viewer left. Their active session and history are dropped; the
    /// close callbacks run only if the session still has the
    /// `close-on-disconnect` flag.
    pub fn disconnect(&self, viewer: ViewerId) {
        let session = self.active.write().remove(&viewer);
        let history = self.history.write().remove(&viewer);
        if let Some(session) = session {
            let mut guard = session.lock();
            if guard.state().has_flag(Flag::CLOSE_ON_DISCONNECT) {
                guard.close();
            } else {
                guard.discard();
            }
        }
        tracing::debug!(
            target: "horizon_grid::registry",
            %viewer,
            history = history.map_or(0, |h| h.len()),
            "viewer disconnected"
        );
    }

    // =========================================================================
    // Lookup and history
    // =========================================================================

    pub fn active(&self, viewer: ViewerId) -> Option<SharedSession> {
        self.active.read().get(&viewer).cloned()
    }

    /// Every session the viewer opened, oldest first.
    pub fn history(&self, viewer: ViewerId) -> Vec<SharedSession> {
        self.history.read().get(&viewer).cloned().unwrap_or_default()
    }

    /// The history entry before the active session.
    pub fn previous(&self, viewer: ViewerId) -> Option<SharedSession> {
        self.adjacent(viewer, false)
    }

    /// The history entry after the active session.
    pub fn next(&self, viewer: ViewerId) -> Option<SharedSession> {
        self.adjacent(viewer, true)
    }

    fn adjacent(&self, viewer: ViewerId, forward: bool) -> Option<SharedSession> {
        let active = self.active(viewer)?;
        let history = self.history.read();
        let entries = history.get(&viewer)?;
        let position = entries
            .iter()
            .position(|session| Arc::ptr_eq(session, &active))?;
        let target = if forward {
            position + 1
        } else {
            position.checked_sub(1)?
        };
        entries.get(target).cloned()
    }

    /// Reopen the previous history entry. Returns `false` at the start of
    /// the history.
    pub fn back(&self, viewer: ViewerId) -> Result<bool> {
        self.step(viewer, false)
    }

    /// Reopen the next history entry. Returns `false` at the end of the
    /// history.
    pub fn forward(&self, viewer: ViewerId) -> Result<bool> {
        self.step(viewer, true)
    }

    fn step(&self, viewer: ViewerId, forward: bool) -> Result<bool> {
        let active = self.active(viewer).ok_or(Error::NotOpen(viewer))?;
        match self.adjacent(viewer, forward) {
            Some(target) => {
                self.reopen_session(viewer, &target, Some(&active))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Route a click to the viewer's active session.
    pub fn handle_click(&self, event: &mut ClickEvent) -> ClickOutcome {
        self.handle_click_at(event, Instant::now())
    }

    /// Route a click as if it happened at `now`.
    pub fn handle_click_at(&self, event: &mut ClickEvent, now: Instant) -> ClickOutcome {
        let viewer = event.viewer();
        let Some(session) = self.active(viewer) else {
            return ClickOutcome::Ignored;
        };
        let (outcome, navigation) = {
            let mut guard = session.lock();
            let outcome = route_click(&mut guard, event, now);
            (outcome, guard.state_mut().take_navigation())
        };
        self.navigate(viewer, &session, navigation);
        outcome
    }

    /// Route a drag to the viewer's active session.
    pub fn handle_drag(&self, event: &mut DragEvent) -> ClickOutcome {
        match self.active(event.viewer()) {
            Some(session) => route_drag(&mut session.lock(), event),
            None => ClickOutcome::Ignored,
        }
    }

    /// Deliver typed text to the viewer's active session.
    ///
    /// Only text-capturing grids consume input. Returns whether the event
    /// was handled.
    pub fn handle_text_input(&self, event: &mut TextInputEvent) -> bool {
        let viewer = event.viewer();
        let Some(session) = self.active(viewer) else {
            return false;
        };
        let navigation = {
            let mut guard = session.lock();
            if !guard.grid().captures_text() {
                return false;
            }
            guard.text_input(event.text());
            guard.state_mut().take_navigation()
        };
        event.mark_handled();
        self.navigate(viewer, &session, navigation);
        true
    }

    fn navigate(&self, viewer: ViewerId, session: &SharedSession, navigation: Option<Navigation>) {
        let Some(navigation) = navigation else {
            return;
        };
        if !self.is_active(viewer, session) {
            tracing::trace!(
                target: "horizon_grid::registry",
                %viewer,
                ?navigation,
                "session no longer active, navigation dropped"
            );
            return;
        }
        tracing::trace!(target: "horizon_grid::registry", %viewer, ?navigation, "deferred navigation");
        let result = match navigation {
            Navigation::Close => {
                self.close_session(viewer, session);
                Ok(())
            }
            Navigation::Open(definition) => self
                .open_session(viewer, &definition, OpenOptions::default(), Some(session))
                .map(drop),
            Navigation::Back => self.step(viewer, false).map(drop),
            Navigation::Forward => self.step(viewer, true).map(drop),
        };
        match result {
            Ok(()) => {}
            Err(Error::NotOpen(_)) => tracing::trace!(
                target: "horizon_grid::registry",
                %viewer,
                "viewer left during navigation, navigation dropped"
            ),
            Err(err) => {
                tracing::warn!(target: "horizon_grid::registry", %viewer, %err, "deferred navigation failed")
            }
        }
    }

    fn is_active(&self, viewer: ViewerId, session: &SharedSession) -> bool {
        self.active
            .read()
            .get(&viewer)
            .is_some_and(|current| Arc::ptr_eq(current, session))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(MemoryDisplay)
    }
}

#[cfg(test)]
mod tests {
    use horizon_grid_core::GridType;

    use super::*;
    use crate::components::Pane;

    fn definition() -> ViewDefinition {
        let mut builder = ViewDefinition::builder();
        builder.grid(GridType::HOPPER);
        builder.root(Pane::new());
        builder.build()
    }

    #[test]
    fn test_reopening_active_session_fails() {
        let registry = SessionRegistry::default();
        let viewer = ViewerId::random();
        let session = registry.open(viewer, &definition()).unwrap();
        assert!(matches!(
            registry.reopen(viewer, &session),
            Err(Error::AlreadyOpen(_))
        ));
    }

    #[test]
    fn test_disabled_registry_rejects_open() {
        let registry = SessionRegistry::default();
        let viewer = ViewerId::random();
        let session = registry.open(viewer, &definition()).unwrap();

        registry.disable();
        assert!(!session.lock().is_open());
        assert!(registry.active(viewer).is_none());
        assert!(registry.history(viewer).is_empty());
        assert!(matches!(
            registry.open(viewer, &definition()),
            Err(Error::RegistryDisabled)
        ));

        registry.enable();
        assert!(registry.open(viewer, &definition()).is_ok());
    }

    #[test]
    fn test_open_without_history() {
        let registry = SessionRegistry::default();
        let viewer = ViewerId::random();
        let options = OpenOptions {
            record_history: false,
        };
        registry.open_with(viewer, &definition(), options).unwrap();
        assert!(registry.active(viewer).is_some());
        assert!(registry.history(viewer).is_empty());
        assert!(registry.previous(viewer).is_none());
    }

    #[test]
    fn test_step_without_session() {
        let registry = SessionRegistry::default();
        assert!(matches!(
            registry.back(ViewerId::random()),
            Err(Error::NotOpen(_))
        ));
    }
}
