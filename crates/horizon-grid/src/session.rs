//! Sessions: one open grid for one viewer.
//!
//! A [`Session`] owns its own copy of the view's component tree and a
//! [`SessionState`] holding everything the components render into: cell
//! content (through the [`Surface`]), click handlers, flags, the
//! disabled-interaction set and cooldown timestamps.
//!
//! Sessions are created and registered by the
//! [`SessionRegistry`](crate::SessionRegistry); they are shared as
//! [`SharedSession`] handles.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_grid_core::{Cell, ComponentId, Flag, FlagSet, GridType, PerfSpan};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::component::{AsAny, Component, Tree, ViewContext};
use crate::content::{CellContent, RichText};
use crate::definition::ViewDefinition;
use crate::element::{CellElement, ClickHandler, Element, Item};
use crate::error::{Error, Result};
use crate::event::{InteractionType, ViewerId};
use crate::surface::Surface;

/// A session handle shared between the registry and its callers.
pub type SharedSession = Arc<Mutex<Session>>;

/// Unique identity of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A navigation step requested from inside a click handler.
///
/// The registry performs it once the session lock is released.
#[derive(Debug, Clone)]
pub enum Navigation {
    Close,
    Open(Box<ViewDefinition>),
    Back,
    Forward,
}

/// The mutable state of a session, shared by all of its components.
pub struct SessionState {
    id: SessionId,
    viewer: ViewerId,
    grid: GridType,
    title: RichText,
    surface: Box<dyn Surface>,
    handlers: HashMap<Cell, ClickHandler>,
    flags: FlagSet,
    disabled: HashSet<InteractionType>,
    global_cooldown: Duration,
    cell_cooldown: Duration,
    next_click: Option<Instant>,
    next_cell_click: HashMap<Cell, Instant>,
    input_text: String,
    open: bool,
    navigation: Option<Navigation>,
}

impl SessionState {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn grid(&self) -> GridType {
        self.grid
    }

    pub fn title(&self) -> &RichText {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<RichText>) {
        self.title = title.into();
        self.surface.set_title(self.title.clone());
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    // =========================================================================
    // Cells
    // =========================================================================

    pub fn content(&self, cell: Cell) -> Option<CellContent> {
        self.surface.cell(cell)
    }

    pub fn set_content(&mut self, cell: Cell, content: Option<CellContent>) {
        self.surface.set_cell(cell, content);
    }

    pub fn handler(&self, cell: Cell) -> Option<ClickHandler> {
        self.handlers.get(&cell).cloned()
    }

    pub fn set_handler(&mut self, cell: Cell, handler: ClickHandler) {
        self.handlers.insert(cell, handler);
    }

    pub fn remove_handler(&mut self, cell: Cell) {
        self.handlers.remove(&cell);
    }

    /// Render `item` into `cell`, replacing both content and handler.
    pub fn set_item(&mut self, cell: Cell, item: Item) {
        let (content, handler) = item.into_parts();
        self.set_content(cell, content);
        match handler {
            Some(handler) => self.set_handler(cell, handler),
            None => self.remove_handler(cell),
        }
    }

    /// Clear a cell's content and handler.
    pub fn clear(&mut self, cell: Cell) {
        self.set_item(cell, Item::empty());
    }

    /// A live element for `cell`.
    pub fn element(&mut self, cell: Cell) -> Element<'_> {
        Element::Cell(CellElement::new(self, cell))
    }

    // =========================================================================
    // Flags and interactions
    // =========================================================================

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(flag)
    }

    pub fn disabled_interactions(&self) -> &HashSet<InteractionType> {
        &self.disabled
    }

    pub fn disabled_interactions_mut(&mut self) -> &mut HashSet<InteractionType> {
        &mut self.disabled
    }

    // =========================================================================
    // Cooldowns
    // =========================================================================

    pub fn global_cooldown(&self) -> Duration {
        self.global_cooldown
    }

    pub fn set_global_cooldown(&mut self, cooldown: Duration) {
        self.global_cooldown = cooldown;
    }

    pub fn cell_cooldown(&self) -> Duration {
        self.cell_cooldown
    }

    pub fn set_cell_cooldown(&mut self, cooldown: Duration) {
        self.cell_cooldown = cooldown;
    }

    /// Whether a click on `cell` at `now` is blocked by either cooldown.
    pub fn is_cooling_down(&self, cell: Cell, now: Instant) -> bool {
        self.next_click.is_some_and(|next| now < next)
            || self.next_cell_click.get(&cell).is_some_and(|&next| now < next)
    }

    /// Forget all cooldown timestamps.
    pub fn reset_cooldowns(&mut self) {
        self.next_click = None;
        self.next_cell_click.clear();
    }

    pub(crate) fn stamp_click(&mut self, cell: Cell, now: Instant) {
        self.next_click = Some(now + self.global_cooldown);
        self.next_cell_click.insert(cell, now + self.cell_cooldown);
    }

    // =========================================================================
    // Text input
    // =========================================================================

    /// The latest text typed into a text-capturing grid.
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub(crate) fn set_input_text(&mut self, text: &str) {
        self.input_text = text.to_string();
        self.surface.set_input_text(text);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Close this session once the current event is done.
    pub fn request_close(&mut self) {
        self.navigation = Some(Navigation::Close);
    }

    /// Open another view for this viewer once the current event is done.
    pub fn request_open(&mut self, definition: ViewDefinition) {
        self.navigation = Some(Navigation::Open(Box::new(definition)));
    }

    /// Go back in history once the current event is done.
    pub fn request_back(&mut self) {
        self.navigation = Some(Navigation::Back);
    }

    /// Go forward in history once the current event is done.
    pub fn request_forward(&mut self) {
        self.navigation = Some(Navigation::Forward);
    }

    pub(crate) fn take_navigation(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }
}

/// One open grid instance for one viewer.
pub struct Session {
    state: SessionState,
    tree: Tree,
    root: ComponentId,
}

impl Session {
    /// Build a session from an already instantiated definition.
    pub(crate) fn new(
        viewer: ViewerId,
        definition: ViewDefinition,
        title: RichText,
        surface: Box<dyn Surface>,
    ) -> Result<Self> {
        let ViewDefinition {
            settings,
            tree,
            root,
        } = definition;
        settings.validate()?;
        let grid = settings
            .grid
            .ok_or_else(|| Error::invalid_definition("no grid type set"))?;
        let root = root
            .filter(|&root| tree.contains(root))
            .ok_or_else(|| Error::invalid_definition("no root component set"))?;

        let mut flags = settings.flags;
        flags.insert(Flag::CLOSE_ON_DISCONNECT);

        let state = SessionState {
            id: SessionId::random(),
            viewer,
            grid,
            title,
            surface,
            handlers: HashMap::new(),
            flags,
            disabled: settings.disabled,
            global_cooldown: millis(settings.global_cooldown_ms),
            cell_cooldown: millis(settings.cell_cooldown_ms),
            next_click: None,
            next_cell_click: HashMap::new(),
            input_text: String::new(),
            open: false,
            navigation: None,
        };
        Ok(Self { state, tree, root })
    }

    pub fn id(&self) -> SessionId {
        self.state.id
    }

    pub fn viewer(&self) -> ViewerId {
        self.state.viewer
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    /// Borrow a component of this session as its concrete type.
    pub fn component<T: 'static>(&self, id: ComponentId) -> Option<&T> {
        self.tree.downcast::<T>(id)
    }

    /// Mutably borrow a component of this session as its concrete type.
    pub fn component_mut<T: 'static>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.tree.downcast_mut::<T>(id)
    }

    /// The first component of type `T` in this session's tree.
    pub fn find<T: 'static>(&self) -> Option<ComponentId> {
        self.tree.find_first::<T>(self.root).ok().flatten()
    }

    /// Run `f` on every component in pre-order.
    ///
    /// Each component is taken out of the tree while `f` runs on it, so
    /// the context sees the rest of the tree but not the component itself.
    pub fn broadcast<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn Component, &mut ViewContext<'_>),
    {
        let order = match self.tree.depth_first_preorder(self.root) {
            Ok(order) => order,
            Err(err) => {
                tracing::warn!(target: "horizon_grid::session", %err, "broadcast on broken tree");
                return;
            }
        };
        for id in order {
            let Some(mut component) = self.tree.take(id) else {
                continue;
            };
            {
                let mut cx = ViewContext::new(id, &self.tree, &mut self.state);
                f(component.as_mut(), &mut cx);
            }
            self.tree.restore(id, component);
        }
    }

    /// Run `f` on one component with a view context.
    pub fn with_component<T, R, F>(&mut self, id: ComponentId, f: F) -> Result<R>
    where
        T: 'static,
        F: FnOnce(&mut T, &mut ViewContext<'_>) -> R,
    {
        let Some(mut component) = self.tree.take(id) else {
            return Err(Error::component_mismatch::<T>(id));
        };
        let result = match AsAny::as_any_mut(&mut *component).downcast_mut::<T>() {
            Some(typed) => {
                let mut cx = ViewContext::new(id, &self.tree, &mut self.state);
                Ok(f(typed, &mut cx))
            }
            None => Err(Error::component_mismatch::<T>(id)),
        };
        self.tree.restore(id, component);
        result
    }

    /// Rebuild and re-render the whole tree.
    pub fn update(&mut self) {
        let _perf = PerfSpan::new("session_update");
        self.broadcast(|component, cx| component.on_update(cx));
    }

    pub(crate) fn open(&mut self) {
        self.state.open = true;
        tracing::debug!(
            target: "horizon_grid::session",
            session = %self.state.id,
            viewer = %self.state.viewer,
            grid = %self.state.grid,
            "session opened"
        );
        self.broadcast(|component, cx| component.on_open(cx));
        self.update();
    }

    /// Run the close callbacks and take the surface down. Returns `false`
    /// if the session was not open.
    pub(crate) fn close(&mut self) -> bool {
        if !self.state.open {
            return false;
        }
        self.broadcast(|component, cx| component.on_close(cx));
        self.state.surface.close();
        self.state.open = false;
        self.state.navigation = None;
        tracing::debug!(
            target: "horizon_grid::session",
            session = %self.state.id,
            viewer = %self.state.viewer,
            "session closed"
        );
        true
    }

    /// Mark the session closed without running callbacks.
    pub(crate) fn discard(&mut self) {
        if self.state.open {
            self.state.surface.close();
            self.state.open = false;
        }
        self.state.navigation = None;
    }

    /// Swap in a fresh surface before the session is reopened.
    ///
    /// The new surface starts blank, so handlers and typed text from the
    /// previous run are dropped with the old one.
    pub(crate) fn attach_surface(&mut self, surface: Box<dyn Surface>) {
        self.state.surface = surface;
        self.state.handlers.clear();
        self.state.input_text.clear();
        self.state.reset_cooldowns();
    }

    pub(crate) fn title(&self) -> &RichText {
        &self.state.title
    }

    pub(crate) fn grid(&self) -> GridType {
        self.state.grid
    }

    /// Feed typed text to the session.
    pub(crate) fn text_input(&mut self, text: &str) {
        self.state.set_input_text(text);
        self.broadcast(|component, cx| component.on_text_input(text, cx));
        self.update();
    }

    pub(crate) fn cooldown_triggered(&mut self, cell: Cell) {
        self.broadcast(|component, cx| component.on_cooldown(cell, cx));
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.state.id)
            .field("viewer", &self.state.viewer)
            .field("grid", &self.state.grid)
            .field("open", &self.state.open)
            .field("components", &self.tree.len())
            .finish()
    }
}

fn millis(ms: i64) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Pane;
    use crate::surface::MemorySurface;

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Component for Recorder {
        fn on_open(&mut self, _cx: &mut ViewContext<'_>) {
            self.events.lock().push("open");
        }

        fn on_update(&mut self, cx: &mut ViewContext<'_>) {
            self.events.lock().push("update");
            cx.set_item(Cell::primary(0), Item::new(CellContent::new("stone")));
        }

        fn on_close(&mut self, _cx: &mut ViewContext<'_>) {
            self.events.lock().push("close");
        }
    }

    fn session(recorder: Recorder, cooldown_ms: i64) -> Session {
        let mut builder = ViewDefinition::builder();
        builder
            .grid(GridType::HOPPER)
            .global_cooldown_ms(cooldown_ms)
            .cell_cooldown_ms(cooldown_ms);
        let root = builder.root(Pane::new());
        builder.child(root, recorder).unwrap();
        let definition = builder.build().instantiate().unwrap();
        let surface = Box::new(MemorySurface::new(GridType::HOPPER, RichText::new("t")));
        Session::new(ViewerId::random(), definition, RichText::new("t"), surface).unwrap()
    }

    #[test]
    fn test_lifecycle_order() {
        let recorder = Recorder::default();
        let events = recorder.events.clone();
        let mut session = session(recorder, 0);

        session.open();
        assert!(session.is_open());
        assert!(session.state().content(Cell::primary(0)).is_some());
        assert!(session.close());
        assert!(!session.close());

        assert_eq!(*events.lock(), vec!["open", "update", "close"]);
        assert!(session.state().flags().contains(Flag::CLOSE_ON_DISCONNECT));
    }

    #[test]
    fn test_cooldown_window() {
        let mut session = session(Recorder::default(), 100);
        let now = Instant::now();
        let cell = Cell::primary(1);

        assert!(!session.state().is_cooling_down(cell, now));
        session.state_mut().stamp_click(cell, now);
        assert!(session.state().is_cooling_down(cell, now + Duration::from_millis(50)));
        assert!(session.state().is_cooling_down(Cell::primary(2), now));
        assert!(!session.state().is_cooling_down(cell, now + Duration::from_millis(100)));
    }

    #[test]
    fn test_with_component_type_mismatch() {
        let mut session = session(Recorder::default(), 0);
        let root = session.root();
        assert!(session.with_component::<Pane, _, _>(root, |_, _| ()).is_ok());
        assert!(matches!(
            session.with_component::<Recorder, _, _>(root, |_, _| ()),
            Err(Error::ComponentMismatch { .. })
        ));
        assert!(session.component::<Pane>(root).is_some());
    }

    #[test]
    fn test_fresh_surface_drops_stale_handlers() {
        let mut session = session(Recorder::default(), 0);
        session.open();
        let stray = Cell::primary(3);
        session
            .state_mut()
            .set_handler(stray, crate::element::handler(|cx| cx.close()));
        session.state_mut().set_input_text("old");
        session.close();

        let surface = Box::new(MemorySurface::new(GridType::HOPPER, RichText::new("t")));
        session.attach_surface(surface);
        assert!(session.state().handler(stray).is_none());
        assert_eq!(session.state().input_text(), "");

        session.open();
        assert!(session.state().handler(stray).is_none());
        assert!(session.state().content(Cell::primary(0)).is_some());
    }

    #[test]
    fn test_navigation_request() {
        let mut session = session(Recorder::default(), 0);
        session.state_mut().request_back();
        assert!(matches!(session.state_mut().take_navigation(), Some(Navigation::Back)));
        assert!(session.state_mut().take_navigation().is_none());
    }
}
