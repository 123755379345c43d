//! Integration tests for session lifecycle, history and registry events.

use std::sync::Arc;

use horizon_grid::{
    CellContent, ClickEvent, ClickOutcome, Component, Error, InteractionType, Item, Pane,
    SessionRegistry, TextField, TextInputEvent, ViewContext, ViewDefinition, ViewSettings, ViewerId,
};
use horizon_grid_core::{Cell, Flag, GridType};
use parking_lot::Mutex;

type Log = Arc<Mutex<Vec<String>>>;

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone)]
struct Lifecycle {
    name: &'static str,
    log: Log,
    keep_on_disconnect: bool,
}

impl Lifecycle {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            keep_on_disconnect: false,
        }
    }
}

impl Component for Lifecycle {
    fn on_open(&mut self, cx: &mut ViewContext<'_>) {
        self.log.lock().push(format!("{}:open", self.name));
        if self.keep_on_disconnect {
            cx.flags_mut().remove(Flag::CLOSE_ON_DISCONNECT);
        }
    }

    fn on_close(&mut self, _cx: &mut ViewContext<'_>) {
        self.log.lock().push(format!("{}:close", self.name));
    }
}

fn view<C: Component>(grid: GridType, component: C) -> ViewDefinition {
    let mut builder = ViewDefinition::builder();
    builder.grid(grid);
    let root = builder.root(Pane::new());
    builder.child(root, component).unwrap();
    builder.build()
}

#[test]
fn test_open_closes_previous_session_first() {
    setup();
    let log = Log::default();
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();

    let first = registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("a", &log)))
        .unwrap();
    let second = registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("b", &log)))
        .unwrap();

    assert_eq!(*log.lock(), vec!["a:open", "a:close", "b:open"]);
    assert!(!first.lock().is_open());
    assert!(second.lock().is_open());
    assert!(Arc::ptr_eq(&registry.active(viewer).unwrap(), &second));
    assert_eq!(registry.history(viewer).len(), 2);
}

#[test]
fn test_invalid_definition_is_rejected() {
    let registry = SessionRegistry::default();
    let mut builder = ViewDefinition::builder();
    builder.grid(GridType::HOPPER).global_cooldown_ms(-5);
    builder.root(Pane::new());

    let result = registry.open(ViewerId::random(), &builder.build());
    assert!(matches!(result, Err(Error::InvalidDefinition(_))));
}

#[test]
fn test_history_back_and_forward() {
    let log = Log::default();
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();

    let a = registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("a", &log)))
        .unwrap();
    let b = registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("b", &log)))
        .unwrap();
    let c = registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("c", &log)))
        .unwrap();

    assert!(Arc::ptr_eq(&registry.previous(viewer).unwrap(), &b));
    assert!(registry.next(viewer).is_none());

    assert!(registry.back(viewer).unwrap());
    assert!(Arc::ptr_eq(&registry.active(viewer).unwrap(), &b));
    assert!(b.lock().is_open());
    assert!(Arc::ptr_eq(&registry.next(viewer).unwrap(), &c));
    assert_eq!(registry.history(viewer).len(), 3);

    assert!(registry.back(viewer).unwrap());
    assert!(Arc::ptr_eq(&registry.active(viewer).unwrap(), &a));
    assert!(registry.previous(viewer).is_none());
    assert!(!registry.back(viewer).unwrap());

    assert!(registry.forward(viewer).unwrap());
    assert!(Arc::ptr_eq(&registry.active(viewer).unwrap(), &b));
    assert_eq!(log.lock().iter().filter(|e| *e == "b:open").count(), 3);
}

#[test]
fn test_open_from_middle_of_history_keeps_later_entries() {
    let log = Log::default();
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();

    registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("a", &log)))
        .unwrap();
    registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("b", &log)))
        .unwrap();
    registry.back(viewer).unwrap();
    let d = registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("d", &log)))
        .unwrap();

    let history = registry.history(viewer);
    assert_eq!(history.len(), 3);
    assert!(Arc::ptr_eq(&history[2], &d));
    // "b" stays in history even though "d" was opened from "a".
    assert!(Arc::ptr_eq(&registry.previous(viewer).unwrap(), &history[1]));
}

#[test]
fn test_close_and_client_side_close() {
    let log = Log::default();
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();

    registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("a", &log)))
        .unwrap();
    registry.close(viewer).unwrap();
    assert!(registry.active(viewer).is_none());
    assert!(matches!(registry.close(viewer), Err(Error::NotOpen(_))));

    registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("b", &log)))
        .unwrap();
    assert!(registry.handle_grid_closed(viewer));
    assert!(!registry.handle_grid_closed(viewer));

    assert_eq!(*log.lock(), vec!["a:open", "a:close", "b:open", "b:close"]);
    assert_eq!(registry.history(viewer).len(), 2);
}

#[test]
fn test_disconnect_drops_session_and_history() {
    let log = Log::default();
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();

    registry
        .open(viewer, &view(GridType::HOPPER, Lifecycle::new("a", &log)))
        .unwrap();
    registry.disconnect(viewer);

    assert!(registry.active(viewer).is_none());
    assert!(registry.history(viewer).is_empty());
    assert_eq!(*log.lock(), vec!["a:open", "a:close"]);
}

#[test]
fn test_disconnect_without_close_flag_skips_callbacks() {
    let log = Log::default();
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();

    let mut component = Lifecycle::new("a", &log);
    component.keep_on_disconnect = true;
    let session = registry.open(viewer, &view(GridType::HOPPER, component)).unwrap();
    registry.disconnect(viewer);

    assert_eq!(*log.lock(), vec!["a:open"]);
    assert!(!session.lock().is_open());
}

#[test]
fn test_handler_navigation_is_deferred() {
    let log = Log::default();
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();

    let target = view(GridType::HOPPER, Lifecycle::new("target", &log));
    let mut builder = ViewDefinition::builder();
    builder.grid(GridType::HOPPER);
    builder.root(horizon_grid::CellProducers::new().produce(0, move |_| {
        let target = target.clone();
        Item::new(CellContent::new("compass")).on_click(move |cx| cx.open(target.clone()))
    }));
    let menu = registry.open(viewer, &builder.build()).unwrap();

    let mut click = ClickEvent::at(viewer, 0, InteractionType::Pickup);
    assert_eq!(registry.handle_click(&mut click), ClickOutcome::Handled);

    assert!(!menu.lock().is_open());
    assert_eq!(*log.lock(), vec!["target:open"]);

    let mut stray = ClickEvent::at(viewer, 0, InteractionType::Pickup);
    assert_eq!(registry.handle_click(&mut stray), ClickOutcome::NoHandler);
    assert_eq!(registry.history(viewer).len(), 2);
    assert!(registry.back(viewer).unwrap());
    assert!(Arc::ptr_eq(&registry.active(viewer).unwrap(), &menu));
}

/// Disconnects its viewer while its view is being instantiated.
#[derive(Clone)]
struct LeaveWhileOpening {
    registry: Arc<SessionRegistry>,
    viewer: ViewerId,
}

impl Component for LeaveWhileOpening {
    fn modify_definition(&mut self, _settings: &mut ViewSettings) {
        self.registry.disconnect(self.viewer);
    }
}

#[test]
fn test_deferred_open_dropped_after_disconnect() {
    setup();
    let registry = Arc::new(SessionRegistry::default());
    let viewer = ViewerId::random();

    let target = view(
        GridType::HOPPER,
        LeaveWhileOpening {
            registry: Arc::clone(&registry),
            viewer,
        },
    );
    let mut builder = ViewDefinition::builder();
    builder.grid(GridType::HOPPER);
    builder.root(horizon_grid::CellProducers::new().produce(0, move |_| {
        let target = target.clone();
        Item::new(CellContent::new("compass")).on_click(move |cx| cx.open(target.clone()))
    }));
    let menu = registry.open(viewer, &builder.build()).unwrap();

    let mut click = ClickEvent::at(viewer, 0, InteractionType::Pickup);
    assert_eq!(registry.handle_click(&mut click), ClickOutcome::Handled);

    assert!(registry.active(viewer).is_none());
    assert!(registry.history(viewer).is_empty());
    assert!(!menu.lock().is_open());
}

#[test]
fn test_text_input_reaches_text_field() {
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();

    let field = TextField::new()
        .with_placeholder(CellContent::new("name_tag"))
        .on_change(|text, cx| {
            cx.set_item(Cell::primary(2), Item::new(CellContent::new("paper").with_label(text)));
        });
    let mut builder = ViewDefinition::builder();
    builder.grid(GridType::ANVIL);
    let root = builder.root(field);
    let session = registry.open(viewer, &builder.build()).unwrap();

    let mut input = TextInputEvent::new(viewer, "diamond");
    assert!(registry.handle_text_input(&mut input));
    assert!(input.is_handled());

    let session = session.lock();
    assert_eq!(session.state().input_text(), "diamond");
    assert_eq!(session.component::<TextField>(root).unwrap().text(), "diamond");
    assert_eq!(session.state().content(Cell::primary(0)).unwrap().icon, "name_tag");
    let output = session.state().content(Cell::primary(2)).unwrap();
    assert_eq!(output.label.unwrap().as_str(), "diamond");
}

#[test]
fn test_text_input_ignored_by_other_grids() {
    let registry = SessionRegistry::default();
    let viewer = ViewerId::random();
    registry
        .open(viewer, &view(GridType::HOPPER, TextField::new()))
        .unwrap();

    let mut input = TextInputEvent::new(viewer, "ignored");
    assert!(!registry.handle_text_input(&mut input));
    assert!(!input.is_handled());

    let mut stray = TextInputEvent::new(ViewerId::random(), "nobody");
    assert!(!registry.handle_text_input(&mut stray));
}
