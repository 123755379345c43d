//! Integration tests for loading view settings from TOML files.

use std::io::Write;

use horizon_grid::{
    ClickEvent, ClickOutcome, Error, InteractionType, MarkupParser, Pane, RichText,
    SessionRegistry, ViewConfig, ViewDefinition, ViewerId,
};
use horizon_grid_core::{Flag, GridKind};

/// Drops `<tag>` markup.
struct StripTags;

impl MarkupParser for StripTags {
    fn parse(&self, markup: &str) -> RichText {
        let mut text = String::new();
        let mut in_tag = false;
        for c in markup.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        RichText::new(text)
    }
}

const WARPS: &str = r#"
title = "<gold>Warps"
global-cooldown-ms = 0
cell-cooldown-ms = 750
flags = ["allow-outside-interaction"]
disabled-interactions = ["hotbar-swap"]

[grid]
kind = "dispenser"
"#;

#[test]
fn test_load_config_and_open() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(WARPS.as_bytes()).unwrap();

    let config = ViewConfig::load(file.path()).unwrap();
    let mut builder = ViewDefinition::builder();
    config.apply(&mut builder).unwrap();
    builder.root(Pane::new());
    let definition = builder.build();

    let registry = SessionRegistry::default().with_markup(StripTags);
    let viewer = ViewerId::random();
    let session = registry.open(viewer, &definition).unwrap();
    {
        let session = session.lock();
        let state = session.state();
        assert_eq!(state.grid().kind(), GridKind::Dispenser);
        assert_eq!(state.title().as_str(), "Warps");
        assert_eq!(state.cell_cooldown().as_millis(), 750);
        assert!(state.has_flag(Flag::ALLOW_OUTSIDE_INTERACTION));
        assert!(state.has_flag(Flag::CLOSE_ON_DISCONNECT));
    }

    let mut swap = ClickEvent::at(viewer, 4, InteractionType::HotbarSwap);
    assert_eq!(registry.handle_click(&mut swap), ClickOutcome::Disabled);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let err = ViewConfig::load(&missing).unwrap_err();
    match err {
        Error::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_negative_cooldown_fails_at_open() {
    let config = ViewConfig::from_toml_str("cell-cooldown-ms = -1\n[grid]\nkind = \"hopper\"").unwrap();
    let mut builder = ViewDefinition::builder();
    config.apply(&mut builder).unwrap();
    builder.root(Pane::new());

    let registry = SessionRegistry::default();
    assert!(matches!(
        registry.open(ViewerId::random(), &builder.build()),
        Err(Error::InvalidDefinition(_))
    ));
}
