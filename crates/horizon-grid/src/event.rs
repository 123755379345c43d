//! Interaction events delivered by the host.
//!
//! The host's event source translates its native events into these types
//! and hands them to the [`SessionRegistry`](crate::SessionRegistry). Click
//! and drag events start out uncancelled; routing decides whether the host
//! should let them through.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the user viewing a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(Uuid);

impl ViewerId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// A fresh random viewer id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for ViewerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The structural kind of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionType {
    /// Pick up a whole stack.
    Pickup,
    /// Pick up half a stack.
    PickupHalf,
    /// Place the cursor's contents.
    Place,
    /// Swap the cursor's contents with the cell's.
    Swap,
    /// Move to the other region in one step.
    MoveToOther,
    /// Swap with a hotbar cell via number key.
    HotbarSwap,
    /// Drop one from the cell.
    Drop,
    /// Drop the whole cell.
    DropAll,
    /// Clone the cell's contents.
    Clone,
    /// Collect matching contents onto the cursor.
    Collect,
    /// Spread the cursor across several cells.
    Drag,
    /// Anything the host could not classify.
    Unknown,
}

/// Where a click landed, in raw view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawSlot {
    /// A cell index. Indices past the primary grid belong to the secondary
    /// region.
    Index(usize),
    /// The viewer's cursor itself.
    Cursor,
    /// Outside the grid window.
    Outside,
}

/// A click on a grid.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    viewer: ViewerId,
    slot: RawSlot,
    interaction: InteractionType,
    cancelled: bool,
}

impl ClickEvent {
    pub fn new(viewer: ViewerId, slot: RawSlot, interaction: InteractionType) -> Self {
        Self {
            viewer,
            slot,
            interaction,
            cancelled: false,
        }
    }

    /// Convenience constructor for a click on a raw index.
    pub fn at(viewer: ViewerId, raw: usize, interaction: InteractionType) -> Self {
        Self::new(viewer, RawSlot::Index(raw), interaction)
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn slot(&self) -> RawSlot {
        self.slot
    }

    pub fn interaction(&self) -> InteractionType {
        self.interaction
    }

    /// Whether the host should block this click.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub(crate) fn set_slot(&mut self, slot: RawSlot) {
        self.slot = slot;
    }
}

/// A drag gesture spreading the cursor across several cells.
#[derive(Debug, Clone)]
pub struct DragEvent {
    viewer: ViewerId,
    raw_slots: Vec<usize>,
    cancelled: bool,
}

impl DragEvent {
    pub fn new(viewer: ViewerId, raw_slots: impl IntoIterator<Item = usize>) -> Self {
        Self {
            viewer,
            raw_slots: raw_slots.into_iter().collect(),
            cancelled: false,
        }
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn raw_slots(&self) -> &[usize] {
        &self.raw_slots
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// Text typed into a text-capturing grid.
#[derive(Debug, Clone)]
pub struct TextInputEvent {
    viewer: ViewerId,
    text: String,
    handled: bool,
}

impl TextInputEvent {
    pub fn new(viewer: ViewerId, text: impl Into<String>) -> Self {
        Self {
            viewer,
            text: text.into(),
            handled: false,
        }
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether a session consumed the input.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    pub(crate) fn mark_handled(&mut self) {
        self.handled = true;
    }
}
