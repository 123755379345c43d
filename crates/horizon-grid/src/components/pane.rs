use crate::component::Component;

/// A component that renders nothing and only groups its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pane;

impl Pane {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Pane {}
