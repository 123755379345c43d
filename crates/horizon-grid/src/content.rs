//! Visual content for cells and titles.
//!
//! Horizon Grid never draws anything itself. It decides which cell gets which
//! [`CellContent`] and hands that to the host's [`Surface`](crate::Surface).
//! Rich text is produced by a host-supplied [`MarkupParser`].

use std::fmt;

/// Text ready for the display, produced by a [`MarkupParser`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct RichText(String);

impl RichText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts markup strings into [`RichText`].
pub trait MarkupParser: Send + Sync {
    fn parse(&self, markup: &str) -> RichText;
}

/// A parser that passes markup through verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMarkup;

impl MarkupParser for PlainMarkup {
    fn parse(&self, markup: &str) -> RichText {
        RichText::new(markup)
    }
}

/// A grid title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    /// Already-built rich text.
    Text(RichText),
    /// Markup resolved through the registry's parser when a session opens.
    Markup(String),
}

impl Title {
    pub fn resolve(&self, parser: &dyn MarkupParser) -> RichText {
        match self {
            Self::Text(text) => text.clone(),
            Self::Markup(markup) => parser.parse(markup),
        }
    }
}

impl Default for Title {
    fn default() -> Self {
        Self::Text(RichText::default())
    }
}

/// What one cell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContent {
    /// Host-specific icon key.
    pub icon: String,
    pub label: Option<RichText>,
    pub lore: Vec<RichText>,
    pub amount: u8,
}

impl CellContent {
    pub fn new(icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            label: None,
            lore: Vec::new(),
            amount: 1,
        }
    }

    pub fn with_label(mut self, label: impl Into<RichText>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_lore<I, T>(mut self, lore: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RichText>,
    {
        self.lore = lore.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_amount(mut self, amount: u8) -> Self {
        self.amount = amount;
        self
    }
}
