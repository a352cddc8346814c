//! Locators and logical interaction targets.

use std::fmt;

/// How a selector string is interpreted when searching the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// CSS selector.
    Css,
    /// XPath expression.
    XPath,
    /// Bare tag name (resolved as a CSS type selector).
    Tag,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Css => f.write_str("css"),
            Strategy::XPath => f.write_str("xpath"),
            Strategy::Tag => f.write_str("tag"),
        }
    }
}

/// A rule for finding one UI element: strategy plus selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: String,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            selector: selector.into(),
        }
    }

    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector: selector.into(),
        }
    }

    pub fn tag(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Tag,
            selector: selector.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.strategy, self.selector)
    }
}

/// A logical UI concept resolved through an ordered list of locator
/// candidates, most stable first. Candidates are always tried in order;
/// the winning candidate is never cached between calls.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: &'static str,
    pub candidates: Vec<Locator>,
}

impl Target {
    pub fn new(name: &'static str, candidates: Vec<Locator>) -> Self {
        Self { name, candidates }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} candidates)", self.name, self.candidates.len())
    }
}
