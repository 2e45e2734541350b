//! Client-side asset requirements for one page render.
//!
//! Every rendered set declares the polyfill script it needs. The collector
//! keeps the first declaration of each path and ignores repeats, so a page
//! with ten sets still includes the script once.

/// Scripts declared during one page render, in first-declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    scripts: Vec<String>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a script. Returns `true` if it was not declared before.
    pub fn javascript(&mut self, path: &str) -> bool {
        if self.scripts.iter().any(|s| s == path) {
            return false;
        }
        self.scripts.push(path.to_string());
        true
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
