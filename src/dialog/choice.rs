//! Dialogue choices offered to the player
//!
//! Handles the option list, the selection cursor and the open/close
//! animation of the choice menu.

/// A selectable dialogue option
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Choice {
    /// Display title; empty for important entries
    pub title: String,
    /// Script function run when the option is taken
    pub script_fn: String,
    /// Whether taking the option hands off to trading
    pub is_trade: bool,
    /// Ordering key among the options of one list
    pub sort: i32,
}

impl Choice {
    /// Create a new choice
    pub fn new(title: &str, script_fn: &str) -> Self {
        Self {
            title: title.to_string(),
            script_fn: script_fn.to_string(),
            ..Default::default()
        }
    }

    /// Create an important (auto-selected, untitled) choice
    pub fn important(script_fn: &str) -> Self {
        Self::new("", script_fn)
    }

    /// Mark the choice as a trade handoff
    pub fn with_trade(mut self, is_trade: bool) -> Self {
        self.is_trade = is_trade;
        self
    }

    /// Set the ordering key
    pub fn with_sort(mut self, sort: i32) -> Self {
        self.sort = sort;
        self
    }

    /// Important entries have no title and are taken without player input
    pub fn is_important(&self) -> bool {
        self.title.is_empty()
    }
}

/// Choice list with cursor and menu animation timer
#[derive(Debug, Default)]
pub struct ChoiceList {
    entries: Vec<Choice>,
    cursor: usize,
    anim_time: u64,
}

impl ChoiceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entries and put the cursor on the first one
    pub fn set(&mut self, entries: Vec<Choice>) {
        self.entries = entries;
        self.cursor = 0;
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn entries(&self) -> &[Choice] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Choice> {
        self.entries.get(index)
    }

    /// The first entry, if it is important
    pub fn important_entry(&self) -> Option<&Choice> {
        self.entries.first().filter(|c| c.is_important())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&Choice> {
        self.entries.get(self.cursor)
    }

    /// Move the cursor down, wrapping around
    pub fn next(&mut self) {
        let count = self.entries.len().max(1);
        self.cursor = (self.cursor + 1) % count;
    }

    /// Move the cursor up, wrapping around
    pub fn prev(&mut self) {
        let count = self.entries.len().max(1);
        self.cursor = (self.cursor + count - 1) % count;
    }

    /// Current menu animation time
    pub fn anim_time(&self) -> u64 {
        self.anim_time
    }

    /// Move the menu animation toward `limit` when opening or toward zero
    /// when closing
    pub fn advance_anim(&mut self, dt: u64, opening: bool, limit: u64) {
        if opening {
            self.anim_time = (self.anim_time + dt).min(limit);
        } else {
            self.anim_time = self.anim_time.saturating_sub(dt);
        }
    }

    /// Jump the menu animation to a fixed value
    pub fn set_anim(&mut self, anim_time: u64) {
        self.anim_time = anim_time;
    }

    /// Menu size relative to its full size
    pub fn anim_progress(&self, limit: u64) -> f32 {
        if limit == 0 {
            return 1.0;
        }
        (self.anim_time as f32 / limit as f32).min(1.0)
    }
}
