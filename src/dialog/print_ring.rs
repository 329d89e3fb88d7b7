//! Transient status lines
//!
//! A small ring of recently printed lines. All slots share one countdown:
//! when it runs out the oldest line falls off and the countdown restarts,
//! which gives a ticker that fades out one line at a time.

use super::types::{MAX_PRINT, PRINT_TIME};

/// One line of the print ring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintLine {
    pub text: String,
    pub font: String,
}

/// Fixed-capacity ring of transient lines, oldest at index 0
#[derive(Debug, Default)]
pub struct PrintRing {
    slots: [Option<PrintLine>; MAX_PRINT],
    countdown: u64,
}

impl PrintRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line in the newest slot, dropping the oldest one
    ///
    /// Empty text is ignored.
    pub fn push(&mut self, text: &str, font: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.shift(Some(PrintLine {
            text: text.to_string(),
            font: font.to_string(),
        }));
        self.countdown = PRINT_TIME;
        true
    }

    /// Age the ring by `dt`
    pub fn tick(&mut self, dt: u64) {
        if self.countdown < dt {
            self.shift(None);
            self.countdown = PRINT_TIME;
        } else {
            self.countdown -= dt;
        }
    }

    fn shift(&mut self, newest: Option<PrintLine>) {
        self.slots.rotate_left(1);
        self.slots[MAX_PRINT - 1] = newest;
    }

    /// All slots, oldest first; empty slots are `None`
    pub fn slots(&self) -> &[Option<PrintLine>] {
        &self.slots
    }

    /// Occupied slots with their slot index
    pub fn lines(&self) -> impl Iterator<Item = (usize, &PrintLine)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|line| (i, line)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn countdown(&self) -> u64 {
        self.countdown
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(ring: &PrintRing) -> Vec<&str> {
        ring.lines().map(|(_, l)| l.text.as_str()).collect()
    }

    #[test]
    fn test_push_fills_newest_slot() {
        let mut ring = PrintRing::new();
        assert!(ring.push("Gold: 10", "FONT"));

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.slots()[MAX_PRINT - 1].as_ref().unwrap().text, "Gold: 10");
        assert_eq!(ring.countdown(), PRINT_TIME);
    }

    #[test]
    fn test_push_empty_text_ignored() {
        let mut ring = PrintRing::new();
        assert!(!ring.push("", "FONT"));
        assert!(ring.is_empty());
    }

    #[test]
    fn test_overflow_keeps_most_recent() {
        let mut ring = PrintRing::new();
        for i in 0..=MAX_PRINT {
            ring.push(&format!("line {i}"), "FONT");
        }

        assert_eq!(ring.len(), MAX_PRINT);
        assert_eq!(
            texts(&ring),
            vec!["line 1", "line 2", "line 3", "line 4", "line 5"]
        );
    }

    #[test]
    fn test_shared_countdown_evicts_oldest() {
        let mut ring = PrintRing::new();
        ring.push("first", "FONT");
        ring.push("second", "FONT");

        ring.tick(1000);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.countdown(), 500);

        ring.tick(500);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.countdown(), 0);

        // Each expiry shifts every slot one step toward index 0
        ring.tick(1);
        assert_eq!(texts(&ring), vec!["first", "second"]);
        assert_eq!(ring.lines().next().unwrap().0, MAX_PRINT - 3);
        assert_eq!(ring.countdown(), PRINT_TIME);

        ring.tick(PRINT_TIME + 1);
        ring.tick(PRINT_TIME + 1);
        assert_eq!(ring.lines().next().unwrap().0, 0);

        ring.tick(PRINT_TIME + 1);
        assert_eq!(texts(&ring), vec!["second"]);
    }

    #[test]
    fn test_clear() {
        let mut ring = PrintRing::new();
        ring.push("a", "FONT");
        ring.clear();
        assert!(ring.is_empty());
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(
            ops in proptest::collection::vec(prop_oneof![
                Just(None),
                "[a-z]{1,8}".prop_map(Some),
            ], 0..40),
        ) {
            let mut ring = PrintRing::new();
            for op in ops {
                match op {
                    Some(text) => { ring.push(&text, "FONT"); }
                    None => ring.tick(2000),
                }
                prop_assert!(ring.len() <= MAX_PRINT);
            }
        }
    }
}
