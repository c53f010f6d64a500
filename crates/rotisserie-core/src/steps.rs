//! Instruction segmentation for guided cooking mode.
//!
//! A recipe's instructions are free text. Cooking mode shows them one step
//! at a time, so the text is split into lines, blank lines are dropped, and
//! leading ordinals such as `"1. "` or `"2)"` are removed.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").expect("newline pattern"));

// "1. ", "2)", "10.": digits then '.' or ')' then optional whitespace
#[allow(clippy::expect_used)]
static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[.)]\s*").expect("ordinal pattern"));

/// Split an instructions blob into ordered steps.
///
/// Empty or all-blank input yields no steps.
///
/// ```
/// use rotisserie_core::segment_instructions;
///
/// let steps = segment_instructions("1. Mix\n2) Bake\n\nServe");
/// assert_eq!(steps, vec!["Mix", "Bake", "Serve"]);
/// ```
#[must_use]
pub fn segment_instructions(text: &str) -> Vec<String> {
    NEWLINES
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| ORDINAL.replace(piece, "").into_owned())
        .collect()
}

/// Navigation and completion state for stepping through a recipe.
///
/// Completion is tracked per step and is independent of the current
/// position: steps can be ticked off in any order and un-ticked again.
#[derive(Debug, Clone, PartialEq)]
pub struct CookingSession {
    steps: Vec<String>,
    current: usize,
    completed: BTreeSet<usize>,
}

impl CookingSession {
    #[must_use]
    pub fn new(steps: Vec<String>) -> Self {
        Self {
            steps,
            current: 0,
            completed: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn from_instructions(text: &str) -> Self {
        Self::new(segment_instructions(text))
    }

    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the current step. Always 0 when there are no steps.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Text of the current step, or `None` if there are no steps.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.steps.get(self.current).map(String::as_str)
    }

    /// Move forward one step. Returns `false` at the last step.
    pub fn next_step(&mut self) -> bool {
        if self.current + 1 < self.steps.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back one step. Returns `false` at the first step.
    pub fn previous_step(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `index`, clamped to the last step.
    pub fn go_to(&mut self, index: usize) {
        self.current = index.min(self.steps.len().saturating_sub(1));
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    /// Flip the completion mark of step `index`.
    ///
    /// Returns the new state, or `None` if `index` is out of range.
    pub fn toggle_complete(&mut self, index: usize) -> Option<bool> {
        if index >= self.steps.len() {
            return None;
        }
        if self.completed.remove(&index) {
            Some(false)
        } else {
            self.completed.insert(index);
            Some(true)
        }
    }

    #[must_use]
    pub fn is_complete(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Position through the recipe as a fraction in `[0.0, 1.0]`.
    ///
    /// Counts the current step as reached, so the first of four steps is
    /// 0.25. A session with no steps reports 0.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        (self.current + 1) as f64 / self.steps.len() as f64
    }
}
