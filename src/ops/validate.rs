//! Title length gate for `add` and `edit`.
//!
//! [`TitleInput`] models an input field for interactive front ends: the
//! pending text, the error currently shown and the `set_text`,
//! `dismiss_error` and `can_submit` transitions. The one-shot CLI only
//! calls [`TitleInput::submit`] and [`validate_title`].

use crate::ops::store::{CommitHook, TaskStore};

/// Shortest accepted title, in characters
pub const MIN_TITLE_LEN: usize = 3;
/// Longest accepted title, in characters
pub const MAX_TITLE_LEN: usize = 255;
/// Length above which a rejected title is reported as too long.
///
/// Lower than `MAX_TITLE_LEN`: titles of 251..=255 characters are accepted.
pub const TOO_LONG_LEN: usize = 250;

/// Why a submitted title was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("input must be at least 3 characters")]
    TooShort,
    #[error("input can't be more than 250 characters")]
    TooLong,
}

/// Character count used for title limits (raw input, not trimmed).
pub fn title_len(title: &str) -> usize {
    title.chars().count()
}

pub fn is_valid_title(title: &str) -> bool {
    (MIN_TITLE_LEN..=MAX_TITLE_LEN).contains(&title_len(title))
}

/// Gate a title before it reaches `add` or `edit`.
pub fn validate_title(title: &str) -> Result<(), TitleError> {
    if is_valid_title(title) {
        return Ok(());
    }
    let len = title_len(title);
    if len < MIN_TITLE_LEN {
        Err(TitleError::TooShort)
    } else {
        debug_assert!(len > TOO_LONG_LEN);
        Err(TitleError::TooLong)
    }
}

/// Pending title text plus the error currently shown for it.
///
/// The error stays until the text changes, a submission succeeds, or it is
/// dismissed. The text is cleared only by a successful submission.
#[derive(Debug, Default)]
pub struct TitleInput {
    text: String,
    error: Option<TitleError>,
}

impl TitleInput {
    pub fn new(text: impl Into<String>) -> Self {
        TitleInput {
            text: text.into(),
            error: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<TitleError> {
        self.error
    }

    /// Replace the pending text. Clears any shown error.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.error = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Whether submitting right now would succeed
    pub fn can_submit(&self) -> bool {
        is_valid_title(&self.text)
    }

    /// Validate and add the pending text as a task, returning its ID.
    pub fn submit<H: CommitHook>(&mut self, store: &mut TaskStore<H>) -> Result<String, TitleError> {
        if let Err(e) = validate_title(&self.text) {
            self.error = Some(e);
            return Err(e);
        }
        let id = store.add(std::mem::take(&mut self.text));
        self.error = None;
        Ok(id)
    }
}
