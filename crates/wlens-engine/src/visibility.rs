//! Page visibility signal.

/// Whether the hosting page is visible.
///
/// Hidden tabs suspend both polling loops; the loops stay alive and resume
/// when the page becomes visible again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Visibility::Visible)
    }

    pub fn is_hidden(self) -> bool {
        matches!(self, Visibility::Hidden)
    }
}
