/// A bounded window over an ordered key space,
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultWindow {
    /// Keys in the window, strictly increasing,
    ///
    pub items: Vec<String>,
    /// True if the window is full and more keys follow the last one,
    ///
    pub truncated: bool,
}

impl ResultWindow {
    /// Returns the cursor to resume after this window, if more keys follow,
    ///
    pub fn next_cursor(&self) -> Option<&str> {
        if self.truncated {
            self.items.last().map(String::as_str)
        } else {
            None
        }
    }
}

/// Selects up to `n` candidates that sort strictly after `last`,
///
/// Candidates must already be in ascending order. The window is only truncated when it is full
/// and at least one more candidate would have qualified. A page size of 0 always returns an empty,
/// non-truncated window.
///
pub fn page_filter(candidates: &[String], last: &str, n: usize) -> ResultWindow {
    let mut window = ResultWindow::default();
    if n == 0 {
        return window;
    }

    let mut remaining = candidates.iter().filter(|c| c.as_str() > last);
    for candidate in remaining.by_ref() {
        window.items.push(candidate.clone());
        if window.items.len() == n {
            break;
        }
    }

    window.truncated = window.items.len() == n && remaining.next().is_some();
    window
}
