//! Navigation service used by guards and the console.
//! `History` is an in-memory browser history: push, replace, back, forward.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Overwrite the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    pub const PUSH: NavigateOptions = NavigateOptions { replace: false };
    pub const REPLACE: NavigateOptions = NavigateOptions { replace: true };
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, opts: NavigateOptions);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn navigate(&self, path: &str, opts: NavigateOptions) {
        (**self).navigate(path, opts)
    }
}

/// One recorded call to [`Navigator::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub replace: bool,
}

#[derive(Debug)]
struct HistoryInner {
    entries: Vec<String>,
    index: usize,
    log: Vec<Navigation>,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<HistoryInner>,
}

impl Default for History {
    fn default() -> Self { Self::new("/") }
}

impl History {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Mutex::new(HistoryInner { entries: vec![initial.to_string()], index: 0, log: Vec::new() }),
        }
    }

    pub fn current(&self) -> String {
        let h = self.inner.lock();
        h.entries[h.index].clone()
    }

    /// Returns the new current path, or None when already at the first entry.
    pub fn back(&self) -> Option<String> {
        let mut h = self.inner.lock();
        if h.index == 0 { return None; }
        h.index -= 1;
        Some(h.entries[h.index].clone())
    }

    pub fn forward(&self) -> Option<String> {
        let mut h = self.inner.lock();
        if h.index + 1 >= h.entries.len() { return None; }
        h.index += 1;
        Some(h.entries[h.index].clone())
    }

    pub fn entries(&self) -> Vec<String> {
        self.inner.lock().entries.clone()
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.inner.lock().log.clone()
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str, opts: NavigateOptions) {
        let mut h = self.inner.lock();
        if opts.replace {
            let i = h.index;
            h.entries[i] = path.to_string();
        } else {
            let keep = h.index + 1;
            h.entries.truncate(keep);
            h.entries.push(path.to_string());
            h.index += 1;
        }
        h.log.push(Navigation { path: path.to_string(), replace: opts.replace });
        debug!(target: "console", path, replace = opts.replace, "navigate");
    }
}
