//! `<head>` resources injected by the authoring session.
//!
//! Font links for the active brand kit are injected through
//! [`DocumentHead::inject`], which returns a [`HeadGuard`]. Dropping the
//! guard removes exactly the links it added.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct HeadState {
    next_id: AtomicU64,
    links: Mutex<Vec<(u64, String)>>,
}

/// Shared list of injected stylesheet links.
#[derive(Debug, Clone, Default)]
pub struct DocumentHead {
    state: Arc<HeadState>,
}

impl DocumentHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject `hrefs` and return the guard owning them.
    pub fn inject<I, S>(&self, hrefs: I) -> HeadGuard
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.state.next_id.fetch_add(1, Ordering::Relaxed);
        let mut links = self
            .state
            .links
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = links.len();
        links.extend(hrefs.into_iter().map(|href| (id, href.into())));
        debug!("head: injected {} link(s) as #{id}", links.len() - before);
        HeadGuard {
            id,
            state: self.state.clone(),
        }
    }

    /// Currently injected links, in injection order.
    pub fn links(&self) -> Vec<String> {
        self.state
            .links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, href)| href.clone())
            .collect()
    }

    /// `<link>` tags for the current links.
    pub fn render(&self) -> String {
        self.links()
            .iter()
            .map(|href| {
                format!(
                    "<link rel=\"stylesheet\" href=\"{}\">\n",
                    crate::export::escape_html(href)
                )
            })
            .collect()
    }
}

/// Removes its links from the [`DocumentHead`] when dropped.
#[derive(Debug)]
#[must_use = "links are removed as soon as the guard is dropped"]
pub struct HeadGuard {
    id: u64,
    state: Arc<HeadState>,
}

impl Drop for HeadGuard {
    fn drop(&mut self) {
        let mut links = self
            .state
            .links
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        links.retain(|(owner, _)| *owner != self.id);
        debug!("head: released #{}", self.id);
    }
}
