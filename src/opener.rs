//! Opening portfolio links in the user's browser.

use anyhow::{Context, Result};

/// Something that can show a URL to the user.
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Hands URLs to the platform's default handler without waiting on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        open::that_detached(url).with_context(|| format!("failed to open {url}"))
    }
}
