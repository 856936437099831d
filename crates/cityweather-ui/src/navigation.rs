//! Navigation requests emitted by screens and the clipboard they may write to.

use std::io::Write;

use base64::Engine;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::route::Route;

/// Where a route is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTarget {
    /// Replace the current tab's screen (top-level navigation)
    Parent,
    /// New background tab
    NewTab,
    /// New tab that takes focus
    NewWindow,
}

/// What a screen asks the shell to do after a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Open { route: Route, target: OpenTarget },
    CopyLink(String),
}

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> std::io::Result<()>;
}

/// Clipboard kept in memory; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> std::io::Result<()> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// Terminal clipboard via the OSC 52 escape sequence.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn set_text(&mut self, text: &str) -> std::io::Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
        write!(self.out, "\x1b]52;c;{encoded}\x07")?;
        self.out.flush()
    }
}
