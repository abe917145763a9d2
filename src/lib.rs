//! FindCore: in-page find engine with regex and fuzzy highlighting
//!
//! A Rust/WASM implementation of the find-on-page content script.
//!
//! # Architecture
//!
//! ## Highlight Engine
//! - `highlight/engine.rs` - HighlightEngine: session state, highlight/navigate/clear
//! - `highlight/matcher.rs` - QueryMatcher: regex, literal and fuzzy ranges per text node
//! - `highlight/scorer.rs` - MatchScorer seam + ApproximateScorer (edit-distance words)
//! - `highlight/range.rs` - MatchRange merging
//! - `highlight/tree.rs` - TextTree trait, container plans
//! - `highlight/web.rs` - WebTree: live DOM via web-sys
//! - `highlight/memory.rs` - MemoryDocument: in-memory tree for tests and hosts
//!
//! ## Command Dispatcher
//! - `dispatch/message.rs` - HIGHLIGHT_TEXT / NAVIGATE_* / CLEAR_HIGHLIGHTS wire types
//! - `dispatch/mod.rs` - CommandDispatcher: `(command) -> reply`
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { PageHighlighter } from 'findcore';
//!
//! await init();
//! const highlighter = new PageHighlighter();
//!
//! highlighter.handleMessage({ type: 'HIGHLIGHT_TEXT', query: 'helo', threshold: 0.4 });
//! // { type: 'SEARCH_RESULTS', total: 1, activeIndex: 0 }
//! highlighter.handleMessage({ type: 'NAVIGATE_NEXT' });
//! highlighter.handleMessage({ type: 'CLEAR_HIGHLIGHTS' });
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod wasm;

pub use config::HighlightConfig;
pub use dispatch::{Command, CommandDispatcher, Reply};
pub use error::{HighlightError, HighlightResult};
pub use highlight::*;
pub use wasm::PageHighlighter;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Install the panic hook and the console logger
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Warn);
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("findcore v{}", env!("CARGO_PKG_VERSION"))
}
