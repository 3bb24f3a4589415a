//! InkRecolor Core Library
//!
//! Page model, ink stroke codec, and the recolor command that replaces one
//! stroke color with another across a page's ink drawings.

pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod isf;
pub mod locator;
pub mod page;
pub mod recolor;
pub mod sampler;

#[cfg(test)]
mod test_support;

pub use color::{InkColor, ParseColorError};
pub use command::{ColorPicker, RecolorInkCommand, RecolorOutcome};
pub use config::{Config, ConfigError};
pub use error::{RecolorError, RecolorResult};
pub use host::{BoxFuture, FileHost, HostError, HostResult, MemoryHost, PageHost};
pub use isf::{CodecError, Stroke, StrokeCollection};
pub use locator::{InkDrawing, InkDrawings, SelectionState};
pub use page::{Element, NodePath, Page, XName};
pub use recolor::{RecolorOptions, RecolorReport, RecolorScope, RewritePolicy};
