//! Document-wide stroke recoloring.

use crate::color::InkColor;
use crate::error::{RecolorError, RecolorResult};
use crate::isf::{self, StrokeCollection};
use crate::locator::{self, InkDrawing};
use crate::page::Page;
use serde::{Deserialize, Serialize};

/// Which drawings a recolor pass rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecolorScope {
    /// Every drawing on the page. The selection only picks the color.
    #[default]
    Document,
    /// Only the selected drawing.
    Selection,
}

/// When a matching stroke counts as modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewritePolicy {
    /// Only when the color value actually changes. Recoloring to the same
    /// color modifies nothing.
    #[default]
    Changed,
    /// Whenever a stroke matches, even if the target equals the reference.
    Matched,
}

/// Recolor policy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecolorOptions {
    pub scope: RecolorScope,
    pub rewrite: RewritePolicy,
}

/// Outcome of a recolor pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecolorReport {
    /// Drawings whose payload was rewritten.
    pub elements: usize,
    /// Strokes reassigned across those drawings.
    pub strokes: usize,
}

/// Replace `from` with `to` on every matching stroke. Returns the number of
/// strokes that count as modified under `policy`.
pub fn recolor_strokes(
    strokes: &mut StrokeCollection,
    from: InkColor,
    to: InkColor,
    policy: RewritePolicy,
) -> usize {
    if policy == RewritePolicy::Changed && from == to {
        return 0;
    }

    let mut count = 0;
    for stroke in strokes.iter_mut().filter(|s| s.color() == from) {
        stroke.set_color(to);
        count += 1;
    }
    count
}

/// Recolor drawings of a page in place.
///
/// Every drawing is decoded and recolored before anything is written back, so
/// a payload that fails to decode leaves the page untouched. Drawings with no
/// modified stroke keep their payload text byte-for-byte.
pub fn recolor(
    page: &mut Page,
    drawings: &[InkDrawing],
    from: InkColor,
    to: InkColor,
    policy: RewritePolicy,
) -> RecolorResult<RecolorReport> {
    let mut report = RecolorReport::default();
    let mut rewrites = Vec::new();

    for drawing in drawings {
        let mut strokes =
            isf::decode(locator::payload(page, drawing)).map_err(|source| RecolorError::Codec {
                element: drawing.path.clone(),
                source,
            })?;

        let count = recolor_strokes(&mut strokes, from, to, policy);
        if count > 0 {
            log::debug!("recolored {} strokes in drawing {}", count, drawing.path);
            report.elements += 1;
            report.strokes += count;
            rewrites.push((drawing, isf::encode(&strokes)));
        }
    }

    for (drawing, text) in rewrites {
        if !locator::set_payload(page, drawing, text) {
            log::warn!("drawing {} lost its data node during recolor", drawing.path);
        }
    }
    Ok(report)
}
