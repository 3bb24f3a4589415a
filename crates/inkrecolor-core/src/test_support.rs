//! Page and payload builders shared by unit tests.

use crate::color::InkColor;
use crate::isf::{self, DrawingAttributes, Point, Stroke, StrokeCollection};
use crate::locator::{DATA, INK_DRAWING, SELECTED};
use crate::page::{Element, ONENOTE_NAMESPACE, Page, XName};

pub const RED: InkColor = InkColor::rgb(255, 0, 0);
pub const GREEN: InkColor = InkColor::rgb(0, 255, 0);
pub const BLUE: InkColor = InkColor::rgb(0, 0, 255);

pub fn one(local: &str) -> Element {
    Element::new(XName::new(ONENOTE_NAMESPACE, local))
}

/// Encode one stroke per color, each with distinct geometry.
pub fn payload(colors: &[InkColor]) -> String {
    let mut strokes = StrokeCollection::new();
    for (i, color) in colors.iter().enumerate() {
        let x = i as i32 * 100;
        let attrs = DrawingAttributes::new().with_color(*color).with_pen_size(40);
        let points = vec![Point::new(x, 0), Point::new(x + 30, 45), Point::new(x + 60, 20)];
        strokes.push(Stroke::new(points, attrs).expect("valid stroke"));
    }
    isf::encode(&strokes)
}

pub fn drawing(selected: &str, data: &str) -> Element {
    one(INK_DRAWING)
        .with_attribute(SELECTED, selected)
        .with_child(one(DATA).with_text(data))
}

/// A page whose outline holds the given drawings.
pub fn page(drawings: Vec<Element>) -> Page {
    let outline = drawings
        .into_iter()
        .fold(one("Outline"), |outline, d| outline.with_child(d));
    Page::with_root("page-1", one("Page").with_child(one("Title")).with_child(outline))
}

/// Payload text of every drawing, in document order.
pub fn payloads(page: &Page) -> Vec<String> {
    crate::locator::locate(page)
        .all()
        .iter()
        .map(|d| crate::locator::payload(page, d).to_string())
        .collect()
}

/// Stroke colors of every drawing, in document order.
pub fn colors(page: &Page) -> Vec<Vec<InkColor>> {
    payloads(page)
        .iter()
        .map(|p| isf::decode(p).expect("valid payload").iter().map(Stroke::color).collect())
        .collect()
}
