//! Strokes and stroke collections.

use super::attributes::DrawingAttributes;
use super::packets::{self, Transform};
use super::{CodecError, CodecResult};
use crate::color::InkColor;
use kurbo::Rect;

/// A sampled pen position in ink-space units, with optional pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub pressure: Option<i32>,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, pressure: None }
    }

    pub fn with_pressure(x: i32, y: i32, pressure: i32) -> Self {
        Self { x, y, pressure: Some(pressure) }
    }
}

/// One continuous pen gesture.
///
/// Geometry is fixed once constructed; only the color can change. The encoded
/// packet body is kept alongside the points so re-encoding never drifts.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    attributes: DrawingAttributes,
    body: Vec<u8>,
    /// Attribute block this stroke referenced when it was decoded.
    pub(crate) source_attribute: Option<usize>,
}

impl Stroke {
    /// Build a stroke, encoding its points with delta-delta transforms.
    pub fn new(points: Vec<Point>, attributes: DrawingAttributes) -> CodecResult<Self> {
        Self::with_transform(points, attributes, Transform::default())
    }

    /// Build a stroke with an explicit point transform.
    pub fn with_transform(
        points: Vec<Point>,
        attributes: DrawingAttributes,
        transform: Transform,
    ) -> CodecResult<Self> {
        let Some(first) = points.first() else {
            return Err(CodecError::InvalidPackets("stroke has no packets".to_string()));
        };
        let has_pressure = first.pressure.is_some();
        if points.iter().any(|p| p.pressure.is_some() != has_pressure) {
            return Err(CodecError::InvalidPackets(
                "pressure must be present on all points or none".to_string(),
            ));
        }

        let body = packets::encode(&points, transform);
        Ok(Self {
            points,
            attributes,
            body,
            source_attribute: None,
        })
    }

    pub(crate) fn decoded(
        points: Vec<Point>,
        attributes: DrawingAttributes,
        body: Vec<u8>,
        source_attribute: Option<usize>,
    ) -> Self {
        Self {
            points,
            attributes,
            body,
            source_attribute,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn attributes(&self) -> &DrawingAttributes {
        &self.attributes
    }

    pub fn color(&self) -> InkColor {
        self.attributes.color()
    }

    pub fn set_color(&mut self, color: InkColor) {
        self.attributes.set_color(color);
    }

    /// Encoded packet body (the stroke tag's payload).
    pub(crate) fn body(&self) -> &[u8] {
        &self.body
    }

    /// Bounding box of the stroke's points in ink-space units.
    pub fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in iter {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        Rect::new(min_x.into(), min_y.into(), max_x.into(), max_y.into())
    }
}

/// How the attribute table was written in the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TableForm {
    #[default]
    Table,
    /// A lone block without the table wrapper.
    Block,
}

/// Position of a top-level tag in the stream, in original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// A tag the codec does not interpret, kept verbatim (tag id included).
    Raw(Vec<u8>),
    AttributeTable,
    AttributeIndex(usize),
    Stroke(usize),
}

/// The ordered strokes of one ink payload plus the stream layout around them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeCollection {
    pub(crate) strokes: Vec<Stroke>,
    pub(crate) attribute_table: Vec<DrawingAttributes>,
    pub(crate) table_form: TableForm,
    pub(crate) segments: Vec<Segment>,
    /// Whether encoding produces a stream header even with no tags.
    pub(crate) framed: bool,
}

impl StrokeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn first(&self) -> Option<&Stroke> {
        self.strokes.first()
    }

    pub fn get(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Stroke> {
        self.strokes.iter_mut()
    }

    /// Append a stroke after everything already in the stream.
    pub fn push(&mut self, mut stroke: Stroke) {
        stroke.source_attribute = None;
        self.segments.push(Segment::Stroke(self.strokes.len()));
        self.strokes.push(stroke);
        self.framed = true;
    }

    /// Union of all stroke bounds, or `None` for an empty collection.
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .map(Stroke::bounds)
            .reduce(|acc, rect| acc.union(rect))
    }
}
