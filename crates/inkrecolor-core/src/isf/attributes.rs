//! Drawing attributes (per-stroke rendering metadata).

use super::tags::{self, TagLayout};
use super::varint::{Reader, write_uint};
use super::{CodecError, CodecResult};
use crate::color::InkColor;

/// Pen width and height used when a block does not carry one (HIMETRIC).
pub const DEFAULT_PEN_SIZE: u64 = 53;

/// Value of a single drawing attribute property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Scalar(u64),
    Blob(Vec<u8>),
}

/// One tagged property inside a drawing attribute block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeProperty {
    pub tag: u64,
    pub value: PropertyValue,
}

/// Rendering metadata shared by one or more strokes.
///
/// Properties are kept in stream order so that a block which was not modified
/// serializes back to the same bytes. Color, width and height have typed
/// accessors; everything else rides along untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawingAttributes {
    properties: Vec<AttributeProperty>,
}

impl DrawingAttributes {
    /// Attributes with no explicit properties (opaque black, default pen).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_color`](Self::set_color).
    pub fn with_color(mut self, color: InkColor) -> Self {
        self.set_color(color);
        self
    }

    /// Set the pen width and height to the same value.
    pub fn with_pen_size(mut self, size: u64) -> Self {
        self.set_scalar(tags::PEN_WIDTH, size);
        self.set_scalar(tags::PEN_HEIGHT, size);
        self
    }

    /// Append an arbitrary property.
    pub fn with_property(mut self, tag: u64, value: PropertyValue) -> Self {
        self.properties.push(AttributeProperty { tag, value });
        self
    }

    pub fn properties(&self) -> &[AttributeProperty] {
        &self.properties
    }

    pub fn scalar(&self, tag: u64) -> Option<u64> {
        self.properties.iter().find_map(|p| match (p.tag == tag, &p.value) {
            (true, PropertyValue::Scalar(v)) => Some(*v),
            _ => None,
        })
    }

    /// Stroke color. Alpha comes from the transparency property (`255 - alpha`).
    pub fn color(&self) -> InkColor {
        let colorref = self.scalar(tags::COLOR_REF).unwrap_or(0);
        let transparency = self.scalar(tags::TRANSPARENCY).unwrap_or(0).min(255) as u8;
        InkColor::from_colorref(colorref, 255 - transparency)
    }

    /// Replace the stroke color in place.
    ///
    /// Existing properties keep their position. A transparency property is only
    /// added when the color is not fully opaque.
    pub fn set_color(&mut self, color: InkColor) {
        self.set_scalar(tags::COLOR_REF, color.to_colorref());

        let transparency = u64::from(255 - color.a);
        if transparency != 0 || self.scalar(tags::TRANSPARENCY).is_some() {
            self.set_scalar(tags::TRANSPARENCY, transparency);
        }
    }

    pub fn width(&self) -> u64 {
        self.scalar(tags::PEN_WIDTH).unwrap_or(DEFAULT_PEN_SIZE)
    }

    pub fn height(&self) -> u64 {
        self.scalar(tags::PEN_HEIGHT).unwrap_or(DEFAULT_PEN_SIZE)
    }

    fn set_scalar(&mut self, tag: u64, value: u64) {
        match self.properties.iter_mut().find(|p| p.tag == tag) {
            Some(property) => property.value = PropertyValue::Scalar(value),
            None => self.properties.push(AttributeProperty {
                tag,
                value: PropertyValue::Scalar(value),
            }),
        }
    }

    /// Parse one block body (the bytes after the block's size prefix).
    pub(crate) fn decode_block(mut reader: Reader<'_>) -> CodecResult<Self> {
        let mut properties = Vec::new();
        while !reader.is_empty() {
            let offset = reader.offset();
            let tag = reader.read_uint()?;
            let value = match tags::property_layout(tag) {
                Some(TagLayout::Uint) => PropertyValue::Scalar(reader.read_uint()?),
                Some(TagLayout::Sized) => {
                    let len = reader.read_len()?;
                    PropertyValue::Blob(reader.read_bytes(len)?.to_vec())
                }
                _ => return Err(CodecError::UnknownTag { tag, offset }),
            };
            properties.push(AttributeProperty { tag, value });
        }
        Ok(Self { properties })
    }

    /// Serialize the block body (without a size prefix).
    pub(crate) fn encode_block(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for property in &self.properties {
            write_uint(&mut out, property.tag);
            match &property.value {
                PropertyValue::Scalar(v) => write_uint(&mut out, *v),
                PropertyValue::Blob(bytes) => {
                    write_uint(&mut out, bytes.len() as u64);
                    out.extend_from_slice(bytes);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let attrs = DrawingAttributes::new();
        assert_eq!(attrs.color(), InkColor::black());
        assert_eq!(attrs.width(), DEFAULT_PEN_SIZE);
        assert_eq!(attrs.height(), DEFAULT_PEN_SIZE);
    }

    #[test]
    fn test_opaque_color_adds_no_transparency() {
        let attrs = DrawingAttributes::new().with_color(InkColor::rgb(1, 2, 3));
        assert_eq!(attrs.properties().len(), 1);
        assert_eq!(attrs.color(), InkColor::rgb(1, 2, 3));
    }

    #[test]
    fn test_translucent_color_round_trips_alpha() {
        let color = InkColor::from_argb(100, 1, 2, 3);
        let attrs = DrawingAttributes::new().with_color(color);
        assert_eq!(attrs.scalar(tags::TRANSPARENCY), Some(155));
        assert_eq!(attrs.color(), color);
    }

    #[test]
    fn test_set_color_keeps_property_order() {
        let mut attrs = DrawingAttributes::new()
            .with_pen_size(80)
            .with_color(InkColor::from_argb(128, 255, 0, 0))
            .with_property(tags::PEN_TIP, PropertyValue::Scalar(1));
        let before: Vec<u64> = attrs.properties().iter().map(|p| p.tag).collect();

        attrs.set_color(InkColor::rgb(0, 255, 0));

        let after: Vec<u64> = attrs.properties().iter().map(|p| p.tag).collect();
        assert_eq!(before, after);
        assert_eq!(attrs.color(), InkColor::rgb(0, 255, 0));
        assert_eq!(attrs.scalar(tags::TRANSPARENCY), Some(0));
        assert_eq!(attrs.width(), 80);
    }

    #[test]
    fn test_block_round_trip() {
        let attrs = DrawingAttributes::new()
            .with_color(InkColor::from_argb(200, 10, 20, 30))
            .with_pen_size(106)
            .with_property(tags::MANTISSA, PropertyValue::Blob(vec![0, 1, 2]))
            .with_property(120, PropertyValue::Blob(vec![0xAA; 3]));
        let bytes = attrs.encode_block();
        let decoded = DrawingAttributes::decode_block(Reader::new(&bytes)).unwrap();
        assert_eq!(decoded, attrs);
        assert_eq!(decoded.encode_block(), bytes);
    }

    #[test]
    fn test_unknown_property_is_error() {
        let bytes = [50, 1];
        let err = DrawingAttributes::decode_block(Reader::new(&bytes)).unwrap_err();
        assert_eq!(err, CodecError::UnknownTag { tag: 50, offset: 0 });
    }
}
