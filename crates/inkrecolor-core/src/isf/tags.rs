//! Tag identifiers used in the ink stream.

/// Format identifier written first in every stream.
pub const FORMAT_VERSION: u64 = 0;

pub const INK_SPACE_RECT: u64 = 0;
pub const GUID_TABLE: u64 = 1;
pub const DRAW_ATTRS_TABLE: u64 = 2;
pub const DRAW_ATTRS_BLOCK: u64 = 3;
pub const STROKE_DESC_TABLE: u64 = 4;
pub const STROKE_DESC_BLOCK: u64 = 5;
pub const DIDX: u64 = 9;
pub const STROKE: u64 = 10;
pub const SIDX: u64 = 13;
pub const TRANSFORM_TABLE: u64 = 15;
pub const TRANSFORM: u64 = 16;
pub const TRANSFORM_ISOTROPIC_SCALE: u64 = 17;
pub const TRANSFORM_ANISOTROPIC_SCALE: u64 = 18;
pub const TRANSFORM_ROTATE: u64 = 19;
pub const TRANSFORM_TRANSLATE: u64 = 20;
pub const TRANSFORM_SCALE_AND_TRANSLATE: u64 = 21;
pub const TIDX: u64 = 23;
pub const METRIC_TABLE: u64 = 24;
pub const METRIC_BLOCK: u64 = 25;
pub const MIDX: u64 = 26;
pub const MANTISSA: u64 = 27;
pub const PERSISTENT_FORMAT: u64 = 28;
pub const HIMETRIC_SIZE: u64 = 29;
pub const STROKE_IDS: u64 = 30;

// Drawing attribute properties.
pub const PEN_STYLE: u64 = 67;
pub const COLOR_REF: u64 = 68;
pub const PEN_WIDTH: u64 = 69;
pub const PEN_HEIGHT: u64 = 70;
pub const PEN_TIP: u64 = 71;
pub const DRAWING_FLAGS: u64 = 72;
pub const CURSOR_ID: u64 = 73;
pub const TRANSPARENCY: u64 = 80;
pub const CURVE_FITTING_ERROR: u64 = 81;
pub const RASTER_OPERATION: u64 = 87;

/// First tag id available to custom (GUID table) properties.
pub const FIRST_CUSTOM: u64 = 100;

/// Shape of a top-level tag's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLayout {
    /// `mbuint` size followed by that many bytes.
    Sized,
    /// A single `mbuint`.
    Uint,
    /// A fixed number of `sint` values.
    Sints(usize),
    /// A fixed number of little-endian `f32` values.
    Floats(usize),
}

/// Payload layout of a top-level tag, or `None` if the tag is not allowed there.
pub fn top_level_layout(tag: u64) -> Option<TagLayout> {
    let layout = match tag {
        INK_SPACE_RECT => TagLayout::Sints(4),
        GUID_TABLE | DRAW_ATTRS_TABLE | DRAW_ATTRS_BLOCK | STROKE_DESC_TABLE
        | STROKE_DESC_BLOCK | STROKE | TRANSFORM_TABLE | METRIC_TABLE | METRIC_BLOCK
        | PERSISTENT_FORMAT | HIMETRIC_SIZE | STROKE_IDS => TagLayout::Sized,
        DIDX | SIDX | TIDX | MIDX | TRANSFORM_ROTATE => TagLayout::Uint,
        TRANSFORM => TagLayout::Floats(6),
        TRANSFORM_ISOTROPIC_SCALE => TagLayout::Floats(1),
        TRANSFORM_ANISOTROPIC_SCALE | TRANSFORM_TRANSLATE => TagLayout::Floats(2),
        TRANSFORM_SCALE_AND_TRANSLATE => TagLayout::Floats(4),
        t if t >= FIRST_CUSTOM => TagLayout::Sized,
        _ => return None,
    };
    Some(layout)
}

/// Payload layout of a drawing attribute property, or `None` if unknown.
pub fn property_layout(tag: u64) -> Option<TagLayout> {
    match tag {
        PEN_STYLE | COLOR_REF | PEN_WIDTH | PEN_HEIGHT | PEN_TIP | DRAWING_FLAGS | CURSOR_ID
        | TRANSPARENCY | CURVE_FITTING_ERROR | RASTER_OPERATION => Some(TagLayout::Uint),
        MANTISSA => Some(TagLayout::Sized),
        t if t >= FIRST_CUSTOM => Some(TagLayout::Sized),
        _ => None,
    }
}
