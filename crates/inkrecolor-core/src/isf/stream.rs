//! Top-level stream layout: header, attribute table, stroke tags.

use super::attributes::DrawingAttributes;
use super::packets;
use super::stroke::{Segment, Stroke, StrokeCollection, TableForm};
use super::tags::{self, TagLayout};
use super::varint::{Reader, write_uint};
use super::{CodecError, CodecResult};

pub(crate) fn decode(bytes: &[u8]) -> CodecResult<StrokeCollection> {
    let mut collection = StrokeCollection::new();
    if bytes.is_empty() {
        return Ok(collection);
    }
    collection.framed = true;

    let mut reader = Reader::new(bytes);
    let format = reader.read_uint()?;
    if format != tags::FORMAT_VERSION {
        return Err(CodecError::UnsupportedFormat(format));
    }
    let declared = reader.read_len()?;
    if declared != reader.remaining() {
        return Err(CodecError::SizeMismatch {
            declared,
            actual: reader.remaining(),
        });
    }

    let mut table_seen = false;
    let mut active = 0usize;

    while !reader.is_empty() {
        let start = reader.position();
        let offset = reader.offset();
        let tag = reader.read_uint()?;
        let layout = tags::top_level_layout(tag).ok_or(CodecError::UnknownTag { tag, offset })?;

        match tag {
            tags::DRAW_ATTRS_TABLE | tags::DRAW_ATTRS_BLOCK => {
                if table_seen || !collection.strokes.is_empty() {
                    return Err(CodecError::MisplacedAttributeTable(offset));
                }
                table_seen = true;

                let mut section = reader.sized_section()?;
                if tag == tags::DRAW_ATTRS_TABLE {
                    while !section.is_empty() {
                        let block = section.sized_section()?;
                        collection.attribute_table.push(DrawingAttributes::decode_block(block)?);
                    }
                    collection.table_form = TableForm::Table;
                } else {
                    collection.attribute_table.push(DrawingAttributes::decode_block(section)?);
                    collection.table_form = TableForm::Block;
                }
                collection.segments.push(Segment::AttributeTable);
            }
            tags::DIDX => {
                let index = reader.read_len()?;
                let count = collection.attribute_table.len();
                if index >= count.max(1) {
                    return Err(CodecError::AttributeIndex { index, count });
                }
                active = index;
                collection.segments.push(Segment::AttributeIndex(index));
            }
            tags::STROKE => {
                let section = reader.sized_section()?;
                let body = section.rest().to_vec();
                let points = packets::decode(section)?;

                let (attributes, source) = match collection.attribute_table.get(active) {
                    Some(block) => (block.clone(), Some(active)),
                    None => (DrawingAttributes::default(), None),
                };
                collection.segments.push(Segment::Stroke(collection.strokes.len()));
                collection
                    .strokes
                    .push(Stroke::decoded(points, attributes, body, source));
            }
            _ => {
                skip(&mut reader, layout)?;
                collection
                    .segments
                    .push(Segment::Raw(reader.consumed_since(start).to_vec()));
            }
        }
    }

    log::trace!(
        "decoded ink stream: {} bytes, {} strokes, {} attribute blocks",
        bytes.len(),
        collection.strokes.len(),
        collection.attribute_table.len()
    );
    Ok(collection)
}

fn skip(reader: &mut Reader<'_>, layout: TagLayout) -> CodecResult<()> {
    match layout {
        TagLayout::Sized => reader.sized_section().map(|_| ()),
        TagLayout::Uint => reader.read_uint().map(|_| ()),
        TagLayout::Sints(count) => {
            for _ in 0..count {
                reader.read_sint()?;
            }
            Ok(())
        }
        TagLayout::Floats(count) => reader.skip_f32(count),
    }
}

pub(crate) fn encode(collection: &StrokeCollection) -> Vec<u8> {
    if !collection.framed && collection.segments.is_empty() {
        return Vec::new();
    }

    let (table, assigned) = resolve_attributes(collection);
    let mut table_written = collection
        .segments
        .iter()
        .any(|s| matches!(s, Segment::AttributeTable));
    let mut active = 0usize;
    let mut body = Vec::new();

    for segment in &collection.segments {
        match segment {
            Segment::Raw(bytes) => body.extend_from_slice(bytes),
            Segment::AttributeTable => write_table(&mut body, &table, collection.table_form),
            Segment::AttributeIndex(index) => {
                write_uint(&mut body, tags::DIDX);
                write_uint(&mut body, *index as u64);
                active = *index;
            }
            Segment::Stroke(i) => {
                if !table_written && !table.is_empty() {
                    write_table(&mut body, &table, TableForm::Table);
                    table_written = true;
                }
                if let Some(target) = assigned[*i] {
                    if target != active {
                        write_uint(&mut body, tags::DIDX);
                        write_uint(&mut body, target as u64);
                        active = target;
                    }
                }
                let stroke_body = collection.strokes[*i].body();
                write_uint(&mut body, tags::STROKE);
                write_uint(&mut body, stroke_body.len() as u64);
                body.extend_from_slice(stroke_body);
            }
        }
    }

    let mut out = Vec::with_capacity(body.len() + 8);
    write_uint(&mut out, tags::FORMAT_VERSION);
    write_uint(&mut out, body.len() as u64);
    out.extend(body);
    out
}

/// Build the attribute table to write and the block index of every stroke.
///
/// A block whose strokes all carry the same attributes is rewritten in place,
/// so recoloring every stroke of one block touches nothing else. Strokes that
/// diverge from their block share an equal block or get a new one appended.
fn resolve_attributes(
    collection: &StrokeCollection,
) -> (Vec<DrawingAttributes>, Vec<Option<usize>>) {
    let mut table = collection.attribute_table.clone();

    for (k, block) in table.iter_mut().enumerate() {
        let mut users = collection
            .strokes
            .iter()
            .filter(|s| s.source_attribute == Some(k))
            .map(Stroke::attributes);
        if let Some(first) = users.next() {
            if users.all(|a| a == first) {
                *block = first.clone();
            }
        }
    }

    let needs_table = !table.is_empty()
        || collection
            .strokes
            .iter()
            .any(|s| *s.attributes() != DrawingAttributes::default());
    if !needs_table {
        return (table, vec![None; collection.strokes.len()]);
    }

    let mut assigned = Vec::with_capacity(collection.strokes.len());
    for stroke in &collection.strokes {
        let attributes = stroke.attributes();
        let index = match stroke.source_attribute {
            Some(k) if table[k] == *attributes => k,
            _ => match table.iter().position(|block| block == attributes) {
                Some(i) => i,
                None => {
                    table.push(attributes.clone());
                    table.len() - 1
                }
            },
        };
        assigned.push(Some(index));
    }
    (table, assigned)
}

fn write_table(out: &mut Vec<u8>, table: &[DrawingAttributes], form: TableForm) {
    if form == TableForm::Block && table.len() == 1 {
        let block = table[0].encode_block();
        write_uint(out, tags::DRAW_ATTRS_BLOCK);
        write_uint(out, block.len() as u64);
        out.extend(block);
        return;
    }

    let mut content = Vec::new();
    for attributes in table {
        let block = attributes.encode_block();
        write_uint(&mut content, block.len() as u64);
        content.extend(block);
    }
    write_uint(out, tags::DRAW_ATTRS_TABLE);
    write_uint(out, content.len() as u64);
    out.extend(content);
}
