//! Locating ink drawings in a page.

use crate::error::RecolorError;
use crate::page::{NodePath, Page};

/// Element name of an ink drawing.
pub const INK_DRAWING: &str = "InkDrawing";
/// Child element holding the base64 ink payload.
pub const DATA: &str = "Data";
/// Selection state attribute.
pub const SELECTED: &str = "selected";

/// How much of a drawing the user has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    None,
    Partial,
    All,
}

impl SelectionState {
    /// Interpret a `selected` attribute value. Missing or unknown values read as `None`.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("all") => Self::All,
            Some("partial") => Self::Partial,
            Some("none") | None => Self::None,
            Some(other) => {
                log::debug!("unknown selection state '{}', treating as none", other);
                Self::None
            }
        }
    }
}

/// One ink drawing found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InkDrawing {
    pub path: NodePath,
    pub selection: SelectionState,
}

/// All ink drawings of a page, in document order, plus the selected one.
#[derive(Debug, Clone, Default)]
pub struct InkDrawings {
    drawings: Vec<InkDrawing>,
    selected: Option<usize>,
}

impl InkDrawings {
    pub fn all(&self) -> &[InkDrawing] {
        &self.drawings
    }

    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    /// The first drawing whose selection state is `all`.
    pub fn selected(&self) -> Option<&InkDrawing> {
        self.selected.map(|i| &self.drawings[i])
    }

    pub fn require_selected(&self) -> Result<&InkDrawing, RecolorError> {
        self.selected().ok_or(RecolorError::NoSelection)
    }
}

/// Scan a page for ink drawings.
pub fn locate(page: &Page) -> InkDrawings {
    let drawings: Vec<InkDrawing> = page
        .descendants(&page.name(INK_DRAWING))
        .into_iter()
        .filter_map(|path| {
            let element = page.element(&path)?;
            let selection = SelectionState::from_attribute(element.attribute(SELECTED));
            Some(InkDrawing { path, selection })
        })
        .collect();

    let selected = drawings
        .iter()
        .position(|d| d.selection == SelectionState::All);

    log::debug!(
        "found {} ink drawings, selected: {}",
        drawings.len(),
        selected.map_or_else(|| "none".to_string(), |i| drawings[i].path.to_string())
    );
    InkDrawings { drawings, selected }
}

/// Payload text of a drawing. A drawing without a `Data` child has an empty payload.
pub fn payload<'a>(page: &'a Page, drawing: &InkDrawing) -> &'a str {
    page.element(&drawing.path)
        .and_then(|element| element.child(&page.name(DATA)))
        .map_or("", |data| data.text())
}

/// Overwrite a drawing's payload text. Returns false if the drawing has no `Data` child.
pub fn set_payload(page: &mut Page, drawing: &InkDrawing, text: String) -> bool {
    let data = page.name(DATA);
    match page
        .element_mut(&drawing.path)
        .and_then(|element| element.child_mut(&data))
    {
        Some(element) => {
            element.text = Some(text);
            true
        }
        None => false,
    }
}
