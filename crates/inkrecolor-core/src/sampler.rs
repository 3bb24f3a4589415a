//! Reference color sampling.

use crate::color::InkColor;
use crate::error::{RecolorError, RecolorResult};
use crate::isf::StrokeCollection;

/// Color of the first stroke, which defines what gets replaced.
pub fn sample_color(strokes: &StrokeCollection) -> RecolorResult<InkColor> {
    strokes
        .first()
        .map(|stroke| stroke.color())
        .ok_or(RecolorError::NoStrokesFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isf::{DrawingAttributes, Point, Stroke};

    #[test]
    fn test_samples_first_stroke_only() {
        let mut strokes = StrokeCollection::new();
        for color in [InkColor::rgb(9, 9, 9), InkColor::rgb(255, 0, 0)] {
            let attrs = DrawingAttributes::new().with_color(color);
            strokes.push(Stroke::new(vec![Point::new(0, 0)], attrs).unwrap());
        }
        assert_eq!(sample_color(&strokes).unwrap(), InkColor::rgb(9, 9, 9));
    }

    #[test]
    fn test_empty_collection() {
        let result = sample_color(&StrokeCollection::new());
        assert!(matches!(result, Err(RecolorError::NoStrokesFound)));
    }
}
