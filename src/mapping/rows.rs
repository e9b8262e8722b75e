//! Greedy row grouping of panel boxes
//!
//! Panels in one physical row rarely share an exact `top` because of
//! perspective and detection noise. Boxes are sorted by `(top, left)` and a
//! row accepts each following box whose `top` lies within
//! `tolerance_factor * height` of the row's first box. The first box stays the
//! reference for the whole row, so rows whose panel sizes drift can absorb
//! boxes that look misaligned.

use crate::geometry::BoundingBox;

/// Group panel boxes into rows, top to bottom, each row sorted west to east
pub fn group_into_rows(panels: &[BoundingBox], tolerance_factor: f64) -> Vec<Vec<BoundingBox>> {
    let mut sorted: Vec<&BoundingBox> = panels.iter().collect();
    sorted.sort_by_key(|b| (b.top(), b.left()));

    let mut rows: Vec<Vec<BoundingBox>> = Vec::new();
    let mut current: Vec<BoundingBox> = Vec::new();

    for panel in sorted {
        let same_row = current
            .first()
            .is_some_and(|reference| within_row_band(reference, panel, tolerance_factor));

        if !same_row && !current.is_empty() {
            rows.push(close_row(std::mem::take(&mut current)));
        }
        current.push(panel.clone());
    }

    if !current.is_empty() {
        rows.push(close_row(current));
    }

    rows
}

fn within_row_band(reference: &BoundingBox, candidate: &BoundingBox, tolerance_factor: f64) -> bool {
    let offset = (f64::from(candidate.top()) - f64::from(reference.top())).abs();
    offset <= f64::from(reference.height()) * tolerance_factor
}

fn close_row(mut row: Vec<BoundingBox>) -> Vec<BoundingBox> {
    row.sort_by_key(BoundingBox::left);
    row
}
