//! Occlusion estimate for stacked windows.
//!
//! Visibility is computed exactly for axis-aligned rectangles: occluders are
//! clipped to the window, the clipped edges split the window into a grid of
//! cells, and each cell is either wholly covered or wholly uncovered. Summing
//! covered cells yields the union area without double-counting overlaps.

use crate::geom::Rect;

/// Windows below this visibility percentage are not captured when saving.
pub const VISIBILITY_THRESHOLD: f64 = 40.0;

/// Percentage (0–100) of `frame` not covered by any rectangle in `occluders`.
///
/// A degenerate (zero-area) frame reports 0: there is nothing to see.
pub fn visibility_percentage(frame: &Rect, occluders: &[Rect]) -> f64 {
    let total = frame.area();
    if total <= 0.0 {
        return 0.0;
    }
    let clipped: Vec<Rect> = occluders
        .iter()
        .filter_map(|o| frame.intersection(o))
        .collect();
    if clipped.is_empty() {
        return 100.0;
    }
    let covered = union_area(frame, &clipped);
    ((total - covered) / total * 100.0).clamp(0.0, 100.0)
}

/// Area of the union of `rects`, all of which lie inside `bounds`.
fn union_area(bounds: &Rect, rects: &[Rect]) -> f64 {
    let mut xs = vec![bounds.left(), bounds.right()];
    let mut ys = vec![bounds.top(), bounds.bottom()];
    for r in rects {
        xs.extend([r.left(), r.right()]);
        ys.extend([r.top(), r.bottom()]);
    }
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    ys.sort_by(f64::total_cmp);
    ys.dedup();

    let mut area = 0.0;
    for xw in xs.windows(2) {
        let (x0, x1) = (xw[0], xw[1]);
        let mid_x = (x0 + x1) / 2.0;
        for yw in ys.windows(2) {
            let (y0, y1) = (yw[0], yw[1]);
            let mid_y = (y0 + y1) / 2.0;
            let covered = rects.iter().any(|r| {
                mid_x > r.left() && mid_x < r.right() && mid_y > r.top() && mid_y < r.bottom()
            });
            if covered {
                area += (x1 - x0) * (y1 - y0);
            }
        }
    }
    area
}

/// Indices of the frames (ordered frontmost first) whose visibility, given
/// every frame stacked above them, meets `threshold`.
pub fn visible_in_stack(frames: &[Rect], threshold: f64) -> Vec<usize> {
    frames
        .iter()
        .enumerate()
        .filter(|(idx, frame)| visibility_percentage(frame, &frames[..*idx]) >= threshold)
        .map(|(idx, _)| idx)
        .collect()
}
