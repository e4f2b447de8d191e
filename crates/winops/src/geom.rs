// Unified geometry primitives and helpers.
// Coordinates follow the window manager's global screen space: origin at the
// top-left of the primary display, y grows downwards.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    #[inline]
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x{:.1}", self.w, self.h)
    }
}

#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Absolute per-component differences between two rectangles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Diffs {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl fmt::Display for Diffs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dx={:.2} dy={:.2} dw={:.2} dh={:.2}",
            self.x, self.y, self.w, self.h
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
    #[inline]
    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }
    #[inline]
    pub fn cy(&self) -> f64 {
        self.y + self.h / 2.0
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point {
            x: self.cx(),
            y: self.cy(),
        }
    }

    /// Area of the rectangle; degenerate rectangles have zero area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.w.max(0.0) * self.h.max(0.0)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Intersection of two rectangles, or `None` when they do not overlap.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let w = overlap_1d(self.left(), self.right(), other.left(), other.right());
        let h = overlap_1d(self.top(), self.bottom(), other.top(), other.bottom());
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(Self::new(
            self.left().max(other.left()),
            self.top().max(other.top()),
            w,
            h,
        ))
    }

    #[inline]
    pub fn diffs(&self, other: &Self) -> Diffs {
        Diffs {
            x: (self.x - other.x).abs(),
            y: (self.y - other.y).abs(),
            w: (self.w - other.w).abs(),
            h: (self.h - other.h).abs(),
        }
    }

    #[inline]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        let d = self.diffs(other);
        d.x <= eps && d.y <= eps && d.w <= eps && d.h <= eps
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1},{:.1},{:.1},{:.1})",
            self.x, self.y, self.w, self.h
        )
    }
}

#[inline]
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    let l = a1.max(b1);
    let r = a2.min(b2);
    (r - l).max(0.0)
}

// Grid helpers ----------------------------------------------------------------

/// Frame of grid cell `(col, row)` inside `vf`. The last column and row absorb
/// any remainder so the cells tile the frame exactly.
pub fn grid_cell_rect(vf: &Rect, cols: u32, rows: u32, col: u32, row: u32) -> Rect {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let col = col.min(cols - 1);
    let row = row.min(rows - 1);
    let tile_w = (vf.w / cols as f64).floor().max(1.0);
    let tile_h = (vf.h / rows as f64).floor().max(1.0);
    let rem_w = vf.w - tile_w * (cols as f64);
    let rem_h = vf.h - tile_h * (rows as f64);

    let w = if col == cols - 1 {
        tile_w + rem_w
    } else {
        tile_w
    };
    let h = if row == rows - 1 {
        tile_h + rem_h
    } else {
        tile_h
    };
    Rect::new(
        vf.x + tile_w * (col as f64),
        vf.y + tile_h * (row as f64),
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_works() {
        assert!(approx_eq(1.0, 1.0, 0.0));
        assert!(approx_eq(1.0, 1.000_5, 0.001));
        assert!(!approx_eq(1.0, 1.01, 0.001));
    }

    #[test]
    fn rect_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Point { x: 25.0, y: 40.0 });
        assert_eq!(r.area(), 1200.0);
    }

    #[test]
    fn contains_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point { x: 0.0, y: 0.0 }));
        assert!(r.contains(Point { x: 10.0, y: 10.0 }));
        assert!(!r.contains(Point { x: -0.1, y: 0.0 }));
        assert!(!r.contains(Point { x: 0.0, y: 10.1 }));
    }

    #[test]
    fn intersection_overlapping_and_disjoint() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(25.0, 10.0, 50.0, 50.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(25.0, 10.0, 25.0, 40.0)));
        let c = Rect::new(60.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&c), None);
        // Touching edges share no area.
        let d = Rect::new(50.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&d), None);
    }

    #[test]
    fn diffs_and_approx_eq() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(3.0, -4.0, 110.0, 100.0);
        let d = a.diffs(&b);
        assert_eq!((d.x, d.y, d.w, d.h), (3.0, 4.0, 10.0, 0.0));
        assert!(a.approx_eq(&b, 10.0));
        assert!(!a.approx_eq(&b, 9.0));
    }

    #[test]
    fn grid_cell_rect_corners_and_remainders() {
        let vf = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(grid_cell_rect(&vf, 3, 2, 0, 0), Rect::new(0.0, 0.0, 33.0, 50.0));
        assert_eq!(grid_cell_rect(&vf, 3, 2, 2, 0), Rect::new(66.0, 0.0, 34.0, 50.0));
        assert_eq!(grid_cell_rect(&vf, 3, 2, 0, 1).y, 50.0);
    }

    #[test]
    fn grid_cell_rect_left_half() {
        let vf = Rect::new(0.0, 0.0, 1000.0, 500.0);
        assert_eq!(grid_cell_rect(&vf, 2, 1, 0, 0), Rect::new(0.0, 0.0, 500.0, 500.0));
        // Out-of-range cells clamp to the last column.
        assert_eq!(grid_cell_rect(&vf, 2, 1, 5, 0), Rect::new(500.0, 0.0, 500.0, 500.0));
    }
}
