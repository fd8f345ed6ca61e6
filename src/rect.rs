use crate::BoundedShape;

/// Integer axis-aligned rectangle, origin at the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge, widened so rectangles near `i32::MAX` cannot overflow.
    #[inline]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// True if both far edges are representable as `i32`.
    #[inline]
    pub fn edges_in_range(&self) -> bool {
        self.right() <= i64::from(i32::MAX) && self.bottom() <= i64::from(i32::MAX)
    }

    /// True if either extent is below 1.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width < 1 || self.height < 1
    }

    /// Full containment. Edges may touch, but a rectangle with no area is
    /// never contained, and an empty rectangle contains nothing.
    pub fn contains(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlap with positive area. Rectangles that only share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && i64::from(self.x) < other.right()
            && i64::from(other.x) < self.right()
            && i64::from(self.y) < other.bottom()
            && i64::from(other.y) < self.bottom()
    }

    /// The four quadrants in row-major order: NW, NE, SW, SE.
    ///
    /// Odd extents leave the extra unit to the east and south quadrants.
    /// The split saturates at `i32::MAX` for rectangles whose edges are out of
    /// range; tree nodes never have such bounds.
    pub fn quadrants(&self) -> [Rect; 4] {
        let hw = self.width / 2;
        let hh = self.height / 2;
        let mx = self.x.saturating_add(hw);
        let my = self.y.saturating_add(hh);
        [
            Rect::new(self.x, self.y, hw, hh),
            Rect::new(mx, self.y, self.width - hw, hh),
            Rect::new(self.x, my, hw, self.height - hh),
            Rect::new(mx, my, self.width - hw, self.height - hh),
        ]
    }

    /// Index of the first quadrant that fully contains `other`, if any.
    pub fn quadrant_containing(&self, other: &Rect) -> Option<usize> {
        self.quadrants().iter().position(|q| q.contains(other))
    }
}

impl BoundedShape for Rect {
    fn bounding_box(&self) -> Rect {
        *self
    }
}
