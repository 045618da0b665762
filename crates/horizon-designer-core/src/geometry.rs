//! Geometry used for drop-position hit testing.
//!
//! The designer never lays widgets out itself; hosts report the bounds of
//! each node after their own layout pass, and the drag protocol compares the
//! pointer against those bounds.

/// A 2D point in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate of this point along an axis.
    #[inline]
    pub fn along(&self, axis: LayoutAxis) -> f32 {
        match axis {
            LayoutAxis::Horizontal => self.x,
            LayoutAxis::Vertical => self.y,
        }
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A square size.
    #[inline]
    pub const fn square(side: f32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Left edge x coordinate.
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge y coordinate.
    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// The edge a pointer has passed once it is beyond this rectangle along
    /// `axis`: right for horizontal layouts, bottom for vertical ones.
    #[inline]
    pub fn trailing_edge(&self, axis: LayoutAxis) -> f32 {
        match axis {
            LayoutAxis::Horizontal => self.right(),
            LayoutAxis::Vertical => self.bottom(),
        }
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

/// The direction in which a linear container stacks its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutAxis {
    Horizontal,
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_edge_follows_axis() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.trailing_edge(LayoutAxis::Horizontal), 40.0);
        assert_eq!(r.trailing_edge(LayoutAxis::Vertical), 60.0);
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }
}
