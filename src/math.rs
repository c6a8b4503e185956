//! Integer geometry used for positions, clipping and destination rectangles.

use glam::IVec2;

/// Integer position in pixels.
pub type Point = IVec2;

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    /// Top-left corner.
    pub position: Point,
    /// Width and height.
    pub size: Point,
}

impl Rectangle {
    /// Construct from the top-left corner and the size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            position: IVec2::new(x, y),
            size: IVec2::new(width, height),
        }
    }

    /// Construct from a position and a size point.
    #[inline]
    #[must_use]
    pub const fn from_parts(position: Point, size: Point) -> Self {
        Self { position, size }
    }

    /// Whether the rectangle has no area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Horizontal coordinate right after the last column.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.position.x + self.size.x
    }

    /// Vertical coordinate right after the last row.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.position.y + self.size.y
    }

    /// Whether the point lies inside, the right and bottom edges are exclusive.
    #[inline]
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x < self.right()
            && point.y < self.bottom()
    }

    /// Overlapping area of both rectangles, empty with a zero size when they don't overlap.
    #[inline]
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let position = self.position.max(other.position);
        let end = Point::new(self.right(), self.bottom()).min(Point::new(other.right(), other.bottom()));
        let size = (end - position).max(Point::ZERO);

        if size.x == 0 || size.y == 0 {
            Self::from_parts(position, Point::ZERO)
        } else {
            Self::from_parts(position, size)
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::Rectangle;

    #[test]
    fn edges() {
        let rect = Rectangle::new(2, 3, 4, 5);
        assert_eq!(rect.right(), 6);
        assert_eq!(rect.bottom(), 8);

        assert!(rect.contains(IVec2::new(2, 3)));
        assert!(rect.contains(IVec2::new(5, 7)));
        assert!(!rect.contains(IVec2::new(6, 7)));
        assert!(!rect.contains(IVec2::new(1, 3)));
    }

    #[test]
    fn empty() {
        assert!(Rectangle::new(0, 0, 0, 10).is_empty());
        assert!(Rectangle::new(0, 0, 10, -1).is_empty());
        assert!(!Rectangle::new(-5, -5, 1, 1).is_empty());
    }

    #[test]
    fn intersection() {
        let canvas = Rectangle::new(0, 0, 10, 10);

        assert_eq!(
            Rectangle::new(8, 8, 50, 50).intersection(&canvas),
            Rectangle::new(8, 8, 2, 2)
        );
        assert_eq!(
            Rectangle::new(-2, 3, 4, 4).intersection(&canvas),
            Rectangle::new(0, 3, 2, 4)
        );
        assert!(Rectangle::new(2, 2, -5, 4).intersection(&canvas).is_empty());
        assert!(Rectangle::new(20, 0, 5, 5).intersection(&canvas).is_empty());
        assert_eq!(canvas.intersection(&canvas), canvas);
    }
}
