//! Screen-space rectangles for UI layout and hit testing

use glam::Vec2;

/// Axis-aligned screen rectangle (origin at top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[must_use]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Whether a point lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.size.x
            && point.y >= self.position.y
            && point.y <= self.position.y + self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_edge_inclusive() {
        let rect = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(100.0, 50.0));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(110.0, 60.0)));
        assert!(rect.contains(rect.center()));
        assert!(!rect.contains(Vec2::new(9.9, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 60.1)));
    }
}
