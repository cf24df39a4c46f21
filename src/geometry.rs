//! Cell-space value types used by hit detection.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}

/// An ordered run of cells traced by a shot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ray {
    pub points: Vec<Point>,
}

impl Ray {
    /// A column of `len` cells starting at `(x, top)` and running downward.
    pub fn vertical(x: i32, top: i32, len: usize) -> Self {
        let mut ray = Ray::default();
        for i in 0..len as i32 {
            ray.add_point(x, top + i);
        }
        ray
    }

    pub fn add_point(&mut self, x: i32, y: i32) {
        self.points.push(Point::new(x, y));
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
