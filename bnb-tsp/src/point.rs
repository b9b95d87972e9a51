/// A point in the plane, optionally lifted by an elevation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
    elevation: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            elevation: 0.0,
        }
    }

    pub fn with_elevation(x: f64, y: f64, elevation: f64) -> Self {
        Point { x, y, elevation }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.elevation - other.elevation;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.elevation == 0.0 {
            write!(f, "({}, {})", self.x, self.y)
        } else {
            write!(f, "({}, {}, {})", self.x, self.y, self.elevation)
        }
    }
}
