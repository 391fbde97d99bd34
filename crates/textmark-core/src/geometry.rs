/// A point in two-dimensional page space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Affine transformation matrix `[a b c d e f]`.
///
/// Uses the PDF row-vector convention: a point `(x, y)` maps to
/// `(a*x + c*y + e, b*x + d*y + f)`. [`Ctm::concat`] composes so that
/// `m.concat(&n)` applies `m` first and `n` second.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Pure translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Build from the six operands of a `cm` or `Tm` operator.
    pub fn from_array(m: [f64; 6]) -> Self {
        Self::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Matrix product `self × other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Transform a direction vector (translation ignored).
    pub fn transform_vector(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y,
            y: self.b * p.x + self.d * p.y,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// False for degenerate matrices that collapse the plane.
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() > f64::EPSILON
    }
}

/// Axis-aligned rectangle in default page space (origin bottom-left).
///
/// - `llx`, `lly`: lower-left corner
/// - `urx`, `ury`: upper-right corner
///
/// [`Rectangle::new`] normalizes its inputs so `llx <= urx` and `lly <= ury`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Rectangle {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    /// Smallest rectangle enclosing all `points`; `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut rect = Rectangle::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            rect.llx = rect.llx.min(p.x);
            rect.lly = rect.lly.min(p.y);
            rect.urx = rect.urx.max(p.x);
            rect.ury = rect.ury.max(p.y);
        }
        Some(rect)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Compute the union of two rectangles.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle {
            llx: self.llx.min(other.llx),
            lly: self.lly.min(other.lly),
            urx: self.urx.max(other.urx),
            ury: self.ury.max(other.ury),
        }
    }

    pub fn is_zero_area(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Overlap of the horizontal extents, zero when disjoint.
    pub fn horizontal_overlap(&self, other: &Rectangle) -> f64 {
        (self.urx.min(other.urx) - self.llx.max(other.llx)).max(0.0)
    }

    /// True when every edge is within `tolerance` of the other's.
    pub fn approx_eq(&self, other: &Rectangle, tolerance: f64) -> bool {
        (self.llx - other.llx).abs() <= tolerance
            && (self.lly - other.lly).abs() <= tolerance
            && (self.urx - other.urx).abs() <= tolerance
            && (self.ury - other.ury).abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_approx(p: Point, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got ({}, {})",
            p.x,
            p.y
        );
    }

    #[test]
    fn test_rectangle_new_normalizes_corners() {
        let r = Rectangle::new(30.0, 40.0, 10.0, 20.0);
        assert_eq!(r.llx, 10.0);
        assert_eq!(r.lly, 20.0);
        assert_eq!(r.urx, 30.0);
        assert_eq!(r.ury, 40.0);
    }

    #[test]
    fn test_rectangle_dimensions() {
        let r = Rectangle::new(10.0, 20.0, 50.0, 60.0);
        assert_eq!(r.width(), 40.0);
        assert_eq!(r.height(), 40.0);
        assert!(!r.is_zero_area());
        assert!(Rectangle::new(1.0, 1.0, 1.0, 5.0).is_zero_area());
    }

    #[test]
    fn test_rectangle_union() {
        let a = Rectangle::new(10.0, 20.0, 30.0, 40.0);
        let b = Rectangle::new(5.0, 25.0, 35.0, 45.0);
        let u = a.union(&b);
        assert_eq!(u, Rectangle::new(5.0, 20.0, 35.0, 45.0));
    }

    #[test]
    fn test_rectangle_enclosing() {
        assert!(Rectangle::enclosing(&[]).is_none());
        let r = Rectangle::enclosing(&[
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(r, Rectangle::new(-2.0, -1.0, 3.0, 4.0));
    }

    #[test]
    fn test_rectangle_horizontal_overlap() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.horizontal_overlap(&Rectangle::new(6.0, 0.0, 20.0, 1.0)), 4.0);
        assert_eq!(a.horizontal_overlap(&Rectangle::new(12.0, 0.0, 20.0, 1.0)), 0.0);
    }

    #[test]
    fn test_ctm_identity_transform() {
        let p = Ctm::identity().transform_point(Point::new(3.0, 4.0));
        assert_point_approx(p, 3.0, 4.0);
    }

    #[test]
    fn test_ctm_concat_applies_left_first() {
        let scale = Ctm::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Ctm::translation(10.0, 5.0);
        // scale then translate
        let p = scale.concat(&shift).transform_point(Point::new(1.0, 1.0));
        assert_point_approx(p, 12.0, 7.0);
        // translate then scale
        let p = shift.concat(&scale).transform_point(Point::new(1.0, 1.0));
        assert_point_approx(p, 22.0, 12.0);
    }

    #[test]
    fn test_ctm_rotation_90() {
        let rot = Ctm::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        assert_point_approx(rot.transform_point(Point::new(1.0, 0.0)), 0.0, 1.0);
        assert_point_approx(rot.transform_vector(Point::new(0.0, 1.0)), -1.0, 0.0);
    }

    #[test]
    fn test_ctm_degenerate() {
        assert!(Ctm::identity().is_invertible());
        assert!(!Ctm::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0).is_invertible());
    }

    #[test]
    fn test_ctm_array_roundtrip() {
        let m = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(Ctm::from_array(m).to_array(), m);
    }
}
