//! Page rotation and the base transform.
//!
//! Maps PDF user space to the displayed page frame. The frame keeps the
//! media box's lower-left corner as its origin and PDF's y-up axis, so an
//! unrotated page reports the document's own coordinates.

use textmark_core::{Ctm, ExtractResult, ExtractWarning, ExtractWarningCode, Point, Rectangle};

/// Media box plus normalized `/Rotate`.
///
/// # Example
///
/// ```
/// use textmark_core::Rectangle;
/// use textmark_parse::page_geometry::PageGeometry;
///
/// // US Letter page shown in landscape
/// let geo = PageGeometry::new(Rectangle::new(0.0, 0.0, 612.0, 792.0), 90).value;
/// assert_eq!(geo.width(), 792.0);
/// assert_eq!(geo.height(), 612.0);
///
/// // The native lower-left corner moves to the displayed top-left.
/// let p = geo.base_transform().transform_point(textmark_core::Point::new(0.0, 0.0));
/// assert!((p.x - 0.0).abs() < 1e-9 && (p.y - 612.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    media_box: Rectangle,
    rotation: i32,
}

impl PageGeometry {
    /// Normalize the declared rotation.
    ///
    /// Multiples of 90 wrap into 0, 90, 180 or 270. Anything else is treated
    /// as 0 and reported as a warning.
    pub fn new(media_box: Rectangle, declared_rotation: i32) -> ExtractResult<Self> {
        let normalized = declared_rotation.rem_euclid(360);
        if normalized % 90 == 0 {
            return ExtractResult::ok(Self {
                media_box,
                rotation: normalized,
            });
        }
        let warning = ExtractWarning::with_code(
            ExtractWarningCode::Other("INVALID_ROTATION".to_string()),
            format!("page rotation {declared_rotation} is not a multiple of 90, using 0"),
        );
        ExtractResult::with_warnings(
            Self {
                media_box,
                rotation: 0,
            },
            vec![warning],
        )
    }

    pub fn media_box(&self) -> &Rectangle {
        &self.media_box
    }

    /// Rotation in degrees clockwise: 0, 90, 180 or 270.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Displayed page width.
    pub fn width(&self) -> f64 {
        match self.rotation {
            90 | 270 => self.media_box.height(),
            _ => self.media_box.width(),
        }
    }

    /// Displayed page height.
    pub fn height(&self) -> f64 {
        match self.rotation {
            90 | 270 => self.media_box.width(),
            _ => self.media_box.height(),
        }
    }

    /// PDF user space to displayed page frame.
    ///
    /// Offset by `-origin`, rotate clockwise, offset by `+origin`.
    pub fn base_transform(&self) -> Ctm {
        let w = self.media_box.width();
        let h = self.media_box.height();
        let rotate = match self.rotation {
            // (x, y) -> (y, w - x)
            90 => Ctm::new(0.0, -1.0, 1.0, 0.0, 0.0, w),
            // (x, y) -> (w - x, h - y)
            180 => Ctm::new(-1.0, 0.0, 0.0, -1.0, w, h),
            // (x, y) -> (h - y, x)
            270 => Ctm::new(0.0, 1.0, -1.0, 0.0, h, 0.0),
            _ => return Ctm::identity(),
        };
        let (ox, oy) = (self.media_box.llx, self.media_box.lly);
        Ctm::translation(-ox, -oy)
            .concat(&rotate)
            .concat(&Ctm::translation(ox, oy))
    }

    /// Map a user-space point into the displayed frame.
    pub fn to_display(&self, p: Point) -> Point {
        self.base_transform().transform_point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER_W: f64 = 612.0;
    const LETTER_H: f64 = 792.0;

    fn letter() -> Rectangle {
        Rectangle::new(0.0, 0.0, LETTER_W, LETTER_H)
    }

    fn geometry(media_box: Rectangle, rotation: i32) -> PageGeometry {
        let result = PageGeometry::new(media_box, rotation);
        assert!(result.is_clean(), "unexpected warnings: {:?}", result.warnings);
        result.value
    }

    fn assert_point_approx(actual: Point, expected: (f64, f64), msg: &str) {
        assert!(
            (actual.x - expected.0).abs() < 0.01 && (actual.y - expected.1).abs() < 0.01,
            "{msg}: expected {expected:?}, got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn rotate_0_is_identity() {
        let geo = geometry(Rectangle::new(-200.0, -200.0, 600.0, 800.0), 0);
        assert_eq!(geo.base_transform(), Ctm::identity());
        assert_point_approx(geo.to_display(Point::new(-150.0, 42.0)), (-150.0, 42.0), "raw");
    }

    #[test]
    fn rotate_0_dimensions() {
        let geo = geometry(letter(), 0);
        assert_eq!(geo.width(), LETTER_W);
        assert_eq!(geo.height(), LETTER_H);
    }

    #[test]
    fn rotate_90_maps_corners() {
        let geo = geometry(letter(), 90);
        assert_eq!(geo.width(), LETTER_H);
        assert_eq!(geo.height(), LETTER_W);
        // top-left of the native page becomes the displayed origin's top
        assert_point_approx(geo.to_display(Point::new(0.0, LETTER_H)), (LETTER_H, LETTER_W), "top-left");
        assert_point_approx(geo.to_display(Point::new(72.0, 720.0)), (720.0, 540.0), "point");
        assert_point_approx(geo.to_display(Point::new(LETTER_W, 0.0)), (0.0, 0.0), "bottom-right");
    }

    #[test]
    fn rotate_180_maps_point() {
        let geo = geometry(letter(), 180);
        assert_point_approx(geo.to_display(Point::new(72.0, 720.0)), (540.0, 72.0), "point");
        assert_point_approx(geo.to_display(Point::new(0.0, 0.0)), (LETTER_W, LETTER_H), "origin");
    }

    #[test]
    fn rotate_270_maps_point() {
        let geo = geometry(letter(), 270);
        assert_point_approx(geo.to_display(Point::new(72.0, 720.0)), (72.0, 72.0), "point");
        assert_point_approx(geo.to_display(Point::new(0.0, 0.0)), (LETTER_H, 0.0), "origin");
    }

    #[test]
    fn rotation_respects_media_box_origin() {
        let media = Rectangle::new(100.0, 50.0, 300.0, 450.0);
        let geo = geometry(media, 90);
        // lower-right corner of the media box lands on its origin
        assert_point_approx(geo.to_display(Point::new(300.0, 50.0)), (100.0, 50.0), "corner");
        // relative (10, 20) -> (20, 200 - 10)
        assert_point_approx(geo.to_display(Point::new(110.0, 70.0)), (120.0, 240.0), "inner");
    }

    #[test]
    fn rotation_wraps_multiples_of_90() {
        assert_eq!(geometry(letter(), 450).rotation(), 90);
        assert_eq!(geometry(letter(), -90).rotation(), 270);
        assert_eq!(geometry(letter(), 720).rotation(), 0);
    }

    #[test]
    fn non_right_angle_rotation_warns_and_uses_0() {
        let result = PageGeometry::new(letter(), 45);
        assert_eq!(result.value.rotation(), 0);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].description.contains("45"));
    }

    #[test]
    fn compensating_matrices_cancel_rotation() {
        let w = LETTER_W;
        let h = LETTER_H;
        let cases = [
            (90, Ctm::new(0.0, 1.0, -1.0, 0.0, w, 0.0)),
            (180, Ctm::new(-1.0, 0.0, 0.0, -1.0, w, h)),
            (270, Ctm::new(0.0, -1.0, 1.0, 0.0, 0.0, h)),
        ];
        for (rotation, cm) in cases {
            let geo = geometry(letter(), rotation);
            let m = cm.concat(&geo.base_transform());
            assert_point_approx(m.transform_point(Point::new(72.0, 700.0)), (72.0, 700.0), &format!("rotate {rotation}"));
        }
    }
}
