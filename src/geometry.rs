//! Integer points and axis-aligned rectangles in image space.
//!
//! Coordinates follow the image buffer: `x` is the column, `y` is the row, and
//! row 0 is the top of the image. A rectangle's "bottom-left" corner is its
//! origin, the corner with the smallest column and row; "top" corners sit
//! `height` rows further along `y`.

use crate::util::{HistMatchError, HistMatchResult};
use std::fmt;

const CORNER_OVERFLOW: HistMatchError = HistMatchError::InconsistentRect {
    reason: "corner coordinates overflow i32",
};

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Creates a point at column `x`, row `y`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translates the point in place, saturating at the `i32` range.
    pub fn slide(&mut self, dx: i32, dy: i32) {
        *self = self.slid(dx, dy);
    }

    /// Returns a translated copy, saturating at the `i32` range.
    #[must_use]
    pub fn slid(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Returns a translated copy, or `None` if a coordinate leaves the `i32`
    /// range.
    pub fn checked_slid(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Axis-aligned rectangle stored as its four corners.
///
/// The corners and the cached size are kept consistent by every constructor
/// and transform, so the fields are private.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    bottom_left: Point,
    bottom_right: Point,
    top_left: Point,
    top_right: Point,
    width: i32,
    height: i32,
}

impl Rect {
    /// Builds a rectangle from four explicit corners.
    ///
    /// The corners must describe an axis-aligned box with non-negative size.
    pub fn from_corners(
        bottom_left: Point,
        bottom_right: Point,
        top_left: Point,
        top_right: Point,
    ) -> HistMatchResult<Self> {
        if bottom_left.y != bottom_right.y || top_left.y != top_right.y {
            return Err(HistMatchError::InconsistentRect {
                reason: "horizontal edges are not level",
            });
        }
        if bottom_left.x != top_left.x || bottom_right.x != top_right.x {
            return Err(HistMatchError::InconsistentRect {
                reason: "vertical edges are not plumb",
            });
        }
        let width = bottom_right.x - bottom_left.x;
        let height = top_right.y - bottom_right.y;
        if width < 0 || height < 0 {
            return Err(HistMatchError::InconsistentRect {
                reason: "negative extent",
            });
        }
        Ok(Self {
            bottom_left,
            bottom_right,
            top_left,
            top_right,
            width,
            height,
        })
    }

    /// Builds a rectangle from its origin and size.
    ///
    /// Negative sizes are clamped to zero. Fails if the far corners do not fit
    /// in `i32` coordinates.
    pub fn from_origin(origin: Point, width: i32, height: i32) -> HistMatchResult<Self> {
        let width = width.max(0);
        let height = height.max(0);
        let top_right = origin
            .checked_slid(width, height)
            .ok_or(CORNER_OVERFLOW)?;
        Ok(Self {
            bottom_left: origin,
            bottom_right: Point::new(top_right.x, origin.y),
            top_left: Point::new(origin.x, top_right.y),
            top_right,
            width,
            height,
        })
    }

    /// Builds a rectangle from `usize` placement values.
    pub(crate) fn from_placement(
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> HistMatchResult<Self> {
        let conv = |v: usize| {
            i32::try_from(v).map_err(|_| {
                HistMatchError::InvalidInput("placement exceeds the i32 coordinate range")
            })
        };
        Self::from_origin(
            Point::new(conv(x)?, conv(y)?),
            conv(width)?,
            conv(height)?,
        )
    }

    /// Returns the origin corner.
    pub fn bottom_left(&self) -> Point {
        self.bottom_left
    }

    /// Returns the corner `width` columns right of the origin.
    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    /// Returns the corner `height` rows along from the origin.
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    /// Returns the corner opposite the origin.
    pub fn top_right(&self) -> Point {
        self.top_right
    }

    /// Origin column.
    pub fn x(&self) -> i32 {
        self.bottom_left.x
    }

    /// Origin row.
    pub fn y(&self) -> i32 {
        self.bottom_left.y
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Translates every corner.
    ///
    /// If any corner would leave the `i32` range the rect is left untouched.
    pub fn slide(&mut self, dx: i32, dy: i32) -> HistMatchResult<()> {
        let top_right = self
            .top_right
            .checked_slid(dx, dy)
            .ok_or(CORNER_OVERFLOW)?;
        let bottom_left = self
            .bottom_left
            .checked_slid(dx, dy)
            .ok_or(CORNER_OVERFLOW)?;
        self.bottom_left = bottom_left;
        self.bottom_right = Point::new(top_right.x, bottom_left.y);
        self.top_left = Point::new(bottom_left.x, top_right.y);
        self.top_right = top_right;
        Ok(())
    }

    /// Returns true if `(x, y)` lies inside or on any edge.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.bottom_left.x <= x
            && x <= self.bottom_right.x
            && self.bottom_left.y <= y
            && y <= self.top_left.y
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.bottom_left, self.bottom_right, self.top_left, self.top_right
        )
    }
}
