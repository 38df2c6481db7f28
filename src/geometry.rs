//! Rects follow CoreGraphics conventions: the size may be negative (a flipped
//! drag), and containment and pixel queries work on the standardized rect.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn flipped_in(self, bounds: Rect) -> Self {
        Self::new(self.x, 2.0 * bounds.y + bounds.height - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_positive(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Box spanned by two corners; the size carries the drag direction.
    pub fn spanning(start: Point, end: Point) -> Self {
        Self::new(start.x, start.y, end.x - start.x, end.y - start.y)
    }

    pub fn standardized(self) -> Self {
        let mut rect = self;
        if rect.width < 0.0 {
            rect.x += rect.width;
            rect.width = -rect.width;
        }
        if rect.height < 0.0 {
            rect.y += rect.height;
            rect.height = -rect.height;
        }
        rect
    }

    pub fn min_x(self) -> f64 {
        self.standardized().x
    }

    pub fn min_y(self) -> f64 {
        self.standardized().y
    }

    pub fn max_x(self) -> f64 {
        let rect = self.standardized();
        rect.x + rect.width
    }

    pub fn max_y(self) -> f64 {
        let rect = self.standardized();
        rect.y + rect.height
    }

    pub fn center(self) -> Point {
        let rect = self.standardized();
        Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Half-open containment: min edges are inside, max edges are not.
    pub fn contains(self, point: Point) -> bool {
        let rect = self.standardized();
        point.x >= rect.x
            && point.x < rect.x + rect.width
            && point.y >= rect.y
            && point.y < rect.y + rect.height
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn outset(self, dx: f64, dy: f64) -> Self {
        let rect = self.standardized();
        Self::new(
            rect.x - dx,
            rect.y - dy,
            rect.width + 2.0 * dx,
            rect.height + 2.0 * dy,
        )
    }

    /// Mirrors the rect vertically inside `bounds`, keeping the size sign.
    pub fn flipped_in(self, bounds: Rect) -> Self {
        Self::new(
            self.x,
            2.0 * bounds.y + bounds.height - self.y - self.height,
            self.width,
            self.height,
        )
    }

    pub fn integral(self) -> Self {
        let rect = self.standardized();
        let min_x = rect.x.floor();
        let min_y = rect.y.floor();
        let max_x = (rect.x + rect.width).ceil();
        let max_y = (rect.y + rect.height).ceil();
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn intersection(self, other: Rect) -> Option<Rect> {
        let a = self.standardized();
        let b = other.standardized();
        let min_x = a.x.max(b.x);
        let min_y = a.y.max(b.y);
        let max_x = (a.x + a.width).min(b.x + b.width);
        let max_y = (a.y + a.height).min(b.y + b.height);
        if max_x <= min_x || max_y <= min_y {
            return None;
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBounds {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn covering(rect: Rect, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || !rect.x.is_finite() || !rect.y.is_finite() {
            return None;
        }
        let raster = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        let clipped = rect.integral().intersection(raster)?;
        Some(Self::new(
            clipped.x as u32,
            clipped.y as u32,
            clipped.width as u32,
            clipped.height as u32,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed rect string {0:?}; expected {{{{x,y}},{{w,h}}}}")]
pub struct RectParseError(pub String);

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{{{},{}}},{{{},{}}}}}",
            self.x, self.y, self.width, self.height
        )
    }
}

impl FromStr for Rect {
    type Err = RectParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || RectParseError(text.to_string());
        let compact = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>();
        let inner = compact
            .strip_prefix("{{")
            .and_then(|rest| rest.strip_suffix("}}"))
            .ok_or_else(malformed)?;
        let (origin, size) = inner.split_once("},{").ok_or_else(malformed)?;
        let (x, y) = parse_pair(origin).ok_or_else(malformed)?;
        let (width, height) = parse_pair(size).ok_or_else(malformed)?;
        Ok(Self::new(x, y, width, height))
    }
}

fn parse_pair(text: &str) -> Option<(f64, f64)> {
    let (first, second) = text.split_once(',')?;
    let first = first.parse::<f64>().ok().filter(|value| value.is_finite())?;
    let second = second.parse::<f64>().ok().filter(|value| value.is_finite())?;
    Some((first, second))
}
