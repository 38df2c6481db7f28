//! Unit space has its origin at the bottom-left of the image (y grows up).
//! Pointer coordinates arrive in the view's own convention; top-down views
//! are mirrored inside the view bounds before normalizing.

use serde::Deserialize;

use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAxis {
    #[default]
    TopDown,
    BottomUp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    view_bounds: Rect,
    display_rect: Rect,
    axis: VerticalAxis,
}

impl CoordinateMapper {
    /// Returns `None` when the display rect has no positive area.
    pub fn new(view_bounds: Rect, display_rect: Rect, axis: VerticalAxis) -> Option<Self> {
        if !display_rect.size().is_positive() {
            return None;
        }
        Some(Self {
            view_bounds,
            display_rect,
            axis,
        })
    }

    pub fn fitted(view_bounds: Rect, image_size: Size, axis: VerticalAxis) -> Option<Self> {
        Self::new(view_bounds, aspect_fit(image_size, view_bounds)?, axis)
    }

    pub const fn display_rect(&self) -> Rect {
        self.display_rect
    }

    pub const fn view_bounds(&self) -> Rect {
        self.view_bounds
    }

    fn unit_frame(&self) -> Rect {
        match self.axis {
            VerticalAxis::TopDown => self.display_rect.flipped_in(self.view_bounds),
            VerticalAxis::BottomUp => self.display_rect,
        }
    }

    fn to_unit_axis(&self, point: Point) -> Point {
        match self.axis {
            VerticalAxis::TopDown => point.flipped_in(self.view_bounds),
            VerticalAxis::BottomUp => point,
        }
    }

    /// No clamping: points outside the image map outside `[0, 1]`.
    pub fn to_unit(&self, view_point: Point) -> Point {
        let frame = self.unit_frame();
        let point = self.to_unit_axis(view_point);
        Point::new(
            (point.x - frame.x) / frame.width,
            (point.y - frame.y) / frame.height,
        )
    }

    pub fn to_view(&self, unit_point: Point) -> Point {
        let frame = self.unit_frame();
        let point = Point::new(
            frame.x + unit_point.x * frame.width,
            frame.y + unit_point.y * frame.height,
        );
        self.to_unit_axis(point)
    }

    pub fn rect_to_view(&self, unit_rect: Rect) -> Rect {
        let rect = rect_for_bounds(unit_rect, self.unit_frame());
        match self.axis {
            VerticalAxis::TopDown => rect.flipped_in(self.view_bounds),
            VerticalAxis::BottomUp => rect,
        }
    }
}

pub fn rect_for_bounds(unit_rect: Rect, bounds: Rect) -> Rect {
    Rect::new(
        bounds.x + unit_rect.x * bounds.width,
        bounds.y + unit_rect.y * bounds.height,
        unit_rect.width * bounds.width,
        unit_rect.height * bounds.height,
    )
}

/// Inverse of [`rect_for_bounds`]; `bounds` must have a positive size.
pub fn unit_rect_in_bounds(rect: Rect, bounds: Rect) -> Rect {
    Rect::new(
        (rect.x - bounds.x) / bounds.width,
        (rect.y - bounds.y) / bounds.height,
        rect.width / bounds.width,
        rect.height / bounds.height,
    )
}

pub fn aspect_fit(content: Size, bounds: Rect) -> Option<Rect> {
    if !content.is_positive() || !bounds.size().is_positive() {
        return None;
    }
    let scale = (bounds.width / content.width).min(bounds.height / content.height);
    let width = content.width * scale;
    let height = content.height * scale;
    Some(Rect::new(
        bounds.x + (bounds.width - width) / 2.0,
        bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
    ))
}
