//! Screen ↔ image mapping under pan and zoom: `screen = image · zoom + translate`.

use serde::{Deserialize, Serialize};

use crate::geom::{safe_div, Point, Size};

/// Allowed zoom range. `min` is kept strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 20.0,
        }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, zoom: f64) -> f64 {
        let lo = self.min.max(f64::MIN_POSITIVE);
        let hi = self.max.max(lo);
        zoom.clamp(lo, hi)
    }
}

/// View transform. Invariant: `zoom > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub zoom: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            zoom: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    /// Non-positive or non-finite `zoom` falls back to 1.
    pub fn new(zoom: f64, translate_x: f64, translate_y: f64) -> Self {
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        Self {
            zoom,
            translate_x,
            translate_y,
        }
    }

    #[inline]
    pub fn image_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.zoom + self.translate_x,
            p.y * self.zoom + self.translate_y,
        )
    }

    #[inline]
    pub fn screen_to_image(&self, p: Point) -> Point {
        Point::new(
            safe_div(p.x - self.translate_x, self.zoom),
            safe_div(p.y - self.translate_y, self.zoom),
        )
    }

    /// Convert a screen-pixel distance to image units.
    #[inline]
    pub fn screen_len_to_image(&self, len: f64) -> f64 {
        safe_div(len, self.zoom)
    }

    /// Multiply zoom by `factor` keeping `anchor` (screen) fixed over the same
    /// image point. The result is clamped to `limits`; a non-positive or
    /// non-finite factor leaves the transform unchanged.
    pub fn zoom_at(&self, anchor: Point, factor: f64, limits: &ZoomLimits) -> Transform {
        if !(factor.is_finite() && factor > 0.0) {
            return *self;
        }
        let image_pt = self.screen_to_image(anchor);
        let zoom = limits.clamp(self.zoom * factor);
        Transform {
            zoom,
            translate_x: anchor.x - image_pt.x * zoom,
            translate_y: anchor.y - image_pt.y * zoom,
        }
    }

    pub fn pan(&self, dx: f64, dy: f64) -> Transform {
        Transform {
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
            ..*self
        }
    }

    /// Largest zoom that shows the whole image inside `viewport`, centred.
    /// Empty image or viewport gives the identity.
    pub fn fit(image: Size, viewport: Size, limits: &ZoomLimits) -> Transform {
        if image.width <= 0.0 || image.height <= 0.0 || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Transform::identity();
        }
        let zoom = limits.clamp(
            (viewport.width / image.width).min(viewport.height / image.height),
        );
        Transform {
            zoom,
            translate_x: 0.5 * (viewport.width - image.width * zoom),
            translate_y: 0.5 * (viewport.height - image.height * zoom),
        }
    }
}
