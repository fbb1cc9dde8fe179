//! Coordinate transform between device pixels and logical document space.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the view transform for the canvas.
///
/// Device coordinates are physical pixels relative to the canvas origin.
/// Logical coordinates are document space, independent of zoom and
/// device pixel ratio. Conversions are computed on every call from the
/// current zoom, so a point converted before a zoom change must be
/// converted again afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in CSS pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Physical pixels per CSS pixel.
    pub device_pixel_ratio: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            device_pixel_ratio: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with the given zoom limits.
    pub fn with_zoom_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Logical-to-device transform.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.device_pixel_ratio) * Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Device-to-logical transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom)
            * Affine::translate(-self.offset)
            * Affine::scale(1.0 / self.device_pixel_ratio)
    }

    /// Convert a device point to logical coordinates.
    pub fn to_logical(&self, device_point: Point) -> Point {
        self.inverse_transform() * device_point
    }

    /// Convert a logical point to device coordinates.
    pub fn to_device(&self, logical_point: Point) -> Point {
        self.transform() * logical_point
    }

    /// Convert a device-space distance to a logical distance.
    pub fn to_logical_distance(&self, device_distance: f64) -> f64 {
        device_distance / (self.zoom * self.device_pixel_ratio)
    }

    /// Set the zoom level, clamped to the camera's limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Pan the camera by a delta in CSS pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given device point fixed.
    pub fn zoom_at(&mut self, device_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let logical = self.to_logical(device_point);
        self.zoom = new_zoom;

        // Shift the offset so `logical` lands back under the device point.
        let drifted = self.to_device(logical);
        let correction = (device_point - drifted) / self.device_pixel_ratio;
        self.offset += correction;
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit the camera to show the given logical bounding box inside a viewport
    /// measured in CSS pixels.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / bounds.width();
        let scale_y = padded_viewport.height / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

        self.offset = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}
