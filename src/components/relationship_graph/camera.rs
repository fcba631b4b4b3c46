//! Pan and zoom transform between simulation space and canvas pixels.

use super::layout::Point;

/// Zoom bounds and wheel behaviour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraLimits {
	/// Most zoomed-out scale.
	pub min_zoom: f64,
	/// Most zoomed-in scale.
	pub max_zoom: f64,
	/// Zoom applied when the camera is created.
	pub initial_zoom: f64,
	/// Multiplicative zoom change per wheel notch.
	pub wheel_factor: f64,
}

impl Default for CameraLimits {
	fn default() -> Self {
		Self {
			min_zoom: 0.5,
			max_zoom: 2.5,
			initial_zoom: 1.5,
			wheel_factor: 1.1,
		}
	}
}

/// `screen = world * k + (x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
	/// Screen-space translation of the simulation origin.
	pub x: f64,
	/// Screen-space translation of the origin along y.
	pub y: f64,
	/// Zoom factor, always within the limits.
	k: f64,
	limits: CameraLimits,
}

impl Camera {
	/// Camera with the simulation origin in the middle of a `width` x `height` canvas.
	pub fn centered(width: f64, height: f64, limits: CameraLimits) -> Self {
		Self {
			x: width / 2.0,
			y: height / 2.0,
			k: limits.initial_zoom.clamp(limits.min_zoom, limits.max_zoom),
			limits,
		}
	}

	/// Current zoom factor.
	pub fn k(&self) -> f64 {
		self.k
	}

	/// Zoom bounds in effect.
	pub fn limits(&self) -> &CameraLimits {
		&self.limits
	}

	/// Set the zoom directly, clamped to the limits.
	pub fn set_zoom(&mut self, k: f64) {
		self.k = k.clamp(self.limits.min_zoom, self.limits.max_zoom);
	}

	/// Scale by `factor` around the screen point `(sx, sy)`, which stays fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(self.limits.min_zoom, self.limits.max_zoom);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// One wheel notch; positive `delta_y` zooms out.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / self.limits.wheel_factor
		} else {
			self.limits.wheel_factor
		};
		self.zoom_at(sx, sy, factor);
	}

	/// Move the simulation origin to screen point `(x, y)`.
	pub fn pan_to(&mut self, x: f64, y: f64) {
		self.x = x;
		self.y = y;
	}

	/// Canvas pixel to simulation coordinates.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Simulation coordinates to canvas pixel.
	pub fn world_to_screen(&self, p: Point) -> (f64, f64) {
		(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Keep the origin in the same relative spot after a canvas resize.
	pub fn resize(&mut self, old: (f64, f64), new: (f64, f64)) {
		if old.0 > 0.0 && old.1 > 0.0 {
			self.x *= new.0 / old.0;
			self.y *= new.1 / old.1;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_centered_at_initial_zoom() {
		let cam = Camera::centered(800.0, 600.0, CameraLimits::default());
		assert_eq!((cam.x, cam.y, cam.k()), (400.0, 300.0, 1.5));
		assert_eq!(cam.world_to_screen(Point::ORIGIN), (400.0, 300.0));
	}

	#[test]
	fn zoom_is_clamped() {
		let mut cam = Camera::centered(800.0, 600.0, CameraLimits::default());
		cam.set_zoom(100.0);
		assert_eq!(cam.k(), 2.5);
		for _ in 0..100 {
			cam.wheel(0.0, 0.0, 1.0);
		}
		assert_eq!(cam.k(), 0.5);
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut cam = Camera::centered(800.0, 600.0, CameraLimits::default());
		let before = cam.screen_to_world(123.0, 456.0);
		cam.zoom_at(123.0, 456.0, 1.2);
		let after = cam.screen_to_world(123.0, 456.0);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);
	}

	#[test]
	fn screen_world_round_trip() {
		let mut cam = Camera::centered(640.0, 480.0, CameraLimits::default());
		cam.pan_to(10.0, -30.0);
		let p = Point::new(12.5, -7.0);
		let (sx, sy) = cam.world_to_screen(p);
		let back = cam.screen_to_world(sx, sy);
		assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
	}
}
