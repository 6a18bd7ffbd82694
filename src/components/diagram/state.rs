use super::style::{FlowStyle, StyleCache};

/// Per-canvas view state that lives outside the store: size, animation clock
/// and the last computed flow style.
#[derive(Clone, Debug, Default)]
pub struct CanvasView {
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	styles: StyleCache,
}

impl CanvasView {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			animation_running: true,
			..Default::default()
		}
	}

	pub fn tick(&mut self, dt: f64) {
		if self.animation_running {
			self.flow_time += dt;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		(0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
	}

	pub fn style(&mut self, rps: u32) -> FlowStyle {
		self.styles.get(rps)
	}

	/// Dash phase in `[0, 1)`: one full cycle per animation period.
	pub fn flow_phase(&self, duration: f64) -> f64 {
		(self.flow_time / duration).fract()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::style::animation_duration;

	#[test]
	fn phase_wraps_once_per_period() {
		let mut view = CanvasView::new(800.0, 600.0);
		let period = animation_duration(1);
		view.tick(period * 2.25);
		assert!((view.flow_phase(period) - 0.25).abs() < 1e-9);
	}

	#[test]
	fn paused_view_does_not_advance() {
		let mut view = CanvasView::new(800.0, 600.0);
		view.animation_running = false;
		view.tick(1.0);
		assert_eq!(view.flow_time, 0.0);
	}

	#[test]
	fn bounds_check() {
		let view = CanvasView::new(800.0, 600.0);
		assert!(view.contains(0.0, 600.0));
		assert!(!view.contains(-1.0, 10.0));
		assert!(!view.contains(801.0, 10.0));
	}
}
