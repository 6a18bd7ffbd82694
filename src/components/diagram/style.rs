//! Throughput-driven styling: maps requests per second to discrete buckets and
//! an animation period. Everything here is pure.

/// Upper bound of the throughput slider.
pub const MAX_RPS: u32 = 50_000;
/// Animation period at [`MAX_RPS`], in seconds.
pub const MIN_DURATION: f64 = 0.067;
/// Animation period at 1 rps, in seconds.
pub const MAX_DURATION: f64 = 0.666;
/// No animation runs faster than this.
pub const DURATION_FLOOR: f64 = 0.05;

const LOW_LIMIT: u32 = 500;
const MEDIUM_LIMIT: u32 = 5_000;

/// Coarse throughput bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Range {
	Low,
	Medium,
	High,
}

impl Range {
	pub fn label(self) -> &'static str {
		match self {
			Range::Low => "LOW",
			Range::Medium => "MEDIUM",
			Range::High => "HIGH",
		}
	}
}

/// Two-stop gradient used for edge strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gradient {
	pub from: &'static str,
	pub to: &'static str,
}

/// Edge look for a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeStyle {
	pub gradient: Gradient,
	pub animation_class: &'static str,
}

/// Glow intensity for database-like nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GlowBucket {
	#[default]
	None,
	Blue,
	Yellow,
	Red,
}

impl GlowBucket {
	/// Shadow colour, `None` for no glow.
	pub fn color(self) -> Option<&'static str> {
		match self {
			GlowBucket::None => None,
			GlowBucket::Blue => Some("rgba(59, 130, 246, 0.85)"),
			GlowBucket::Yellow => Some("rgba(234, 179, 8, 0.85)"),
			GlowBucket::Red => Some("rgba(239, 68, 68, 0.9)"),
		}
	}

	pub fn blur(self) -> f64 {
		match self {
			GlowBucket::None => 0.0,
			GlowBucket::Blue => 12.0,
			GlowBucket::Yellow => 18.0,
			GlowBucket::Red => 26.0,
		}
	}
}

pub fn range_of(rps: u32) -> Range {
	if rps <= LOW_LIMIT {
		Range::Low
	} else if rps <= MEDIUM_LIMIT {
		Range::Medium
	} else {
		Range::High
	}
}

pub fn edge_style(range: Range) -> EdgeStyle {
	match range {
		Range::Low => EdgeStyle {
			gradient: Gradient {
				from: "#22c55e",
				to: "#3b82f6",
			},
			animation_class: "flow-slow",
		},
		Range::Medium => EdgeStyle {
			gradient: Gradient {
				from: "#eab308",
				to: "#f97316",
			},
			animation_class: "flow-medium",
		},
		Range::High => EdgeStyle {
			gradient: Gradient {
				from: "#f97316",
				to: "#ef4444",
			},
			animation_class: "flow-fast",
		},
	}
}

pub fn glow_bucket(range: Range) -> GlowBucket {
	match range {
		Range::Low => GlowBucket::Blue,
		Range::Medium => GlowBucket::Yellow,
		Range::High => GlowBucket::Red,
	}
}

/// Seconds per dash cycle, log-interpolated between [`MAX_DURATION`] at 1 rps
/// and [`MIN_DURATION`] at [`MAX_RPS`].
pub fn animation_duration(rps: u32) -> f64 {
	let rps = f64::from(rps.max(1));
	let t = (rps.ln() - 1f64.ln()) / (f64::from(MAX_RPS).ln() - 1f64.ln());
	(MAX_DURATION - t * (MAX_DURATION - MIN_DURATION)).max(DURATION_FLOOR)
}

pub fn should_glow(label: &str) -> bool {
	label == "Database" || label.contains("DB")
}

/// Glow for a given node label at the current range.
pub fn node_glow(label: &str, range: Range) -> GlowBucket {
	if should_glow(label) {
		glow_bucket(range)
	} else {
		GlowBucket::None
	}
}

/// Everything a consumer needs for one throughput value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowStyle {
	pub rps: u32,
	pub range: Range,
	pub edge: EdgeStyle,
	pub glow: GlowBucket,
	pub duration: f64,
}

pub fn flow_style(rps: u32) -> FlowStyle {
	let range = range_of(rps);
	FlowStyle {
		rps,
		range,
		edge: edge_style(range),
		glow: glow_bucket(range),
		duration: animation_duration(rps),
	}
}

/// Remembers the last computed [`FlowStyle`] so a render loop only recomputes on change.
#[derive(Clone, Debug, Default)]
pub struct StyleCache {
	last: Option<FlowStyle>,
}

impl StyleCache {
	pub fn get(&mut self, rps: u32) -> FlowStyle {
		match self.last {
			Some(style) if style.rps == rps => style,
			_ => {
				let style = flow_style(rps);
				self.last = Some(style);
				style
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn range_boundaries() {
		assert_eq!(range_of(0), Range::Low);
		assert_eq!(range_of(500), Range::Low);
		assert_eq!(range_of(501), Range::Medium);
		assert_eq!(range_of(5000), Range::Medium);
		assert_eq!(range_of(5001), Range::High);
		assert_eq!(range_of(MAX_RPS), Range::High);
	}

	#[test]
	fn glow_mirrors_range() {
		assert_eq!(glow_bucket(Range::Low), GlowBucket::Blue);
		assert_eq!(glow_bucket(Range::Medium), GlowBucket::Yellow);
		assert_eq!(glow_bucket(Range::High), GlowBucket::Red);
		assert_eq!(node_glow("Service", Range::High), GlowBucket::None);
		assert_eq!(node_glow("Users DB", Range::Medium), GlowBucket::Yellow);
	}

	#[test]
	fn edge_styles_are_distinct_per_range() {
		let styles = [Range::Low, Range::Medium, Range::High].map(edge_style);
		assert_ne!(styles[0], styles[1]);
		assert_ne!(styles[1], styles[2]);
		assert_eq!(edge_style(Range::Medium), edge_style(range_of(1234)));
	}

	#[test]
	fn animation_classes_follow_range() {
		assert_eq!(flow_style(10).edge.animation_class, "flow-slow");
		assert_eq!(flow_style(501).edge.animation_class, "flow-medium");
		assert_eq!(flow_style(5001).edge.animation_class, "flow-fast");
	}

	#[test]
	fn duration_endpoints() {
		assert!((animation_duration(1) - 0.666).abs() < 1e-9);
		assert!((animation_duration(MAX_RPS) - 0.067).abs() < 1e-9);
		assert_eq!(animation_duration(0), animation_duration(1));
	}

	#[test]
	fn duration_is_non_increasing() {
		let mut prev = f64::INFINITY;
		for rps in (0..=MAX_RPS).step_by(97) {
			let d = animation_duration(rps);
			assert!(d <= prev, "duration rose at {rps}");
			assert!(d >= DURATION_FLOOR);
			prev = d;
		}
	}

	#[test]
	fn glow_labels() {
		assert!(should_glow("Database"));
		assert!(should_glow("OrdersDB"));
		assert!(!should_glow("database"));
		assert!(!should_glow("Db replica"));
	}

	#[test]
	fn cache_recomputes_on_change() {
		let mut cache = StyleCache::default();
		assert_eq!(cache.get(100).range, Range::Low);
		assert_eq!(cache.get(100), flow_style(100));
		assert_eq!(cache.get(9000).range, Range::High);
	}
}
