use std::fmt;

use serde::{Deserialize, Serialize};

/// Node identity. Ids start at 1 and grow with every insertion.
pub type NodeId = u32;

/// A position in canvas (world) space, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

impl std::ops::Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

/// Role of a node in the flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Start,
	#[default]
	Process,
	End,
}

/// A labeled component placed on the canvas. `(x, y)` is the top-left corner of its box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: NodeId,
	pub label: String,
	pub x: f64,
	pub y: f64,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
}

impl Node {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

/// Opaque, session-unique edge identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<String> for EdgeId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&str> for EdgeId {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A directed connection from `source` to `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	pub id: EdgeId,
	pub source: NodeId,
	pub target: NodeId,
}

/// Rubber-band line drawn while a connection is being dragged out.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TempLine {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

/// Label and kind applied to a newly added node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeTemplate {
	pub label: String,
	pub kind: NodeKind,
}

impl NodeTemplate {
	pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
		Self {
			label: label.into(),
			kind,
		}
	}

	/// Components offered by the editor toolbar.
	pub fn palette() -> Vec<NodeTemplate> {
		vec![
			Self::new("Client", NodeKind::Start),
			Self::new("Load Balancer", NodeKind::Process),
			Self::new("API Gateway", NodeKind::Process),
			Self::new("Service", NodeKind::Process),
			Self::new("Cache", NodeKind::Process),
			Self::new("Queue", NodeKind::Process),
			Self::new("Database", NodeKind::End),
		]
	}
}

/// Pan/zoom applied when drawing: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for CanvasTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl CanvasTransform {
	pub fn screen_to_world(&self, p: Point) -> Point {
		Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}

	/// Scale by `factor` (clamped to `[min_k, max_k]`) keeping `anchor` fixed on screen.
	pub fn zoom_about(&mut self, anchor: Point, factor: f64, min_k: f64, max_k: f64) {
		let new_k = (self.k * factor).clamp(min_k, max_k);
		let ratio = new_k / self.k;
		self.x = anchor.x - (anchor.x - self.x) * ratio;
		self.y = anchor.y - (anchor.y - self.y) * ratio;
		self.k = new_k;
	}

	/// Replace non-finite or out-of-range values coming from outside the app.
	pub fn sanitized(self, min_k: f64, max_k: f64) -> Self {
		if !(self.x.is_finite() && self.y.is_finite() && self.k.is_finite()) || self.k <= 0.0 {
			return Self::default();
		}
		Self {
			k: self.k.clamp(min_k, max_k),
			..self
		}
	}
}

/// Node and edge collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl Graph {
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
		self.edges.iter().find(|e| &e.id == id)
	}

	pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
		self.edges
			.iter()
			.any(|e| e.source == source && e.target == target)
	}

	/// Both endpoints of `edge`, or `None` if either node is gone.
	pub fn endpoints(&self, edge: &Edge) -> Option<(&Node, &Node)> {
		Some((self.node(edge.source)?, self.node(edge.target)?))
	}

	pub fn next_node_id(&self) -> NodeId {
		self.nodes.iter().map(|n| n.id).max().unwrap_or(0) + 1
	}
}
