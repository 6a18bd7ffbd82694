//! Authoritative diagram state. Every mutation goes through a `&mut self`
//! method, so a single `update` on the owning signal replaces the state as a
//! whole and readers never see a half-applied change.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::settings::SpawnRegion;
use super::style::MAX_RPS;
use super::types::{
	CanvasTransform, Edge, EdgeId, Graph, Node, NodeId, NodeKind, NodeTemplate, Point, TempLine,
};

/// Throughput the starter diagram opens with.
pub const STARTER_RPS: u32 = 100;

/// Press on a node body that may still turn out to be a click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingClick {
	pub node: NodeId,
	/// Selection state before the press
	pub was_selected: bool,
	/// Canvas-local press position
	pub origin: Point,
}

/// Where a background pan started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanAnchor {
	pub start: Point,
	pub origin: CanvasTransform,
}

/// Transient pointer state. Never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
	pub selected_node: Option<NodeId>,
	pub dragging_node: Option<NodeId>,
	pub drag_offset: Point,
	pub connecting: Option<NodeId>,
	pub temp_line: Option<TempLine>,
	pub pan: Option<PanAnchor>,
	pub pending_click: Option<PendingClick>,
}

/// Read-only view handed to the render surface.
#[derive(Clone, Copy, Debug)]
pub struct RenderSnapshot<'a> {
	pub nodes: &'a [Node],
	pub edges: &'a [Edge],
	pub temp_line: Option<TempLine>,
	pub selected_node: Option<NodeId>,
	pub dragging_node: Option<NodeId>,
	pub transform: CanvasTransform,
	pub requests_per_second: u32,
}

impl<'a> RenderSnapshot<'a> {
	pub fn node(&self, id: NodeId) -> Option<&'a Node> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Graph, interaction state and throughput for one editor.
#[derive(Clone, Debug)]
pub struct DiagramStore {
	graph: Graph,
	interaction: Interaction,
	requests_per_second: u32,
	transform: CanvasTransform,
	spawn: SpawnRegion,
	rng: SmallRng,
	edge_seq: u64,
}

impl DiagramStore {
	/// Empty diagram. `seed` drives node placement.
	pub fn new(seed: u64) -> Self {
		Self {
			graph: Graph::default(),
			interaction: Interaction::default(),
			requests_per_second: 0,
			transform: CanvasTransform::default(),
			spawn: SpawnRegion::default(),
			rng: SmallRng::seed_from_u64(seed),
			edge_seq: 0,
		}
	}

	/// Client → API Gateway → Service → Database.
	pub fn starter(seed: u64) -> Self {
		let mut store = Self::new(seed);
		store.load_starter();
		store
	}

	/// Rebuild a store from persisted parts. Interaction state always starts empty.
	pub fn from_parts(graph: Graph, requests_per_second: f64, transform: CanvasTransform, seed: u64) -> Self {
		let mut store = Self::new(seed);
		info!(
			"Rehydrated diagram with {} nodes and {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		store.graph = graph;
		store.transform = transform;
		store.set_throughput(requests_per_second);
		store
	}

	pub fn with_spawn(mut self, spawn: SpawnRegion) -> Self {
		self.spawn = spawn;
		self
	}

	fn load_starter(&mut self) {
		self.graph = Graph::default();
		let layout = [
			("Client", NodeKind::Start, 80.0),
			("API Gateway", NodeKind::Process, 300.0),
			("Service", NodeKind::Process, 520.0),
			("Database", NodeKind::End, 740.0),
		];
		for (label, kind, x) in layout {
			let id = self.graph.next_node_id();
			self.graph.nodes.push(Node {
				id,
				label: label.into(),
				x,
				y: 200.0,
				kind,
			});
		}
		for (source, target) in [(1, 2), (2, 3), (3, 4)] {
			self.add_edge(source, target);
		}
		self.requests_per_second = STARTER_RPS;
	}

	/// Back to the starter diagram with a default view.
	pub fn reset(&mut self) {
		self.load_starter();
		self.interaction = Interaction::default();
		self.transform = CanvasTransform::default();
		info!("Diagram reset");
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn nodes(&self) -> &[Node] {
		&self.graph.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.graph.edges
	}

	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	pub fn requests_per_second(&self) -> u32 {
		self.requests_per_second
	}

	pub fn transform(&self) -> CanvasTransform {
		self.transform
	}

	pub fn snapshot(&self) -> RenderSnapshot<'_> {
		RenderSnapshot {
			nodes: &self.graph.nodes,
			edges: &self.graph.edges,
			temp_line: self.interaction.temp_line,
			selected_node: self.interaction.selected_node,
			dragging_node: self.interaction.dragging_node,
			transform: self.transform,
			requests_per_second: self.requests_per_second,
		}
	}

	/// Insert a node at a random spot in the spawn region and return its id.
	pub fn add_node(&mut self, template: Option<&NodeTemplate>) -> NodeId {
		let id = self.graph.next_node_id();
		let SpawnRegion {
			min_x,
			max_x,
			min_y,
			max_y,
		} = self.spawn;
		let x = self.rng.random_range(min_x.min(max_x)..=max_x.max(min_x));
		let y = self.rng.random_range(min_y.min(max_y)..=max_y.max(min_y));
		let (label, kind) = match template {
			Some(t) => (t.label.clone(), t.kind),
			None => (format!("Node {id}"), NodeKind::Process),
		};
		debug!("Adding node {id} ({label}) at ({x:.0}, {y:.0})");
		self.graph.nodes.push(Node {
			id,
			label,
			x,
			y,
			kind,
		});
		id
	}

	/// Remove a node and every edge touching it. Returns whether anything was removed.
	pub fn delete_node(&mut self, id: NodeId) -> bool {
		let before = self.graph.nodes.len();
		self.graph.nodes.retain(|n| n.id != id);
		if self.graph.nodes.len() == before {
			return false;
		}
		self.graph
			.edges
			.retain(|e| e.source != id && e.target != id);
		if self.interaction.selected_node == Some(id) {
			self.interaction.selected_node = None;
		}
		self.end_gesture();
		debug!("Deleted node {id}");
		true
	}

	pub fn update_node_position(&mut self, id: NodeId, x: f64, y: f64) {
		if let Some(node) = self.graph.node_mut(id) {
			node.x = x;
			node.y = y;
		}
	}

	/// Connect `source` to `target`. Returns `None` if that ordered pair already exists.
	pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
		if self.graph.has_edge(source, target) {
			return None;
		}
		let id = self.fresh_edge_id();
		debug!("Adding edge {id}: {source} -> {target}");
		self.graph.edges.push(Edge {
			id: id.clone(),
			source,
			target,
		});
		Some(id)
	}

	fn fresh_edge_id(&mut self) -> EdgeId {
		let stamp = now_millis();
		loop {
			self.edge_seq += 1;
			let id = EdgeId::from(format!("edge-{stamp}-{}", self.edge_seq));
			if self.graph.edge(&id).is_none() {
				return id;
			}
		}
	}

	pub fn delete_edge(&mut self, id: &EdgeId) -> bool {
		let before = self.graph.edges.len();
		self.graph.edges.retain(|e| &e.id != id);
		let removed = self.graph.edges.len() != before;
		if removed {
			debug!("Deleted edge {id}");
		}
		removed
	}

	/// Store `value` rounded and clamped to `[0, MAX_RPS]`; NaN becomes 0.
	pub fn set_throughput(&mut self, value: f64) {
		let rps = if value.is_nan() {
			0
		} else {
			value.clamp(0.0, f64::from(MAX_RPS)).round() as u32
		};
		if rps != self.requests_per_second {
			debug!("Throughput set to {rps} rps");
		}
		self.requests_per_second = rps;
	}

	/// Raw text from an input field. Anything unparseable counts as 0.
	pub fn set_throughput_input(&mut self, raw: &str) {
		self.set_throughput(raw.trim().parse::<f64>().unwrap_or(0.0));
	}

	pub fn set_selected(&mut self, id: Option<NodeId>) {
		self.interaction.selected_node = id;
	}

	pub fn start_drag(&mut self, id: NodeId, offset: Point, pending: Option<PendingClick>) {
		self.interaction.dragging_node = Some(id);
		self.interaction.selected_node = Some(id);
		self.interaction.drag_offset = offset;
		self.interaction.pending_click = pending;
	}

	pub fn cancel_pending_click(&mut self) {
		self.interaction.pending_click = None;
	}

	pub fn start_connect(&mut self, id: NodeId, line: TempLine) {
		self.interaction.connecting = Some(id);
		self.interaction.temp_line = Some(line);
	}

	pub fn set_temp_line_end(&mut self, end: Point) {
		if let Some(line) = self.interaction.temp_line.as_mut() {
			line.x2 = end.x;
			line.y2 = end.y;
		}
	}

	pub fn start_pan(&mut self, start: Point) {
		self.interaction.pan = Some(PanAnchor {
			start,
			origin: self.transform,
		});
	}

	pub fn set_transform(&mut self, transform: CanvasTransform) {
		self.transform = transform;
	}

	/// Drop drag, connect and pan state. Selection survives.
	pub fn end_gesture(&mut self) {
		let i = &mut self.interaction;
		i.dragging_node = None;
		i.drag_offset = Point::default();
		i.connecting = None;
		i.temp_line = None;
		i.pan = None;
		i.pending_click = None;
	}
}

impl Default for DiagramStore {
	fn default() -> Self {
		Self::starter(now_millis())
	}
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn now_millis() -> u64 {
	js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn now_millis() -> u64 {
	use std::time::{SystemTime, UNIX_EPOCH};
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis() as u64)
		.unwrap_or(0)
}
