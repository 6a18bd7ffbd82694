//! Pointer gestures → store calls. Nothing in here keeps state between
//! events; the gesture in progress is read back from the store each time.

use super::settings::{EditorSettings, NodeGeometry};
use super::store::{DiagramStore, PendingClick};
use super::types::{EdgeId, Node, NodeId, Point, TempLine};

/// How far (canvas px) a press may wander and still count as a click.
pub const CLICK_SLOP: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	Primary,
	Other,
}

impl PointerButton {
	/// From `MouseEvent.button`.
	pub fn from_code(code: i16) -> Self {
		if code == 0 {
			PointerButton::Primary
		} else {
			PointerButton::Other
		}
	}
}

/// Top-left of the canvas element in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasRect {
	pub left: f64,
	pub top: f64,
}

/// Viewport → canvas-local coordinates.
pub fn to_canvas(client_x: f64, client_y: f64, rect: CanvasRect) -> Point {
	Point::new(client_x - rect.left, client_y - rect.top)
}

/// What sits under the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
	Background,
	NodeBody(NodeId),
	OutputPort(NodeId),
	InputPort(NodeId),
	DeleteButton(NodeId),
	EdgeHandle(EdgeId),
}

/// Gesture currently in progress, derived from store state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
	Idle,
	Dragging(NodeId),
	Connecting(NodeId),
	Panning,
}

pub fn gesture(store: &DiagramStore) -> Gesture {
	let i = store.interaction();
	match (i.dragging_node, i.connecting, i.pan) {
		(Some(id), _, _) => Gesture::Dragging(id),
		(_, Some(id), _) => Gesture::Connecting(id),
		(_, _, Some(_)) => Gesture::Panning,
		_ => Gesture::Idle,
	}
}

pub fn input_port(node: &Node, geo: &NodeGeometry) -> Point {
	Point::new(node.x, node.y + geo.height / 2.0)
}

pub fn output_port(node: &Node, geo: &NodeGeometry) -> Point {
	Point::new(node.x + geo.width, node.y + geo.height / 2.0)
}

/// Top-left corner of the delete button drawn on a selected node.
pub fn delete_button(node: &Node, geo: &NodeGeometry) -> Point {
	Point::new(node.x + geo.width - geo.delete_size - 4.0, node.y + 4.0)
}

pub fn edge_handle(source: &Node, target: &Node, geo: &NodeGeometry) -> Point {
	let (a, b) = (output_port(source, geo), input_port(target, geo));
	Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn in_box(p: Point, origin: Point, w: f64, h: f64) -> bool {
	p.x >= origin.x && p.x <= origin.x + w && p.y >= origin.y && p.y <= origin.y + h
}

/// Resolve a canvas-local point. Later-drawn nodes are on top and win, so a
/// selected node's delete button only counts where no node above covers it.
pub fn hit_test(store: &DiagramStore, local: Point, geo: &NodeGeometry) -> HitTarget {
	let world = store.transform().screen_to_world(local);
	let graph = store.graph();
	let selected = store.interaction().selected_node;

	for node in graph.nodes.iter().rev() {
		if selected == Some(node.id)
			&& in_box(world, delete_button(node, geo), geo.delete_size, geo.delete_size)
		{
			return HitTarget::DeleteButton(node.id);
		}
		if output_port(node, geo).distance(world) <= geo.port_hit_radius {
			return HitTarget::OutputPort(node.id);
		}
		if input_port(node, geo).distance(world) <= geo.port_hit_radius {
			return HitTarget::InputPort(node.id);
		}
		if in_box(world, node.position(), geo.width, geo.height) {
			return HitTarget::NodeBody(node.id);
		}
	}

	for edge in &graph.edges {
		let Some((source, target)) = graph.endpoints(edge) else {
			continue;
		};
		if edge_handle(source, target, geo).distance(world) <= geo.edge_handle_radius + 2.0 {
			return HitTarget::EdgeHandle(edge.id.clone());
		}
	}

	HitTarget::Background
}

/// Press. Body starts a drag, output port starts a connection, background starts a pan.
pub fn pointer_down(
	store: &mut DiagramStore,
	settings: &EditorSettings,
	target: &HitTarget,
	local: Point,
	button: PointerButton,
) {
	if button != PointerButton::Primary {
		return;
	}
	store.end_gesture();
	let world = store.transform().screen_to_world(local);

	match target {
		HitTarget::NodeBody(id) => {
			let Some(node) = store.graph().node(*id) else {
				return;
			};
			let offset = world - node.position();
			let pending = PendingClick {
				node: *id,
				was_selected: store.interaction().selected_node == Some(*id),
				origin: local,
			};
			store.start_drag(*id, offset, Some(pending));
		}
		HitTarget::OutputPort(id) => {
			let Some(node) = store.graph().node(*id) else {
				return;
			};
			let from = output_port(node, &settings.node);
			store.start_connect(
				*id,
				TempLine {
					x1: from.x,
					y1: from.y,
					x2: from.x,
					y2: from.y,
				},
			);
		}
		HitTarget::InputPort(_) => {}
		HitTarget::DeleteButton(id) => {
			if store.interaction().selected_node == Some(*id) {
				store.delete_node(*id);
			}
		}
		HitTarget::EdgeHandle(id) => {
			store.delete_edge(id);
		}
		HitTarget::Background => {
			store.set_selected(None);
			store.start_pan(local);
		}
	}
}

pub fn pointer_move(store: &mut DiagramStore, local: Point) {
	let world = store.transform().screen_to_world(local);

	match gesture(store) {
		Gesture::Dragging(id) => {
			let interaction = store.interaction();
			let offset = interaction.drag_offset;
			if interaction
				.pending_click
				.is_some_and(|pc| pc.origin.distance(local) > CLICK_SLOP)
			{
				store.cancel_pending_click();
			}
			let pos = world - offset;
			store.update_node_position(id, pos.x, pos.y);
		}
		Gesture::Connecting(_) => store.set_temp_line_end(world),
		Gesture::Panning => {
			let Some(anchor) = store.interaction().pan else {
				return;
			};
			let mut transform = anchor.origin;
			transform.x += local.x - anchor.start.x;
			transform.y += local.y - anchor.start.y;
			store.set_transform(transform);
		}
		Gesture::Idle => {}
	}
}

/// Release, wherever it happens. Always leaves the store idle.
pub fn pointer_up(store: &mut DiagramStore, target: &HitTarget) {
	let interaction = store.interaction().clone();

	if let (Some(source), HitTarget::InputPort(dest)) = (interaction.connecting, target) {
		if source != *dest {
			store.add_edge(source, *dest);
		}
	}

	if let Some(click) = interaction.pending_click {
		if *target == HitTarget::NodeBody(click.node) && click.was_selected {
			store.set_selected(None);
		}
	}

	store.end_gesture();
}

/// Wheel zoom about the pointer.
pub fn wheel(store: &mut DiagramStore, settings: &EditorSettings, local: Point, delta_y: f64) {
	let factor = if delta_y > 0.0 {
		1.0 / settings.zoom_step
	} else {
		settings.zoom_step
	};
	let mut transform = store.transform();
	transform.zoom_about(local, factor, settings.zoom_min, settings.zoom_max);
	store.set_transform(transform);
}

/// Keyboard shortcuts. Returns whether the key was used.
pub fn key_down(store: &mut DiagramStore, key: &str) -> bool {
	match key {
		"Delete" | "Backspace" => match store.interaction().selected_node {
			Some(id) => store.delete_node(id),
			None => false,
		},
		"Escape" => {
			store.end_gesture();
			store.set_selected(None);
			true
		}
		_ => false,
	}
}
