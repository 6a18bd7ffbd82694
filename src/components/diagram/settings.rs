/// Rectangle new nodes are dropped into at random.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRegion {
	pub min_x: f64,
	pub max_x: f64,
	pub min_y: f64,
	pub max_y: f64,
}

impl Default for SpawnRegion {
	fn default() -> Self {
		Self {
			min_x: 200.0,
			max_x: 600.0,
			min_y: 100.0,
			max_y: 400.0,
		}
	}
}

/// Box and hit-area sizes for a node, in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
	pub width: f64,
	pub height: f64,
	/// Drawn radius of the input/output ports
	pub port_radius: f64,
	/// Ports are easier to grab than they look
	pub port_hit_radius: f64,
	pub delete_size: f64,
	pub edge_handle_radius: f64,
}

impl Default for NodeGeometry {
	fn default() -> Self {
		Self {
			width: 140.0,
			height: 52.0,
			port_radius: 6.0,
			port_hit_radius: 10.0,
			delete_size: 16.0,
			edge_handle_radius: 6.0,
		}
	}
}

/// Editor configuration passed to the canvas component.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
	/// localStorage key the diagram is saved under
	pub storage_key: String,
	pub spawn: SpawnRegion,
	pub node: NodeGeometry,
	pub zoom_min: f64,
	pub zoom_max: f64,
	/// Multiplier applied per wheel notch
	pub zoom_step: f64,
}

impl Default for EditorSettings {
	fn default() -> Self {
		Self {
			storage_key: "system-sketch/diagram".into(),
			spawn: SpawnRegion::default(),
			node: NodeGeometry::default(),
			zoom_min: 0.1,
			zoom_max: 10.0,
			zoom_step: 1.1,
		}
	}
}
