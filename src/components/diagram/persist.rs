//! Save-on-mutation / load-on-init boundary around [`DiagramStore`].
//!
//! Only the durable subset (nodes, edges, throughput, pan/zoom) is written,
//! as one versioned JSON blob under a single key. Interaction state is never
//! stored. Anything that cannot be read back cleanly degrades to the starter
//! diagram instead of surfacing an error.

use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::settings::EditorSettings;
use super::store::DiagramStore;
use super::types::{CanvasTransform, Edge, Graph, Node};

/// Bumped whenever the blob layout changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum PersistError {
	#[error("local storage is not available")]
	Unavailable,
	#[error("storage call failed: {0}")]
	Storage(String),
	#[error("could not decode saved diagram: {0}")]
	Decode(#[source] serde_json::Error),
	#[error("could not encode diagram: {0}")]
	Encode(#[source] serde_json::Error),
	#[error("saved diagram has no schema version")]
	Unversioned,
	#[error("saved diagram has schema version {found}, expected {expected}")]
	Version { found: u32, expected: u32 },
}

/// Durable part of the editor state as written to storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedDiagram {
	/// Missing means unversioned, which is rejected.
	#[serde(default)]
	pub version: Option<u32>,
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	#[serde(deserialize_with = "lenient_number")]
	pub requests_per_second: f64,
	pub canvas_transform: CanvasTransform,
}

impl Default for PersistedDiagram {
	fn default() -> Self {
		Self {
			version: Some(SCHEMA_VERSION),
			nodes: Vec::new(),
			edges: Vec::new(),
			requests_per_second: 0.0,
			canvas_transform: CanvasTransform::default(),
		}
	}
}

// Non-numeric throughput reads as 0 rather than failing the whole blob.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: Deserializer<'de>,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	Ok(value.as_f64().unwrap_or(0.0))
}

impl PersistedDiagram {
	pub fn capture(store: &DiagramStore) -> Self {
		Self {
			version: Some(SCHEMA_VERSION),
			nodes: store.nodes().to_vec(),
			edges: store.edges().to_vec(),
			requests_per_second: f64::from(store.requests_per_second()),
			canvas_transform: store.transform(),
		}
	}

	pub fn into_store(self, settings: &EditorSettings, seed: u64) -> DiagramStore {
		let graph = Graph {
			nodes: self.nodes,
			edges: self.edges,
		};
		let transform = self
			.canvas_transform
			.sanitized(settings.zoom_min, settings.zoom_max);
		DiagramStore::from_parts(graph, self.requests_per_second, transform, seed)
			.with_spawn(settings.spawn)
	}
}

/// Minimal key-value backend.
pub trait BlobStorage {
	fn read(&self, key: &str) -> Result<Option<String>, PersistError>;
	fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// Browser `window.localStorage`.
pub struct LocalStorage {
	inner: web_sys::Storage,
}

impl LocalStorage {
	pub fn open() -> Result<Self, PersistError> {
		let window = web_sys::window().ok_or(PersistError::Unavailable)?;
		let inner = window
			.local_storage()
			.map_err(|e| PersistError::Storage(format!("{e:?}")))?
			.ok_or(PersistError::Unavailable)?;
		Ok(Self { inner })
	}
}

impl BlobStorage for LocalStorage {
	fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
		self.inner
			.get_item(key)
			.map_err(|e| PersistError::Storage(format!("{e:?}")))
	}

	fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
		self.inner
			.set_item(key, value)
			.map_err(|e| PersistError::Storage(format!("{e:?}")))
	}
}

/// In-memory backend for tests and non-browser hosts.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
	entries: HashMap<String, String>,
}

impl BlobStorage for MemoryStorage {
	fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
		Ok(self.entries.get(key).cloned())
	}

	fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
		self.entries.insert(key.to_owned(), value.to_owned());
		Ok(())
	}
}

pub fn encode(store: &DiagramStore) -> Result<String, PersistError> {
	serde_json::to_string(&PersistedDiagram::capture(store)).map_err(PersistError::Encode)
}

pub fn decode(blob: &str) -> Result<PersistedDiagram, PersistError> {
	let persisted: PersistedDiagram = serde_json::from_str(blob).map_err(PersistError::Decode)?;
	match persisted.version {
		None => Err(PersistError::Unversioned),
		Some(found) if found != SCHEMA_VERSION => Err(PersistError::Version {
			found,
			expected: SCHEMA_VERSION,
		}),
		Some(_) => Ok(persisted),
	}
}

pub fn save(
	storage: &mut impl BlobStorage,
	key: &str,
	store: &DiagramStore,
) -> Result<(), PersistError> {
	storage.write(key, &encode(store)?)
}

/// Saved diagram if one decodes cleanly, otherwise the starter diagram.
pub fn load_or_default(
	storage: &impl BlobStorage,
	settings: &EditorSettings,
	seed: u64,
) -> DiagramStore {
	let starter = || DiagramStore::starter(seed).with_spawn(settings.spawn);
	match storage.read(&settings.storage_key) {
		Ok(Some(blob)) => match decode(&blob) {
			Ok(persisted) => persisted.into_store(settings, seed),
			Err(e) => {
				warn!("Discarding saved diagram: {e}");
				starter()
			}
		},
		Ok(None) => {
			info!("No saved diagram, starting fresh");
			starter()
		}
		Err(e) => {
			warn!("Could not read saved diagram: {e}");
			starter()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::store::Interaction;
	use crate::components::diagram::types::{NodeKind, Point};

	fn settings() -> EditorSettings {
		EditorSettings::default()
	}

	fn stored(blob: &str) -> MemoryStorage {
		let mut storage = MemoryStorage::default();
		let _ = storage.write(&settings().storage_key, blob);
		storage
	}

	#[test]
	fn save_then_load_keeps_durable_state() {
		let mut store = DiagramStore::starter(1);
		store.add_node(None);
		store.set_throughput(4200.0);
		store.set_transform(CanvasTransform {
			x: 12.0,
			y: -8.0,
			k: 1.5,
		});
		let mut storage = MemoryStorage::default();
		save(&mut storage, &settings().storage_key, &store).expect("save");

		let loaded = load_or_default(&storage, &settings(), 2);
		assert_eq!(loaded.graph(), store.graph());
		assert_eq!(loaded.requests_per_second(), 4200);
		assert_eq!(loaded.transform(), store.transform());
	}

	#[test]
	fn transient_state_is_never_restored() {
		let mut store = DiagramStore::starter(1);
		store.set_selected(Some(2));
		store.start_drag(3, Point::new(4.0, 4.0), None);
		let mut storage = MemoryStorage::default();
		save(&mut storage, &settings().storage_key, &store).expect("save");

		let blob = storage.read(&settings().storage_key).ok().flatten().unwrap_or_default();
		assert!(!blob.contains("selected"));
		let loaded = load_or_default(&storage, &settings(), 1);
		assert_eq!(loaded.interaction(), &Interaction::default());
	}

	#[test]
	fn uses_camel_case_keys() {
		let blob = encode(&DiagramStore::starter(1)).expect("encode");
		assert!(blob.contains("\"requestsPerSecond\":100.0"));
		assert!(blob.contains("\"canvasTransform\""));
		assert!(blob.contains("\"type\":\"start\""));
		assert!(blob.contains("\"version\":1"));
	}

	#[test]
	fn malformed_blob_falls_back_to_starter() {
		let loaded = load_or_default(&stored("{not json"), &settings(), 1);
		assert_eq!(loaded.nodes(), DiagramStore::starter(1).nodes());
		assert_eq!(loaded.edges().len(), 3);
		assert!(matches!(decode("{not json"), Err(PersistError::Decode(_))));
	}

	#[test]
	fn version_mismatch_falls_back_to_starter() {
		let blob = r#"{"version":7,"nodes":[],"edges":[]}"#;
		assert!(matches!(
			decode(blob),
			Err(PersistError::Version {
				found: 7,
				expected: SCHEMA_VERSION
			})
		));
		let loaded = load_or_default(&stored(blob), &settings(), 1);
		assert_eq!(loaded.nodes().len(), 4);
	}

	#[test]
	fn unversioned_blob_falls_back_to_starter() {
		for blob in ["{}", r#"{"nodes":[]}"#, r#"{"foo":1}"#] {
			assert!(matches!(decode(blob), Err(PersistError::Unversioned)), "{blob}");
			let loaded = load_or_default(&stored(blob), &settings(), 1);
			assert_eq!(loaded.nodes(), DiagramStore::starter(1).nodes(), "{blob}");
			assert_eq!(loaded.edges().len(), 3);
			assert_eq!(loaded.requests_per_second(), 100);
		}
	}

	#[test]
	fn missing_fields_use_defaults() {
		let blob = r#"{"version":1,"nodes":[{"id":3,"label":"Cache","x":1,"y":2}],"extra":true}"#;
		let loaded = load_or_default(&stored(blob), &settings(), 1);
		assert_eq!(loaded.nodes().len(), 1);
		assert_eq!(loaded.nodes()[0].kind, NodeKind::Process);
		assert!(loaded.edges().is_empty());
		assert_eq!(loaded.requests_per_second(), 0);
		assert_eq!(loaded.transform(), CanvasTransform::default());
	}

	#[test]
	fn bad_throughput_values_are_tamed() {
		let blob = r#"{"version":1,"requestsPerSecond":"fast"}"#;
		assert_eq!(load_or_default(&stored(blob), &settings(), 1).requests_per_second(), 0);
		let blob = r#"{"version":1,"requestsPerSecond":123456}"#;
		assert_eq!(load_or_default(&stored(blob), &settings(), 1).requests_per_second(), 50_000);
	}

	#[test]
	fn dangling_edges_survive_load() {
		let blob = r#"{"version":1,"nodes":[{"id":1,"label":"A","x":0,"y":0,"type":"start"}],
			"edges":[{"id":"e1","source":1,"target":9}]}"#;
		let loaded = load_or_default(&stored(blob), &settings(), 1);
		assert_eq!(loaded.edges().len(), 1);
		assert!(loaded.graph().endpoints(&loaded.edges()[0]).is_none());
	}

	#[test]
	fn empty_storage_gives_starter() {
		let loaded = load_or_default(&MemoryStorage::default(), &settings(), 1);
		assert_eq!(loaded.nodes().len(), 4);
	}
}
