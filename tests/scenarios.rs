use system_sketch::controller::{self, Gesture, HitTarget, PointerButton};
use system_sketch::persist::{self, BlobStorage, MemoryStorage};
use system_sketch::style::{self, GlowBucket, Range};
use system_sketch::{DiagramStore, EditorSettings, NodeTemplate, NodeKind, Point};

#[test]
fn add_connect_then_cascade_delete() {
	let mut store = DiagramStore::new(11);
	assert_eq!(store.add_node(None), 1);
	assert_eq!(store.add_node(None), 2);
	assert_eq!(store.nodes().len(), 2);

	store.add_edge(1, 2);
	assert_eq!(store.edges().len(), 1);

	store.delete_node(1);
	assert!(store.nodes().iter().all(|n| n.id != 1));
	assert!(store.edges().is_empty());
}

#[test]
fn throughput_is_clamped_at_both_ends() {
	let mut store = DiagramStore::new(11);
	store.set_throughput(-50.0);
	assert_eq!(store.requests_per_second(), 0);
	store.set_throughput(999_999.0);
	assert_eq!(store.requests_per_second(), 50_000);
}

#[test]
fn drag_gesture_follows_pointer() {
	let settings = EditorSettings::default();
	let mut store = DiagramStore::new(11);
	let id = store.add_node(None);
	let start = store.nodes()[0].position();

	let target = controller::hit_test(&store, start, &settings.node);
	assert_eq!(target, HitTarget::NodeBody(id));
	controller::pointer_down(&mut store, &settings, &target, start, PointerButton::Primary);
	controller::pointer_move(&mut store, Point::new(start.x + 10.0, start.y + 5.0));
	assert_eq!(
		store.nodes()[0].position(),
		Point::new(start.x + 10.0, start.y + 5.0)
	);

	// released far outside the canvas
	controller::pointer_up(&mut store, &HitTarget::Background);
	assert_eq!(store.interaction().dragging_node, None);
	assert_eq!(controller::gesture(&store), Gesture::Idle);
}

#[test]
fn connect_by_ports_found_through_hit_testing() {
	let settings = EditorSettings::default();
	let geo = settings.node;
	let mut store = DiagramStore::new(3);
	let a = store.add_node(Some(&NodeTemplate::new("Client", NodeKind::Start)));
	let b = store.add_node(Some(&NodeTemplate::new("Orders DB", NodeKind::End)));
	store.update_node_position(a, 0.0, 0.0);
	store.update_node_position(b, 400.0, 200.0);

	let out = Point::new(geo.width, geo.height / 2.0);
	let target = controller::hit_test(&store, out, &geo);
	assert_eq!(target, HitTarget::OutputPort(a));
	controller::pointer_down(&mut store, &settings, &target, out, PointerButton::Primary);

	let inp = Point::new(400.0, 200.0 + geo.height / 2.0);
	controller::pointer_move(&mut store, inp);
	let drop = controller::hit_test(&store, inp, &geo);
	assert_eq!(drop, HitTarget::InputPort(b));
	controller::pointer_up(&mut store, &drop);

	assert_eq!(store.edges().len(), 1);
	assert_eq!((store.edges()[0].source, store.edges()[0].target), (a, b));

	// same gesture again: duplicate ignored; reverse direction allowed
	assert!(store.add_edge(a, b).is_none());
	assert!(store.add_edge(b, a).is_some());
	assert_eq!(store.edges().len(), 2);
}

#[test]
fn styling_consumer_view() {
	let low = style::flow_style(500);
	assert_eq!(low.range, Range::Low);
	assert_eq!(low.glow, GlowBucket::Blue);
	let high = style::flow_style(5001);
	assert_eq!(high.range, Range::High);
	assert_eq!(high.edge, style::edge_style(Range::High));
	assert!(high.duration < low.duration);
	assert_eq!(style::node_glow("Client", high.range), GlowBucket::None);
}

#[test]
fn persistence_round_trip_drops_interaction() {
	let settings = EditorSettings::default();
	let mut store = DiagramStore::starter(5);
	store.set_throughput(7000.0);
	store.set_selected(Some(3));
	let mut storage = MemoryStorage::default();
	persist::save(&mut storage, &settings.storage_key, &store).expect("save");
	assert!(storage.read(&settings.storage_key).expect("read").is_some());

	let restored = persist::load_or_default(&storage, &settings, 6);
	assert_eq!(restored.graph(), store.graph());
	assert_eq!(restored.requests_per_second(), 7000);
	assert_eq!(restored.interaction().selected_node, None);
}

#[test]
fn garbage_in_storage_means_starter_graph() {
	let settings = EditorSettings::default();
	let mut storage = MemoryStorage::default();
	storage
		.write(&settings.storage_key, "[1, 2, 3]")
		.expect("write");
	let restored = persist::load_or_default(&storage, &settings, 6);
	let labels: Vec<_> = restored.nodes().iter().map(|n| n.label.clone()).collect();
	assert_eq!(labels, ["Client", "API Gateway", "Service", "Database"]);
}
