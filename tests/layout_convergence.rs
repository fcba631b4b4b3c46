use guild_graph::{
	Category, Edge, GraphDataset, GraphModel, LayoutEngine, Node, Point, SimulationParameters,
	dataset,
};
use proptest::prelude::*;

fn engine_for_network() -> LayoutEngine {
	let model = GraphModel::from_dataset(dataset::guild_network()).unwrap();
	LayoutEngine::new(&model, SimulationParameters::default())
}

#[test]
fn guild_network_energy_decays_and_settles() {
	let mut engine = engine_for_network();
	let mut energies = Vec::new();
	while engine.tick() {
		energies.push(engine.kinetic_energy());
		assert!(energies.len() <= 600, "layout did not settle");
	}
	assert!(engine.is_settled());
	assert!(energies.len() > 20);

	let mean = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
	let early = mean(&energies[..10]);
	let late = mean(&energies[energies.len() - 10..]);
	assert!(early > late, "early {early} vs late {late}");

	for (_, p) in engine.positions() {
		assert!(p.x.is_finite() && p.y.is_finite());
	}
}

#[test]
fn snapshot_matches_live_positions() {
	let mut engine = engine_for_network();
	for _ in 0..25 {
		engine.tick();
	}
	let snapshot = engine.snapshot();
	assert_eq!(snapshot.positions.len(), 17);
	for (id, p) in engine.positions() {
		assert_eq!(snapshot.get(id), Some(p));
	}
}

#[test]
fn dragging_reheats_a_settled_layout() {
	let mut engine = engine_for_network();
	while engine.tick() {}
	engine.pin("m2", 250.0, 250.0).unwrap();
	assert!(!engine.is_settled());
	assert!(engine.tick());
	assert_eq!(engine.position("m2"), Some(Point::new(250.0, 250.0)));
}

fn engine_from_json(json: &str, canvas: (f64, f64)) -> LayoutEngine {
	let dataset: GraphDataset = serde_json::from_str(json).unwrap();
	let params = dataset
		.layout
		.clone()
		.unwrap_or_default()
		.with_viewport(canvas.0, canvas.1);
	let model = GraphModel::from_dataset(dataset).unwrap();
	LayoutEngine::new(&model, params)
}

#[test]
fn zero_min_distance_from_dataset_keeps_positions_finite() {
	let json = r#"{
		"nodes": [
			{ "id": "a", "name": "A", "category": "agent", "weight": 8 },
			{ "id": "b", "name": "B", "category": "target", "weight": 6 }
		],
		"edges": [ { "source": "a", "target": "b", "strength": 2 } ],
		"layout": { "minDistance": 0 }
	}"#;
	let mut engine = engine_from_json(json, (800.0, 600.0));
	engine.seed_position("a", 1.0, 1.0).unwrap();
	engine.seed_position("b", 1.0, 1.0).unwrap();

	for _ in 0..50 {
		engine.tick();
		assert!(engine.kinetic_energy().is_finite());
		for (id, p) in engine.positions() {
			assert!(p.x.is_finite() && p.y.is_finite(), "{id} at {p:?}");
		}
	}
	assert_ne!(engine.position("a"), engine.position("b"));
}

#[test]
fn partial_layout_override_still_fits_the_canvas() {
	let json = r#"{
		"nodes": [
			{ "id": "a", "name": "A", "category": "agent", "weight": 8 },
			{ "id": "b", "name": "B", "category": "target", "weight": 6 }
		],
		"edges": [],
		"layout": { "chargeStrength": -1500 }
	}"#;
	let engine = engine_from_json(json, (1200.0, 900.0));
	assert_eq!(engine.params().viewport(), (1200.0, 900.0));
	assert_eq!(engine.params().charge_strength, -1500.0);

	let pinned = r#"{
		"nodes": [ { "id": "a", "name": "A", "category": "agent", "weight": 8 } ],
		"edges": [],
		"layout": { "viewportWidth": 300 }
	}"#;
	let engine = engine_from_json(pinned, (1200.0, 900.0));
	assert_eq!(engine.params().viewport(), (300.0, 900.0));
}

proptest! {
	#[test]
	fn prop_coincident_seeds_separate_without_nan(
		x in -500.0..500.0f64,
		y in -500.0..500.0f64,
		wa in 0.5..20.0f64,
		wb in 0.5..20.0f64,
		linked in any::<bool>()
	) {
		let edges = if linked { vec![Edge::new("a", "b", 1.0)] } else { vec![] };
		let model = GraphModel::build(
			vec![
				Node::new("a", "A", Category::Agent, wa),
				Node::new("b", "B", Category::Target, wb),
			],
			edges,
		)
		.unwrap();
		let mut engine = LayoutEngine::new(&model, SimulationParameters::default());
		engine.seed_position("a", x, y).unwrap();
		engine.seed_position("b", x, y).unwrap();

		prop_assert!(engine.tick());
		let (a, b) = (engine.position("a").unwrap(), engine.position("b").unwrap());
		prop_assert!(a.x.is_finite() && a.y.is_finite());
		prop_assert!(b.x.is_finite() && b.y.is_finite());
		prop_assert!(a != b);
	}
}
