use std::collections::HashSet;

use guild_graph::{Category, Edge, GraphError, GraphModel, Node, SelectionPresenter, ValidationError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn agents(ids: &[usize]) -> Vec<Node> {
	ids.iter()
		.map(|i| Node::new(format!("n{i}"), format!("Node {i}"), Category::Agent, 1.0))
		.collect()
}

fn links(pairs: &[(usize, usize)]) -> Vec<Edge> {
	pairs
		.iter()
		.map(|(a, b)| Edge::new(format!("n{a}"), format!("n{b}"), 1.0))
		.collect()
}

proptest! {
	#[test]
	fn prop_build_succeeds_iff_well_formed(
		ids in proptest::collection::vec(0..8usize, 1..8),
		pairs in proptest::collection::vec((0..10usize, 0..10usize), 0..16)
	) {
		let unique: HashSet<usize> = ids.iter().copied().collect();
		let well_formed = unique.len() == ids.len()
			&& pairs
				.iter()
				.all(|(a, b)| a != b && unique.contains(a) && unique.contains(b));

		match GraphModel::build(agents(&ids), links(&pairs)) {
			Ok(model) => {
				prop_assert!(well_formed);
				prop_assert_eq!(model.node_count(), ids.len());
				prop_assert_eq!(model.edges().len(), pairs.len());
			}
			Err(e) => {
				prop_assert!(!well_formed);
				prop_assert!(matches!(e, GraphError::Validation(_)));
			}
		}
	}

	#[test]
	fn prop_neighbors_preserve_multiplicity_in_both_directions(
		n in 2..8usize,
		raw in proptest::collection::vec((0..8usize, 0..8usize), 0..20)
	) {
		let pairs: Vec<(usize, usize)> = raw
			.into_iter()
			.map(|(a, b)| (a % n, b % n))
			.filter(|(a, b)| a != b)
			.collect();
		let ids: Vec<usize> = (0..n).collect();
		let model = GraphModel::build(agents(&ids), links(&pairs)).unwrap();

		for a in 0..n {
			let id = format!("n{a}");
			let neighbors = model.neighbors_of(&id).unwrap();
			let touching = pairs.iter().filter(|(s, t)| *s == a || *t == a).count();
			prop_assert_eq!(neighbors.len(), touching);

			for b in (0..n).filter(|&b| b != a) {
				let other = format!("n{b}");
				let between = pairs
					.iter()
					.filter(|&&(s, t)| (s, t) == (a, b) || (s, t) == (b, a))
					.count();
				let seen = neighbors.iter().filter(|(node, _)| node.id == other).count();
				prop_assert_eq!(seen, between);

				let back = model
					.neighbors_of(&other)
					.unwrap()
					.iter()
					.filter(|(node, _)| node.id == id)
					.count();
				prop_assert_eq!(back, between);
			}
		}
	}
}

fn star() -> GraphModel {
	GraphModel::build(
		vec![
			Node::new("C", "Center", Category::Hub, 10.0),
			Node::new("A", "Alpha", Category::Agent, 5.0),
			Node::new("B", "Beta", Category::Agent, 5.0),
		],
		vec![Edge::new("C", "A", 1.0), Edge::new("C", "B", 1.0)],
	)
	.unwrap()
}

#[test]
fn star_scenario_lists_neighbors_in_insertion_order() {
	let model = star();
	let ids = |id: &str| -> Vec<String> {
		model
			.neighbors_of(id)
			.unwrap()
			.into_iter()
			.map(|(n, _)| n.id.clone())
			.collect()
	};
	assert_eq!(ids("C"), vec!["A".to_string(), "B".to_string()]);
	assert_eq!(ids("A"), vec!["C".to_string()]);
	assert_eq!(ids("B"), vec!["C".to_string()]);
}

#[test]
fn star_scenario_selection_lists_center_once() {
	let mut presenter = SelectionPresenter::new(std::rc::Rc::new(star()));
	let view = presenter.select_node("A").unwrap();
	assert_eq!(view.connections.len(), 1);
	assert_eq!(view.connections[0].node_id, "C");
	assert_eq!(view.connections[0].display_name, "Center");
	assert_eq!(view.connections[0].category, Category::Hub);
}

#[test]
fn dangling_endpoint_produces_no_model() {
	let result = GraphModel::build(
		vec![Node::new("a", "A", Category::Agent, 1.0)],
		vec![Edge::new("a", "ghost", 1.0)],
	);
	assert_eq!(
		result.unwrap_err(),
		GraphError::Validation(ValidationError::UnknownEndpoint {
			edge: 0,
			id: "ghost".into()
		})
	);
}

#[test]
fn dataset_json_builds_through_aliases() {
	let json = r#"{
		"nodes": [
			{ "id": "h", "name": "Hub", "group": 0, "category": "hub", "size": 18 },
			{ "id": "g", "name": "Guild", "category": "guild", "weight": 12,
			  "details": { "role": "Combat Guild", "threatLevel": "High", "followers": 24 } }
		],
		"links": [ { "source": "h", "target": "g", "value": 5 } ],
		"layout": { "chargeStrength": -1500 }
	}"#;
	let dataset: guild_graph::GraphDataset = serde_json::from_str(json).unwrap();
	assert_eq!(dataset.layout.as_ref().unwrap().charge_strength, -1500.0);
	assert_eq!(dataset.layout.as_ref().unwrap().base_distance, 100.0);

	let model = GraphModel::from_dataset(dataset).unwrap();
	assert_eq!(model.degree("g").unwrap(), 1);
	assert_eq!(model.node("h").unwrap().weight, 18.0);
	match &model.node("g").unwrap().detail {
		Some(guild_graph::NodeDetail::Guild(d)) => {
			assert_eq!(d.dossier.role, "Combat Guild");
			assert_eq!(d.threat_level.as_deref(), Some("High"));
			assert_eq!(d.known_members, Some(24));
		}
		other => panic!("unexpected detail {other:?}"),
	}
}
