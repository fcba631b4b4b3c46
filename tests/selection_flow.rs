use std::rc::Rc;

use guild_graph::{Category, GraphError, GraphModel, SelectionPresenter, SelectionState, dataset};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn presenter() -> SelectionPresenter {
	SelectionPresenter::new(Rc::new(
		GraphModel::from_dataset(dataset::guild_network()).unwrap(),
	))
}

#[test]
fn stale_id_is_not_found_and_click_leaves_unselected() {
	let mut p = presenter();
	assert_eq!(
		p.select_node("missing-id").unwrap_err(),
		GraphError::NotFound("missing-id".into())
	);
	assert_eq!(p.state(), &SelectionState::Unselected);

	assert!(p.handle_click("missing-id").is_none());
	assert_eq!(p.state(), &SelectionState::Unselected);
	assert!(p.view().is_none());
}

#[test]
fn stale_click_clears_an_existing_selection() {
	let mut p = presenter();
	p.handle_click("g1").unwrap();
	assert_eq!(p.selected_id(), Some("g1"));

	assert!(p.handle_click("gone").is_none());
	assert_eq!(p.state(), &SelectionState::Unselected);
}

#[test]
fn failed_select_keeps_previous_selection() {
	let mut p = presenter();
	p.select_node("m1").unwrap();
	assert!(p.select_node("nope").is_err());
	assert_eq!(p.selected_id(), Some("m1"));
}

#[test]
fn hub_view_carries_dossier_and_tally() {
	let mut p = presenter();
	let view = p.select_node("center").unwrap();
	assert_eq!(view.display_name, "Guild 00:00");
	assert_eq!(view.category, Category::Hub);
	assert_eq!(view.detail.as_ref().unwrap().dossier().security_level, "S+");
	assert_eq!(
		view.connection_tally(),
		vec![(Category::Guild, 4), (Category::Agent, 4)]
	);
}

#[test]
fn plain_node_falls_back_to_name_and_category() {
	let mut p = presenter();
	let view = p.select_node("t2").unwrap();
	assert_eq!(view.display_name, "Target Beta");
	assert_eq!(view.category, Category::Target);
	assert!(view.detail.is_none());
	let ids: Vec<&str> = view.connections.iter().map(|c| c.node_id.as_str()).collect();
	assert_eq!(ids, vec!["m1", "m2"]);
}

#[test]
fn reselect_switches_directly() {
	let mut p = presenter();
	p.select_node("g1").unwrap();
	p.select_node("g2").unwrap();
	assert_eq!(p.state(), &SelectionState::Selected("g2".into()));
	p.clear_selection();
	assert_eq!(p.state(), &SelectionState::Unselected);
}

proptest! {
	#[test]
	fn prop_select_node_is_idempotent(idx in 0..17usize) {
		let mut p = presenter();
		let id = p.model().nodes().nth(idx).unwrap().id.clone();
		let first = p.select_node(&id).unwrap().clone();
		let second = p.select_node(&id).unwrap().clone();
		prop_assert_eq!(first, second);
	}
}
