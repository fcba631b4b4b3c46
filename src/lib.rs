//! guild-graph: Interactive relationship graph for the guild intelligence network.
//!
//! This crate provides a WASM-based viewer that lays out hubs, guilds, agents,
//! targets and artifacts with a force-directed simulation, supports pan/zoom
//! and dragging, and opens a detail panel for the clicked node.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::relationship_graph::{
	Camera, CameraLimits, Category, Connection, Edge, GraphDataset, GraphError, GraphModel,
	LayoutEngine, LayoutSnapshot, Node, NodeDetail, Point, PositionVelocity,
	RelationshipGraphViewer, SelectionPresenter, SelectionState, SelectionView,
	SimulationParameters, Theme, ValidationError, dataset,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("guild-graph: logging initialized");
}

/// Load the dataset from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...], layout?: {...} }
fn load_graph_data() -> Option<GraphDataset> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphDataset>(&json_text) {
		Ok(data) => {
			info!(
				"guild-graph: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("guild-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Flat theme when the user asks the OS for reduced motion, the glowing one otherwise.
fn preferred_theme() -> Theme {
	let reduced = web_sys::window()
		.and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
		.is_some_and(|query| query.matches());
	if reduced {
		info!("guild-graph: reduced motion requested, using the minimal theme");
		Theme::minimal()
	} else {
		Theme::guild()
	}
}

/// Main application component.
/// Loads the dataset from the DOM (or the built-in network) and renders the viewer.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|| {
		info!("guild-graph: no embedded dataset, using the built-in network");
		dataset::guild_network()
	});
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Guild Intelligence Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<RelationshipGraphViewer data=graph_signal fullscreen=true theme=preferred_theme() />
			<div class="graph-overlay">
				<h1>"Guild Intelligence Network"</h1>
				<p class="subtitle">"Click a node for its dossier. Drag nodes to reposition. Scroll to zoom."</p>
			</div>
		</div>
	}
}
