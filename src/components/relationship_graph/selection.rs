//! Click-to-detail projection.
//!
//! [`SelectionPresenter`] turns a clicked node id into a [`SelectionView`]: the
//! node's dossier (or a minimal name/category fallback) plus a summary of every
//! connection. It never mutates the model.

use std::rc::Rc;

use log::{info, warn};

use super::error::GraphError;
use super::model::GraphModel;
use super::types::{Category, NodeDetail};

/// One neighbor as listed in the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	/// Id of the neighbor.
	pub node_id: String,
	/// Neighbor's label.
	pub display_name: String,
	/// Neighbor's category.
	pub category: Category,
}

/// Display-ready projection of a selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionView {
	/// Id of the selected node.
	pub node_id: String,
	/// Label of the selected node.
	pub display_name: String,
	/// Category of the selected node.
	pub category: Category,
	/// The node's dossier, `None` for ordinary nodes.
	pub detail: Option<NodeDetail>,
	/// One entry per incident edge, in adjacency order.
	pub connections: Vec<Connection>,
}

impl SelectionView {
	/// Connection counts per category, in [`Category::ALL`] order, skipping zeros.
	pub fn connection_tally(&self) -> Vec<(Category, usize)> {
		Category::ALL
			.into_iter()
			.map(|cat| {
				let count = self.connections.iter().filter(|c| c.category == cat).count();
				(cat, count)
			})
			.filter(|&(_, count)| count > 0)
			.collect()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SelectionState {
	/// Nothing is selected and no panel is shown.
	#[default]
	Unselected,
	/// The node with this id is selected.
	Selected(String),
}

/// Holds the current selection over a shared, read-only model.
pub struct SelectionPresenter {
	model: Rc<GraphModel>,
	state: SelectionState,
	view: Option<SelectionView>,
}

impl SelectionPresenter {
	/// Presenter over `model`, starting unselected.
	pub fn new(model: Rc<GraphModel>) -> Self {
		Self {
			model,
			state: SelectionState::Unselected,
			view: None,
		}
	}

	/// Build the view for `id` without touching the selection state.
	pub fn project(&self, id: &str) -> Result<SelectionView, GraphError> {
		let node = self.model.node(id)?;
		let connections = self
			.model
			.neighbors_of(id)?
			.into_iter()
			.map(|(other, _)| Connection {
				node_id: other.id.clone(),
				display_name: other.display_name.clone(),
				category: other.category,
			})
			.collect();
		Ok(SelectionView {
			node_id: node.id.clone(),
			display_name: node.display_name.clone(),
			category: node.category,
			detail: node.detail.clone(),
			connections,
		})
	}

	/// Select `id`, replacing any current selection.
	///
	/// On [`GraphError::NotFound`] the state is left as it was.
	pub fn select_node(&mut self, id: &str) -> Result<&SelectionView, GraphError> {
		let view = self.project(id)?;
		self.state = SelectionState::Selected(id.to_string());
		let view: &SelectionView = self.view.insert(view);
		Ok(view)
	}

	/// Click handler: selects `id`, or clears the selection when `id` is stale.
	pub fn handle_click(&mut self, id: &str) -> Option<&SelectionView> {
		match self.project(id) {
			Ok(view) => {
				info!(
					"guild-graph: selected `{}` ({} connections)",
					id,
					view.connections.len()
				);
				self.state = SelectionState::Selected(id.to_string());
				let view: &SelectionView = self.view.insert(view);
				Some(view)
			}
			Err(e) => {
				warn!("guild-graph: ignoring click on stale node: {}", e);
				self.clear_selection();
				None
			}
		}
	}

	/// Drop the selection and its view.
	pub fn clear_selection(&mut self) {
		self.state = SelectionState::Unselected;
		self.view = None;
	}

	/// Current state of the selection machine.
	pub fn state(&self) -> &SelectionState {
		&self.state
	}

	/// Id of the selected node, if any.
	pub fn selected_id(&self) -> Option<&str> {
		match &self.state {
			SelectionState::Selected(id) => Some(id),
			SelectionState::Unselected => None,
		}
	}

	/// View of the selected node, if any.
	pub fn view(&self) -> Option<&SelectionView> {
		self.view.as_ref()
	}

	/// The model being presented.
	pub fn model(&self) -> &GraphModel {
		&self.model
	}
}
