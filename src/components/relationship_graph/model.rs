//! Immutable node/edge store with a precomputed adjacency index.
//!
//! Built once from a [`GraphDataset`] and shared read-only between the layout
//! engine, the renderer and the selection presenter.

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::debug;

use super::error::{GraphError, ValidationError};
use super::types::{Edge, GraphDataset, Node};

/// Validated graph plus an `id -> incident edges` index.
#[derive(Clone, Debug)]
pub struct GraphModel {
	/// Nodes keyed by id, in dataset order.
	nodes: IndexMap<String, Node>,
	edges: Vec<Edge>,
	/// Incident edge indices per node, in edge insertion order. Every node has an
	/// entry, isolated nodes map to an empty list.
	adjacency: Vec<Vec<usize>>,
}

impl GraphModel {
	/// Validate `nodes` and `edges` and build the adjacency index.
	///
	/// Fails on the first duplicate id, non-positive weight or strength, detail
	/// attached to the wrong category, dangling endpoint or self-loop.
	pub fn build(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
		let mut by_id = IndexMap::with_capacity(nodes.len());
		for node in nodes {
			if !(node.weight.is_finite() && node.weight > 0.0) {
				return Err(ValidationError::InvalidWeight {
					id: node.id,
					weight: node.weight,
				}
				.into());
			}
			if let Some(detail) = &node.detail {
				if detail.category() != node.category {
					return Err(ValidationError::DetailMismatch {
						category: node.category,
						detail: detail.category(),
						id: node.id,
					}
					.into());
				}
			}
			match by_id.entry(node.id.clone()) {
				Entry::Occupied(_) => return Err(ValidationError::DuplicateNode(node.id).into()),
				Entry::Vacant(slot) => {
					slot.insert(node);
				}
			}
		}

		let mut adjacency = vec![Vec::new(); by_id.len()];
		for (i, edge) in edges.iter().enumerate() {
			if !(edge.strength.is_finite() && edge.strength > 0.0) {
				return Err(ValidationError::InvalidStrength {
					edge: i,
					strength: edge.strength,
				}
				.into());
			}
			let resolve = |id: &String| {
				by_id.get_index_of(id).ok_or_else(|| ValidationError::UnknownEndpoint {
					edge: i,
					id: id.clone(),
				})
			};
			let src = resolve(&edge.source_id)?;
			let tgt = resolve(&edge.target_id)?;
			if src == tgt {
				return Err(ValidationError::SelfLoop {
					edge: i,
					id: edge.source_id.clone(),
				}
				.into());
			}
			adjacency[src].push(i);
			adjacency[tgt].push(i);
		}

		debug!(
			"guild-graph: built model with {} nodes, {} edges",
			by_id.len(),
			edges.len()
		);

		Ok(Self {
			nodes: by_id,
			edges,
			adjacency,
		})
	}

	/// Build from a deserialized dataset. Layout overrides are not part of the model.
	pub fn from_dataset(dataset: GraphDataset) -> Result<Self, GraphError> {
		Self::build(dataset.nodes, dataset.edges)
	}

	/// Look up a node, [`GraphError::NotFound`] if absent.
	pub fn node(&self, id: &str) -> Result<&Node, GraphError> {
		self.nodes
			.get(id)
			.ok_or_else(|| GraphError::NotFound(id.to_string()))
	}

	/// Dense index of `id` in dataset order.
	pub fn index_of(&self, id: &str) -> Result<usize, GraphError> {
		self.nodes
			.get_index_of(id)
			.ok_or_else(|| GraphError::NotFound(id.to_string()))
	}

	/// Every node reachable over one edge from `id`, paired with that edge.
	///
	/// Direction is ignored and multi-edges yield the neighbor once per edge.
	/// Order follows edge insertion order.
	pub fn neighbors_of(&self, id: &str) -> Result<Vec<(&Node, &Edge)>, GraphError> {
		let idx = self.index_of(id)?;
		Ok(self.adjacency[idx]
			.iter()
			.filter_map(|&e| {
				let edge = &self.edges[e];
				let other = edge.other_end(id)?;
				self.nodes.get(other).map(|node| (node, edge))
			})
			.collect())
	}

	/// Number of edges touching `id`.
	pub fn degree(&self, id: &str) -> Result<usize, GraphError> {
		Ok(self.adjacency[self.index_of(id)?].len())
	}

	/// All nodes in dataset order.
	pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
		self.nodes.values()
	}

	/// All edges in insertion order, multi-edges included.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the model has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
