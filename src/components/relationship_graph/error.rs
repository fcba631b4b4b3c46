//! Error types for graph construction and lookup.

use super::types::Category;

/// A malformed dataset. Fatal: no [`GraphModel`](super::model::GraphModel) is built.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	/// An edge endpoint names no node.
	#[error("edge #{edge} references unknown node `{id}`")]
	UnknownEndpoint { edge: usize, id: String },

	/// An edge connects a node to itself.
	#[error("edge #{edge} is a self-loop on `{id}`")]
	SelfLoop { edge: usize, id: String },

	/// A node weight is zero, negative or not finite.
	#[error("node `{id}` has invalid weight {weight} (must be positive)")]
	InvalidWeight { id: String, weight: f64 },

	/// An edge strength is zero, negative or not finite.
	#[error("edge #{edge} has invalid strength {strength} (must be positive)")]
	InvalidStrength { edge: usize, strength: f64 },

	/// A node carries detail shaped for another category.
	#[error("node `{id}` is a {category} but carries {detail} detail")]
	DetailMismatch {
		id: String,
		category: Category,
		detail: Category,
	},
}

/// Errors surfaced by graph queries and construction.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GraphError {
	/// The dataset failed validation.
	#[error("invalid graph: {0}")]
	Validation(#[from] ValidationError),

	/// A lookup against an id that is not in the graph. Callers treat this as a
	/// stale reference.
	#[error("node `{0}` not found")]
	NotFound(String),
}

impl GraphError {
	/// Whether this is a lookup miss rather than a malformed dataset.
	pub fn is_not_found(&self) -> bool {
		matches!(self, GraphError::NotFound(_))
	}
}
