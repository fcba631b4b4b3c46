//! Dataset schema for the relationship graph.
//!
//! Nodes carry a closed [`Category`] and an optional category-specific
//! [`NodeDetail`]. When deserialized from JSON, the `detail` payload is parsed
//! according to the node's `category`, so a guild can never carry a target's
//! dossier fields.

use std::fmt;

use serde::Deserialize;

use super::layout::SimulationParameters;

/// Edge tint used when an edge does not override its color.
pub const DEFAULT_EDGE_TINT: &str = "rgba(255, 255, 255, 0.2)";

/// The closed set of node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	/// The network's intelligence center.
	Hub,
	/// An organization with members and operations.
	Guild,
	/// A field operative.
	Agent,
	/// A person or group under observation.
	Target,
	/// An object of interest.
	Artifact,
}

impl Category {
	/// All categories in render-tier order (largest first).
	pub const ALL: [Category; 5] = [
		Category::Hub,
		Category::Guild,
		Category::Agent,
		Category::Target,
		Category::Artifact,
	];

	/// Human readable label shown next to connections in the detail panel.
	pub fn label(self) -> &'static str {
		match self {
			Category::Hub => "Hub",
			Category::Guild => "Guild",
			Category::Agent => "Agent",
			Category::Target => "Target",
			Category::Artifact => "Artifact",
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Fields every dossier carries regardless of category.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dossier {
	/// Function within the network, e.g. "Combat Guild".
	pub role: String,
	/// Clearance grade such as "S+" or "B".
	pub security_level: String,
	/// Current standing, e.g. "Monitored".
	pub status: String,
	/// Free-form recency, e.g. "2 hours ago".
	pub last_activity: String,
	/// One-paragraph summary.
	pub description: String,
}

/// A labelled count, e.g. "Agents: 12".
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Tally {
	#[serde(alias = "type")]
	pub label: String,
	/// How many of them.
	pub count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HubDetail {
	#[serde(flatten)]
	pub dossier: Dossier,
	/// What the hub can do.
	pub capabilities: Vec<String>,
	#[serde(alias = "connections")]
	pub affiliations: Vec<Tally>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuildDetail {
	#[serde(flatten)]
	pub dossier: Dossier,
	#[serde(alias = "rituals")]
	pub operations: Vec<String>,
	#[serde(alias = "artifacts")]
	pub assets: Vec<String>,
	#[serde(alias = "threat_level", alias = "influenceLevel")]
	pub threat_level: Option<String>,
	#[serde(alias = "known_members", alias = "followers")]
	pub known_members: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentDetail {
	#[serde(flatten)]
	pub dossier: Dossier,
	/// Fields the agent works in.
	pub specialties: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetDetail {
	#[serde(flatten)]
	pub dossier: Dossier,
	/// Field notes collected on the target.
	pub observations: Vec<String>,
	/// Assessed danger, e.g. "High".
	pub threat_level: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactDetail {
	#[serde(flatten)]
	pub dossier: Dossier,
	/// Notable traits of the artifact.
	pub properties: Vec<String>,
	/// Where the artifact came from, if known.
	pub origin: Option<String>,
}

/// Category-specific detail record for featured nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeDetail {
	/// Detail of a [`Category::Hub`] node.
	Hub(HubDetail),
	/// Detail of a [`Category::Guild`] node.
	Guild(GuildDetail),
	/// Detail of a [`Category::Agent`] node.
	Agent(AgentDetail),
	/// Detail of a [`Category::Target`] node.
	Target(TargetDetail),
	/// Detail of a [`Category::Artifact`] node.
	Artifact(ArtifactDetail),
}

impl NodeDetail {
	/// The category this detail shape belongs to.
	pub fn category(&self) -> Category {
		match self {
			NodeDetail::Hub(_) => Category::Hub,
			NodeDetail::Guild(_) => Category::Guild,
			NodeDetail::Agent(_) => Category::Agent,
			NodeDetail::Target(_) => Category::Target,
			NodeDetail::Artifact(_) => Category::Artifact,
		}
	}

	/// Fields every category shares.
	pub fn dossier(&self) -> &Dossier {
		match self {
			NodeDetail::Hub(d) => &d.dossier,
			NodeDetail::Guild(d) => &d.dossier,
			NodeDetail::Agent(d) => &d.dossier,
			NodeDetail::Target(d) => &d.dossier,
			NodeDetail::Artifact(d) => &d.dossier,
		}
	}

	/// Parse a raw JSON detail payload using the shape owned by `category`.
	fn parse(category: Category, raw: serde_json::Value) -> Result<Self, serde_json::Error> {
		Ok(match category {
			Category::Hub => NodeDetail::Hub(serde_json::from_value(raw)?),
			Category::Guild => NodeDetail::Guild(serde_json::from_value(raw)?),
			Category::Agent => NodeDetail::Agent(serde_json::from_value(raw)?),
			Category::Target => NodeDetail::Target(serde_json::from_value(raw)?),
			Category::Artifact => NodeDetail::Artifact(serde_json::from_value(raw)?),
		})
	}
}

/// A node in the relationship graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "NodeRecord")]
pub struct Node {
	/// Unique identifier. Edges reference nodes by this id.
	pub id: String,
	/// Label rendered next to the node and shown in the detail panel.
	pub display_name: String,
	/// Closed category; decides which detail shape is legal.
	pub category: Category,
	/// Drives render radius and simulation mass. Must be positive.
	pub weight: f64,
	/// Dossier for featured nodes; `None` for ordinary ones.
	pub detail: Option<NodeDetail>,
}

impl Node {
	/// Node without detail.
	pub fn new(
		id: impl Into<String>,
		display_name: impl Into<String>,
		category: Category,
		weight: f64,
	) -> Self {
		Self {
			id: id.into(),
			display_name: display_name.into(),
			category,
			weight,
			detail: None,
		}
	}

	/// Attach a dossier. Must match `category` or `GraphModel::build` rejects it.
	pub fn with_detail(mut self, detail: NodeDetail) -> Self {
		self.detail = Some(detail);
		self
	}
}

/// Wire form of a node before its detail is interpreted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
	id: String,
	#[serde(alias = "displayName")]
	name: String,
	category: Category,
	#[serde(alias = "size")]
	weight: f64,
	#[serde(default, alias = "details")]
	detail: Option<serde_json::Value>,
}

impl TryFrom<NodeRecord> for Node {
	type Error = serde_json::Error;

	fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
		let detail = record
			.detail
			.map(|raw| NodeDetail::parse(record.category, raw))
			.transpose()?;
		Ok(Self {
			id: record.id,
			display_name: record.name,
			category: record.category,
			weight: record.weight,
			detail,
		})
	}
}

/// A relationship between two nodes. Stored with a direction, treated as undirected.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Edge {
	#[serde(rename = "source")]
	pub source_id: String,
	#[serde(rename = "target")]
	pub target_id: String,
	/// Higher strength means a thicker line and a shorter rest length.
	#[serde(alias = "value")]
	pub strength: f64,
	/// Optional CSS color override.
	#[serde(default, alias = "color")]
	pub tint: Option<String>,
}

impl Edge {
	/// Untinted edge.
	pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, strength: f64) -> Self {
		Self {
			source_id: source_id.into(),
			target_id: target_id.into(),
			strength,
			tint: None,
		}
	}

	/// Override the edge color with a CSS color.
	pub fn with_tint(mut self, tint: impl Into<String>) -> Self {
		self.tint = Some(tint.into());
		self
	}

	/// The tint to draw with, falling back to the neutral default.
	pub fn tint_or_default(&self) -> &str {
		self.tint.as_deref().unwrap_or(DEFAULT_EDGE_TINT)
	}

	/// Given one endpoint, return the other. `None` if `id` is not an endpoint.
	pub fn other_end(&self, id: &str) -> Option<&str> {
		if self.source_id == id {
			Some(&self.target_id)
		} else if self.target_id == id {
			Some(&self.source_id)
		} else {
			None
		}
	}
}

/// Complete graph input: nodes, edges and optional layout tuning.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphDataset {
	/// Every node, ids unique.
	pub nodes: Vec<Node>,
	#[serde(alias = "links")]
	pub edges: Vec<Edge>,
	/// Overrides for the force simulation; absent fields keep their defaults.
	#[serde(default)]
	pub layout: Option<SimulationParameters>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detail_is_parsed_by_category() {
		let json = r#"{
			"id": "g1",
			"name": "Shadow Hunters",
			"category": "guild",
			"weight": 12,
			"detail": {
				"role": "Combat Guild",
				"securityLevel": "A",
				"operations": ["Artifact Recovery"],
				"threatLevel": "High",
				"knownMembers": 24
			}
		}"#;
		let node: Node = serde_json::from_str(json).unwrap();
		assert_eq!(node.category, Category::Guild);
		let Some(NodeDetail::Guild(detail)) = node.detail else {
			panic!("expected guild detail, got {:?}", node.detail);
		};
		assert_eq!(detail.dossier.role, "Combat Guild");
		assert_eq!(detail.dossier.security_level, "A");
		assert_eq!(detail.operations, vec!["Artifact Recovery".to_string()]);
		assert_eq!(detail.known_members, Some(24));
	}

	#[test]
	fn unknown_category_is_rejected() {
		let json = r#"{ "id": "x", "name": "X", "category": "wizard", "weight": 1 }"#;
		assert!(serde_json::from_str::<Node>(json).is_err());
	}

	#[test]
	fn edge_accepts_link_aliases() {
		let json = r#"{ "source": "a", "target": "b", "value": 3, "color": "red" }"#;
		let edge: Edge = serde_json::from_str(json).unwrap();
		assert_eq!(edge.strength, 3.0);
		assert_eq!(edge.tint_or_default(), "red");
		assert_eq!(edge.other_end("b"), Some("a"));
		assert_eq!(edge.other_end("c"), None);
	}

	#[test]
	fn edge_tint_defaults_to_neutral() {
		assert_eq!(Edge::new("a", "b", 1.0).tint_or_default(), DEFAULT_EDGE_TINT);
	}
}
