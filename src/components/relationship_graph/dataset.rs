//! The guild intelligence network shipped with the site.
//!
//! Used when the page does not embed its own `graph-data` script element.

use super::types::{
	Category, Dossier, Edge, GraphDataset, GuildDetail, HubDetail, Node, NodeDetail, Tally,
};

/// Tint for the hive-mind links radiating from Ravenna.
const HIVE_TINT: &str = "rgba(168, 85, 247, 0.3)";

fn strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|s| s.to_string()).collect()
}

fn dossier(
	role: &str,
	security_level: &str,
	status: &str,
	last_activity: &str,
	description: &str,
) -> Dossier {
	Dossier {
		role: role.into(),
		security_level: security_level.into(),
		status: status.into(),
		last_activity: last_activity.into(),
		description: description.into(),
	}
}

fn nodes() -> Vec<Node> {
	let hub = HubDetail {
		dossier: dossier(
			"Central Hub",
			"S+",
			"Active",
			"Now",
			"Core intelligence gathering and analysis center",
		),
		capabilities: strings(&[
			"Advanced Data Analysis",
			"Real-time Surveillance",
			"Memory Web Integration",
		]),
		affiliations: vec![
			Tally { label: "Agents".into(), count: 12 },
			Tally { label: "Active Operations".into(), count: 8 },
			Tally { label: "Allied Guilds".into(), count: 4 },
		],
	};
	let shadow_hunters = GuildDetail {
		dossier: dossier(
			"Combat Guild",
			"A",
			"Monitored",
			"2 hours ago",
			"Elite combat unit with suspected black market connections",
		),
		operations: strings(&["Artifact Recovery", "Territory Control", "Combat Training"]),
		assets: strings(&[
			"Hidden Training Grounds",
			"Weapon Cache Delta",
			"Underground Network",
		]),
		threat_level: Some("High".into()),
		known_members: Some(24),
	};
	let euphemia = GuildDetail {
		dossier: dossier(
			"Religious Organization",
			"B",
			"Infiltrated",
			"1 day ago",
			"Religious group dedicated to the worship of Euphemia",
		),
		operations: strings(&["Dawn Prayer", "Light Blessing", "Divine Communion"]),
		assets: strings(&["Tears of Euphemia", "Light Crystals", "Sacred Texts"]),
		threat_level: Some("Medium".into()),
		known_members: Some(156),
	};

	vec![
		Node::new("center", "Guild 00:00", Category::Hub, 18.0).with_detail(NodeDetail::Hub(hub)),
		Node::new("g1", "Shadow Hunters", Category::Guild, 12.0)
			.with_detail(NodeDetail::Guild(shadow_hunters)),
		Node::new("g2", "Euphemia Followers", Category::Guild, 12.0)
			.with_detail(NodeDetail::Guild(euphemia)),
		Node::new("g3", "Merchant Alliance", Category::Guild, 10.0),
		Node::new("g4", "Twilight Wardens", Category::Guild, 10.0),
		Node::new("m1", "Jun Minamitake", Category::Agent, 8.0),
		Node::new("m2", "Ravenna Nemesyn", Category::Agent, 8.0),
		Node::new("m3", "Agent 3", Category::Agent, 8.0),
		Node::new("m4", "Agent 4", Category::Agent, 8.0),
		Node::new("t1", "Target Alpha", Category::Target, 6.0),
		Node::new("t2", "Target Beta", Category::Target, 6.0),
		Node::new("t3", "Target Gamma", Category::Target, 6.0),
		Node::new("t4", "Target Delta", Category::Target, 6.0),
		Node::new("t5", "Target Epsilon", Category::Target, 6.0),
		Node::new("a1", "Divine Relic", Category::Artifact, 5.0),
		Node::new("a2", "Memory Crystal", Category::Artifact, 5.0),
		Node::new("a3", "Resonance Key", Category::Artifact, 5.0),
	]
}

fn edges() -> Vec<Edge> {
	let plain: &[(&str, &str, f64)] = &[
		// hub to agents
		("center", "m1", 10.0),
		("center", "m2", 10.0),
		("center", "m3", 10.0),
		("center", "m4", 10.0),
		// hub to guilds
		("center", "g1", 5.0),
		("center", "g2", 5.0),
		("center", "g3", 5.0),
		("center", "g4", 5.0),
		// agents to targets
		("m1", "t1", 3.0),
		("m1", "t2", 3.0),
		("m2", "t3", 3.0),
		("m2", "t4", 3.0),
		("m3", "t5", 3.0),
		("m4", "t1", 3.0),
		// targets to artifacts
		("t1", "a1", 2.0),
		("t3", "a2", 2.0),
		("t5", "a3", 2.0),
		// guild ring
		("g1", "g2", 1.0),
		("g2", "g3", 1.0),
		("g3", "g4", 1.0),
		("g4", "g1", 1.0),
	];
	let hive = ["t1", "t2", "t5", "a1", "a2", "a3"];

	plain
		.iter()
		.map(|&(s, t, v)| Edge::new(s, t, v))
		.chain(hive.iter().map(|t| Edge::new("m2", *t, 1.0).with_tint(HIVE_TINT)))
		.collect()
}

/// The default guild network: one hub, four guilds, four agents, five targets
/// and three artifacts.
pub fn guild_network() -> GraphDataset {
	GraphDataset {
		nodes: nodes(),
		edges: edges(),
		layout: None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::relationship_graph::model::GraphModel;

	#[test]
	fn builtin_network_is_valid() {
		let model = GraphModel::from_dataset(guild_network()).unwrap();
		assert_eq!(model.node_count(), 17);
		assert_eq!(model.edges().len(), 27);
		// Ravenna: hub, two targets, then six hive links.
		assert_eq!(model.degree("m2").unwrap(), 9);
	}
}
