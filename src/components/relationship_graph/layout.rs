//! Force-directed layout simulation.
//!
//! Each tick applies pairwise charge repulsion (inverse square, scaled by the
//! source node's weight), spring attraction along edges towards a rest length of
//! `base_distance / strength`, then damped integration. Forces are scaled by a
//! cooling `alpha` so the layout always comes to rest; once kinetic energy falls
//! below a threshold (or alpha cools out) the engine is settled and ignores ticks
//! until it is perturbed by a drag.
//!
//! The engine owns every node's position and velocity. The renderer only reads
//! them through [`LayoutEngine::position`] or a [`LayoutSnapshot`].

use std::f64::consts::TAU;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use super::error::GraphError;
use super::model::GraphModel;
use super::types::Category;

/// Tuning for the force simulation. Deserializable so a dataset can override
/// individual fields; anything omitted keeps its default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParameters {
	/// Charge constant. Negative values repel.
	pub charge_strength: f64,
	/// Rest length of an edge with strength 1. Stronger edges rest closer.
	pub base_distance: f64,
	/// Spring constant for edges, divided by the smaller endpoint degree.
	pub link_stiffness: f64,
	/// Velocity retained each tick (must be below 1).
	pub friction: f64,
	/// Floor applied to pair distance before computing repulsion.
	pub min_distance: f64,
	/// Per-tick velocity clamp.
	pub max_speed: f64,
	/// Fraction of alpha lost each tick.
	pub alpha_decay: f64,
	/// Alpha below which the simulation counts as settled.
	pub alpha_min: f64,
	/// Alpha restored when the layout is perturbed.
	pub reheat_alpha: f64,
	/// Kinetic energy below which the simulation counts as settled.
	pub energy_threshold: f64,
	/// Width of the area used for initial placement, centered on the origin.
	/// Unset means "fit the canvas", see [`SimulationParameters::with_viewport`].
	pub viewport_width: Option<f64>,
	/// Height of the area used for initial placement, centered on the origin.
	pub viewport_height: Option<f64>,
	/// Keep the centroid of free nodes on the origin.
	pub center: bool,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			charge_strength: -3000.0,
			base_distance: 100.0,
			link_stiffness: 0.5,
			friction: 0.6,
			min_distance: 1.0,
			max_speed: 40.0,
			alpha_decay: 0.0228,
			alpha_min: 0.001,
			reheat_alpha: 0.3,
			energy_threshold: 0.01,
			viewport_width: None,
			viewport_height: None,
			center: true,
		}
	}
}

/// Seed area used when neither the dataset nor the canvas provides one.
const FALLBACK_VIEWPORT: (f64, f64) = (600.0, 400.0);

/// Smallest pair distance the forces ever see, whatever `min_distance` says.
const DISTANCE_FLOOR: f64 = 1e-6;

impl SimulationParameters {
	/// Fill the seed area dimensions the dataset left unset.
	pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
		self.viewport_width.get_or_insert(width);
		self.viewport_height.get_or_insert(height);
		self
	}

	/// Seed area `(width, height)`.
	pub fn viewport(&self) -> (f64, f64) {
		(
			self.viewport_width.unwrap_or(FALLBACK_VIEWPORT.0),
			self.viewport_height.unwrap_or(FALLBACK_VIEWPORT.1),
		)
	}

	/// `min_distance`, never below a small positive floor.
	fn distance_floor(&self) -> f64 {
		self.min_distance.max(DISTANCE_FLOOR)
	}
}

/// A 2D point in simulation space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// The simulation origin, where the anchor node is seeded.
	pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

	/// Point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
	}
}

/// Mutable simulation state of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionVelocity {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Velocity applied on the next integration step.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
}

impl PositionVelocity {
	fn at(p: Point) -> Self {
		Self {
			x: p.x,
			y: p.y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	/// Current position without the velocity.
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

#[derive(Clone, Debug)]
struct Spring {
	a: usize,
	b: usize,
	rest: f64,
	stiffness: f64,
}

/// Read-only copy of every node position at one instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutSnapshot {
	/// Positions keyed by node id, in model order.
	pub positions: IndexMap<String, Point>,
}

impl LayoutSnapshot {
	/// Position of `id`, if it is in the snapshot.
	pub fn get(&self, id: &str) -> Option<Point> {
		self.positions.get(id).copied()
	}
}

/// Owns node positions and advances them one tick at a time.
pub struct LayoutEngine {
	params: SimulationParameters,
	bodies: IndexMap<String, PositionVelocity>,
	masses: Vec<f64>,
	pinned: Vec<bool>,
	springs: Vec<Spring>,
	alpha: f64,
	energy: f64,
	settled: bool,
	ticks: u64,
}

impl LayoutEngine {
	/// Seed a body for every node of `model`.
	///
	/// The heaviest hub (or the first node when there is none) starts at the
	/// origin; the rest are scattered deterministically over the seed viewport.
	pub fn new(model: &GraphModel, params: SimulationParameters) -> Self {
		let anchor = model
			.nodes()
			.enumerate()
			.filter(|(_, n)| n.category == Category::Hub)
			.max_by(|(_, a), (_, b)| a.weight.total_cmp(&b.weight))
			.map(|(i, _)| i)
			.unwrap_or(0);

		let (seed_w, seed_h) = params.viewport();
		let mut bodies = IndexMap::with_capacity(model.node_count());
		let mut masses = Vec::with_capacity(model.node_count());
		for (i, node) in model.nodes().enumerate() {
			let seed = if i == anchor {
				Point::ORIGIN
			} else {
				let s = i as f64;
				Point::new(
					(pseudo_random(s * 1.1 + 0.5) - 0.5) * seed_w,
					(pseudo_random(s * 2.3 + 0.7) - 0.5) * seed_h,
				)
			};
			bodies.insert(node.id.clone(), PositionVelocity::at(seed));
			masses.push(node.weight);
		}

		let degrees: Vec<usize> = model
			.nodes()
			.map(|n| model.degree(&n.id).unwrap_or(0))
			.collect();
		let springs = model
			.edges()
			.iter()
			.filter_map(|edge| {
				let a = bodies.get_index_of(&edge.source_id)?;
				let b = bodies.get_index_of(&edge.target_id)?;
				let shared = degrees[a].min(degrees[b]).max(1) as f64;
				Some(Spring {
					a,
					b,
					rest: params.base_distance / edge.strength,
					stiffness: params.link_stiffness / shared,
				})
			})
			.collect();

		let pinned = vec![false; bodies.len()];
		Self {
			params,
			bodies,
			masses,
			pinned,
			springs,
			alpha: 1.0,
			energy: 0.0,
			settled: false,
			ticks: 0,
		}
	}

	/// Parameters the engine was built with.
	pub fn params(&self) -> &SimulationParameters {
		&self.params
	}

	/// Override the initial position of a node. Also clears its velocity.
	pub fn seed_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), GraphError> {
		let body = self
			.bodies
			.get_mut(id)
			.ok_or_else(|| GraphError::NotFound(id.to_string()))?;
		*body = PositionVelocity::at(Point::new(x, y));
		Ok(())
	}

	/// Advance the simulation by one step. Returns `false` without doing
	/// anything when the layout has settled.
	pub fn tick(&mut self) -> bool {
		if self.settled {
			return false;
		}
		let n = self.bodies.len();
		self.alpha -= self.alpha * self.params.alpha_decay;

		let mut accel = vec![(0.0_f64, 0.0_f64); n];
		self.apply_charge(&mut accel);
		self.apply_springs(&mut accel);
		self.integrate(&accel);
		if self.params.center && !self.pinned.iter().any(|&p| p) {
			self.recenter();
		}

		self.ticks += 1;
		self.energy = self.kinetic_energy_now();
		// Energy only counts once the layout has cooled; a fresh seed can be nearly still.
		let cooled = self.alpha < self.params.reheat_alpha;
		if self.alpha < self.params.alpha_min
			|| (cooled && self.energy < self.params.energy_threshold)
		{
			self.settled = true;
			debug!(
				"guild-graph: layout settled after {} ticks (energy {:.4}, alpha {:.4})",
				self.ticks, self.energy, self.alpha
			);
		}
		true
	}

	fn apply_charge(&self, accel: &mut [(f64, f64)]) {
		let n = self.bodies.len();
		let floor = self.params.distance_floor();
		let min_sq = floor * floor;
		let k = -self.params.charge_strength * self.alpha;
		for i in 0..n {
			for j in (i + 1)..n {
				let (pi, pj) = (&self.bodies[i], &self.bodies[j]);
				let (dx, dy) = (pj.x - pi.x, pj.y - pi.y);
				let raw_sq = dx * dx + dy * dy;
				let (ux, uy) = if raw_sq > f64::EPSILON {
					let d = raw_sq.sqrt();
					(dx / d, dy / d)
				} else {
					jiggle(i, j)
				};
				let base = k / raw_sq.max(min_sq);
				let (mi, mj) = (self.masses[i], self.masses[j]);

				// Pushes j away from i, and i away from j.
				let to_j = base * mi / mj;
				let to_i = base * mj / mi;
				accel[j].0 += ux * to_j;
				accel[j].1 += uy * to_j;
				accel[i].0 -= ux * to_i;
				accel[i].1 -= uy * to_i;
			}
		}
	}

	fn apply_springs(&self, accel: &mut [(f64, f64)]) {
		let min_d = self.params.distance_floor();
		for spring in &self.springs {
			let (pa, pb) = (&self.bodies[spring.a], &self.bodies[spring.b]);
			let (dx, dy) = (pb.x - pa.x, pb.y - pa.y);
			let len = (dx * dx + dy * dy).sqrt().max(min_d);
			let k = (len - spring.rest) / len * spring.stiffness * self.alpha;
			let (fx, fy) = (dx * k, dy * k);

			// The lighter endpoint takes the larger share of the correction.
			let (ma, mb) = (self.masses[spring.a], self.masses[spring.b]);
			let bias = ma / (ma + mb);
			accel[spring.b].0 -= fx * bias;
			accel[spring.b].1 -= fy * bias;
			accel[spring.a].0 += fx * (1.0 - bias);
			accel[spring.a].1 += fy * (1.0 - bias);
		}
	}

	fn integrate(&mut self, accel: &[(f64, f64)]) {
		let friction = self.params.friction.clamp(0.0, 0.999);
		let max_speed = self.params.max_speed.max(f64::EPSILON);
		for (i, (_, body)) in self.bodies.iter_mut().enumerate() {
			if self.pinned[i] {
				body.vx = 0.0;
				body.vy = 0.0;
				continue;
			}
			let (ax, ay) = accel[i];
			body.vx = (body.vx + ax) * friction;
			body.vy = (body.vy + ay) * friction;
			let speed = (body.vx * body.vx + body.vy * body.vy).sqrt();
			if speed > max_speed {
				body.vx *= max_speed / speed;
				body.vy *= max_speed / speed;
			}
			body.x += body.vx;
			body.y += body.vy;
		}
	}

	fn recenter(&mut self) {
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.values()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let (cx, cy) = (sx / n as f64, sy / n as f64);
		for body in self.bodies.values_mut() {
			body.x -= cx;
			body.y -= cy;
		}
	}

	fn kinetic_energy_now(&self) -> f64 {
		self.bodies
			.values()
			.zip(&self.masses)
			.map(|(b, m)| 0.5 * m * (b.vx * b.vx + b.vy * b.vy))
			.sum()
	}

	/// Total kinetic energy after the last tick.
	pub fn kinetic_energy(&self) -> f64 {
		self.energy
	}

	/// Whether the engine stopped stepping. Cleared by [`LayoutEngine::reheat`].
	pub fn is_settled(&self) -> bool {
		self.settled
	}

	/// Current simulation temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Number of ticks that did work.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Wake the simulation up after an external perturbation.
	pub fn reheat(&mut self) {
		self.alpha = self.alpha.max(self.params.reheat_alpha);
		self.settled = false;
	}

	/// Hold a node at `(x, y)` (e.g. while it is dragged) and reheat.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) -> Result<(), GraphError> {
		let idx = self
			.bodies
			.get_index_of(id)
			.ok_or_else(|| GraphError::NotFound(id.to_string()))?;
		self.bodies[idx] = PositionVelocity::at(Point::new(x, y));
		self.pinned[idx] = true;
		self.reheat();
		Ok(())
	}

	/// Release a pinned node back to the simulation.
	pub fn unpin(&mut self, id: &str) -> Result<(), GraphError> {
		let idx = self
			.bodies
			.get_index_of(id)
			.ok_or_else(|| GraphError::NotFound(id.to_string()))?;
		self.pinned[idx] = false;
		self.reheat();
		Ok(())
	}

	/// Whether `id` is held in place by a drag.
	pub fn is_pinned(&self, id: &str) -> bool {
		self.bodies
			.get_index_of(id)
			.is_some_and(|idx| self.pinned[idx])
	}

	/// Current position of `id`.
	pub fn position(&self, id: &str) -> Option<Point> {
		self.bodies.get(id).map(PositionVelocity::position)
	}

	/// Position and velocity of `id`.
	pub fn body(&self, id: &str) -> Option<&PositionVelocity> {
		self.bodies.get(id)
	}

	/// Positions in model order.
	pub fn positions(&self) -> impl Iterator<Item = (&str, Point)> {
		self.bodies.iter().map(|(id, b)| (id.as_str(), b.position()))
	}

	/// Copy every position for a consumer that must not hold a borrow.
	pub fn snapshot(&self) -> LayoutSnapshot {
		LayoutSnapshot {
			positions: self
				.positions()
				.map(|(id, p)| (id.to_string(), p))
				.collect(),
		}
	}

	/// The top-most node whose disc (radius given per id) contains `point`.
	///
	/// Later nodes are drawn on top, so the search runs back to front.
	pub fn node_at(&self, point: Point, radius_of: impl Fn(&str) -> f64) -> Option<&str> {
		self.bodies
			.iter()
			.rev()
			.find(|(id, b)| b.position().distance(point) < radius_of(id.as_str()))
			.map(|(id, _)| id.as_str())
	}
}

/// Deterministic pseudo-random value in `[0, 1)`.
fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

/// Unit direction used to separate two coincident nodes.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
	let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214 + 0.37) * TAU;
	(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::relationship_graph::types::{Edge, Node};

	fn pair(edges: Vec<Edge>) -> GraphModel {
		GraphModel::build(
			vec![
				Node::new("a", "A", Category::Agent, 5.0),
				Node::new("b", "B", Category::Agent, 5.0),
			],
			edges,
		)
		.unwrap()
	}

	#[test]
	fn heaviest_hub_is_seeded_at_origin() {
		let model = GraphModel::build(
			vec![
				Node::new("t", "T", Category::Target, 20.0),
				Node::new("h1", "Small hub", Category::Hub, 3.0),
				Node::new("h2", "Big hub", Category::Hub, 9.0),
			],
			vec![],
		)
		.unwrap();
		let engine = LayoutEngine::new(&model, SimulationParameters::default());
		assert_eq!(engine.position("h2"), Some(Point::ORIGIN));
		assert_ne!(engine.position("t"), Some(Point::ORIGIN));
	}

	#[test]
	fn seeds_stay_inside_viewport() {
		let model = GraphModel::build(
			(0..20)
				.map(|i| Node::new(format!("n{i}"), "N", Category::Target, 1.0))
				.collect(),
			vec![],
		)
		.unwrap();
		let params = SimulationParameters::default().with_viewport(2000.0, 100.0);
		let engine = LayoutEngine::new(&model, params);
		for (_, p) in engine.positions() {
			assert!(p.x.abs() <= 1000.0);
			assert!(p.y.abs() <= 50.0);
		}
		assert!(engine.positions().any(|(_, p)| p.x.abs() > 300.0));
	}

	#[test]
	fn dataset_viewport_wins_over_canvas() {
		let params = SimulationParameters {
			viewport_width: Some(300.0),
			..SimulationParameters::default()
		}
		.with_viewport(1200.0, 800.0);
		assert_eq!(params.viewport(), (300.0, 800.0));
		assert_eq!(SimulationParameters::default().viewport(), (600.0, 400.0));
	}

	#[test]
	fn zero_min_distance_still_floors_coincident_nodes() {
		let model = pair(vec![Edge::new("a", "b", 1.0)]);
		let params = SimulationParameters {
			min_distance: 0.0,
			..SimulationParameters::default()
		};
		let mut engine = LayoutEngine::new(&model, params);
		engine.seed_position("a", 1.0, 1.0).unwrap();
		engine.seed_position("b", 1.0, 1.0).unwrap();

		for _ in 0..5 {
			engine.tick();
			for (_, p) in engine.positions() {
				assert!(p.x.is_finite() && p.y.is_finite());
			}
			assert!(engine.kinetic_energy().is_finite());
		}
		assert_ne!(engine.position("a"), engine.position("b"));
	}

	#[test]
	fn coincident_nodes_separate_without_nan() {
		let model = pair(vec![]);
		let mut engine = LayoutEngine::new(&model, SimulationParameters::default());
		engine.seed_position("a", 3.0, 3.0).unwrap();
		engine.seed_position("b", 3.0, 3.0).unwrap();

		assert!(engine.tick());
		let (a, b) = (engine.position("a").unwrap(), engine.position("b").unwrap());
		assert!(a.x.is_finite() && a.y.is_finite());
		assert!(b.x.is_finite() && b.y.is_finite());
		assert_ne!(a, b);
	}

	#[test]
	fn stronger_edges_rest_closer() {
		let run = |strength: f64| {
			let model = pair(vec![Edge::new("a", "b", strength)]);
			let mut engine = LayoutEngine::new(&model, SimulationParameters::default());
			while engine.tick() {}
			let (a, b) = (engine.position("a").unwrap(), engine.position("b").unwrap());
			a.distance(b)
		};
		assert!(run(10.0) < run(1.0));
	}

	#[test]
	fn settled_engine_ignores_ticks_until_reheated() {
		let model = pair(vec![Edge::new("a", "b", 2.0)]);
		let mut engine = LayoutEngine::new(&model, SimulationParameters::default());
		let mut guard = 0;
		while engine.tick() {
			guard += 1;
			assert!(guard < 10_000, "simulation never settled");
		}
		assert!(engine.is_settled());
		let before = engine.snapshot();
		assert!(!engine.tick());
		assert_eq!(engine.snapshot(), before);

		engine.reheat();
		assert!(!engine.is_settled());
		assert!(engine.tick());
	}

	#[test]
	fn pinned_node_holds_position() {
		let model = pair(vec![Edge::new("a", "b", 1.0)]);
		let mut engine = LayoutEngine::new(&model, SimulationParameters::default());
		engine.pin("a", 50.0, -20.0).unwrap();
		for _ in 0..30 {
			engine.tick();
		}
		assert_eq!(engine.position("a"), Some(Point::new(50.0, -20.0)));
		assert!(engine.is_pinned("a"));
		engine.unpin("a").unwrap();
		assert!(!engine.is_pinned("a"));
	}

	#[test]
	fn hit_test_prefers_top_most_node() {
		let model = pair(vec![]);
		let mut engine = LayoutEngine::new(&model, SimulationParameters::default());
		engine.seed_position("a", 0.0, 0.0).unwrap();
		engine.seed_position("b", 1.0, 0.0).unwrap();
		assert_eq!(engine.node_at(Point::new(0.5, 0.0), |_| 5.0), Some("b"));
		assert_eq!(engine.node_at(Point::new(100.0, 0.0), |_| 5.0), None);
	}

	#[test]
	fn unknown_ids_are_not_found() {
		let model = pair(vec![]);
		let mut engine = LayoutEngine::new(&model, SimulationParameters::default());
		assert!(engine.seed_position("zzz", 0.0, 0.0).unwrap_err().is_not_found());
		assert!(engine.pin("zzz", 0.0, 0.0).unwrap_err().is_not_found());
	}
}
