//! Zoom-dependent sizing for graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: simulation coordinates. Values in world-space grow on
//!   screen as the camera zooms in.
//! - **Screen-space**: canvas pixels. Values in screen-space stay the same size
//!   regardless of zoom.
//!
//! Rendering happens after the camera transform has been applied to the canvas,
//! so every value produced here is expressed in world units.

/// How a visual property scales with zoom level `k`.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Node radius, hit area and label sizing.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Radius contributed by one unit of node weight.
	pub radius_per_weight: f64,
	/// How the radius reacts to zoom.
	pub radius_behavior: ScaleBehavior,
	/// Extra slack around the drawn disc that still counts as a hit, in pixels.
	pub hit_padding: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Nodes at least this heavy are always labelled.
	pub label_min_weight: f64,
	/// Past this zoom every node is labelled.
	pub label_all_zoom: f64,
}

/// Edge line width sizing.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// How the line width reacts to zoom.
	pub width_behavior: ScaleBehavior,
}

/// Glow and selection ring sizing.
#[derive(Clone, Debug)]
pub struct GlowScaleConfig {
	/// Glow radius as a multiple of the node radius.
	pub radius: f64,
	/// Selection ring width in screen pixels.
	pub ring_width: f64,
	/// Ring gap from the node edge in screen pixels.
	pub ring_offset: f64,
}

/// All zoom-dependent sizing for one viewer.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node sizing.
	pub node: NodeScaleConfig,
	/// Edge sizing.
	pub edge: EdgeScaleConfig,
	/// Glow and ring sizing.
	pub glow: GlowScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius_per_weight: 1.0,
				radius_behavior: ScaleBehavior::Screen,
				hit_padding: 4.0,
				label_size: 10.0,
				label_min_weight: 7.0,
				label_all_zoom: 1.2,
			},
			edge: EdgeScaleConfig {
				width_behavior: ScaleBehavior::Clamped {
					min_screen: 0.5,
					max_screen: 6.0,
				},
			},
			glow: GlowScaleConfig {
				radius: 2.5,
				ring_width: 1.5,
				ring_offset: 3.0,
			},
		}
	}
}

/// Scale values resolved for one zoom level. Build once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom the values were resolved for.
	pub k: f64,
	radius_per_weight: f64,
	radius_behavior: ScaleBehavior,
	hit_padding: f64,
	label_min_weight: f64,
	label_all: bool,
	edge_behavior: ScaleBehavior,
	/// Label font in world units, e.g. "6.67px sans-serif".
	pub label_font: String,
	/// Label font size in world units.
	pub label_size: f64,
	/// Glow radius as a multiple of the node radius.
	pub glow_radius: f64,
	/// Selection ring width in world units.
	pub ring_width: f64,
	/// Selection ring gap in world units.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Resolve `config` for zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_size = config.node.label_size / k;
		Self {
			k,
			radius_per_weight: config.node.radius_per_weight,
			radius_behavior: config.node.radius_behavior.clone(),
			hit_padding: config.node.hit_padding / k,
			label_min_weight: config.node.label_min_weight,
			label_all: k > config.node.label_all_zoom,
			edge_behavior: config.edge.width_behavior.clone(),
			label_font: format!("{}px sans-serif", label_size),
			label_size,
			glow_radius: config.glow.radius,
			ring_width: config.glow.ring_width / k,
			ring_offset: config.glow.ring_offset / k,
		}
	}

	/// Drawn radius of a node of the given weight.
	pub fn node_radius(&self, weight: f64) -> f64 {
		self.radius_behavior
			.apply(weight * self.radius_per_weight, self.k)
	}

	/// Radius that counts as a click on the node.
	pub fn hit_radius(&self, weight: f64) -> f64 {
		self.node_radius(weight) + self.hit_padding
	}

	/// Whether a node of this weight gets a label at this zoom.
	pub fn shows_label(&self, weight: f64) -> bool {
		self.label_all || weight > self.label_min_weight
	}

	/// Line width of an edge. `per_strength` and `min_width` come from the theme.
	pub fn edge_width(&self, strength: f64, per_strength: f64, min_width: f64) -> f64 {
		self.edge_behavior
			.apply((strength * per_strength).max(min_width), self.k)
	}
}
