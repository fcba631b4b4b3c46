//! Visual theming for the relationship graph.
//!
//! Colors are keyed by node [`Category`]; edges use their own tint or the
//! dataset-wide neutral default.

use super::types::Category;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with a different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// CSS notation: hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parse a CSS color string. Supports hex (`#RRGGBB`) and `rgb()`/`rgba()`
	/// functional notation; anything else falls back to mid grey.
	pub fn parse(color_str: &str) -> Color {
		let s = color_str.trim();
		if s.starts_with('#') && s.len() == 7 {
			let channel = |range: std::ops::Range<usize>| {
				s.get(range)
					.and_then(|hex| u8::from_str_radix(hex, 16).ok())
					.unwrap_or(128)
			};
			Color::rgb(channel(1..3), channel(3..5), channel(5..7))
		} else if s.starts_with("rgb") {
			let nums: Vec<&str> = s
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let channel = |i: usize| nums.get(i).and_then(|v| v.parse().ok()).unwrap_or(128);
			let a = nums.get(3).and_then(|v| v.parse().ok()).unwrap_or(1.0);
			Color::rgba(channel(0), channel(1), channel(2), a)
		} else {
			Color::rgb(128, 128, 128)
		}
	}
}

/// One color per node category.
#[derive(Clone, Debug)]
pub struct CategoryPalette {
	/// Hub color.
	pub hub: Color,
	/// Guild color.
	pub guild: Color,
	/// Agent color.
	pub agent: Color,
	/// Target color.
	pub target: Color,
	/// Artifact color.
	pub artifact: Color,
}

impl CategoryPalette {
	/// Color for `category`.
	pub fn get(&self, category: Category) -> Color {
		match category {
			Category::Hub => self.hub,
			Category::Guild => self.guild,
			Category::Agent => self.agent,
			Category::Target => self.target,
			Category::Artifact => self.artifact,
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Outer glow intensity (0 = none)
	pub glow_intensity: f64,
	/// Ring drawn around the selected node
	pub selection_ring: Color,
	/// Alpha applied to nodes outside the selection neighborhood
	pub dim_alpha: f64,
	/// Label text color
	pub label_color: Color,
	/// Label background plate
	pub label_plate: Color,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Line width per unit of edge strength, in screen pixels.
	pub width_per_strength: f64,
	/// Minimum line width in screen pixels.
	pub min_width: f64,
	/// Alpha multiplier for edges not touching the selection.
	pub dim_alpha: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Short identifier, e.g. `"guild"`.
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Node look.
	pub node: NodeStyle,
	/// Edge look.
	pub edge: EdgeStyle,
	/// Node colors per category.
	pub palette: CategoryPalette,
}

impl Theme {
	/// Purple-on-black guild look (default).
	pub fn guild() -> Self {
		Self {
			name: "guild",
			background: BackgroundStyle {
				color: Color::rgb(9, 9, 14),
				color_secondary: Color::rgb(24, 16, 38),
				use_gradient: true,
				vignette: 0.25,
			},
			node: NodeStyle {
				use_gradient: true,
				glow_intensity: 0.6,
				selection_ring: Color::rgba(255, 255, 255, 0.85),
				dim_alpha: 0.3,
				label_color: Color::rgb(255, 255, 255),
				label_plate: Color::rgba(0, 0, 0, 0.8),
			},
			edge: EdgeStyle {
				width_per_strength: 0.3,
				min_width: 0.5,
				dim_alpha: 0.35,
			},
			palette: CategoryPalette {
				hub: Color::rgba(168, 85, 247, 1.0),
				guild: Color::rgba(20, 184, 166, 1.0),
				agent: Color::rgba(255, 255, 255, 0.9),
				target: Color::rgba(250, 204, 21, 0.9),
				artifact: Color::rgba(248, 113, 113, 0.9),
			},
		}
	}

	/// Flat, glow-free variant for low-power devices.
	pub fn minimal() -> Self {
		let guild = Self::guild();
		Self {
			name: "minimal",
			background: BackgroundStyle {
				use_gradient: false,
				vignette: 0.0,
				..guild.background
			},
			node: NodeStyle {
				use_gradient: false,
				glow_intensity: 0.0,
				..guild.node
			},
			..guild
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::guild()
	}
}
