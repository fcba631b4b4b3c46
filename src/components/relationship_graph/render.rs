//! Canvas rendering for the relationship graph.
//!
//! Reads positions from the layout engine and never writes to it. Rendering
//! uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges, dimmed when they do not touch the selection (world space)
//! 3. Node glows, nodes, then the selection ring and labels on top

use std::collections::HashSet;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::camera::Camera;
use super::layout::{LayoutEngine, Point};
use super::model::GraphModel;
use super::scale::{ScaleConfig, ScaledValues};
use super::selection::SelectionView;
use super::theme::{Color, Theme};
use super::types::Node;

/// Everything needed to draw one frame. All borrows are read-only.
pub struct Frame<'a> {
	/// Graph being drawn.
	pub model: &'a GraphModel,
	/// Source of positions; only read.
	pub layout: &'a LayoutEngine,
	/// Pan and zoom to draw with.
	pub camera: &'a Camera,
	/// Current selection; everything outside its neighborhood is dimmed.
	pub selection: Option<&'a SelectionView>,
	/// Node under the pointer, if any.
	pub hovered: Option<&'a str>,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
}

impl Frame<'_> {
	/// Ids of the selected node and its neighbors.
	fn focus(&self) -> HashSet<&str> {
		self.selection
			.map(|view| {
				std::iter::once(view.node_id.as_str())
					.chain(view.connections.iter().map(|c| c.node_id.as_str()))
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Renders the complete graph to the canvas.
pub fn render(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, frame.camera.k());
	let focus = frame.focus();

	draw_background(frame, ctx, theme);

	ctx.save();
	let _ = ctx.translate(frame.camera.x, frame.camera.y);
	let _ = ctx.scale(frame.camera.k(), frame.camera.k());

	draw_edges(frame, ctx, &scale, theme, &focus);
	draw_nodes(frame, ctx, &scale, theme, &focus);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(frame, ctx, theme);
	}
}

fn draw_background(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (frame.width, frame.height);
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8)
				.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_vignette(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (frame.width, frame.height);
	let Ok(gradient) = ctx.create_radial_gradient(
		w / 2.0,
		h / 2.0,
		w.min(h) * 0.3,
		w / 2.0,
		h / 2.0,
		w.max(h) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", theme.background.vignette),
	);

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_edges(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	focus: &HashSet<&str>,
) {
	let selected = frame.selection.map(|v| v.node_id.as_str());

	for edge in frame.model.edges() {
		let (Some(p1), Some(p2)) = (
			frame.layout.position(&edge.source_id),
			frame.layout.position(&edge.target_id),
		) else {
			continue;
		};
		if p1.distance(p2) < 0.001 {
			continue;
		}

		let touches_selection =
			selected.is_some_and(|id| edge.source_id == id || edge.target_id == id);
		let tint = Color::parse(edge.tint_or_default());
		let tint = if focus.is_empty() || touches_selection {
			tint
		} else {
			tint.with_alpha(tint.a * theme.edge.dim_alpha)
		};
		let width = scale.edge_width(
			edge.strength,
			theme.edge.width_per_strength,
			theme.edge.min_width,
		);

		ctx.set_stroke_style_str(&tint.to_css());
		ctx.set_line_width(if touches_selection { width * 1.6 } else { width });
		ctx.begin_path();
		ctx.move_to(p1.x, p1.y);
		ctx.line_to(p2.x, p2.y);
		ctx.stroke();
	}
}

fn draw_nodes(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	focus: &HashSet<&str>,
) {
	let placed: Vec<(&Node, Point)> = frame
		.model
		.nodes()
		.filter_map(|node| frame.layout.position(&node.id).map(|p| (node, p)))
		.collect();
	let alpha_for = |node: &Node| {
		if focus.is_empty() || focus.contains(node.id.as_str()) {
			1.0
		} else {
			theme.node.dim_alpha
		}
	};

	// Pass 1: glows
	if theme.node.glow_intensity > 0.0 {
		for &(node, p) in &placed {
			draw_node_glow(ctx, node, p, scale, theme, alpha_for(node));
		}
	}

	// Pass 2: discs
	for &(node, p) in &placed {
		draw_node(ctx, node, p, scale, theme, alpha_for(node));
	}

	// Pass 3: selection ring, hover ring and pinned marker
	let selected = frame.selection.map(|v| v.node_id.as_str());
	for &(node, p) in &placed {
		let radius = scale.node_radius(node.weight);
		if selected == Some(node.id.as_str()) {
			draw_ring(ctx, p, radius + scale.ring_offset, scale.ring_width, theme.node.selection_ring);
		} else if frame.hovered == Some(node.id.as_str()) {
			draw_ring(
				ctx,
				p,
				radius + scale.ring_offset,
				scale.ring_width * 0.6,
				theme.node.selection_ring.with_alpha(0.4),
			);
		}
		if frame.layout.is_pinned(&node.id) {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(2.0 / scale.k),
				&JsValue::from_f64(2.0 / scale.k),
			));
			draw_ring(
				ctx,
				p,
				radius + scale.ring_offset * 2.0,
				scale.ring_width * 0.5,
				theme.node.selection_ring.with_alpha(0.5),
			);
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}

	// Pass 4: labels
	for &(node, p) in &placed {
		if scale.shows_label(node.weight) || focus.contains(node.id.as_str()) {
			draw_label(ctx, node, p, scale, theme, alpha_for(node));
		}
	}
}

fn draw_node_glow(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	p: Point,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
) {
	let radius = scale.node_radius(node.weight);
	let glow_radius = radius * scale.glow_radius;
	let glow_alpha = theme.node.glow_intensity * alpha * 0.4;
	if glow_alpha < 0.01 {
		return;
	}

	let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, radius * 0.5, p.x, p.y, glow_radius)
	else {
		return;
	};
	let color = theme.palette.get(node.category);
	let _ = gradient.add_color_stop(0.0, &color.with_alpha(glow_alpha).to_css());
	let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");

	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	p: Point,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
) {
	let radius = scale.node_radius(node.weight);
	let base = theme.palette.get(node.category);

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				p.x - radius * 0.3,
				p.y - radius * 0.3,
				0.0,
				p.x,
				p.y,
				radius,
			)
			.ok()
		})
		.flatten();
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();
	ctx.set_global_alpha(1.0);
}

fn draw_ring(ctx: &CanvasRenderingContext2d, p: Point, radius: f64, width: f64, color: Color) {
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(width);
	ctx.stroke();
}

/// Name centered under the node on a dark plate.
fn draw_label(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	p: Point,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
) {
	let radius = scale.node_radius(node.weight);
	let font_size = scale.label_size;
	ctx.set_font(&scale.label_font);
	let text_width = ctx
		.measure_text(&node.display_name)
		.map(|m| m.width())
		.unwrap_or(font_size * node.display_name.len() as f64 * 0.6);
	let pad = font_size * 0.5;
	let (plate_w, plate_h) = (text_width + pad, font_size + pad);
	let top = p.y + radius + 2.0 / scale.k;

	ctx.set_global_alpha(alpha);
	ctx.set_fill_style_str(&theme.node.label_plate.to_css());
	ctx.fill_rect(p.x - plate_w / 2.0, top, plate_w, plate_h);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&theme.node.label_color.to_css());
	let _ = ctx.fill_text(&node.display_name, p.x, top + plate_h / 2.0);
	ctx.set_global_alpha(1.0);
}
