//! Leptos component wrapping the relationship graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming and click selection. An
//! animation loop runs via `requestAnimationFrame`, stepping the layout engine
//! and redrawing each frame. The loop, its closure and the window resize
//! listener are torn down when the component unmounts or the data changes.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::camera::{Camera, CameraLimits};
use super::layout::LayoutEngine;
use super::model::GraphModel;
use super::render::{self, Frame};
use super::scale::{ScaleConfig, ScaledValues};
use super::selection::{SelectionPresenter, SelectionView};
use super::theme::Theme;
use super::types::{GraphDataset, NodeDetail, Tally};

/// Pointer travel (pixels) below which a press-release counts as a click.
const CLICK_SLOP: f64 = 3.0;

/// What the pointer is currently doing on the canvas.
enum Pointer {
	Idle,
	Dragging {
		id: String,
		start: (f64, f64),
		moved: bool,
	},
	Panning {
		start: (f64, f64),
		origin: (f64, f64),
		moved: bool,
	},
}

/// Bundles the model, simulation and selection with visual configuration.
struct GraphContext {
	model: Rc<GraphModel>,
	layout: LayoutEngine,
	camera: Camera,
	presenter: SelectionPresenter,
	scale: ScaleConfig,
	theme: Theme,
	width: f64,
	height: f64,
	pointer: Pointer,
	hovered: Option<String>,
}

impl GraphContext {
	/// Id of the node under the screen point, if any.
	fn node_at(&self, sx: f64, sy: f64) -> Option<String> {
		let scale = ScaledValues::new(&self.scale, self.camera.k());
		let world = self.camera.screen_to_world(sx, sy);
		let model = &self.model;
		self.layout
			.node_at(world, |id| {
				model
					.node(id)
					.map(|n| scale.hit_radius(n.weight))
					.unwrap_or(0.0)
			})
			.map(str::to_string)
	}
}

/// Browser resources owned by the running frame loop.
#[derive(Default)]
struct LoopHandles {
	animate: Option<Closure<dyn FnMut()>>,
	resize: Option<Closure<dyn FnMut()>>,
	frame: Option<i32>,
}

impl LoopHandles {
	/// Cancel the pending frame, detach the resize listener and drop both closures.
	fn stop(&mut self) {
		if let Some(window) = web_sys::window() {
			if let Some(id) = self.frame.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = self.resize.as_ref() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.frame = None;
		self.resize = None;
		self.animate = None;
	}
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: &str) {
	if let Some(canvas) = canvas_ref.get_untracked() {
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Interactive force-directed view of a relationship graph with a detail panel.
///
/// Pass the dataset via the reactive `data` signal. The canvas sizes itself to
/// its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize with the window. Explicit `width`/`height` override
/// automatic sizing. `theme` and `scale` default to [`Theme::guild`] and
/// [`ScaleConfig::default`]. An invalid dataset is reported in place of the graph.
#[component]
pub fn RelationshipGraphViewer(
	#[prop(into)] data: Signal<GraphDataset>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(optional)] scale: Option<ScaleConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let handles: Rc<RefCell<LoopHandles>> = Rc::new(RefCell::new(LoopHandles::default()));
	let selection = RwSignal::new(None::<SelectionView>);
	let build_error = RwSignal::new(None::<String>);
	let (context_init, handles_init) = (context.clone(), handles.clone());

	Effect::new(move |_| {
		let dataset = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		handles_init.borrow_mut().stop();
		*context_init.borrow_mut() = None;
		selection.set(None);

		let Some(window) = web_sys::window() else {
			error!("guild-graph: no window, graph not mounted");
			return;
		};
		let (w, h) = if fullscreen {
			viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("guild-graph: canvas has no 2d context, graph not mounted");
			return;
		};

		let limits = CameraLimits::default();
		let params = dataset
			.layout
			.clone()
			.unwrap_or_default()
			.with_viewport(w / limits.initial_zoom, h / limits.initial_zoom);
		let model = match GraphModel::from_dataset(dataset) {
			Ok(model) => Rc::new(model),
			Err(e) => {
				error!("guild-graph: invalid dataset: {}", e);
				build_error.set(Some(e.to_string()));
				return;
			}
		};
		build_error.set(None);
		info!(
			"guild-graph: mounted {} nodes, {} edges on {}x{} canvas",
			model.node_count(),
			model.edges().len(),
			w,
			h
		);

		*context_init.borrow_mut() = Some(GraphContext {
			layout: LayoutEngine::new(&model, params),
			camera: Camera::centered(w, h, limits),
			presenter: SelectionPresenter::new(model.clone()),
			model,
			scale: scale.clone().unwrap_or_default(),
			theme: theme.clone().unwrap_or_default(),
			width: w,
			height: h,
			pointer: Pointer::Idle,
			hovered: None,
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			let resize = Closure::<dyn FnMut()>::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.camera.resize((c.width, c.height), (nw, nh));
					c.width = nw;
					c.height = nh;
				}
			});
			let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
			handles_init.borrow_mut().resize = Some(resize);
		}

		let (context_anim, handles_anim) = (context_init.clone(), handles_init.clone());
		let animate = Closure::<dyn FnMut()>::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.layout.tick();
				let frame = Frame {
					model: &c.model,
					layout: &c.layout,
					camera: &c.camera,
					selection: c.presenter.view(),
					hovered: c.hovered.as_deref(),
					width: c.width,
					height: c.height,
				};
				render::render(&frame, &ctx, &c.scale, &c.theme);
			}
			let mut h = handles_anim.borrow_mut();
			let next = h.animate.as_ref().and_then(|cb| {
				web_sys::window()?
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok()
			});
			h.frame = next;
		});
		let first = window
			.request_animation_frame(animate.as_ref().unchecked_ref())
			.ok();
		let mut h = handles_init.borrow_mut();
		h.animate = Some(animate);
		h.frame = first;
	});

	let handles_cleanup = StoredValue::new_local(handles.clone());
	on_cleanup(move || {
		let _ = handles_cleanup.try_with_value(|h| h.borrow_mut().stop());
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.pointer = match c.node_at(x, y) {
				Some(id) => Pointer::Dragging {
					id,
					start: (x, y),
					moved: false,
				},
				None => Pointer::Panning {
					start: (x, y),
					origin: (c.camera.x, c.camera.y),
					moved: false,
				},
			};
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = context_mm.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		let travelled = |start: (f64, f64)| (x - start.0).hypot(y - start.1) >= CLICK_SLOP;

		if matches!(c.pointer, Pointer::Idle) {
			let hovered = c.node_at(x, y);
			if hovered != c.hovered {
				set_cursor(canvas_ref, if hovered.is_some() { "pointer" } else { "grab" });
				c.hovered = hovered;
			}
			return;
		}
		match &mut c.pointer {
			Pointer::Idle => {}
			Pointer::Dragging { id, start, moved } => {
				if !*moved && !travelled(*start) {
					return;
				}
				*moved = true;
				let p = c.camera.screen_to_world(x, y);
				if let Err(e) = c.layout.pin(id, p.x, p.y) {
					warn!("guild-graph: drag lost its node: {}", e);
					c.pointer = Pointer::Idle;
				}
			}
			Pointer::Panning {
				start,
				origin,
				moved,
			} => {
				if !*moved && !travelled(*start) {
					return;
				}
				*moved = true;
				c.camera
					.pan_to(origin.0 + (x - start.0), origin.1 + (y - start.1));
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let update = {
			let mut guard = context_mu.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			match std::mem::replace(&mut c.pointer, Pointer::Idle) {
				Pointer::Dragging { id, moved: true, .. } => {
					let _ = c.layout.unpin(&id);
					None
				}
				Pointer::Dragging { id, moved: false, .. } => {
					Some(c.presenter.handle_click(&id).cloned())
				}
				Pointer::Panning { moved: false, .. } => {
					c.presenter.clear_selection();
					Some(None)
				}
				Pointer::Panning { .. } | Pointer::Idle => None,
			}
		};
		if let Some(view) = update {
			selection.set(view);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let Pointer::Dragging { id, .. } = std::mem::replace(&mut c.pointer, Pointer::Idle) {
				let _ = c.layout.unpin(&id);
			}
			c.hovered = None;
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.camera.wheel(x, y, ev.delta_y());
		}
	};

	let context_close = StoredValue::new_local(context);
	let close_panel = Callback::new(move |_: ()| {
		context_close.with_value(|ctx| {
			if let Some(ref mut c) = *ctx.borrow_mut() {
				c.presenter.clear_selection();
			}
		});
		selection.set(None);
	});

	view! {
		<div class="relationship-graph" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="relationship-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			{move || {
				build_error
					.get()
					.map(|message| {
						view! {
							<div class="graph-error" role="alert">
								<h2>"Graph unavailable"</h2>
								<p>{message}</p>
							</div>
						}
					})
			}}
			{move || {
				selection
					.get()
					.map(|view| view! { <SelectionPanel view=view on_close=close_panel /> })
			}}
		</div>
	}
}

fn text_field(label: &'static str, value: String) -> impl IntoView {
	(!value.is_empty())
		.then(|| {
			view! {
				<div class="field">
					<dt>{label}</dt>
					<dd>{value}</dd>
				</div>
			}
		})
}

fn text_list(title: &'static str, items: Vec<String>) -> impl IntoView {
	(!items.is_empty())
		.then(|| {
			view! {
				<section>
					<h4>{title}</h4>
					<ul>{items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}</ul>
				</section>
			}
		})
}

fn tally_list(title: &'static str, tallies: Vec<Tally>) -> impl IntoView {
	(!tallies.is_empty())
		.then(|| {
			view! {
				<section>
					<h4>{title}</h4>
					<ul>
						{tallies
							.into_iter()
							.map(|t| view! { <li>{t.label}": "{t.count}</li> })
							.collect_view()}
					</ul>
				</section>
			}
		})
}

/// Dossier plus the category-specific sections of a featured node.
fn detail_sections(detail: NodeDetail) -> AnyView {
	let dossier = detail.dossier().clone();
	let common = view! {
		<dl class="dossier">
			{text_field("Role", dossier.role)}
			{text_field("Security level", dossier.security_level)}
			{text_field("Status", dossier.status)}
			{text_field("Last activity", dossier.last_activity)}
		</dl>
		{(!dossier.description.is_empty()).then(|| view! { <p class="description">{dossier.description}</p> })}
	};

	let specific = match detail {
		NodeDetail::Hub(d) => view! {
			{text_list("Capabilities", d.capabilities)}
			{tally_list("Affiliations", d.affiliations)}
		}
		.into_any(),
		NodeDetail::Guild(d) => view! {
			<dl class="dossier">
				{text_field("Threat level", d.threat_level.unwrap_or_default())}
				{text_field(
					"Known members",
					d.known_members.map(|n| n.to_string()).unwrap_or_default(),
				)}
			</dl>
			{text_list("Operations", d.operations)}
			{text_list("Assets", d.assets)}
		}
		.into_any(),
		NodeDetail::Agent(d) => text_list("Specialties", d.specialties).into_any(),
		NodeDetail::Target(d) => view! {
			<dl class="dossier">{text_field("Threat level", d.threat_level.unwrap_or_default())}</dl>
			{text_list("Observations", d.observations)}
		}
		.into_any(),
		NodeDetail::Artifact(d) => view! {
			<dl class="dossier">{text_field("Origin", d.origin.unwrap_or_default())}</dl>
			{text_list("Properties", d.properties)}
		}
		.into_any(),
	};

	view! { {common} {specific} }.into_any()
}

/// Side panel describing the selected node and its connections.
#[component]
fn SelectionPanel(view: SelectionView, on_close: Callback<()>) -> impl IntoView {
	let tally = view.connection_tally();
	let category = view.category;
	let count = view.connections.len();

	view! {
		<aside class="selection-panel" data-category=category.label()>
			<header>
				<h3>{view.display_name}</h3>
				<span class="category-badge">{category.label()}</span>
				<button class="close" aria-label="Close" on:click=move |_| on_close.run(())>
					"×"
				</button>
			</header>
			{view.detail.map(detail_sections)}
			<section class="connections">
				<h4>"Connections (" {count} ")"</h4>
				<ul>
					{view
						.connections
						.into_iter()
						.map(|c| {
							view! {
								<li data-node=c.node_id>
									<span class="name">{c.display_name}</span>
									<span class="category">{c.category.label()}</span>
								</li>
							}
						})
						.collect_view()}
				</ul>
			</section>
			{(!tally.is_empty())
				.then(|| {
					view! {
						<section class="tally">
							<h4>"Connections by type"</h4>
							<ul>
								{tally
									.into_iter()
									.map(|(cat, count)| view! { <li>{cat.label()}": "{count}</li> })
									.collect_view()}
							</ul>
						</section>
					}
				})}
		</aside>
	}
}
