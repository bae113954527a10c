//! Leptos component wrapping the term graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for hover focus, panning, and zooming. An animation loop runs via
//! `requestAnimationFrame`, advancing the edge flow clock and redrawing each frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render::{self, LabelCache};
use super::scale::{ScaleConfig, ScaledValues};
use super::state::TermGraphState;
use super::theme::Theme;
use super::types::{GraphConfig, TermGraph};

/// Fixed frame step for the flow animation, in seconds.
const FRAME_DT: f64 = 0.016;

/// Bundles graph view state with visual configuration (scaling, theme).
struct GraphContext {
	state: TermGraphState,
	scale: ScaleConfig,
	theme: Theme,
	labels: LabelCache,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;
type SharedCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: &str) {
	if let Some(canvas) = canvas_ref.get() {
		let canvas: HtmlCanvasElement = canvas.into();
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Renders a laid-out term graph on a canvas element.
///
/// The graph is laid out once when the canvas mounts. Hovering a node
/// highlights its neighborhood; dragging the background pans; the wheel and
/// the corner controls zoom. The component sizes itself to its parent
/// container by default; set `fullscreen = true` to fill the viewport.
#[component]
pub fn TermGraphCanvas(
	#[prop(into)] graph: Signal<TermGraph>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: SharedCallback = Rc::new(RefCell::new(None));
	let resize_cb: SharedCallback = Rc::new(RefCell::new(None));
	let frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let (context_init, animate_init, resize_cb_init, frame_init) =
		(context.clone(), animate.clone(), resize_cb.clone(), frame.clone());

	// The frame closure holds its own slot, so the loop only ends when the
	// pending frame is cancelled and the slot cleared.
	let loop_handles = StoredValue::new_local((animate.clone(), resize_cb.clone(), frame.clone()));
	on_cleanup(move || {
		loop_handles.try_with_value(|(animate, resize_cb, frame)| {
			let window = web_sys::window();
			if let (Some(id), Some(win)) = (frame.take(), &window) {
				let _ = win.cancel_animation_frame(id);
			}
			if let (Some(cb), Some(win)) = (resize_cb.borrow_mut().take(), &window) {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			animate.borrow_mut().take();
			debug!("term-graph: animation loop stopped");
		});
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(id) = frame_init.take() {
			let _ = window.cancel_animation_frame(id);
		}
		if let Some(cb) = resize_cb_init.borrow_mut().take() {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

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
			log::warn!("term-graph: 2d canvas context unavailable");
			return;
		};

		let scale = ScaleConfig::default();
		let state = TermGraphState::new(graph.get(), w, h, &config.layout, &scale.zoom);
		info!(
			"term-graph: canvas ready with {} nodes, {} edges",
			state.nodes.len(),
			state.graph.edges.len()
		);
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale,
			theme: Theme::named(&config.theme),
			labels: LabelCache::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, frame_inner) =
			(context_init.clone(), animate_init.clone(), frame_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(FRAME_DT);
				render::render(&c.state, &ctx, &c.scale, &c.theme, &mut c.labels);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let scaled = ScaledValues::new(&c.scale, c.state.transform.k);
			if c.state.node_at_position(x, y, &scaled).is_none() {
				c.state.begin_pan(x, y);
				set_cursor(canvas_ref, "grabbing");
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.pan.active {
				c.state.pan_to(x, y);
				return;
			}
			let scaled = ScaledValues::new(&c.scale, c.state.transform.k);
			if c.state.hover_at(x, y, &scaled) {
				let focused = c.state.highlight.focused();
				debug!("term-graph: focus {:?}", focused);
				set_cursor(canvas_ref, if focused.is_some() { "pointer" } else { "grab" });
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.pan.active {
				c.state.end_pan();
				set_cursor(canvas_ref, "grab");
			}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.end_pan();
			c.state.set_focus(None);
		}
		set_cursor(canvas_ref, "grab");
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let step = c.scale.zoom.step;
			let factor = if ev.delta_y() > 0.0 { 1.0 / step } else { step };
			c.state.zoom_at(x, y, factor, &c.scale.zoom);
		}
	};

	let context_zi = context.clone();
	let zoom_in = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zi.borrow_mut() {
			c.state.zoom_by(c.scale.zoom.step, &c.scale.zoom);
		}
	};

	let context_zo = context.clone();
	let zoom_out = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zo.borrow_mut() {
			c.state.zoom_by(1.0 / c.scale.zoom.step, &c.scale.zoom);
		}
	};

	let context_fit = context.clone();
	let fit_view = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_fit.borrow_mut() {
			c.state.fit_view(&c.scale.zoom);
		}
	};

	view! {
		<div class="term-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="term-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-controls" style="position: absolute; left: 12px; bottom: 12px; display: flex; flex-direction: column;">
				<button title="zoom in" on:click=zoom_in>"+"</button>
				<button title="zoom out" on:click=zoom_out>"−"</button>
				<button title="fit view" on:click=fit_view>"⤢"</button>
			</div>
		</div>
	}
}
