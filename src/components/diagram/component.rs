use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent,
	WheelEvent, Window,
};

use super::controller::{self, CanvasRect, Gesture, HitTarget, PointerButton};
use super::render;
use super::settings::EditorSettings;
use super::state::CanvasView;
use super::store::DiagramStore;
use super::types::Point;

const FRAME_DT: f64 = 0.016;

type Listener<T> = Rc<RefCell<Option<Closure<T>>>>;

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	controller::to_canvas(
		ev.client_x() as f64,
		ev.client_y() as f64,
		CanvasRect {
			left: rect.left(),
			top: rect.top(),
		},
	)
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn cursor_for(target: &HitTarget) -> &'static str {
	match target {
		HitTarget::NodeBody(_) => "grab",
		HitTarget::OutputPort(_) | HitTarget::InputPort(_) => "crosshair",
		HitTarget::DeleteButton(_) | HitTarget::EdgeHandle(_) => "pointer",
		HitTarget::Background => "default",
	}
}

/// Canvas that draws a [`DiagramStore`] and turns mouse input into edits.
#[component]
pub fn DiagramCanvas(
	store: RwSignal<DiagramStore>,
	#[prop(optional)] settings: EditorSettings,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let settings = Rc::new(settings);
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let view_state: Rc<RefCell<Option<CanvasView>>> = Rc::new(RefCell::new(None));
	let animate: Listener<dyn FnMut()> = Rc::new(RefCell::new(None));
	let resize_cb: Listener<dyn FnMut()> = Rc::new(RefCell::new(None));
	let mouseup_cb: Listener<dyn FnMut(MouseEvent)> = Rc::new(RefCell::new(None));
	let mousemove_cb: Listener<dyn FnMut(MouseEvent)> = Rc::new(RefCell::new(None));
	let (view_init, settings_init) = (view_state.clone(), settings.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
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
			return;
		};
		*view_init.borrow_mut() = Some(CanvasView::new(w, h));
		debug!("Diagram canvas mounted at {w}x{h}");

		if fullscreen {
			let (view_resize, canvas_resize) = (view_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut v) = *view_resize.borrow_mut() {
					v.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// Moves and releases are watched on the window so a gesture keeps
		// tracking, and still ends, once the pointer leaves the canvas.
		let (canvas_move, view_move) = (canvas.clone(), view_init.clone());
		let geo_move = settings_init.node;
		*mousemove_cb.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			let local = canvas_point(&canvas_move, &ev);
			let Some(gesture) = store.try_with_untracked(controller::gesture) else {
				return;
			};
			if gesture == Gesture::Idle {
				let inside = view_move
					.borrow()
					.as_ref()
					.is_some_and(|v| v.contains(local.x, local.y));
				if inside {
					let cursor = store
						.try_with_untracked(|s| cursor_for(&controller::hit_test(s, local, &geo_move)))
						.unwrap_or("default");
					let _ = HtmlElement::style(&canvas_move).set_property("cursor", cursor);
				}
				return;
			}
			store.update(|s| controller::pointer_move(s, local));
		}));

		let (canvas_up, view_up) = (canvas.clone(), view_init.clone());
		let geo_up = settings_init.node;
		*mouseup_cb.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			let idle = store
				.try_with_untracked(|s| controller::gesture(s) == Gesture::Idle)
				.unwrap_or(true);
			if idle {
				return;
			}
			let local = canvas_point(&canvas_up, &ev);
			let inside = view_up
				.borrow()
				.as_ref()
				.is_some_and(|v| v.contains(local.x, local.y));
			store.update(|s| {
				let target = if inside {
					controller::hit_test(s, local, &geo_up)
				} else {
					HitTarget::Background
				};
				controller::pointer_up(s, &target);
			});
		}));

		for (name, cb) in [("mousemove", &mousemove_cb), ("mouseup", &mouseup_cb)] {
			if let Some(ref cb) = *cb.borrow() {
				let _ = window.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
			}
		}

		let (view_anim, animate_inner) = (view_init.clone(), animate.clone());
		let geo_anim = settings_init.node;
		*animate.borrow_mut() = Some(Closure::new(move || {
			let mut alive = true;
			if let Some(ref mut v) = *view_anim.borrow_mut() {
				v.tick(FRAME_DT);
				alive = store
					.try_with_untracked(|s| render::render(&s.snapshot(), v, &geo_anim, &ctx))
					.is_some();
			}
			if !alive {
				return;
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let settings_md = settings.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let _ = HtmlElement::focus(&canvas);
		let local = canvas_point(&canvas, &ev);
		let button = PointerButton::from_code(ev.button());
		store.update(|s| {
			let target = controller::hit_test(s, local, &settings_md.node);
			controller::pointer_down(s, &settings_md, &target, local, button);
		});
	};

	let settings_wh = settings.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let local = canvas_point(&canvas, &ev);
		store.update(|s| controller::wheel(s, &settings_wh, local, ev.delta_y()));
	};

	let on_keydown = move |ev: KeyboardEvent| {
		let key = ev.key();
		if store
			.try_update(|s| controller::key_down(s, &key))
			.unwrap_or(false)
		{
			ev.prevent_default();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="diagram-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:wheel=on_wheel
			on:keydown=on_keydown
			style="display: block; outline: none;"
		/>
	}
}
