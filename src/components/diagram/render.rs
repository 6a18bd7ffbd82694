use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::controller::{delete_button, edge_handle, input_port, output_port};
use super::settings::NodeGeometry;
use super::state::CanvasView;
use super::store::RenderSnapshot;
use super::style::{FlowStyle, node_glow};
use super::types::NodeKind;

const DASH: f64 = 10.0;
const GAP: f64 = 6.0;
const ARROW: f64 = 9.0;

fn kind_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Start => "#166534",
		NodeKind::Process => "#1e293b",
		NodeKind::End => "#581c87",
	}
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64, gap: f64) {
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
}

fn clear_dash(ctx: &CanvasRenderingContext2d) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

pub fn render(
	snap: &RenderSnapshot<'_>,
	view: &mut CanvasView,
	geo: &NodeGeometry,
	ctx: &CanvasRenderingContext2d,
) {
	let style = view.style(snap.requests_per_second);
	ctx.set_fill_style_str("#0f172a");
	ctx.fill_rect(0.0, 0.0, view.width, view.height);
	ctx.save();
	let _ = ctx.translate(snap.transform.x, snap.transform.y);
	let _ = ctx.scale(snap.transform.k, snap.transform.k);
	draw_edges(snap, view, &style, geo, ctx);
	draw_temp_line(snap, ctx);
	draw_nodes(snap, &style, geo, ctx);
	ctx.restore();
}

fn draw_edges(
	snap: &RenderSnapshot<'_>,
	view: &CanvasView,
	style: &FlowStyle,
	geo: &NodeGeometry,
	ctx: &CanvasRenderingContext2d,
) {
	let dash_offset = -view.flow_phase(style.duration) * (DASH + GAP);
	let gradient_colors = style.edge.gradient;

	for edge in snap.edges {
		// Dangling edges only come from hand-edited storage; skip them.
		let (Some(source), Some(target)) = (snap.node(edge.source), snap.node(edge.target)) else {
			continue;
		};
		let (a, b) = (output_port(source, geo), input_port(target, geo));
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		let gradient = ctx.create_linear_gradient(a.x, a.y, b.x, b.y);
		let _ = gradient.add_color_stop(0.0, gradient_colors.from);
		let _ = gradient.add_color_stop(1.0, gradient_colors.to);
		#[allow(deprecated)]
		ctx.set_stroke_style(&gradient);
		ctx.set_line_width(2.5);
		set_dash(ctx, DASH, GAP);
		ctx.set_line_dash_offset(dash_offset);

		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x - ux * ARROW, b.y - uy * ARROW);
		ctx.stroke();
		clear_dash(ctx);

		ctx.set_fill_style_str(gradient_colors.to);
		let (back_x, back_y) = (b.x - ux * ARROW, b.y - uy * ARROW);
		let (px, py) = (-uy * ARROW * 0.5, ux * ARROW * 0.5);
		ctx.begin_path();
		ctx.move_to(b.x, b.y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		let mid = edge_handle(source, target, geo);
		ctx.begin_path();
		let _ = ctx.arc(mid.x, mid.y, geo.edge_handle_radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("rgba(15, 23, 42, 0.9)");
		ctx.fill();
		ctx.set_stroke_style_str(gradient_colors.to);
		ctx.set_line_width(1.0);
		ctx.stroke();
	}
}

fn draw_temp_line(snap: &RenderSnapshot<'_>, ctx: &CanvasRenderingContext2d) {
	let Some(line) = snap.temp_line else {
		return;
	};
	ctx.set_stroke_style_str("rgba(248, 250, 252, 0.7)");
	ctx.set_line_width(1.5);
	set_dash(ctx, 6.0, 4.0);
	ctx.begin_path();
	ctx.move_to(line.x1, line.y1);
	ctx.line_to(line.x2, line.y2);
	ctx.stroke();
	clear_dash(ctx);
}

fn draw_nodes(
	snap: &RenderSnapshot<'_>,
	style: &FlowStyle,
	geo: &NodeGeometry,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for node in snap.nodes {
		let (x, y) = (node.x, node.y);
		let selected = snap.selected_node == Some(node.id);
		let dragging = snap.dragging_node == Some(node.id);

		ctx.set_global_alpha(if dragging { 0.85 } else { 1.0 });

		let glow = node_glow(&node.label, style.range);
		if let Some(color) = glow.color() {
			ctx.set_shadow_color(color);
			ctx.set_shadow_blur(glow.blur());
		}
		ctx.set_fill_style_str(kind_color(node.kind));
		ctx.fill_rect(x, y, geo.width, geo.height);
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_color("transparent");

		if selected {
			ctx.set_stroke_style_str("#f8fafc");
			ctx.set_line_width(2.5);
		} else {
			ctx.set_stroke_style_str("rgba(148, 163, 184, 0.6)");
			ctx.set_line_width(1.0);
		}
		ctx.stroke_rect(x, y, geo.width, geo.height);

		ctx.set_fill_style_str("white");
		ctx.set_font("13px sans-serif");
		let _ = ctx.fill_text(&node.label, x + geo.width / 2.0, y + geo.height / 2.0);

		for (port, color) in [
			(input_port(node, geo), "#94a3b8"),
			(output_port(node, geo), "#38bdf8"),
		] {
			ctx.begin_path();
			let _ = ctx.arc(port.x, port.y, geo.port_radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(color);
			ctx.fill();
		}

		if selected {
			let corner = delete_button(node, geo);
			ctx.set_fill_style_str("#ef4444");
			ctx.fill_rect(corner.x, corner.y, geo.delete_size, geo.delete_size);
			ctx.set_fill_style_str("white");
			ctx.set_font("12px sans-serif");
			let half = geo.delete_size / 2.0;
			let _ = ctx.fill_text("×", corner.x + half, corner.y + half);
		}
	}
	ctx.set_global_alpha(1.0);
}
