use leptos::prelude::*;
use log::warn;

use crate::components::diagram::persist::{self, LocalStorage};
use crate::components::diagram::store::now_millis;
use crate::components::diagram::style::{MAX_RPS, flow_style};
use crate::components::diagram::{DiagramCanvas, DiagramStore, EditorSettings, NodeTemplate};

/// Saved diagram from localStorage, or the starter diagram.
fn load_initial(settings: &EditorSettings) -> DiagramStore {
	let seed = now_millis();
	match LocalStorage::open() {
		Ok(storage) => persist::load_or_default(&storage, settings, seed),
		Err(e) => {
			warn!("Starting without saved state: {e}");
			DiagramStore::starter(seed).with_spawn(settings.spawn)
		}
	}
}

/// Editor page: palette, throughput control and the diagram canvas.
#[component]
pub fn Home() -> impl IntoView {
	let settings = EditorSettings::default();
	let store = RwSignal::new(load_initial(&settings));
	let storage_key = settings.storage_key.clone();

	// Save on every change to the store.
	Effect::new(move |_| {
		store.with(|s| {
			let saved = LocalStorage::open()
				.and_then(|mut storage| persist::save(&mut storage, &storage_key, s));
			if let Err(e) = saved {
				warn!("Could not save diagram: {e}");
			}
		});
	});

	let style = Memo::new(move |_| store.with(|s| flow_style(s.requests_per_second())));

	let palette = NodeTemplate::palette()
		.into_iter()
		.map(|template| {
			let label = template.label.clone();
			view! {
				<button
					class="palette-item"
					on:click=move |_| store.update(|s| {
						s.add_node(Some(&template));
					})
				>
					{label}
				</button>
			}
		})
		.collect_view();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<DiagramCanvas store=store settings=settings fullscreen=true />
				<div class="graph-overlay">
					<h1>"System Sketch"</h1>
					<p class="subtitle">
						"Drag nodes to move them. Drag from the right port to the left port of another node to connect. Click an edge handle to remove it."
					</p>
					<div class="palette">
						{palette}
						<button
							class="palette-item"
							on:click=move |_| store.update(|s| {
								s.add_node(None);
							})
						>
							"Blank node"
						</button>
						<button class="palette-item reset" on:click=move |_| store.update(|s| s.reset())>
							"Reset"
						</button>
					</div>
					<label class="throughput">
						"Requests / second"
						<input
							type="range"
							min="0"
							max=MAX_RPS.to_string()
							step="10"
							prop:value=move || store.with(|s| s.requests_per_second().to_string())
							on:input=move |ev| store.update(|s| s.set_throughput_input(&event_target_value(&ev)))
						/>
					</label>
					<div class="readout">
						<span class="rps">{move || format!("{} rps", style.get().rps)}</span>
						<span class=move || {
							format!("range range-{}", style.get().range.label().to_lowercase())
						}>{move || style.get().range.label()}</span>
						<span
							class=move || format!("flow-indicator {}", style.get().edge.animation_class)
							style=move || format!("animation-duration: {:.3}s", style.get().duration)
						/>
						<span class="cycle">
							{move || format!("{:.3}s per cycle", style.get().duration)}
						</span>
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}
