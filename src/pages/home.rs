use std::time::Duration;

use leptos::leptos_dom::helpers::set_interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use crate::api::{ApiConfig, fetch_graph_export};
use crate::components::details::NodeDetails;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::legend::ClusterLegend;
use crate::graph::{GraphSession, NodeId, NormalizeConfig, SnapshotUpdate, summarize};

/// Fetches one export and feeds it to the session, whatever the outcome.
fn refresh(session: RwSignal<GraphSession>, api: ApiConfig) {
	spawn_local(async move {
		let result = fetch_graph_export(&api).await;
		let update = session.try_update(|s| s.apply_export(result));
		if let Some(SnapshotUpdate::Replaced) = update {
			info!("graph refreshed");
		}
	});
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let api = ApiConfig::default();
	let session = RwSignal::new(GraphSession::new(NormalizeConfig::default()));

	// Only changes when the snapshot value does, so hover and selection
	// updates never reach the layout engine.
	let snapshot = Memo::new(move |_| session.with(|s| s.snapshot().clone()));
	let overrides = Memo::new(move |_| session.with(GraphSession::overrides));
	let summary = Memo::new(move |_| summarize(&snapshot.get()));
	let status = move || {
		session.with(|s| match (s.last_error(), s.snapshot().is_empty()) {
			(Some(err), true) => Some(format!("Could not load the graph: {}", err)),
			(Some(_), false) => Some("Showing the last loaded graph; refresh failed.".to_string()),
			(None, true) if s.revision() == 0 => Some("Loading…".to_string()),
			(None, true) => Some("No content yet. Browse a little and come back.".to_string()),
			(None, false) => None,
		})
	};

	refresh(session, api.clone());
	let period = api.refresh_secs;
	if period > 0 {
		let api = api.clone();
		set_interval(
			move || refresh(session, api.clone()),
			Duration::from_secs(period),
		);
	}

	let details_api = api.clone();
	let report = |result: Result<(), crate::graph::InteractionError>| {
		if let Err(err) = result {
			warn!("{}", err);
		}
	};
	let on_select = move |id: NodeId| session.update(|s| report(s.on_node_select(id.as_str())));
	let on_hover = move |id: Option<NodeId>| {
		session.update(|s| report(s.on_node_hover(id.as_ref().map(NodeId::as_str))))
	};
	let on_background = move |_: ()| session.update(GraphSession::on_background_click);
	let on_viewport = move |_: ()| session.update(GraphSession::on_viewport_change);

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
				<ForceGraphCanvas
					snapshot=snapshot
					overrides=overrides
					on_node_select=on_select
					on_background_click=on_background
					on_node_hover=on_hover
					on_viewport_change=on_viewport
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"MindCanvas"</h1>
					<p class="subtitle">"Click a node for details. Drag to pan, scroll to zoom."</p>
					<p class="status">{status}</p>
					<button on:click=move |_| refresh(session, api.clone())>"Refresh"</button>
				</div>
				<ClusterLegend summary=summary />
				<NodeDetails session=session api=details_api />
			</div>
		</ErrorBoundary>
	}
}
