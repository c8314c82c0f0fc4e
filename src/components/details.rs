use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::api::{ApiConfig, fetch_related_content};
use crate::graph::{GraphSession, NodeId, RawContentRecord};

/// Side panel for the selected node: record details, expandable topics and
/// related content from the backend.
#[component]
pub fn NodeDetails(session: RwSignal<GraphSession>, api: ApiConfig) -> impl IntoView {
	let selected_id = Memo::new(move |_| session.with(|s| s.interaction().selected().cloned()));
	let related = RwSignal::new(Vec::<RawContentRecord>::new());

	Effect::new(move |_| {
		related.set(Vec::new());
		let Some(id) = selected_id.get() else {
			return;
		};
		let api = api.clone();
		spawn_local(async move {
			match fetch_related_content(&api, id.as_str(), api.related_limit).await {
				// Drop responses that arrive after the selection moved on.
				Ok(records) if selected_id.get_untracked().as_ref() == Some(&id) => related.set(records),
				Ok(_) => {}
				Err(err) => warn!("related content for {} unavailable: {}", id, err),
			}
		});
	});

	let toggle = move |id: NodeId| {
		session.update(|s| {
			if let Err(err) = s.toggle_expand(id.as_str()) {
				warn!("{}", err);
			}
		})
	};
	let select = move |id: NodeId| {
		session.update(|s| {
			if let Err(err) = s.on_node_select(id.as_str()) {
				warn!("{}", err);
			}
		})
	};

	move || {
		let (node, expanded) = session.with(|s| {
			let node = s.selected_node().cloned()?;
			let expanded = s.interaction().is_expanded(node.id.as_str());
			Some((node, expanded))
		})?;
		let record = node.record.clone();
		let id = node.id.clone();
		let has_sub_items = node.has_sub_items();

		let related_view = move || {
			let records = related.get();
			session.with(|s| {
				s.related_in_snapshot(&records)
					.into_iter()
					.map(|n| {
						let target = n.id.clone();
						view! {
							<li>
								<a href="#" on:click=move |ev| {
									ev.prevent_default();
									select(target.clone());
								}>{n.label.clone()}</a>
							</li>
						}
					})
					.collect_view()
			})
		};

		Some(view! {
			<aside class="node-details">
				<h2>{node.label.clone()}</h2>
				<p class="cluster" style=format!("color: {}", node.color)>{node.cluster.name()}</p>
				<p class="quality">
					{record.quality_score.map(|q| format!("Quality {:.0}/10", q))}
				</p>
				<p class="summary">{record.summary.clone()}</p>
				{record.url.clone().map(|url| {
					let href = url.clone();
					view! { <a class="source" href=href target="_blank" rel="noopener">{url}</a> }
				})}
				{has_sub_items.then(|| {
					let id = id.clone();
					let topics = record.topics.clone();
					view! {
						<button on:click=move |_| toggle(id.clone())>
							{if expanded { "Hide topics" } else { "Show topics" }}
						</button>
						{expanded.then(|| view! {
							<ul class="topics">
								{topics.into_iter().map(|t| view! { <li>{t}</li> }).collect_view()}
							</ul>
						})}
					}
				})}
				<h3>"Related"</h3>
				<ul class="related">{related_view}</ul>
				<button on:click=move |_| session.update(GraphSession::reset)>"Reset view"</button>
			</aside>
		})
	}
}
