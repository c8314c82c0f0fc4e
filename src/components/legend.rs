use leptos::prelude::*;

use crate::graph::{ClusterSummary, DEFAULT_TOP_N};

/// Cluster swatches with node counts, plus graph totals.
#[component]
pub fn ClusterLegend(
	#[prop(into)] summary: Signal<ClusterSummary>,
	#[prop(default = DEFAULT_TOP_N)] top_n: usize,
) -> impl IntoView {
	view! {
		<aside class="cluster-legend">
			<h2>"Clusters"</h2>
			<ul>
				{move || {
					summary
						.get()
						.top(top_n)
						.iter()
						.map(|c| {
							view! {
								<li>
									<span class="swatch" style=format!("background-color: {}", c.color) />
									<span class="name">{c.cluster.name()}</span>
									<span class="count">{c.count}</span>
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
			<dl class="graph-stats">
				<dt>"Nodes"</dt>
				<dd>{move || summary.with(|s| s.total_nodes)}</dd>
				<dt>"Edges"</dt>
				<dd>{move || summary.with(|s| s.total_edges)}</dd>
				<dt>"Density"</dt>
				<dd>{move || summary.with(|s| format!("{:.1}%", s.density))}</dd>
			</dl>
		</aside>
	}
}
