use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::{debug, error, info};

use crate::components::force_graph::{ForceGraphCanvas, GraphData, NodeKind, kind_color};
use crate::config::GraphConfig;
use crate::graph::build_graph;
use crate::query::{Phase, QueryState, address_param};
use crate::resolver::{StaticNameTable, display_label};
use crate::transactions::TransactionClient;

fn open_in_new_tab(url: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(err) = window.open_with_url_and_target(url, "_blank") {
		error!("could not open {url}: {err:?}");
	}
}

#[component]
fn Legend() -> impl IntoView {
	let entry = |kind: NodeKind| {
		view! {
			<li>
				<span class="swatch" style:background-color=kind_color(kind)></span>
				{kind.as_str()}
			</li>
		}
	};
	view! {
		<ul class="legend">
			{entry(NodeKind::In)}
			{entry(NodeKind::Out)}
			{entry(NodeKind::Both)}
		</ul>
	}
}

/// Transaction graph for the `address` query parameter.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<GraphConfig>().unwrap_or_default();
	let client = TransactionClient::new(&config);
	let query = use_query_map();
	let address = Memo::new(move |_| address_param(query.read().get("address").as_deref()));
	let state = RwSignal::new(QueryState::default());

	Effect::new(move |_| {
		let address = address.get();
		let Some(token) = state
			.try_update(|s| s.begin_for(address.as_deref()))
			.flatten()
		else {
			debug!("no address in query");
			return;
		};
		let Some(address) = address else {
			return;
		};
		let client = client.clone();
		spawn_local(async move {
			info!("fetching transactions for {address}");
			let result = client.fetch(&address).await.map(|transactions| {
				info!("{} transactions for {address}", transactions.len());
				build_graph(&address, &transactions, &StaticNameTable)
			});
			// None once the page is gone
			let _ = state.try_update(|s| s.finish(token, result));
		});
	});

	// only notifies the canvas when the graph itself changed
	let graph = Memo::new(move |_| {
		state
			.with(|s| s.graph().cloned())
			.unwrap_or_else(GraphData::default)
	});
	let ready = move || state.with(|s| *s.phase() == Phase::Ready);

	let explorer = config.clone();
	let on_node_click = Callback::new(move |id: String| {
		open_in_new_tab(&explorer.explorer_link(&id));
	});

	let status = move || match state.with(|s| s.phase().clone()) {
		Phase::Idle => view! {
			<div class="card">
				<p>"Add " <code>"?address=0x..."</code> " to the URL to graph an account."</p>
			</div>
		}
		.into_any(),
		Phase::Loading => view! { <div class="card loading">"Loading transactions..."</div> }.into_any(),
		Phase::Errored(message) => view! {
			<div class="card error">
				<h2>"Could not load transactions"</h2>
				<p>{message}</p>
			</div>
		}
		.into_any(),
		Phase::Ready => {
			let (nodes, links) = graph.with(|g| (g.nodes.len(), g.links.len()));
			let summary = if nodes == 0 {
				"No transactions found.".to_string()
			} else {
				format!("{nodes} addresses, {links} transactions")
			};
			view! {
				<p class="subtitle">{summary}</p>
				<Legend />
			}
			.into_any()
		}
	};

	let title = move || {
		address
			.get()
			.map(|a| display_label(&StaticNameTable, &a))
			.unwrap_or_else(|| "Transaction Graph".to_string())
	};

	view! {
		<div class="fullscreen-graph">
			<div style:display=move || if ready() { "block" } else { "none" }>
				<ForceGraphCanvas data=graph fullscreen=true on_node_click=on_node_click />
			</div>
			<div class="graph-overlay">
				<h1>{title}</h1>
				{status}
			</div>
		</div>
	}
}
