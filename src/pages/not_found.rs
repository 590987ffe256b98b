use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="card">
			<h1>"Page not found"</h1>
			<p>
				"Try " <a href="/?address=0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045">"a sample address"</a>
				"."
			</p>
		</div>
	}
}
