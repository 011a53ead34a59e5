//! Swatch grid for the record's entries, in on-chain order.

use leptos::prelude::*;

use lib_core::model::ColorEntry;

#[component]
pub fn ColorGrid(entries: Vec<ColorEntry>) -> impl IntoView {
    view! {
        <div class="color-grid">
            {entries
                .into_iter()
                .map(|entry| {
                    let style = format!("background-color: {}", entry.color_code);
                    view! {
                        <div class="color-item" style=style title=entry.submitter>
                            <p class="color-code">{entry.color_code}</p>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
