//! Navigation Bar Component

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::controller::use_controller_context;

#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = use_controller_context();
    let address = move || ctx.view.with(|v| v.state.address().map(str::to_string));

    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: space-between; align-items: center;">
                <A href="/" attr:class="nav-link-clean">
                    <span class="nav-title">"Infinite Rainbow"</span>
                </A>
                {move || address().map(|addr| view! {
                    <div class="nav-session">
                        <span class="wallet-address">{addr}</span>
                        <button class="nav-button" on:click=move |_| ctx.disconnect()>
                            "Disconnect"
                        </button>
                    </div>
                })}
            </div>
        </nav>
    }
}
