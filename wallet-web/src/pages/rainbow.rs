//! Rainbow page: connect, one-time initialization, color submission and the grid.

use leptos::prelude::*;

use lib_app::{ActionKind, ControllerState};
use lib_core::model::RecordState;

use crate::components::ColorGrid;
use crate::state::controller::{use_controller_context, ControllerContext};
use crate::utils::constants::COLOR_PLACEHOLDER;

#[component]
pub fn RainbowPage() -> impl IntoView {
    let ctx = use_controller_context();
    // Re-render the body on state changes only, not on every keystroke
    let state = Memo::new(move |_| ctx.view.with(|v| v.state.clone()));

    // Silent reconnect for wallets that already trust this page
    ctx.auto_connect();

    view! {
        <div class="container">
            <div class="header-container">
                <p class="header">"Infinite Rainbow"</p>
                <p class="sub-text">
                    "A digital rainbow created by people of the world on the Solana blockchain."
                </p>
                {move || state.with(|state| body(ctx, state))}
                {move || ctx.notice.get().map(|msg| view! { <p class="notice">{msg}</p> })}
            </div>
        </div>
    }
}

fn offered(ctx: ControllerContext, action: ActionKind) -> impl Fn() -> bool + Copy {
    move || ctx.view.with(|v| v.is_offered(action))
}

fn body(ctx: ControllerContext, state: &ControllerState) -> AnyView {
    match state {
        ControllerState::Disconnected => connect_button(ctx).into_any(),
        ControllerState::Connected { record, .. } => match record {
            RecordState::Unknown => view! { <p class="sub-text">"Loading colors..."</p> }.into_any(),
            RecordState::Uninitialized => initialize_button(ctx).into_any(),
            RecordState::Populated(entries) => view! {
                <div class="connected-container">
                    <ColorForm ctx=ctx/>
                    <ColorGrid entries=entries.clone()/>
                </div>
            }
            .into_any(),
        },
    }
}

fn connect_button(ctx: ControllerContext) -> impl IntoView {
    let enabled = offered(ctx, ActionKind::Connect);
    view! {
        <button
            class="cta-button connect-wallet-button"
            disabled=move || !enabled()
            on:click=move |_| ctx.connect()
        >
            "Connect to Wallet"
        </button>
    }
}

fn initialize_button(ctx: ControllerContext) -> impl IntoView {
    let enabled = offered(ctx, ActionKind::Initialize);
    view! {
        <div class="connected-container">
            <button
                class="cta-button submit-color-button"
                disabled=move || !enabled()
                on:click=move |_| ctx.initialize()
            >
                "Do One-Time Initialization For Color Program Account"
            </button>
        </div>
    }
}

#[component]
fn ColorForm(ctx: ControllerContext) -> impl IntoView {
    let enabled = offered(ctx, ActionKind::AppendColor);
    let value = move || ctx.view.with(|v| v.pending_input.clone());

    view! {
        <form on:submit=move |ev| {
            ev.prevent_default();
            ctx.submit();
        }>
            <input
                class="color-input"
                type="text"
                placeholder=format!("Add a color (hex code, e.g. {})", COLOR_PLACEHOLDER)
                prop:value=value
                on:input=move |ev| ctx.set_input(event_target_value(&ev))
            />
            <button type="submit" class="cta-button submit-color-button" disabled=move || !enabled()>
                "Submit"
            </button>
            <button type="button" class="cta-button clear-button" on:click=move |_| ctx.clear_input()>
                "Clear"
            </button>
        </form>
    }
}
