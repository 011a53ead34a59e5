//! Infinite Rainbow - Leptos Frontend

use leptos::prelude::*;
use leptos_router::{
    components::{A, Route, Router, Routes},
    path,
};

use lib_app::SubmissionController;
use lib_core::config::NetworkConfig;
use lib_solana::AppConfig;

use crate::components::Navbar;
use crate::pages::RainbowPage;
use crate::services::{JsonRpcLedger, PhantomWallet};
use crate::state::controller::provide_controller_context;
use crate::utils::constants::{IDL_JSON, KEYPAIR_JSON};

#[component]
pub fn App() -> impl IntoView {
    let config = match AppConfig::from_documents(NetworkConfig::default(), IDL_JSON, KEYPAIR_JSON) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load deployment descriptor: {}", e);
            return view! { <ConfigError message=e.to_string()/> }.into_any();
        }
    };

    let controller = SubmissionController::new(&config, PhantomWallet::detect(), JsonRpcLedger);
    provide_controller_context(controller);

    view! {
        <Router>
            <div class="app-container">
                <Navbar/>
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("/") view=RainbowPage/>
                </Routes>
            </div>
        </Router>
    }
    .into_any()
}

#[component]
fn ConfigError(message: String) -> impl IntoView {
    view! {
        <div class="app-container">
            <div class="card">
                <h1>"Deployment not found"</h1>
                <p>{message}</p>
            </div>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="app-container" style="display: flex; justify-content: center; align-items: center; min-height: calc(100vh - 60px);">
            <div class="card" style="max-width: 500px; text-align: center;">
                <h1 style="margin-bottom: 16px; font-size: 32px; font-weight: 700;">"404 - Page Not Found"</h1>
                <A href="/">
                    <span class="btn" style="margin-top: 20px; display: inline-block;">
                        "Back to the rainbow"
                    </span>
                </A>
            </div>
        </div>
    }
}
