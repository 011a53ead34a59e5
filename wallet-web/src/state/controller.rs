//! Controller state management
//!
//! The controller lives in local (non-`Send`) storage; the page renders from a
//! [`ControllerView`] signal that is refreshed whenever an action settles.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use lib_app::{ActionKind, ControllerView, SubmissionController};
use lib_core::error::{AppError, Result};

use crate::services::JsonRpcLedger;

pub type Controller = SubmissionController<JsonRpcLedger>;

/// Global controller context
#[derive(Clone, Copy)]
pub struct ControllerContext {
    controller: StoredValue<Rc<Controller>, LocalStorage>,
    pub view: RwSignal<ControllerView>,
    /// Message shown next to the input (validation, missing wallet).
    pub notice: RwSignal<Option<String>>,
}

impl ControllerContext {
    pub fn new(controller: Controller) -> Self {
        let view = RwSignal::new(controller.snapshot());
        Self {
            controller: StoredValue::new_local(Rc::new(controller)),
            view,
            notice: RwSignal::new(None),
        }
    }

    fn sync(&self) {
        self.view.set(self.controller.get_value().snapshot());
    }

    pub fn set_input(&self, value: String) {
        self.controller.get_value().set_input(value);
        self.sync();
    }

    pub fn clear_input(&self) {
        self.controller.get_value().clear_input();
        self.sync();
    }

    pub fn disconnect(&self) {
        self.controller.get_value().disconnect();
        self.notice.set(None);
        self.sync();
    }

    pub fn auto_connect(&self) {
        self.dispatch(None, |c| async move { c.auto_connect().await });
    }

    pub fn connect(&self) {
        self.dispatch(Some(ActionKind::Connect), |c| async move { c.connect().await });
    }

    pub fn initialize(&self) {
        self.dispatch(Some(ActionKind::Initialize), |c| async move { c.initialize_record().await });
    }

    pub fn submit(&self) {
        self.dispatch(Some(ActionKind::AppendColor), |c| async move { c.submit_color().await });
    }

    /// Run `action` on the controller and re-render once it settles.
    ///
    /// `pending` is marked in flight immediately so the button disables before
    /// the task is first polled.
    fn dispatch<F, Fut>(&self, pending: Option<ActionKind>, action: F)
    where
        F: FnOnce(Rc<Controller>) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let controller = self.controller.get_value();
        let view = self.view;
        let notice = self.notice;

        if let Some(kind) = pending {
            view.update(|v| {
                if !v.in_flight.contains(&kind) {
                    v.in_flight.push(kind);
                }
            });
        }
        notice.set(None);

        spawn_local(async move {
            match action(controller.clone()).await {
                Ok(()) => {}
                Err(e @ (AppError::InvalidInput(_) | AppError::NoWalletFound)) => {
                    notice.set(Some(e.to_string()))
                }
                Err(e) => log::debug!("Action settled with {}", e),
            }
            view.set(controller.snapshot());
        });
    }
}

pub fn provide_controller_context(controller: Controller) -> ControllerContext {
    let context = ControllerContext::new(controller);
    provide_context(context);
    context
}

pub fn use_controller_context() -> ControllerContext {
    expect_context::<ControllerContext>()
}
