//! # Submission Controller
//!
//! Orchestrates the wallet gateway and the record client, and owns the only
//! mutable UI-facing state: connection status, the client's view of the record,
//! and the pending input.
//!
//! ## States
//!
//! ```text
//! Disconnected ──connect──▶ Connected/Unknown ──fetch──▶ Connected/Uninitialized
//!                                              └─fetch──▶ Connected/Populated
//! Connected/Uninitialized ──initialize + fetch──▶ Connected/Populated
//! Connected/Populated ──append + fetch──▶ Connected/Populated
//! ```
//!
//! Each action is offered in exactly one state (see [`ControllerState::available_actions`]).
//! A failed action leaves the state untouched and records a diagnostic.
//!
//! ## Single Flight
//!
//! At most one instance of each [`ActionKind`] runs at a time. Triggering an
//! action that is already outstanding returns [`AppError::ActionInFlight`]
//! immediately, without a remote call.
//!
//! State lives in `RefCell`s; no borrow is held across an `.await`.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};

use lib_core::config::NetworkConfig;
use lib_core::error::{AppError, Result};
use lib_core::model::RecordState;
use lib_solana::{AppConfig, InjectedWallet, Ledger, RecordClient, RequestContext, WalletGateway};
use lib_utils::validate_color_code;

use crate::diagnostics::{DiagnosticSink, Operation, TracingSink};

/// User-triggerable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKind {
    Connect,
    Initialize,
    AppendColor,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Connect => write!(f, "connect"),
            ActionKind::Initialize => write!(f, "initialize"),
            ActionKind::AppendColor => write!(f, "append-color"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ControllerState {
    #[default]
    Disconnected,
    Connected { address: String, record: RecordState },
}

impl ControllerState {
    /// Actions the user may take in this state.
    pub fn available_actions(&self) -> Vec<ActionKind> {
        match self {
            ControllerState::Disconnected => vec![ActionKind::Connect],
            ControllerState::Connected { record, .. } => match record {
                RecordState::Unknown => vec![],
                RecordState::Uninitialized => vec![ActionKind::Initialize],
                RecordState::Populated(_) => vec![ActionKind::AppendColor],
            },
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            ControllerState::Disconnected => None,
            ControllerState::Connected { address, .. } => Some(address),
        }
    }

    pub fn record(&self) -> Option<&RecordState> {
        match self {
            ControllerState::Disconnected => None,
            ControllerState::Connected { record, .. } => Some(record),
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControllerView {
    pub state: ControllerState,
    pub pending_input: String,
    pub actions: Vec<ActionKind>,
    pub in_flight: Vec<ActionKind>,
}

impl ControllerView {
    pub fn is_offered(&self, action: ActionKind) -> bool {
        self.actions.contains(&action) && !self.in_flight.contains(&action)
    }
}

/// Marks an action outstanding for as long as it lives.
struct FlightGuard<'a> {
    in_flight: &'a RefCell<HashSet<ActionKind>>,
    kind: ActionKind,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.borrow_mut().remove(&self.kind);
    }
}

pub struct SubmissionController<L> {
    gateway: WalletGateway,
    records: RecordClient<L>,
    network: NetworkConfig,
    diagnostics: Rc<dyn DiagnosticSink>,
    state: RefCell<ControllerState>,
    pending_input: RefCell<String>,
    in_flight: RefCell<HashSet<ActionKind>>,
}

impl<L: Ledger> SubmissionController<L> {
    pub fn new(config: &AppConfig, wallet: InjectedWallet, ledger: L) -> Self {
        Self {
            gateway: WalletGateway::new(wallet),
            records: RecordClient::new(ledger, config.program.clone()),
            network: config.network.clone(),
            diagnostics: Rc::new(TracingSink),
            state: RefCell::new(ControllerState::Disconnected),
            pending_input: RefCell::new(String::new()),
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Rc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn gateway(&self) -> &WalletGateway {
        &self.gateway
    }

    // region:    --- Queries

    pub fn state(&self) -> ControllerState {
        self.state.borrow().clone()
    }

    pub fn available_actions(&self) -> Vec<ActionKind> {
        self.state.borrow().available_actions()
    }

    pub fn pending_input(&self) -> String {
        self.pending_input.borrow().clone()
    }

    pub fn snapshot(&self) -> ControllerView {
        let state = self.state();
        let actions = state.available_actions();

        let mut in_flight: Vec<ActionKind> = self.in_flight.borrow().iter().copied().collect();
        in_flight.sort_by_key(|kind| *kind as u8);

        ControllerView {
            state,
            pending_input: self.pending_input(),
            actions,
            in_flight,
        }
    }

    // endregion: --- Queries

    // region:    --- Input

    pub fn set_input(&self, value: impl Into<String>) {
        *self.pending_input.borrow_mut() = value.into();
    }

    pub fn clear_input(&self) {
        self.pending_input.borrow_mut().clear();
    }

    // endregion: --- Input

    // region:    --- Actions

    /// Connect silently if the wallet already trusts this client.
    ///
    /// A decline is the normal first-visit outcome and leaves the controller
    /// `Disconnected` without a diagnostic.
    pub async fn auto_connect(&self) -> Result<()> {
        if !matches!(*self.state.borrow(), ControllerState::Disconnected) {
            return Ok(());
        }
        let _guard = self.begin(ActionKind::Connect)?;

        match self.gateway.attempt_auto_connect().await {
            Ok(Some(address)) => self.on_connected(address).await,
            Ok(None) => Ok(()),
            Err(e) => Err(self.report(Operation::AutoConnect, e)),
        }
    }

    /// Ask the wallet for a connection; the user may be prompted.
    pub async fn connect(&self) -> Result<()> {
        self.ensure_offered(ActionKind::Connect)?;
        let _guard = self.begin(ActionKind::Connect)?;

        match self.gateway.connect_explicit().await {
            Ok(address) => self.on_connected(address).await,
            Err(e) => Err(self.report(Operation::Connect, e)),
        }
    }

    /// Re-read the record. Fetch failures land in `Uninitialized`.
    pub async fn refresh(&self) -> Result<()> {
        if self.state.borrow().address().is_none() {
            return Err(AppError::NoSession);
        }
        self.load_record().await;
        Ok(())
    }

    /// Create the shared record, then re-fetch it.
    pub async fn initialize_record(&self) -> Result<()> {
        self.ensure_offered(ActionKind::Initialize)?;
        let _guard = self.begin(ActionKind::Initialize)?;

        let result = match self.context() {
            Ok(ctx) => self.records.initialize_record(&ctx).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            return Err(self.report(Operation::InitializeRecord, e));
        }

        self.load_record().await;
        Ok(())
    }

    /// Validate and submit the pending input, then re-fetch the record.
    ///
    /// The pending input is left as is, whatever the outcome.
    pub async fn submit_color(&self) -> Result<()> {
        self.ensure_offered(ActionKind::AppendColor)?;

        let color_code = self.pending_input.borrow().trim().to_string();
        validate_color_code(&color_code).map_err(AppError::InvalidInput)?;

        let _guard = self.begin(ActionKind::AppendColor)?;
        info!("Submitting color {}", color_code);

        let result = match self.context() {
            Ok(ctx) => self.records.append_color(&ctx, &color_code).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            return Err(self.report(Operation::AppendColor, e));
        }

        self.load_record().await;
        Ok(())
    }

    /// Drop the session and return to `Disconnected`.
    pub fn disconnect(&self) {
        self.gateway.disconnect();
        *self.state.borrow_mut() = ControllerState::Disconnected;
    }

    // endregion: --- Actions

    // region:    --- Internals

    fn ensure_offered(&self, action: ActionKind) -> Result<()> {
        if self.available_actions().contains(&action) {
            Ok(())
        } else {
            Err(AppError::ActionUnavailable(action.to_string()))
        }
    }

    fn begin(&self, kind: ActionKind) -> Result<FlightGuard<'_>> {
        if !self.in_flight.borrow_mut().insert(kind) {
            debug!("Rejected duplicate {} while one is outstanding", kind);
            return Err(AppError::ActionInFlight(kind.to_string()));
        }
        Ok(FlightGuard {
            in_flight: &self.in_flight,
            kind,
        })
    }

    fn context(&self) -> Result<RequestContext> {
        let session = self.gateway.session();
        RequestContext::build(session.as_ref(), &self.network, self.gateway.signer()?)
    }

    fn report(&self, operation: Operation, error: AppError) -> AppError {
        self.diagnostics.record(operation, &error);
        error
    }

    async fn on_connected(&self, address: String) -> Result<()> {
        info!("Connected as {}", address);
        *self.state.borrow_mut() = ControllerState::Connected {
            address,
            record: RecordState::Unknown,
        };
        self.load_record().await;
        Ok(())
    }

    /// Fetch and store the record for the current session.
    ///
    /// The result is dropped if the session changed while the fetch was
    /// outstanding.
    async fn load_record(&self) {
        let ctx = match self.context() {
            Ok(ctx) => ctx,
            Err(e) => {
                self.report(Operation::FetchRecord, e);
                return;
            }
        };

        let record = match self.records.fetch_record(&ctx).await {
            Ok(entries) => RecordState::Populated(entries),
            Err(e) if e.is_recoverable() => {
                debug!("{}", e);
                RecordState::Uninitialized
            }
            Err(e) => {
                self.report(Operation::FetchRecord, e);
                RecordState::Uninitialized
            }
        };

        let mut state = self.state.borrow_mut();
        match &mut *state {
            ControllerState::Connected { address, record: current } if *address == ctx.user => {
                info!(
                    "Record is {}",
                    match &record {
                        RecordState::Populated(entries) => format!("populated ({} entries)", entries.len()),
                        _ => "uninitialized".to_string(),
                    }
                );
                *current = record;
            }
            _ => debug!("Discarding record fetched for {}", ctx.user),
        }
    }

    // endregion: --- Internals
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_core::model::ColorEntry;
    use lib_solana::testing::{test_program_config, FakeLedger, FakeWallet};

    fn controller(wallet: FakeWallet) -> (SubmissionController<FakeLedger>, FakeLedger) {
        let config = AppConfig::new(NetworkConfig::default(), test_program_config());
        let ledger = FakeLedger::new(config.program.program_id);
        let controller = SubmissionController::new(&config, InjectedWallet::present(wallet), ledger.clone());
        (controller, ledger)
    }

    #[test]
    fn test_gating_per_state() {
        let populated = ControllerState::Connected {
            address: "Addr1".to_string(),
            record: RecordState::Populated(vec![ColorEntry::new("#fff", "Addr1")]),
        };
        let uninitialized = ControllerState::Connected {
            address: "Addr1".to_string(),
            record: RecordState::Uninitialized,
        };
        let unknown = ControllerState::Connected {
            address: "Addr1".to_string(),
            record: RecordState::Unknown,
        };

        assert_eq!(ControllerState::Disconnected.available_actions(), vec![ActionKind::Connect]);
        assert!(unknown.available_actions().is_empty());
        assert_eq!(uninitialized.available_actions(), vec![ActionKind::Initialize]);
        assert_eq!(populated.available_actions(), vec![ActionKind::AppendColor]);
    }

    #[tokio::test]
    async fn test_actions_outside_their_state_are_unavailable() {
        let (controller, ledger) = controller(FakeWallet::new());

        assert_eq!(
            controller.initialize_record().await,
            Err(AppError::ActionUnavailable("initialize".to_string()))
        );
        controller.set_input("#fff");
        assert_eq!(
            controller.submit_color().await,
            Err(AppError::ActionUnavailable("append-color".to_string()))
        );
        assert_eq!(ledger.sent_transactions(), 0);
    }

    #[tokio::test]
    async fn test_refresh_requires_session() {
        let (controller, _) = controller(FakeWallet::new());
        assert_eq!(controller.refresh().await, Err(AppError::NoSession));
    }

    #[tokio::test]
    async fn test_disconnect_returns_to_disconnected() {
        let (controller, _) = controller(FakeWallet::new());
        controller.connect().await.unwrap();
        assert!(controller.state().address().is_some());

        controller.disconnect();

        assert_eq!(controller.state(), ControllerState::Disconnected);
        assert!(controller.gateway().session().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_reflects_state() {
        let (controller, _) = controller(FakeWallet::new());
        controller.set_input("#abc");

        let view = controller.snapshot();
        assert_eq!(view.state, ControllerState::Disconnected);
        assert_eq!(view.pending_input, "#abc");
        assert!(view.is_offered(ActionKind::Connect));
        assert!(view.in_flight.is_empty());
    }
}
