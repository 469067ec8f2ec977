// ── Controller ──
//
// Lifecycle facade over the store, the transport and every background
// task: notification pipeline, periodic refresh, page data loading and
// command execution.

use std::future::Future;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandEnvelope, CommandResult, RequestKind};
use crate::config::ViewConfig;
use crate::derive::{Selectors, label_query};
use crate::error::CoreError;
use crate::model::{Label, Topology};
use crate::notify::{self, MessageId, MessageScope};
use crate::selection::{Location, SelectionState, reconcile};
use crate::store::{Action, RequestEvent, Store};
use crate::transport::ClusterTransport;
use crate::view::ClusterPageView;

const COMMAND_CHANNEL_SIZE: usize = 16;

// ── LifecycleState ───────────────────────────────────────────────

/// Lifecycle observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Running,
    ShutDown,
}

// ── Controller ───────────────────────────────────────────────────

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
pub struct Controller<T: ClusterTransport> {
    inner: Arc<ControllerInner<T>>,
}

impl<T: ClusterTransport> Clone for Controller<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<T> {
    config: ViewConfig,
    transport: T,
    store: Arc<Store>,
    selectors: Selectors,
    lifecycle: watch::Sender<LifecycleState>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    /// Cancels tasks scoped to the mounted cluster page.
    page_cancel: std::sync::Mutex<Option<CancellationToken>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<T: ClusterTransport> Controller<T> {
    /// Create a controller. Does not spawn anything until
    /// [`start()`](Self::start).
    pub fn new(transport: T, config: ViewConfig) -> Self {
        let (lifecycle, _) = watch::channel(LifecycleState::Idle);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Self {
            inner: Arc::new(ControllerInner {
                config,
                transport,
                store: Arc::new(Store::new()),
                selectors: Selectors::new(),
                lifecycle,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                page_cancel: std::sync::Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.inner.store
    }

    pub fn selectors(&self) -> &Selectors {
        &self.inner.selectors
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Subscribe to lifecycle changes.
    pub fn lifecycle(&self) -> watch::Receiver<LifecycleState> {
        self.inner.lifecycle.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the background tasks and load the cluster self description.
    pub async fn start(&self) -> Result<(), CoreError> {
        let state = *self.inner.lifecycle.borrow();
        match state {
            LifecycleState::Idle => {}
            LifecycleState::Running => return Ok(()),
            LifecycleState::ShutDown => {
                return Err(CoreError::Internal("controller was shut down".into()));
            }
        }

        {
            let mut handles = self.inner.task_handles.lock().await;
            handles.extend(notify::spawn(
                Arc::clone(&self.inner.store),
                self.inner.config.message_ttl,
                self.inner.cancel.child_token(),
            ));

            if let Some(rx) = self.inner.command_rx.lock().await.take() {
                handles.push(tokio::spawn(command_processor_task(self.clone(), rx)));
            }

            let interval_secs = self.inner.config.refresh_interval_secs;
            if interval_secs > 0 {
                let cancel = self.inner.cancel.child_token();
                handles.push(tokio::spawn(refresh_task(self.clone(), interval_secs, cancel)));
            }
        }

        self.inner.lifecycle.send_replace(LifecycleState::Running);
        info!("controller started");

        self.load_cluster_self().await
    }

    /// Cancel every task and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.lifecycle.send_replace(LifecycleState::ShutDown);
        debug!("controller shut down");
    }

    /// Start, run `f`, shut down. Periodic refresh is disabled.
    pub async fn oneshot<F, Fut, R>(transport: T, config: ViewConfig, f: F) -> Result<R, CoreError>
    where
        F: FnOnce(Controller<T>) -> Fut,
        Fut: Future<Output = Result<R, CoreError>>,
    {
        let config = ViewConfig {
            refresh_interval_secs: 0,
            ..config
        };
        let controller = Controller::new(transport, config);
        let result = match controller.start().await {
            Ok(()) => f(controller.clone()).await,
            Err(e) => Err(e),
        };
        controller.shutdown().await;
        result
    }

    // ── Cluster page lifecycle ───────────────────────────────────

    /// Mount the cluster page at `location`.
    ///
    /// Initializes the page state with the URL selection, loads the lists,
    /// and fetches statistics in a separate task.
    pub async fn mount_cluster_page(&self, location: &Location) -> Result<(), CoreError> {
        let page_cancel = self.inner.cancel.child_token();
        if let Some(previous) = self.swap_page_token(Some(page_cancel.clone())) {
            previous.cancel();
        }

        self.inner.store.dispatch(Action::ClusterPageDidMount {
            selection: SelectionState::from_location(location),
        });
        info!(%location, "cluster page mounted");

        let ctrl = self.clone();
        let cancel = page_cancel.clone();
        let stats = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                result = ctrl.load_server_stat() => {
                    if let Err(e) = result {
                        debug!(error = %e, "statistics unavailable");
                    }
                }
            }
        });
        self.track_task(stats).await;

        tokio::select! {
            biased;
            () = page_cancel.cancelled() => Ok(()),
            result = self.load_page_data() => result,
        }
    }

    /// Cancel page tasks and drop all page-scoped state.
    pub fn unmount_cluster_page(&self) {
        if let Some(token) = self.swap_page_token(None) {
            token.cancel();
        }
        self.inner.store.dispatch(Action::ClusterPageReset);
        info!("cluster page unmounted");
    }

    /// Refetch topology and statistics for the mounted page.
    pub async fn refresh_lists(&self) -> Result<(), CoreError> {
        let Some(page_cancel) = self.page_token() else {
            debug!("refresh skipped, cluster page not mounted");
            return Ok(());
        };

        let refresh = self.tracked(
            RequestKind::RefreshLists,
            async {
                let transport = &self.inner.transport;
                let (topology, stats) =
                    tokio::join!(transport.fetch_topology(), transport.fetch_server_stat());
                self.apply_topology(topology?);
                self.inner.store.dispatch(Action::ServerStatLoaded(stats?));
                Ok(())
            },
            None,
            false,
        );

        tokio::select! {
            biased;
            () = page_cancel.cancelled() => Ok(()),
            result = refresh => result,
        }
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command through the command processor task.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.lifecycle.borrow() != LifecycleState::Running {
            return Err(CoreError::Internal("controller is not running".into()));
        }

        let (tx, rx) = oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::Internal("command processor stopped".into()))?;

        rx.await
            .map_err(|_| CoreError::Internal("command processor stopped".into()))?
    }

    // ── UI state ─────────────────────────────────────────────────

    /// Derived view of the mounted cluster page.
    pub fn view(&self) -> Option<ClusterPageView> {
        let state = self.inner.store.state();
        state
            .cluster_page
            .as_ref()
            .map(|page| ClusterPageView::build(page, &self.inner.selectors))
    }

    pub fn set_filter(&self, text: impl Into<String>) {
        self.inner.store.dispatch(Action::SetFilter(text.into()));
    }

    /// Filter by a clicked server label.
    pub fn apply_label_filter(&self, label: &Label) {
        self.set_filter(label_query(label));
    }

    /// Reconcile the store selection with `location`. Returns how many
    /// actions were dispatched.
    pub fn render_pass(&self, location: &Location) -> usize {
        let state = self.inner.store.state();
        let Some(page) = state.cluster_page.as_ref() else {
            return 0;
        };
        let actions = reconcile(location, page);
        let count = actions.len();
        for action in actions {
            self.inner.store.dispatch(action);
        }
        count
    }

    pub fn set_failover_modal_visible(&self, visible: bool) {
        self.inner
            .store
            .dispatch(Action::SetFailoverModalVisible(visible));
    }

    pub fn dismiss_message(&self, id: MessageId) {
        self.inner.store.dispatch(Action::SetMessageDone(id));
    }

    // ── Loading ──────────────────────────────────────────────────

    async fn load_cluster_self(&self) -> Result<(), CoreError> {
        let me = self
            .tracked(
                RequestKind::ClusterSelf,
                self.inner.transport.cluster_self(),
                None,
                true,
            )
            .await?;
        debug!(configured = me.configured, failover = me.failover, "cluster self loaded");
        self.inner.store.dispatch(Action::ClusterSelfLoaded(me));
        Ok(())
    }

    async fn load_page_data(&self) -> Result<(), CoreError> {
        self.tracked(
            RequestKind::PageData,
            async {
                let topology = self.inner.transport.fetch_topology().await?;
                self.apply_topology(topology);
                Ok(())
            },
            None,
            false,
        )
        .await
    }

    async fn load_server_stat(&self) -> Result<(), CoreError> {
        self.tracked(
            RequestKind::ServerStat,
            async {
                let stats = self.inner.transport.fetch_server_stat().await?;
                self.inner.store.dispatch(Action::ServerStatLoaded(stats));
                Ok(())
            },
            None,
            false,
        )
        .await
    }

    fn apply_topology(&self, topology: Topology) {
        if self.inner.config.validate_topology {
            for replicaset in &topology.replicasets {
                if let Err(e) = replicaset.validate() {
                    warn!(error = %e, "inconsistent replicaset");
                }
            }
        }
        debug!(
            servers = topology.servers.len(),
            replicasets = topology.replicasets.len(),
            "lists loaded"
        );
        self.inner.store.dispatch(Action::ListsLoaded(topology));
    }

    /// Wrap `request` in started/succeeded/failed actions.
    async fn tracked<R>(
        &self,
        kind: RequestKind,
        request: impl Future<Output = Result<R, CoreError>>,
        success_message: Option<String>,
        show_error: bool,
    ) -> Result<R, CoreError> {
        let scope = self.request_scope();
        let store = &self.inner.store;
        store.dispatch(Action::Request(RequestEvent::started(kind, scope)));

        match request.await {
            Ok(value) => {
                store.dispatch(Action::Request(RequestEvent::succeeded(
                    kind,
                    scope,
                    success_message,
                )));
                Ok(value)
            }
            Err(e) => {
                warn!(request = %kind, error = %e, "request failed");
                store.dispatch(Action::Request(RequestEvent::failed(
                    kind,
                    scope,
                    e.clone(),
                    show_error,
                )));
                Err(e)
            }
        }
    }

    async fn run_command(&self, command: Command) -> Result<CommandResult, CoreError> {
        let kind = command.kind();
        info!(command = %kind, "executing command");

        let result = self
            .tracked(
                kind,
                self.inner.transport.execute(&command),
                Some(command.success_message()),
                true,
            )
            .await?;

        if let CommandResult::Failover(enabled) = result {
            self.inner.store.dispatch(Action::FailoverChanged(enabled));
            self.set_failover_modal_visible(false);
        }

        if command.changes_topology() {
            if let Err(e) = self.refresh_lists().await {
                warn!(error = %e, "refresh after command failed");
            }
        }

        Ok(result)
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn request_scope(&self) -> MessageScope {
        if self.inner.store.state().cluster_page.is_some() {
            MessageScope::ClusterPage
        } else {
            MessageScope::Global
        }
    }

    fn page_token(&self) -> Option<CancellationToken> {
        self.inner
            .page_cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn swap_page_token(&self, token: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut slot = self
            .inner
            .page_cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, token)
    }

    async fn track_task(&self, handle: JoinHandle<()>) {
        let mut handles = self.inner.task_handles.lock().await;
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh the mounted page's lists.
async fn refresh_task<T: ClusterTransport>(
    controller: Controller<T>,
    interval_secs: u64,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = controller.refresh_lists().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

/// Run queued commands one at a time.
async fn command_processor_task<T: ClusterTransport>(
    controller: Controller<T>,
    mut rx: mpsc::Receiver<CommandEnvelope>,
) {
    let cancel = controller.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = controller.run_command(envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}
