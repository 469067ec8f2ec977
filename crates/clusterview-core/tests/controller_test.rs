#![allow(clippy::unwrap_used)]
// Controller scenarios against an in-memory transport.

use std::sync::Mutex;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use clusterview_core::notify::{MessageKind, MessageScope, SERVER_NOT_REACHABLE_TEXT};
use clusterview_core::selection::{close_server, open_server};
use clusterview_core::{
    ClusterSelf, ClusterTransport, Command, CommandResult, Controller, CoreError, History,
    JoinServerRequest, Label, LifecycleState, Location, Resolution, SelectionPhase, ServerStat,
    Topology, ViewConfig,
};

// ── Fake transport ──────────────────────────────────────────────────

#[derive(Default)]
struct FakeTransport {
    topology: Mutex<Option<Result<Topology, CoreError>>>,
    stats: Mutex<Option<Result<Vec<ServerStat>, CoreError>>>,
    topology_delay: Mutex<Duration>,
    command_error: Mutex<Option<CoreError>>,
    commands: Mutex<Vec<Command>>,
}

impl FakeTransport {
    fn with_topology(topology: Topology) -> Self {
        let fake = Self::default();
        fake.set_topology(Ok(topology));
        fake
    }

    fn set_topology(&self, topology: Result<Topology, CoreError>) {
        *self.topology.lock().unwrap() = Some(topology);
    }

    fn set_stats(&self, stats: Result<Vec<ServerStat>, CoreError>) {
        *self.stats.lock().unwrap() = Some(stats);
    }

    fn fail_commands_with(&self, error: Option<CoreError>) {
        *self.command_error.lock().unwrap() = error;
    }
}

impl ClusterTransport for FakeTransport {
    async fn cluster_self(&self) -> Result<ClusterSelf, CoreError> {
        Ok(ClusterSelf {
            uri: Some("localhost:3301".into()),
            uuid: Some("s1".into()),
            configured: true,
            failover: false,
        })
    }

    async fn fetch_topology(&self) -> Result<Topology, CoreError> {
        let delay = *self.topology_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let topology = self.topology.lock().unwrap().clone();
        topology.unwrap_or_else(|| Ok(Topology::default()))
    }

    async fn fetch_server_stat(&self) -> Result<Vec<ServerStat>, CoreError> {
        let stats = self.stats.lock().unwrap().clone();
        stats.unwrap_or_else(|| {
            Err(CoreError::OperationFailed {
                message: "stats unavailable".into(),
            })
        })
    }

    async fn execute(&self, command: &Command) -> Result<CommandResult, CoreError> {
        self.commands.lock().unwrap().push(command.clone());
        let error = self.command_error.lock().unwrap().clone();
        if let Some(error) = error {
            return Err(error);
        }
        Ok(match command {
            Command::ChangeFailover { enabled } => CommandResult::Failover(*enabled),
            Command::ToggleAuth { enabled } => CommandResult::Auth(*enabled),
            _ => CommandResult::Ok,
        })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn topology() -> Topology {
    serde_json::from_value(json!({
        "servers": [
            {"uri": "localhost:3301", "uuid": "s1", "status": "healthy",
             "replicaset": {"uuid": "aaaaaaaa-0001"}, "labels": [{"name": "rack", "value": "1"}]},
            {"uri": "localhost:3302", "uuid": "s2", "status": "healthy",
             "replicaset": {"uuid": "aaaaaaaa-0001"}, "labels": [{"name": "rack", "value": "2"}]},
            {"uri": "localhost:3303", "status": "unconfigured"}
        ],
        "replicasets": [
            {"uuid": "aaaaaaaa-0001", "roles": ["vshard-storage"], "status": "healthy",
             "master": {"uuid": "s1"}, "active_master": {"uuid": "s1"},
             "servers": [
                {"uri": "localhost:3301", "uuid": "s1", "status": "healthy",
                 "replicaset": {"uuid": "aaaaaaaa-0001"}, "labels": [{"name": "rack", "value": "1"}]},
                {"uri": "localhost:3302", "uuid": "s2", "status": "healthy",
                 "replicaset": {"uuid": "aaaaaaaa-0001"}, "labels": [{"name": "rack", "value": "2"}]}
             ]}
        ]
    }))
    .unwrap()
}

fn unreachable() -> CoreError {
    CoreError::ServerUnreachable {
        url: "http://localhost:8081".into(),
        reason: "connection refused".into(),
    }
}

async fn started(transport: FakeTransport) -> Controller<FakeTransport> {
    let controller = Controller::new(transport, ViewConfig::default());
    controller.start().await.unwrap();
    controller
}

/// Let background tasks drain their queues.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

fn active_texts(controller: &Controller<FakeTransport>) -> Vec<String> {
    controller
        .store()
        .state()
        .active_messages()
        .map(|m| m.content.text.clone())
        .collect()
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn execute_requires_running_controller() {
    let controller = Controller::new(FakeTransport::default(), ViewConfig::default());
    let result = controller.execute(Command::BootstrapVshard).await;
    assert!(matches!(result, Err(CoreError::Internal(_))), "got {result:?}");

    controller.start().await.unwrap();
    assert_eq!(*controller.lifecycle().borrow(), LifecycleState::Running);
    assert!(controller.store().state().cluster_self.as_ref().unwrap().configured);

    controller.shutdown().await;
    assert_eq!(*controller.lifecycle().borrow(), LifecycleState::ShutDown);
    assert!(controller.start().await.is_err());
}

#[tokio::test]
async fn oneshot_runs_closure_and_shuts_down() {
    let servers = Controller::oneshot(
        FakeTransport::with_topology(topology()),
        ViewConfig::default(),
        |ctrl| async move {
            ctrl.mount_cluster_page(&Location::parse("/cluster")).await?;
            Ok::<_, CoreError>(ctrl.view().unwrap().server_counts.unwrap().total)
        },
    )
    .await
    .unwrap();
    assert_eq!(servers, 3);
}

// ── Page data ───────────────────────────────────────────────────────

#[tokio::test]
async fn mount_loads_lists_and_tolerates_missing_stats() {
    let controller = started(FakeTransport::with_topology(topology())).await;
    controller
        .mount_cluster_page(&Location::parse("/cluster"))
        .await
        .unwrap();
    settle().await;

    let view = controller.view().unwrap();
    assert!(!view.loading);
    assert_eq!(view.title.as_deref(), Some("(1 total, 0 unhealthy) (2 servers)"));
    assert_eq!(view.unlinked_servers.unwrap().len(), 1);

    let replicasets = view.replicasets.unwrap();
    assert!(
        replicasets[0]
            .replicaset
            .servers
            .iter()
            .all(|s| s.searchable.server.statistics.is_none())
    );
    // Statistics failures are never shown.
    assert!(active_texts(&controller).is_empty());
}

#[tokio::test]
async fn late_stats_are_joined_by_uuid() {
    let transport = FakeTransport::with_topology(topology());
    transport.set_stats(Ok(serde_json::from_value(json!([
        {"uuid": "s2", "statistics": {"arena_used": 64}}
    ]))
    .unwrap()));
    let controller = started(transport).await;
    controller
        .mount_cluster_page(&Location::parse("/cluster"))
        .await
        .unwrap();
    settle().await;

    let view = controller.view().unwrap();
    let arena: Vec<_> = view.replicasets.unwrap()[0]
        .replicaset
        .servers
        .iter()
        .map(|s| s.searchable.server.statistics.as_ref().and_then(|st| st.arena_used))
        .collect();
    assert_eq!(arena, vec![None, Some(64)]);
}

#[tokio::test]
async fn label_filter_narrows_view() {
    let controller = started(FakeTransport::with_topology(topology())).await;
    controller
        .mount_cluster_page(&Location::parse("/cluster"))
        .await
        .unwrap();

    controller.apply_label_filter(&Label::new("rack", "1"));
    let view = controller.view().unwrap();
    assert_eq!(&*view.filter, "rack: 1");

    let rs = &view.replicasets.unwrap()[0];
    assert_eq!(rs.matching_servers_count, 1);
    assert!(rs.replicaset.servers[0].filter_matching);
    assert!(!rs.replicaset.servers[1].filter_matching);

    // Counters ignore the filter.
    assert_eq!(view.server_counts.unwrap().total, 3);
}

// ── Selection ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn deep_link_resolves_after_load() {
    let transport = FakeTransport::with_topology(topology());
    *transport.topology_delay.lock().unwrap() = Duration::from_millis(500);
    let controller = started(transport).await;

    let mount = {
        let ctrl = controller.clone();
        tokio::spawn(async move {
            ctrl.mount_cluster_page(&Location::parse("/cluster?s=localhost%3A3302"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let view = controller.view().unwrap();
    assert!(view.loading);
    assert!(view.join_server_modal_visible);
    assert_eq!(view.selected_server, Some(Resolution::Loading));

    mount.await.unwrap().unwrap();
    let view = controller.view().unwrap();
    let server = view.selected_server.unwrap();
    assert_eq!(server.found().unwrap().uri, "localhost:3302");
}

#[tokio::test(start_paused = true)]
async fn background_refresh_keeps_open_selection() {
    let controller = started(FakeTransport::with_topology(topology())).await;
    controller
        .mount_cluster_page(&Location::parse("/cluster?s=localhost%3A3302"))
        .await
        .unwrap();
    *controller.transport().topology_delay.lock().unwrap() = Duration::from_millis(500);

    let refresh = {
        let ctrl = controller.clone();
        tokio::spawn(async move { ctrl.refresh_lists().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let view = controller.view().unwrap();
    assert!(view.refreshing);
    assert!(!view.loading);
    let server = view.selected_server.unwrap();
    assert_eq!(server.found().unwrap().uri, "localhost:3302");

    refresh.await.unwrap().unwrap();
    assert!(!controller.view().unwrap().refreshing);
}

#[tokio::test]
async fn unknown_selection_is_not_found() {
    let controller = started(FakeTransport::with_topology(topology())).await;
    controller
        .mount_cluster_page(&Location::parse("/cluster?r=missing"))
        .await
        .unwrap();

    let view = controller.view().unwrap();
    assert_eq!(view.selection, SelectionPhase::ReplicasetSelected);
    assert_eq!(view.selected_replicaset, Some(Resolution::NotFound));
    assert!(view.edit_replicaset_modal_visible);
}

#[tokio::test]
async fn navigation_reconciles_store_with_url() {
    let controller = started(FakeTransport::with_topology(topology())).await;
    let mut history = History::new(Location::parse("/cluster"));
    controller.mount_cluster_page(history.current()).await.unwrap();
    assert_eq!(controller.render_pass(history.current()), 0);

    // User opens the dialog: URL first, store follows on the next pass.
    history.push(open_server(history.current(), "localhost:3303"));
    assert_eq!(controller.render_pass(history.current()), 1);
    assert_eq!(controller.render_pass(history.current()), 0);
    assert!(controller.view().unwrap().join_server_modal_visible);

    // Back button closes it.
    history.back();
    assert_eq!(controller.render_pass(history.current()), 1);
    assert_eq!(controller.view().unwrap().selection, SelectionPhase::Idle);

    // Forward reopens, explicit close clears again.
    let reopened = history.forward().unwrap().clone();
    controller.render_pass(&reopened);
    history.push(close_server(&reopened));
    controller.render_pass(history.current());
    assert!(!controller.view().unwrap().join_server_modal_visible);
}

#[tokio::test]
async fn render_pass_before_mount_does_nothing() {
    let controller = started(FakeTransport::with_topology(topology())).await;
    assert_eq!(controller.render_pass(&Location::parse("/cluster?s=a")), 0);
    assert!(controller.view().is_none());
}

// ── Notifications ───────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn success_expires_after_three_seconds_danger_stays() {
    let transport = FakeTransport::with_topology(topology());
    let controller = started(transport).await;

    controller
        .execute(Command::ExpelServer { uuid: "s2".into() })
        .await
        .unwrap();
    controller
        .transport()
        .fail_commands_with(Some(CoreError::Rejected {
            message: "Server s2 is master".into(),
        }));
    assert!(controller.execute(Command::BootstrapVshard).await.is_err());

    tokio::time::sleep(Duration::from_millis(2999)).await;
    let state = controller.store().state();
    let kinds: Vec<_> = state
        .active_messages()
        .map(|m| m.content.kind)
        .collect();
    assert_eq!(kinds, vec![MessageKind::Success, MessageKind::Danger]);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(active_texts(&controller), vec!["Server s2 is master".to_owned()]);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(active_texts(&controller).len(), 1);
}

#[tokio::test]
async fn dismissed_success_is_not_redismissed() {
    let controller = started(FakeTransport::default()).await;
    controller
        .execute(Command::ToggleAuth { enabled: true })
        .await
        .unwrap();
    settle().await;

    let id = controller.store().state().messages[0].id;
    controller.dismiss_message(id);
    controller.dismiss_message(id);
    assert!(controller.store().state().messages[0].done);
}

#[tokio::test]
async fn connectivity_message_deduplicates_and_heals() {
    let transport = FakeTransport::default();
    transport.set_topology(Err(unreachable()));
    transport.set_stats(Err(unreachable()));
    let controller = started(transport).await;

    let location = Location::parse("/cluster");
    assert!(controller.mount_cluster_page(&location).await.is_err());
    assert!(controller.refresh_lists().await.is_err());
    settle().await;

    assert_eq!(active_texts(&controller), vec![SERVER_NOT_REACHABLE_TEXT.to_owned()]);
    let view = controller.view().unwrap();
    assert!(view.request_status.error.is_some());

    controller.transport().set_topology(Ok(topology()));
    controller.transport().set_stats(Ok(Vec::new()));
    controller.refresh_lists().await.unwrap();
    settle().await;

    assert!(active_texts(&controller).is_empty());
    assert!(controller.view().unwrap().replicasets.is_some());
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn command_success_refreshes_lists() {
    let transport = FakeTransport::with_topology(Topology::default());
    let controller = started(transport).await;
    controller
        .mount_cluster_page(&Location::parse("/cluster"))
        .await
        .unwrap();
    assert_eq!(controller.view().unwrap().server_counts.unwrap().total, 0);

    controller.transport().set_topology(Ok(topology()));
    controller.transport().set_stats(Ok(Vec::new()));
    controller
        .execute(Command::JoinServer(JoinServerRequest {
            uri: "localhost:3303".into(),
            replicaset_uuid: "aaaaaaaa-0001".into(),
        }))
        .await
        .unwrap();
    settle().await;

    assert_eq!(controller.view().unwrap().server_counts.unwrap().total, 3);
    assert_eq!(controller.transport().commands.lock().unwrap().len(), 1);
    assert_eq!(
        active_texts(&controller),
        vec!["Join is OK. Please wait for list refresh...".to_owned()]
    );
}

#[tokio::test]
async fn failover_change_updates_cluster_self() {
    let controller = started(FakeTransport::default()).await;
    controller.set_failover_modal_visible(true);

    let result = controller
        .execute(Command::ChangeFailover { enabled: true })
        .await
        .unwrap();
    assert_eq!(result, CommandResult::Failover(true));

    let state = controller.store().state();
    assert!(state.cluster_self.as_ref().unwrap().failover);
    assert!(!state.failover_modal_visible);
}

#[tokio::test]
async fn unmount_resets_page_and_supersedes_page_messages() {
    let controller = started(FakeTransport::with_topology(topology())).await;
    controller
        .mount_cluster_page(&Location::parse("/cluster?s=localhost%3A3301"))
        .await
        .unwrap();
    controller.set_filter("rack");

    controller
        .transport()
        .fail_commands_with(Some(CoreError::Rejected {
            message: "edit failed".into(),
        }));
    assert!(
        controller
            .execute(Command::ExpelServer { uuid: "s1".into() })
            .await
            .is_err()
    );
    settle().await;
    let state = controller.store().state();
    assert_eq!(state.messages[0].scope, MessageScope::ClusterPage);

    controller.unmount_cluster_page();
    assert!(controller.view().is_none());
    assert!(active_texts(&controller).is_empty());

    // Remount starts from initial page state.
    controller
        .mount_cluster_page(&Location::parse("/cluster"))
        .await
        .unwrap();
    let view = controller.view().unwrap();
    assert_eq!(&*view.filter, "");
    assert_eq!(view.selection, SelectionPhase::Idle);
}
