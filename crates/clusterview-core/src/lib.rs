// clusterview-core: Derived-state engine and selection sync for the cluster admin view.

pub mod command;
pub mod config;
pub mod controller;
pub mod derive;
pub mod error;
pub mod model;
pub mod notify;
pub mod selection;
pub mod store;
pub mod transport;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult, RequestKind};
pub use config::ViewConfig;
pub use controller::{Controller, LifecycleState};
pub use error::CoreError;
pub use store::{AppState, ClusterPageState, Store};
pub use transport::ClusterTransport;
pub use view::ClusterPageView;

pub use derive::{
    FilteredReplicaset, FilteredServer, ReplicasetCounts, SearchableReplicaset, SearchableServer,
    Selectors, ServerCounts,
};
pub use notify::{Message, MessageId, MessageKind};
pub use selection::{History, Location, Resolution, SelectionPhase, SelectionState};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ClusterSelf, HealthStatus, Label, MemberRole, Replicaset, ReplicasetRef, Server, ServerStat,
    ServerStatSnapshot, ServerStatistics, Topology,
};
