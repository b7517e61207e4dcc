use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Server {
    Air,
    Sdp,
    Ccn,
    Occ,
}

impl Server {
    pub const ALL: [Server; 4] = [Server::Air, Server::Sdp, Server::Ccn, Server::Occ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Air => "AIR",
            Self::Sdp => "SDP",
            Self::Ccn => "CCN",
            Self::Occ => "OCC",
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most recently finalized dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSelection {
    pub server: Option<Server>,
    pub dashboard: String,
    pub metrics: Vec<String>,
    pub category: String,
    pub metric: String,
}

impl DashboardSelection {
    pub fn is_ready(&self) -> bool {
        self.server.is_some() && !self.dashboard.is_empty()
    }

    pub fn server_name(&self) -> &'static str {
        self.server.map(Server::as_str).unwrap_or("")
    }
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardUpdate {
    pub server: Option<Server>,
    pub dashboard: Option<String>,
    pub metrics: Option<Vec<String>>,
    pub category: Option<String>,
    pub metric: Option<String>,
}

/// Session-scoped dashboard state shared by the uploader and the assistant.
///
/// Readers compare `revision()` against the last value they saw to detect
/// that a new dashboard was published.
#[derive(Debug, Clone, Default)]
pub struct DashboardContext {
    selection: DashboardSelection,
    revision: u64,
}

impl DashboardContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &DashboardSelection {
        &self.selection
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_ready(&self) -> bool {
        self.selection.is_ready()
    }

    pub fn merge(&mut self, update: DashboardUpdate) {
        if let Some(server) = update.server {
            self.selection.server = Some(server);
        }
        if let Some(dashboard) = update.dashboard {
            self.selection.dashboard = dashboard;
        }
        if let Some(metrics) = update.metrics {
            self.selection.metrics = metrics;
        }
        if let Some(category) = update.category {
            self.selection.category = category;
        }
        if let Some(metric) = update.metric {
            self.selection.metric = metric;
        }
        self.revision += 1;
        tracing::debug!(
            revision = self.revision,
            server = self.selection.server_name(),
            dashboard = %self.selection.dashboard,
            "dashboard context updated"
        );
    }
}
