//! Upload form and the backend-driven selection rounds that may follow it.
//!
//! `Idle -> Loading -> {Selection | Success | Error}`; confirming a
//! selection goes back to `Loading`. Success and error end the submission
//! but leave the form usable for the next one.

use crate::backend::{
    DashboardBackend, LogFile, ResolvedSelection, UploadOutcome, UploadRequest,
};
use crate::context::{DashboardContext, DashboardUpdate, Server};
use crate::error::{BackendError, ValidationError};

pub mod selection;

pub use selection::{ColumnPicker, SelectionKind, SelectionRound};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Loading,
    Selection,
    Success,
    Error,
}

/// What was sent for the submission currently in flight.
#[derive(Debug, Clone)]
struct PendingSubmission {
    server: Server,
    dashboard_name: String,
    selection: Option<ResolvedSelection>,
}

#[derive(Debug, Clone)]
pub struct Uploader {
    file: Option<LogFile>,
    server: Option<Server>,
    dashboard_name: String,
    status: UploadStatus,
    round: Option<SelectionRound>,
    message: String,
    dashboard_url: Option<String>,
    pending: Option<PendingSubmission>,
}

impl Default for Uploader {
    fn default() -> Self {
        Self::new()
    }
}

impl Uploader {
    pub fn new() -> Self {
        Self {
            file: None,
            server: None,
            dashboard_name: String::new(),
            status: UploadStatus::Idle,
            round: None,
            message: String::new(),
            dashboard_url: None,
            pending: None,
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == UploadStatus::Loading
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn dashboard_url(&self) -> Option<&str> {
        self.dashboard_url.as_deref()
    }

    pub fn round(&self) -> Option<&SelectionRound> {
        self.round.as_ref()
    }

    pub fn file(&self) -> Option<&LogFile> {
        self.file.as_ref()
    }

    pub fn set_file(&mut self, file: LogFile) {
        self.file = Some(file);
    }

    pub fn server(&self) -> Option<Server> {
        self.server
    }

    pub fn set_server(&mut self, server: Server) {
        self.server = Some(server);
    }

    pub fn server_mut(&mut self) -> &mut Option<Server> {
        &mut self.server
    }

    pub fn dashboard_name(&self) -> &str {
        &self.dashboard_name
    }

    pub fn set_dashboard_name(&mut self, name: impl Into<String>) {
        self.dashboard_name = name.into();
    }

    pub fn dashboard_name_mut(&mut self) -> &mut String {
        &mut self.dashboard_name
    }

    pub fn can_submit(&self) -> bool {
        self.validated_form().is_ok()
    }

    pub fn can_confirm(&self) -> bool {
        self.status == UploadStatus::Selection
            && self
                .round
                .as_ref()
                .and_then(SelectionRound::resolved)
                .is_some()
    }

    pub fn choose_metric(&mut self, metric: &str) {
        if let Some(SelectionRound::Metric { selected, .. }) = self.round.as_mut() {
            *selected = Some(metric.to_string());
        }
    }

    pub fn choose_category(&mut self, full: &str) {
        if let Some(SelectionRound::Category { selected, .. }) = self.round.as_mut() {
            *selected = Some(full.to_string());
        }
    }

    pub fn column_picker_mut(&mut self) -> Option<&mut ColumnPicker> {
        match self.round.as_mut() {
            Some(SelectionRound::Columns(picker)) => Some(picker),
            _ => None,
        }
    }

    fn validated_form(&self) -> Result<(LogFile, Server, String), ValidationError> {
        if self.is_busy() {
            return Err(ValidationError::Busy);
        }
        let file = self.file.clone().ok_or(ValidationError::MissingFile)?;
        let server = self.server.ok_or(ValidationError::MissingServer)?;
        if self.dashboard_name.trim().is_empty() {
            return Err(ValidationError::MissingDashboardName);
        }
        Ok((file, server, self.dashboard_name.clone()))
    }

    /// Starts a fresh upload from the form. Any open selection round is
    /// discarded and nothing from it is sent.
    pub fn begin_submit(&mut self) -> Result<UploadRequest, ValidationError> {
        let (file, server, dashboard_name) = self.validated_form()?;
        Ok(self.start_loading(file, server, dashboard_name, None))
    }

    /// Resends the same file with the active round's answer.
    pub fn begin_confirm(&mut self) -> Result<UploadRequest, ValidationError> {
        let (file, server, dashboard_name) = self.validated_form()?;
        let round = match (&self.status, &self.round) {
            (UploadStatus::Selection, Some(round)) => round,
            _ => return Err(ValidationError::NoSelectionRound),
        };
        let selection = round.resolved().ok_or(ValidationError::NothingSelected)?;
        Ok(self.start_loading(file, server, dashboard_name, Some(selection)))
    }

    fn start_loading(
        &mut self,
        file: LogFile,
        server: Server,
        dashboard_name: String,
        selection: Option<ResolvedSelection>,
    ) -> UploadRequest {
        self.round = None;
        self.dashboard_url = None;
        self.status = UploadStatus::Loading;
        self.message = "Uploading and processing file...".to_string();
        self.pending = Some(PendingSubmission {
            server,
            dashboard_name: dashboard_name.clone(),
            selection: selection.clone(),
        });

        tracing::info!(
            file = %file.name,
            server = server.as_str(),
            dashboard = %dashboard_name,
            with_selection = selection.is_some(),
            "upload submitted"
        );

        UploadRequest {
            file,
            dashboard_name,
            server,
            selection,
        }
    }

    /// Applies the backend's answer for the submission in flight.
    pub fn finish(
        &mut self,
        result: Result<UploadOutcome, BackendError>,
        context: &mut DashboardContext,
    ) {
        let Some(pending) = self.pending.take() else {
            tracing::warn!("upload result arrived with no submission in flight");
            return;
        };

        match result {
            Ok(UploadOutcome::MetricSelectionRequired(options)) => {
                tracing::info!(options = options.len(), "metric selection required");
                self.enter_selection(
                    SelectionRound::metric(options),
                    "Please select a metric to visualize",
                );
            }
            Ok(UploadOutcome::CategorySelectionRequired(options)) => {
                tracing::info!(options = options.len(), "category selection required");
                self.enter_selection(
                    SelectionRound::category(options),
                    "Please select a category to visualize",
                );
            }
            Ok(UploadOutcome::ColumnsSelectionRequired(options)) => {
                tracing::info!(options = options.len(), "column selection required");
                self.enter_selection(
                    SelectionRound::columns(options),
                    "Please select items to include in the dashboard",
                );
            }
            Ok(UploadOutcome::Created {
                dashboard_name,
                dashboard_url,
            }) => {
                let shown_name = dashboard_name.unwrap_or_else(|| pending.dashboard_name.clone());
                tracing::info!(
                    dashboard = %shown_name,
                    url = dashboard_url.as_deref().unwrap_or(""),
                    "dashboard created"
                );
                self.status = UploadStatus::Success;
                self.message = format!("Success! Dashboard \"{shown_name}\" created.");
                self.dashboard_url = dashboard_url;
                context.merge(Self::published_update(pending));
            }
            Err(err) => {
                tracing::warn!(error = %err, "upload failed");
                self.status = UploadStatus::Error;
                self.message = err.user_message();
            }
        }
    }

    fn enter_selection(&mut self, round: SelectionRound, message: &str) {
        self.round = Some(round);
        self.status = UploadStatus::Selection;
        self.message = message.to_string();
    }

    fn published_update(pending: PendingSubmission) -> DashboardUpdate {
        let (mut metrics, mut category, mut metric) = (Vec::new(), String::new(), String::new());
        match pending.selection {
            Some(ResolvedSelection::Columns(columns)) => metrics = columns,
            Some(ResolvedSelection::Category(full)) => category = full,
            Some(ResolvedSelection::Metric(name)) => metric = name,
            None => {}
        }
        DashboardUpdate {
            server: Some(pending.server),
            dashboard: Some(pending.dashboard_name),
            metrics: Some(metrics),
            category: Some(category),
            metric: Some(metric),
        }
    }

    pub async fn submit<B>(
        &mut self,
        backend: &B,
        context: &mut DashboardContext,
    ) -> Result<(), ValidationError>
    where
        B: DashboardBackend + ?Sized,
    {
        let request = self.begin_submit()?;
        let result = backend.upload(request).await;
        self.finish(result, context);
        Ok(())
    }

    pub async fn confirm<B>(
        &mut self,
        backend: &B,
        context: &mut DashboardContext,
    ) -> Result<(), ValidationError>
    where
        B: DashboardBackend + ?Sized,
    {
        let request = self.begin_confirm()?;
        let result = backend.upload(request).await;
        self.finish(result, context);
        Ok(())
    }
}
