use crate::chat::AnalysisMode;
use crate::context::DashboardSelection;
use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const METRIC_SELECTION_REQUIRED: &str = "metric_selection_required";
pub const OCC_SELECTION_REQUIRED: &str = "occ_selection_required";
pub const COLUMNS_SELECTION_REQUIRED: &str = "columns_selection_required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub full: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    MetricSelectionRequired(Vec<String>),
    CategorySelectionRequired(Vec<CategoryOption>),
    ColumnsSelectionRequired(Vec<String>),
    Created {
        dashboard_name: Option<String>,
        dashboard_url: Option<String>,
    },
}

// A missing or null option list is an empty round.
#[derive(Debug, Default, Deserialize)]
struct MetricRound {
    #[serde(default)]
    available_metrics: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct CategoryRound {
    #[serde(default)]
    available_categories: Option<Vec<CategoryOption>>,
}

#[derive(Debug, Default, Deserialize)]
struct ColumnsRound {
    #[serde(default)]
    available_columns: Option<Vec<String>>,
}

/// Interprets an `/upload/` response. Any 2xx body whose `status` is not one
/// of the selection constants counts as a created dashboard.
pub fn classify_upload(status: u16, body: &str) -> Result<UploadOutcome, BackendError> {
    if !(200..300).contains(&status) {
        return Err(BackendError::Rejected {
            status,
            detail: error_detail(body),
        });
    }

    let value: Value = serde_json::from_str(body)?;
    let outcome = match value.get("status").and_then(Value::as_str) {
        Some(METRIC_SELECTION_REQUIRED) => {
            let round: MetricRound = serde_json::from_value(value)?;
            UploadOutcome::MetricSelectionRequired(round.available_metrics.unwrap_or_default())
        }
        Some(OCC_SELECTION_REQUIRED) => {
            let round: CategoryRound = serde_json::from_value(value)?;
            UploadOutcome::CategorySelectionRequired(
                round.available_categories.unwrap_or_default(),
            )
        }
        Some(COLUMNS_SELECTION_REQUIRED) => {
            let round: ColumnsRound = serde_json::from_value(value)?;
            UploadOutcome::ColumnsSelectionRequired(round.available_columns.unwrap_or_default())
        }
        _ => UploadOutcome::Created {
            dashboard_name: string_field(&value, "dashboard_name"),
            dashboard_url: string_field(&value, "dashboard_url"),
        },
    };
    Ok(outcome)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

/// Snapshot of the shared context attached to every chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatContext {
    pub server: String,
    pub dashboard: String,
    pub selected_metrics: Vec<String>,
    pub selected_category: String,
    pub selected_metric: String,
    pub analysis_type: AnalysisMode,
}

impl ChatContext {
    pub fn snapshot(selection: &DashboardSelection, mode: AnalysisMode) -> Self {
        Self {
            server: selection.server_name().to_string(),
            dashboard: selection.dashboard.clone(),
            selected_metrics: selection.metrics.clone(),
            selected_category: selection.category.clone(),
            selected_metric: selection.metric.clone(),
            analysis_type: mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub analysis_type: AnalysisMode,
    pub context: ChatContext,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub response: Option<String>,
}

/// Interprets a `/chatbot/` response. The body of a non-2xx reply is ignored.
pub fn classify_chat(status: u16, body: &str) -> Result<ChatReply, BackendError> {
    if !(200..300).contains(&status) {
        return Err(BackendError::Status(status));
    }
    let value: Value = serde_json::from_str(body)?;
    Ok(ChatReply {
        response: string_field(&value, "response"),
    })
}

#[cfg(test)]
mod tests {
    use super::{classify_chat, classify_upload, CategoryOption, ChatContext, UploadOutcome};
    use crate::chat::AnalysisMode;
    use crate::context::{DashboardSelection, Server};
    use crate::error::BackendError;

    #[test]
    fn occ_round_carries_full_and_display_labels() {
        let body = r#"{
            "status": "occ_selection_required",
            "available_categories": [{"full": "net.occ.cpu", "display": "CPU"}]
        }"#;
        let outcome = classify_upload(200, body).expect("category round should parse");
        assert_eq!(
            outcome,
            UploadOutcome::CategorySelectionRequired(vec![CategoryOption {
                full: "net.occ.cpu".to_string(),
                display: "CPU".to_string(),
            }])
        );
    }

    #[test]
    fn metric_and_column_rounds_are_recognized() {
        let metrics = classify_upload(
            200,
            r#"{"status":"metric_selection_required","available_metrics":["tps","latency"]}"#,
        )
        .expect("metric round should parse");
        assert_eq!(
            metrics,
            UploadOutcome::MetricSelectionRequired(vec!["tps".to_string(), "latency".to_string()])
        );

        let columns = classify_upload(
            201,
            r#"{"status":"columns_selection_required","available_columns":["cpu_load"]}"#,
        )
        .expect("columns round should parse");
        assert_eq!(
            columns,
            UploadOutcome::ColumnsSelectionRequired(vec!["cpu_load".to_string()])
        );
    }

    #[test]
    fn null_or_missing_options_give_an_empty_round() {
        assert_eq!(
            classify_upload(
                200,
                r#"{"status":"metric_selection_required","available_metrics":null}"#,
            ),
            Ok(UploadOutcome::MetricSelectionRequired(Vec::new()))
        );
        assert_eq!(
            classify_upload(
                200,
                r#"{"status":"occ_selection_required","available_categories":null}"#,
            ),
            Ok(UploadOutcome::CategorySelectionRequired(Vec::new()))
        );
        assert_eq!(
            classify_upload(200, r#"{"status":"columns_selection_required"}"#),
            Ok(UploadOutcome::ColumnsSelectionRequired(Vec::new()))
        );
    }

    #[test]
    fn body_without_selection_status_is_a_created_dashboard() {
        let outcome = classify_upload(
            200,
            r#"{"status":"ok","dashboard_name":"Test","dashboard_url":"http://x/d1"}"#,
        )
        .expect("success body should parse");
        assert_eq!(
            outcome,
            UploadOutcome::Created {
                dashboard_name: Some("Test".to_string()),
                dashboard_url: Some("http://x/d1".to_string()),
            }
        );
    }

    #[test]
    fn failed_upload_keeps_detail() {
        let err = classify_upload(500, r#"{"detail":"bad file"}"#).expect_err("500 is an error");
        assert_eq!(
            err,
            BackendError::Rejected {
                status: 500,
                detail: Some("bad file".to_string()),
            }
        );

        let err = classify_upload(502, "<html>gateway</html>").expect_err("502 is an error");
        assert_eq!(err.user_message(), "Unknown error occurred");
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let err = classify_upload(200, "not json").expect_err("garbage should not parse");
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn chat_reply_may_be_missing_or_empty() {
        assert_eq!(
            classify_chat(200, r#"{"response":"Looks stable."}"#)
                .expect("reply should parse")
                .response
                .as_deref(),
            Some("Looks stable.")
        );
        assert!(classify_chat(200, r#"{"response":""}"#)
            .expect("reply should parse")
            .response
            .is_none());
        assert!(classify_chat(200, "{}")
            .expect("reply should parse")
            .response
            .is_none());
        assert_eq!(classify_chat(500, "{}"), Err(BackendError::Status(500)));
    }

    #[test]
    fn chat_request_serializes_context_snapshot() {
        let selection = DashboardSelection {
            server: Some(Server::Occ),
            dashboard: "Test".to_string(),
            category: "net.occ.cpu".to_string(),
            ..Default::default()
        };
        let context = ChatContext::snapshot(&selection, AnalysisMode::Trends);
        let value = serde_json::to_value(&context).expect("context should serialize");
        assert_eq!(value["server"], "OCC");
        assert_eq!(value["analysis_type"], "trends");
        assert_eq!(value["selected_category"], "net.occ.cpu");
        assert_eq!(value["selected_metrics"], serde_json::json!([]));
    }
}
