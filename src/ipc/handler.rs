//! Request routing for the scoring daemon.
//!
//! Maps `tasks.analyze` / `tasks.suggest` / `ping` onto a shared
//! `Prioritizer`. Every connection uses the same prioritizer, so a suggestion
//! on one connection sees the analysis made on another.

use log::{error, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::normalize_batch;
use crate::error::{RankError, Result};
use crate::ipc::messages::{AnalyzeParams, DaemonError, DaemonRequest, DaemonResponse, Methods, SuggestParams};
use crate::ipc::server::RequestHandler;
use crate::scoring::{DEFAULT_SUGGESTIONS, Prioritizer};

/// Routes daemon requests to a prioritizer
#[derive(Debug, Clone)]
pub struct PrioritizerHandler {
    prioritizer: Prioritizer,
    default_count: usize,
}

impl PrioritizerHandler {
    pub fn new(prioritizer: Prioritizer) -> Self {
        Self {
            prioritizer,
            default_count: DEFAULT_SUGGESTIONS,
        }
    }

    /// Number of suggestions returned when a request does not say.
    pub fn with_default_count(mut self, count: usize) -> Self {
        self.default_count = count;
        self
    }

    pub fn prioritizer(&self) -> &Prioritizer {
        &self.prioritizer
    }

    /// Handle one request synchronously.
    pub fn dispatch(&self, request: DaemonRequest) -> DaemonResponse {
        let id = request.id;
        let outcome = match request.method.as_str() {
            Methods::PING => Ok(serde_json::json!({ "pong": true })),
            Methods::ANALYZE => self.analyze(request.params),
            Methods::SUGGEST => self.suggest(request.params),
            other => return DaemonResponse::error(id, DaemonError::method_not_found(other)),
        };

        match outcome {
            Ok(result) => DaemonResponse::success(id, result),
            Err(e) => {
                if e.is_client_error() || matches!(e, RankError::NoPriorAnalysis) {
                    warn!("Request {} ({}) rejected: {}", id, request.method, e);
                } else {
                    error!("Request {} ({}) failed: {}", id, request.method, e);
                }
                DaemonResponse::error(id, DaemonError::from(&e))
            }
        }
    }

    fn analyze(&self, params: Value) -> Result<Value> {
        let params: AnalyzeParams = parse_params(params)?;
        let tasks = normalize_batch(params.tasks)?;
        let ranked = self.prioritizer.score(&tasks)?;
        Ok(serde_json::to_value(ranked)?)
    }

    fn suggest(&self, params: Value) -> Result<Value> {
        let params: SuggestParams = parse_params(params)?;
        let count = params.count.unwrap_or(self.default_count);
        let tasks = params.tasks.map(normalize_batch).transpose()?;
        let top = self.prioritizer.suggest(tasks.as_deref(), count)?;
        Ok(serde_json::to_value(top)?)
    }
}

impl RequestHandler for PrioritizerHandler {
    fn handle(&self, request: DaemonRequest) -> impl std::future::Future<Output = DaemonResponse> + Send {
        let response = self.dispatch(request);
        async move { response }
    }
}

/// Deserialize request params; a missing (null) params value means defaults.
fn parse_params<T: DeserializeOwned + Default>(params: Value) -> Result<T> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params).map_err(|e| RankError::InvalidInput(format!("invalid params: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::messages::ErrorCode;
    use serde_json::json;

    fn handler() -> PrioritizerHandler {
        PrioritizerHandler::new(Prioritizer::new())
    }

    fn batch() -> Value {
        json!([
            {"id": "a", "title": "Base", "due_date": "2099-01-01", "importance": 9},
            {"id": "b", "title": "Child", "due_date": "2099-01-01", "dependencies": ["a"]},
            {"id": "c", "title": "Other", "due_date": "2099-01-01", "importance": 2}
        ])
    }

    #[test]
    fn test_ping() {
        let response = handler().dispatch(DaemonRequest::no_params(1, Methods::PING));
        assert_eq!(response.result.unwrap()["pong"], true);
    }

    #[test]
    fn test_unknown_method() {
        let response = handler().dispatch(DaemonRequest::no_params(1, "tasks.delete"));
        assert_eq!(response.error.unwrap().code, ErrorCode::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_analyze_returns_ranked_list() {
        let response = handler().dispatch(DaemonRequest::new(3, Methods::ANALYZE, json!({ "tasks": batch() })));
        assert_eq!(response.id, 3);
        let result = response.result.unwrap();
        let list = result.as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0]["id"], "a");
        assert_eq!(list[0]["explanation"], "High importance. Low effort (quick win). Blocks 1 task(s)");
    }

    #[test]
    fn test_analyze_cycle_rejected() {
        let tasks = json!([
            {"id": "a", "title": "A", "due_date": "2099-01-01", "dependencies": ["b"]},
            {"id": "b", "title": "B", "due_date": "2099-01-01", "dependencies": ["a"]}
        ]);
        let response = handler().dispatch(DaemonRequest::new(4, Methods::ANALYZE, json!({ "tasks": tasks })));
        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::INVALID_TASKS);
        assert!(error.message.contains("a -> b -> a"));
    }

    #[test]
    fn test_analyze_bad_record_rejected() {
        let tasks = json!([{ "title": "A", "due_date": "2099-01-01", "importance": 42 }]);
        let response = handler().dispatch(DaemonRequest::new(5, Methods::ANALYZE, json!({ "tasks": tasks })));
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_analyze_missing_tasks_param() {
        let response = handler().dispatch(DaemonRequest::new(6, Methods::ANALYZE, json!({ "items": [] })));
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_suggest_before_analyze() {
        let response = handler().dispatch(DaemonRequest::no_params(7, Methods::SUGGEST));
        assert_eq!(response.error.unwrap().code, ErrorCode::NO_PRIOR_ANALYSIS);
    }

    #[test]
    fn test_suggest_after_analyze() {
        let handler = handler().with_default_count(2);
        handler.dispatch(DaemonRequest::new(8, Methods::ANALYZE, json!({ "tasks": batch() })));

        let response = handler.dispatch(DaemonRequest::new(9, Methods::SUGGEST, Value::Null));
        assert_eq!(response.result.unwrap().as_array().unwrap().len(), 2);

        let response = handler.dispatch(DaemonRequest::new(10, Methods::SUGGEST, json!({ "count": 1 })));
        assert_eq!(response.result.unwrap()[0]["id"], "a");
    }

    #[test]
    fn test_suggest_with_tasks() {
        let handler = handler();
        let response = handler.dispatch(DaemonRequest::new(11, Methods::SUGGEST, json!({ "tasks": batch() })));
        assert_eq!(response.result.unwrap().as_array().unwrap().len(), 3);
        assert_eq!(handler.prioritizer().last_top_n(10).unwrap().len(), 3);
    }
}
