use crate::domain::analysis::OperationContext;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Observability sink for engine steps. Implementations must not influence results.
pub trait StepLogger: Send + Sync {
    fn log_step(&self, context: &OperationContext, message: &str, payload: &Value);
}

/// Forwards steps to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStepLogger;

impl StepLogger for TracingStepLogger {
    fn log_step(&self, context: &OperationContext, message: &str, payload: &Value) {
        info!(
            correlation_id = %context.correlation_id,
            operation = context.operation.as_deref().unwrap_or("-"),
            payload = %payload,
            "{}",
            message
        );
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepLogEntry {
    pub time: String,
    pub correlation_id: String,
    pub operation: Option<String>,
    pub message: String,
    pub payload: Value,
}

/// Keeps the most recent steps in memory, oldest dropped first
#[derive(Clone)]
pub struct StepLogBuffer {
    entries: Arc<Mutex<Vec<StepLogEntry>>>,
    capacity: usize,
}

pub const DEFAULT_STEP_LOG_CAPACITY: usize = 100;

impl StepLogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> Vec<StepLogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Default for StepLogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_LOG_CAPACITY)
    }
}

impl StepLogger for StepLogBuffer {
    fn log_step(&self, context: &OperationContext, message: &str, payload: &Value) {
        let entry = StepLogEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            correlation_id: context.correlation_id.to_string(),
            operation: context.operation.clone(),
            message: message.to_string(),
            payload: payload.clone(),
        };

        // A poisoned buffer just stops recording
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
            if entries.len() > self.capacity {
                entries.remove(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_buffer_keeps_latest_entries() {
        let buffer = StepLogBuffer::new(2);
        let ctx = OperationContext::for_operation("chart");

        buffer.log_step(&ctx, "one", &json!({}));
        buffer.log_step(&ctx, "two", &json!({}));
        buffer.log_step(&ctx, "three", &json!({ "rows": 3 }));

        let entries = buffer.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "two");
        assert_eq!(entries[1].payload, json!({ "rows": 3 }));
        assert_eq!(entries[1].operation.as_deref(), Some("chart"));
        assert_eq!(entries[1].correlation_id, ctx.correlation_id.to_string());
    }

    #[test]
    fn test_clear() {
        let buffer = StepLogBuffer::default();
        buffer.log_step(&OperationContext::new(), "step", &Value::Null);
        buffer.clear();
        assert!(buffer.entries().is_empty());
    }
}
