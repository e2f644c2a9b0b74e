use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation handle threaded through engine calls. The engine never looks
/// inside it; it is only forwarded to the step logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    pub correlation_id: Uuid,
    pub operation: Option<String>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            operation: None,
        }
    }

    pub fn for_operation(operation: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            operation: Some(operation.into()),
        }
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}
