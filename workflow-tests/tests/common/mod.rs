//! Common test utilities for workflow tests.

use workflow_tests::WorkflowTestContext;

/// Create a new workflow test context with default configuration.
pub async fn setup() -> WorkflowTestContext {
    WorkflowTestContext::new()
        .await
        .expect("Failed to create workflow test context")
}
