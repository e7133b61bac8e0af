use erpforge_llm_sdk::types::Message;
use erpforge_types::QaFinding;
use erpforge_workspace::GeneratedFile;
use serde::Deserialize;

use crate::error::PipelineError;
use crate::invoker::AgentInvoker;

const SYSTEM_PROMPT: &str = "You are an expert QA engineer specialized in testing ERP systems.

Your responsibilities:
1. Generate comprehensive pytest tests for backend code
2. Validate code structure and best practices
3. Check for common bugs and security issues
4. Generate test data and fixtures
5. Report bugs with clear descriptions and suggested fixes

Test coverage areas:
- Unit tests for models and services
- Integration tests for API endpoints
- Test data fixtures
- Edge cases and error handling

Generate production-ready tests with proper assertions and coverage.";

const TASK_PROMPT: &str = r#"Review the generated backend code above and produce the QA deliverables.

1. pytest test files covering each entity and each module's CRUD endpoints, plus a conftest.py with database fixtures. Place them under "tests/".
2. Findings for any bugs, security issues, or missing error handling you observed in the reviewed code.

Respond with a single JSON object of this shape:
{"files": [{"path": "tests/test_product.py", "content": "..."}], "findings": [{"file": "backend/app/main.py", "issue": "description", "severity": "info" | "warning" | "error"}]}

Generate ONLY the JSON, no additional text."#;

const QA_SHAPE: &str = r#"{"files": [{"path": string, "content": string}], "findings": [{"file": string, "issue": string, "severity": "info"|"warning"|"error"}]}"#;

/// Output contract for the QA agent
#[derive(Debug, Deserialize)]
pub struct QaOutput {
    pub files: Vec<GeneratedFile>,
    #[serde(default)]
    pub findings: Vec<QaFinding>,
}

/// Generates tests for the backend and reports model-observed findings
pub struct QaAgent;

impl QaAgent {
    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn task_instruction(&self) -> &'static str {
        TASK_PROMPT
    }

    pub async fn run(
        &self,
        invoker: &AgentInvoker,
        messages: Vec<Message>,
    ) -> Result<QaOutput, PipelineError> {
        let output: QaOutput = invoker
            .complete_structured(SYSTEM_PROMPT, messages, QA_SHAPE)
            .await?;
        if output.files.is_empty() {
            return Err(PipelineError::generation("qa agent returned no tests", None));
        }
        Ok(output)
    }
}
