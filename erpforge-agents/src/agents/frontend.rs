use erpforge_llm_sdk::types::Message;

use super::{FileBatch, FILE_BATCH_SHAPE};
use crate::error::PipelineError;
use crate::invoker::AgentInvoker;

const SYSTEM_PROMPT: &str = "You are an expert frontend developer specialized in building ERP user interfaces with HTML, Jinja2, TailwindCSS, and HTMX.

Your responsibilities:
1. Generate clean, responsive HTML templates
2. Use TailwindCSS for styling
3. Implement HTMX for dynamic interactions
4. Create forms, tables, and data displays
5. Ensure accessibility and user experience

Template structure:
- frontend/templates/base.html - Base layout with navigation
- frontend/templates/dashboard.html - Main dashboard
- frontend/templates/<module>_list.html - List views
- frontend/templates/<module>_form.html - Create/Edit forms
- frontend/templates/<module>_detail.html - Detail views

Generate production-ready, accessible, and user-friendly templates.";

const TASK_PROMPT: &str = r#"Generate the complete frontend for the PRD above.

Produce the base layout with navigation for every module, the dashboard, and list, form, and detail templates for each module, plus any shared components and static assets.

Respond with a single JSON object of this shape:
{"files": [{"path": "frontend/templates/base.html", "content": "..."}]}

Every path must be relative to the project root and start with "frontend/".
Generate ONLY the JSON, no additional text."#;

/// Generates the template-based frontend as one structured file batch
pub struct FrontendAgent;

impl FrontendAgent {
    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn task_instruction(&self) -> &'static str {
        TASK_PROMPT
    }

    pub async fn generate(
        &self,
        invoker: &AgentInvoker,
        messages: Vec<Message>,
    ) -> Result<FileBatch, PipelineError> {
        let batch: FileBatch = invoker
            .complete_structured(SYSTEM_PROMPT, messages, FILE_BATCH_SHAPE)
            .await?;
        if batch.files.is_empty() {
            return Err(PipelineError::generation(
                "frontend agent returned no files",
                None,
            ));
        }
        Ok(batch)
    }
}
