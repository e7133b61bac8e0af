use erpforge_llm_sdk::types::Message;
use erpforge_types::Prd;

use crate::error::PipelineError;
use crate::invoker::AgentInvoker;

const SYSTEM_PROMPT: &str = "You are an expert ERP Project Manager specialized in gathering requirements for ERP systems.

Your responsibilities:
1. Ask clarifying questions about ERP modules, business processes, user roles, and data entities
2. Focus ONLY on ERP-related systems (Inventory, Sales, HR, Finance, Manufacturing, etc.)
3. Gather complete requirements before generating PRD
4. Generate a comprehensive Product Requirements Document (PRD)

Key areas to explore:
- Business modules needed (e.g., Inventory Management, Order Processing, HR Management)
- User roles and permissions
- Database entities and relationships
- Business workflows and processes
- Reporting and analytics needs
- Integration requirements

Always ask one or two questions at a time. Be conversational but professional.
When the user confirms requirements are complete, generate a structured PRD.";

const PRD_PROMPT: &str = r#"Based on our conversation, generate a comprehensive Product Requirements Document (PRD) for this ERP system.

Format the PRD as a JSON object with the following structure:
{
  "project_name": "string",
  "overview": "string - brief description",
  "modules": [
    {
      "name": "string",
      "description": "string",
      "features": ["list of features"]
    }
  ],
  "entities": [
    {
      "name": "string",
      "description": "string",
      "fields": [
        {
          "name": "string",
          "type": "string (e.g., string, integer, date, foreign_key)",
          "required": boolean
        }
      ]
    }
  ],
  "roles": [
    {
      "name": "string",
      "permissions": ["list of permissions"]
    }
  ],
  "workflows": [
    {
      "name": "string",
      "steps": ["list of steps"]
    }
  ]
}

Generate ONLY the JSON, no additional text."#;

const PRD_SHAPE: &str = r#"{"project_name": string, "overview": string, "modules": [...], "entities": [...], "roles": [...], "workflows": [...]}"#;

/// Phrases in a user message that signal the conversation is ready for
/// PRD generation
const PRD_KEYWORDS: &[&str] = &[
    "generate prd",
    "create prd",
    "finalize requirements",
    "ready to generate",
];

/// Requirements-gathering agent. Converses freely and, on request,
/// distills the conversation into a structured PRD.
pub struct PmAgent;

impl PmAgent {
    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    /// The trigger payload for PRD generation; the conversation itself
    /// comes in through the assembled context.
    pub fn prd_instruction(&self) -> &'static str {
        PRD_PROMPT
    }

    /// Whether the user's message is asking for the PRD. A hint for the
    /// caller, never a state transition by itself.
    pub fn prd_requested(&self, user_message: &str) -> bool {
        let lower = user_message.to_lowercase();
        PRD_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    /// One conversational turn
    pub async fn chat(
        &self,
        invoker: &AgentInvoker,
        messages: Vec<Message>,
    ) -> Result<String, PipelineError> {
        invoker.complete_text(SYSTEM_PROMPT, messages).await
    }

    /// Distill the conversation into a PRD
    pub async fn generate_prd(
        &self,
        invoker: &AgentInvoker,
        messages: Vec<Message>,
    ) -> Result<Prd, PipelineError> {
        invoker
            .complete_structured(SYSTEM_PROMPT, messages, PRD_SHAPE)
            .await
    }
}
