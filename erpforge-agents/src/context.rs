use erpforge_llm_sdk::types::Message;
use erpforge_types::{ChatMessage, Chunk, MessageRole, Prd, Project};

/// Default number of recent conversation turns included verbatim
pub const DEFAULT_MAX_TURNS: usize = 20;
/// Default character budget for the assembled context
pub const DEFAULT_CHAR_BUDGET: usize = 24_000;

/// Builds the bounded prompt payload for an agent call.
///
/// The context is project metadata (plus PRD when present), then the
/// retrieved document chunks, then the most recent conversation turns in
/// chronological order. The character budget is enforced by dropping the
/// oldest turns first; retrieved chunks are never truncated once selected.
pub struct ContextAssembler {
    max_turns: usize,
    char_budget: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            char_budget: DEFAULT_CHAR_BUDGET,
        }
    }
}

impl ContextAssembler {
    pub fn new(max_turns: usize, char_budget: usize) -> Self {
        Self {
            max_turns,
            char_budget,
        }
    }

    /// Assemble the message list for one agent invocation. `trigger` is the
    /// trigger-specific payload (the user's message, a PRD-generation
    /// instruction, an agent task) and always forms the final user turn.
    pub fn assemble(
        &self,
        project: &Project,
        prd: Option<&Prd>,
        history: &[ChatMessage],
        chunks: &[Chunk],
        trigger: &str,
    ) -> Vec<Message> {
        let preamble = self.preamble(project, prd, chunks);

        // Fixed parts come out of the budget first; turns fill what is left.
        let fixed_len = preamble.as_deref().map_or(0, str::len) + trigger.len();
        let turn_budget = self.char_budget.saturating_sub(fixed_len);

        let recent: Vec<&ChatMessage> = history
            .iter()
            .rev()
            .take(self.max_turns)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        // Drop oldest turns until the remainder fits.
        let mut used = 0usize;
        let mut keep_from = recent.len();
        for (i, turn) in recent.iter().enumerate().rev() {
            if used + turn.content.len() > turn_budget {
                break;
            }
            used += turn.content.len();
            keep_from = i;
        }

        let mut messages = Vec::new();
        if let Some(text) = preamble {
            messages.push(Message::user(text));
            // Keep user/assistant alternation plausible for the provider
            messages.push(Message::assistant(
                "Understood. I have the project context.",
            ));
        }

        for turn in &recent[keep_from..] {
            let message = match turn.role {
                MessageRole::Assistant => Message::assistant(turn.content.clone()),
                MessageRole::User | MessageRole::System => Message::user(turn.content.clone()),
            };
            messages.push(message);
        }

        messages.push(Message::user(trigger.to_string()));
        messages
    }

    /// Project metadata + PRD + retrieved chunks. None when there is
    /// nothing beyond the bare name to say.
    fn preamble(&self, project: &Project, prd: Option<&Prd>, chunks: &[Chunk]) -> Option<String> {
        if project.description.is_empty() && prd.is_none() && chunks.is_empty() {
            return None;
        }

        let mut sections = Vec::new();

        let mut meta = format!("Project: {}", project.name);
        if !project.description.is_empty() {
            meta.push_str(&format!("\nDescription: {}", project.description));
        }
        sections.push(meta);

        if let Some(prd) = prd {
            if let Ok(json) = serde_json::to_string_pretty(prd) {
                sections.push(format!("Current PRD:\n{}", json));
            }
        }

        if !chunks.is_empty() {
            let excerpts = chunks
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join("\n---\n");
            sections.push(format!("Context from uploaded documents:\n{}", excerpts));
        }

        Some(sections.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erpforge_types::{ChatMessage, MessageRole, Project};
    use uuid::Uuid;

    fn turn(project_id: Uuid, role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage::new(project_id, role, content)
    }

    fn chunk(text: &str) -> Chunk {
        Chunk {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            seq: 0,
            text: text.to_string(),
            embedding: vec![],
        }
    }

    #[test]
    fn trigger_is_always_the_final_turn() {
        let project = Project::new("inv", "");
        let assembler = ContextAssembler::default();
        let messages = assembler.assemble(&project, None, &[], &[], "generate the PRD");
        let last = messages.last().unwrap();
        assert_eq!(last.content[0].as_text(), "generate the PRD");
    }

    #[test]
    fn history_is_chronological() {
        let project = Project::new("inv", "");
        let id = project.id;
        let history = vec![
            turn(id, MessageRole::User, "first"),
            turn(id, MessageRole::Assistant, "second"),
            turn(id, MessageRole::User, "third"),
        ];

        let assembler = ContextAssembler::default();
        let messages = assembler.assemble(&project, None, &history, &[], "go");
        let texts: Vec<&str> = messages
            .iter()
            .map(|m| m.content[0].as_text())
            .collect();

        let first = texts.iter().position(|t| *t == "first").unwrap();
        let second = texts.iter().position(|t| *t == "second").unwrap();
        let third = texts.iter().position(|t| *t == "third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn oldest_turns_are_dropped_first() {
        let project = Project::new("inv", "");
        let id = project.id;
        let history = vec![
            turn(id, MessageRole::User, &"old ".repeat(100)),
            turn(id, MessageRole::Assistant, "recent answer"),
            turn(id, MessageRole::User, "recent question"),
        ];

        // Budget only fits the recent turns
        let assembler = ContextAssembler::new(20, 300);
        let messages = assembler.assemble(&project, None, &history, &[], "go");
        let joined: String = messages
            .iter()
            .map(|m| m.content[0].as_text())
            .collect::<Vec<_>>()
            .join("|");

        assert!(!joined.contains("old old"));
        assert!(joined.contains("recent answer"));
        assert!(joined.contains("recent question"));
    }

    #[test]
    fn chunks_are_never_truncated() {
        let project = Project::new("inv", "");
        let big_chunk = "warehouse ".repeat(200);
        let chunks = vec![chunk(&big_chunk)];

        // Budget smaller than the chunk itself; the chunk still survives whole
        let assembler = ContextAssembler::new(20, 100);
        let messages = assembler.assemble(&project, None, &[], &chunks, "go");
        let joined: String = messages
            .iter()
            .map(|m| m.content[0].as_text())
            .collect::<Vec<_>>()
            .join("|");
        assert!(joined.contains(big_chunk.trim()));
    }

    #[test]
    fn empty_retrieval_is_not_an_error() {
        let project = Project::new("inv", "desc");
        let assembler = ContextAssembler::default();
        let messages = assembler.assemble(&project, None, &[], &[], "hello");
        assert!(messages.len() >= 2);
        let joined: String = messages
            .iter()
            .map(|m| m.content[0].as_text())
            .collect::<Vec<_>>()
            .join("|");
        assert!(!joined.contains("uploaded documents"));
    }

    #[test]
    fn bare_project_gets_no_preamble() {
        let project = Project::new("inv", "");
        let assembler = ContextAssembler::default();
        let messages = assembler.assemble(&project, None, &[], &[], "hello");

        // Just the trigger: no metadata turn, no acknowledgement turn
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content[0].as_text(), "hello");
    }

    #[test]
    fn prd_appears_in_preamble_when_present() {
        let mut project = Project::new("inv", "");
        project.record_message();
        let prd = Prd {
            project_name: "Inventory".into(),
            overview: String::new(),
            modules: vec![],
            entities: vec![],
            roles: vec![],
            workflows: vec![],
        };

        let assembler = ContextAssembler::default();
        let messages = assembler.assemble(&project, Some(&prd), &[], &[], "go");
        let joined: String = messages
            .iter()
            .map(|m| m.content[0].as_text())
            .collect::<Vec<_>>()
            .join("|");
        assert!(joined.contains("Current PRD"));
        assert!(joined.contains("Inventory"));
    }
}
