use serde::{Deserialize, Serialize};

/// Structured Product Requirements Document generated by the PM agent.
///
/// This is the contract the PM agent's structured output is validated
/// against and the input handed to the code-generation agents. Generated
/// once per explicit trigger; regeneration overwrites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prd {
    pub project_name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub modules: Vec<PrdModule>,
    #[serde(default)]
    pub entities: Vec<PrdEntity>,
    #[serde(default)]
    pub roles: Vec<PrdRole>,
    #[serde(default)]
    pub workflows: Vec<PrdWorkflow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdModule {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdEntity {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<PrdField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdRole {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdWorkflow {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl Prd {
    /// Markdown rendering written to the workspace as `PRD.md` whenever a
    /// PRD is stored, so the generated document is browsable alongside the
    /// generated code.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Product Requirements Document\n\n");
        out.push_str(&format!("## {}\n\n{}\n\n", self.project_name, self.overview));

        out.push_str("## Modules\n\n");
        for module in &self.modules {
            out.push_str(&format!("### {}\n\n{}\n\n", module.name, module.description));
            for feature in &module.features {
                out.push_str(&format!("- {}\n", feature));
            }
            out.push('\n');
        }

        out.push_str("## Entities\n\n");
        for entity in &self.entities {
            out.push_str(&format!("### {}\n\n", entity.name));
            for field in &entity.fields {
                let required = if field.required { " (required)" } else { "" };
                out.push_str(&format!("- {}: {}{}\n", field.name, field.field_type, required));
            }
            out.push('\n');
        }

        out.push_str("## Roles\n\n");
        for role in &self.roles {
            out.push_str(&format!(
                "- {}: {}\n",
                role.name,
                role.permissions.join(", ")
            ));
        }

        out.push_str("\n## Workflows\n\n");
        for workflow in &self.workflows {
            out.push_str(&format!("### {}\n\n", workflow.name));
            for (i, step) in workflow.steps.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, step));
            }
            out.push('\n');
        }

        out
    }
}
