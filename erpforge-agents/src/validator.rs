use erpforge_types::{QaFinding, Severity};
use erpforge_workspace::GeneratedFile;
use regex::Regex;

/// Files larger than this are flagged as a structure smell
const MAX_FILE_BYTES: usize = 100 * 1024;

/// Deterministic checks over generated code, run alongside the QA agent.
///
/// Findings are advisory: they land in the QA report but never block the
/// run. The model's own review catches semantic problems; this catches
/// the cheap mechanical ones even when the model misses them.
pub struct StaticValidator {
    dynamic_eval: Regex,
    hardcoded_secret: Regex,
}

impl Default for StaticValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticValidator {
    pub fn new() -> Self {
        Self {
            // eval(...) / exec(...) as calls, not words inside identifiers
            dynamic_eval: Regex::new(r"\b(eval|exec)\s*\(").unwrap(),
            hardcoded_secret: Regex::new(
                r#"(?i)\b(password|secret|api_key|token)\s*=\s*["'][^"']+["']"#,
            )
            .unwrap(),
        }
    }

    pub fn validate_files(&self, files: &[GeneratedFile]) -> Vec<QaFinding> {
        let mut findings = Vec::new();
        for file in files {
            self.validate_file(file, &mut findings);
        }
        findings
    }

    fn validate_file(&self, file: &GeneratedFile, findings: &mut Vec<QaFinding>) {
        if file.content.trim().is_empty() {
            findings.push(QaFinding {
                file: file.path.clone(),
                issue: "file is empty".to_string(),
                severity: Severity::Warning,
            });
            return;
        }

        if file.content.len() > MAX_FILE_BYTES {
            findings.push(QaFinding {
                file: file.path.clone(),
                issue: format!(
                    "file is {} bytes; consider splitting it",
                    file.content.len()
                ),
                severity: Severity::Warning,
            });
        }

        if self.dynamic_eval.is_match(&file.content) {
            findings.push(QaFinding {
                file: file.path.clone(),
                issue: "uses eval/exec on dynamic input".to_string(),
                severity: Severity::Error,
            });
        }

        if self.hardcoded_secret.is_match(&file.content) {
            findings.push(QaFinding {
                file: file.path.clone(),
                issue: "hardcoded credential-like assignment".to_string(),
                severity: Severity::Error,
            });
        }

        // Python route/service files should carry some error handling
        if file.path.ends_with(".py")
            && file.path.contains("routers")
            && !file.content.contains("HTTPException")
            && !file.content.contains("try:")
        {
            findings.push(QaFinding {
                file: file.path.clone(),
                issue: "router has no error handling (no HTTPException or try block)".to_string(),
                severity: Severity::Info,
            });
        }
    }
}
