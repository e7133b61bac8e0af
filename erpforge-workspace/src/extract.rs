use std::io::Write;
use std::process::Command;

use crate::error::WorkspaceError;

/// Extract plain text from an uploaded document.
///
/// Text formats are decoded as UTF-8 (lossily, uploads are not always
/// clean). PDFs are handed to the `pdftotext` binary.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, WorkspaceError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "md" | "markdown" | "csv" => Ok(String::from_utf8_lossy(bytes).into_owned()),
        "pdf" => extract_pdf(bytes),
        _ => Err(WorkspaceError::UnsupportedFormat { extension }),
    }
}

/// Run pdftotext over the uploaded bytes, capturing stdout
fn extract_pdf(bytes: &[u8]) -> Result<String, WorkspaceError> {
    let mut temp = tempfile::NamedTempFile::new()
        .map_err(|e| WorkspaceError::extraction(format!("Failed to create temp file: {}", e)))?;
    temp.write_all(bytes)
        .map_err(|e| WorkspaceError::extraction(format!("Failed to write temp file: {}", e)))?;

    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-nopgbrk")
        .arg(temp.path())
        .arg("-")
        .output()
        .map_err(|e| {
            WorkspaceError::extraction(format!(
                "Failed to execute pdftotext command. Is pdftotext installed? Error: {}",
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WorkspaceError::extraction(format!(
            "pdftotext command failed: {}",
            stderr
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_text() {
        let text = extract_text("requirements.txt", b"3 warehouse locations").unwrap();
        assert_eq!(text, "3 warehouse locations");
    }

    #[test]
    fn extracts_markdown() {
        let text = extract_text("NOTES.md", b"# Heading\nbody").unwrap();
        assert!(text.contains("Heading"));
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert!(extract_text("README.MD", b"hi").is_ok());
    }

    #[test]
    fn rejects_unknown_formats() {
        let err = extract_text("photo.png", &[0u8; 4]).unwrap_err();
        assert!(matches!(err, WorkspaceError::UnsupportedFormat { .. }));
    }
}
