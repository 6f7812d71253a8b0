//! Document discovery and text extraction.
//!
//! PDFs yield one unit per page. Word documents yield one unit per body
//! paragraph, plain text and markdown one unit per blank-line separated
//! paragraph. Empty pages and paragraphs are dropped here; the rest keep
//! their original page or paragraph numbers.

use crate::types::{Locator, TextUnit};
use docqa_core::{AppError, AppResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Main part of a Word package.
const DOCX_DOCUMENT_PART: &str = "word/document.xml";

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
    Markdown,
}

impl DocumentKind {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::PlainText),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "text",
            Self::Markdown => "markdown",
        }
    }
}

/// Expand files and directories into the list of supported documents.
///
/// Files are kept as given, whatever their extension, so that unsupported
/// files can be reported. Directories are walked and only supported files
/// are collected, in sorted order.
pub fn collect_documents(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for path in paths {
        if path.is_file() {
            documents.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && DocumentKind::from_path(entry_path).is_some() {
                    documents.push(entry_path.to_path_buf());
                }
            }
        } else {
            return Err(AppError::Extraction(format!(
                "Path does not exist: {:?}",
                path
            )));
        }
    }

    tracing::debug!("Collected {} documents", documents.len());
    Ok(documents)
}

/// Extract the text units of one document.
pub fn extract_file(path: &Path) -> AppResult<Vec<TextUnit>> {
    let kind = DocumentKind::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        AppError::Extraction(format!(
            "Unsupported document type '{}' for {:?}. Supported: pdf, docx, txt, md",
            ext, path
        ))
    })?;

    let name = document_name(path);

    let units = match kind {
        DocumentKind::Pdf => {
            let bytes = fs::read(path)?;
            let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
                AppError::Extraction(format!("Failed to extract text from {:?}: {}", path, e))
            })?;
            page_units(&pages, &name)
        }
        DocumentKind::Docx => {
            let bytes = fs::read(path)?;
            let paragraphs = docx_paragraphs(&bytes).map_err(|e| {
                AppError::Extraction(format!("Failed to read {:?}: {}", path, e))
            })?;
            paragraph_units(&paragraphs, &name)
        }
        DocumentKind::PlainText | DocumentKind::Markdown => {
            let text = fs::read_to_string(path).map_err(|e| {
                AppError::Extraction(format!("Failed to read {:?}: {}", path, e))
            })?;
            split_sections(&text, &name)
        }
    };

    tracing::debug!(
        "Extracted {} units from {:?} ({})",
        units.len(),
        path,
        kind.as_str()
    );

    Ok(units)
}

/// File name used in citations.
fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// One unit per non-empty page, numbered by page position.
pub fn page_units(pages: &[String], source_document: &str) -> Vec<TextUnit> {
    pages
        .iter()
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| TextUnit::new(page.trim(), source_document, Locator::Page(i as u32 + 1)))
        .collect()
}

/// One unit per non-empty paragraph, numbered by paragraph position.
pub fn paragraph_units(paragraphs: &[String], source_document: &str) -> Vec<TextUnit> {
    paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.trim().is_empty())
        .map(|(i, p)| TextUnit::new(p.as_str(), source_document, Locator::Section(i as u32 + 1)))
        .collect()
}

/// Body paragraphs of a Word document, empty ones included.
///
/// Only `w:p` elements directly under `w:body` count; paragraphs nested in
/// tables or text boxes are not part of the numbering.
pub fn docx_paragraphs(bytes: &[u8]) -> AppResult<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::Extraction(format!("Not a Word document: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_DOCUMENT_PART)
        .map_err(|e| AppError::Extraction(format!("Missing {}: {}", DOCX_DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| AppError::Extraction(format!("Malformed {}: {}", DOCX_DOCUMENT_PART, e)))?;

        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if name == b"w:p" && parent_is(&stack, b"w:body") {
                    current = Some(String::new());
                }
                stack.push(name);
            }
            Event::End(e) => {
                stack.pop();
                if e.name().as_ref() == b"w:p" && parent_is(&stack, b"w:body") {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if parent_is(&stack, b"w:body") => paragraphs.push(String::new()),
                b"w:tab" => {
                    if let Some(text) = current.as_mut() {
                        text.push('\t');
                    }
                }
                b"w:br" | b"w:cr" => {
                    if let Some(text) = current.as_mut() {
                        text.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if let (true, Some(text)) = (parent_is(&stack, b"w:t"), current.as_mut()) {
                    let unescaped = t.unescape().map_err(|e| {
                        AppError::Extraction(format!("Malformed {}: {}", DOCX_DOCUMENT_PART, e))
                    })?;
                    text.push_str(&unescaped);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parent_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().map(Vec::as_slice) == Some(name)
}

/// Split plain text into paragraphs separated by blank lines.
///
/// Sections are numbered 1-based in paragraph order. Runs of blank lines
/// count as one break.
pub fn split_sections(text: &str, source_document: &str) -> Vec<TextUnit> {
    let normalized = text.replace("\r\n", "\n");
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
        .iter()
        .enumerate()
        .map(|(i, p)| TextUnit::new(p.trim(), source_document, Locator::Section(i as u32 + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_kind_detection() {
        assert_eq!(
            DocumentKind::from_path(Path::new("a/handbook.PDF")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("notes.md")),
            Some(DocumentKind::Markdown)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("notes.txt")),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("policy.DOCX")),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::from_path(Path::new("policy.doc")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_page_units_skip_empty_pages() {
        let pages = vec![
            "\n\nFirst page".to_string(),
            "   \n".to_string(),
            "Third page".to_string(),
        ];
        let units = page_units(&pages, "report.pdf");

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "First page");
        assert_eq!(units[0].locator, Locator::Page(1));
        assert_eq!(units[1].text, "Third page");
        assert_eq!(units[1].locator, Locator::Page(3));
        assert!(units.iter().all(|u| u.source_document == "report.pdf"));
    }

    /// A minimal uncompressed PDF with one Helvetica text line per page.
    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        let font_id = 3 + 2 * lines.len();
        let kids: Vec<String> = (0..lines.len()).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                lines.len()
            ),
        ];
        for (i, line) in lines.iter().enumerate() {
            let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", line);
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                font_id,
                4 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_at = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[test]
    fn test_extract_pdf_keeps_page_boundaries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("handbook.pdf");
        fs::write(&path, pdf_with_pages(&["Alpha page one text", "Beta page two text"])).unwrap();

        let units = extract_file(&path).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].locator, Locator::Page(1));
        assert!(units[0].text.contains("Alpha page one text"));
        assert!(!units[0].text.contains("Beta"));
        assert_eq!(units[1].locator, Locator::Page(2));
        assert!(units[1].text.contains("Beta page two text"));
        assert!(units.iter().all(|u| u.source_document == "handbook.pdf"));
    }

    /// A Word package holding only the main document part.
    fn docx_with_body(body: &str) -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file(DOCX_DOCUMENT_PART, options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs_by_body_position() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Leave policy</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t xml:space=\"preserve\">Staff accrue </w:t></w:r>\
             <w:r><w:t>leave &amp; sick days.</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell text</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>Name:</w:t><w:tab/><w:t>HR</w:t></w:r></w:p>\
             <w:sectPr/>",
        );

        let paragraphs = docx_paragraphs(&bytes).unwrap();
        assert_eq!(
            paragraphs,
            vec!["Leave policy", "", "Staff accrue leave & sick days.", "Name:\tHR"]
        );

        let units = paragraph_units(&paragraphs, "policy.docx");
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].locator, Locator::Section(1));
        assert_eq!(units[1].text, "Staff accrue leave & sick days.");
        assert_eq!(units[1].locator, Locator::Section(3));
        assert_eq!(units[2].locator, Locator::Section(4));
    }

    #[test]
    fn test_extract_docx_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("policy.docx");
        fs::write(
            &path,
            docx_with_body("<w:p><w:r><w:t>Remote work needs approval.</w:t></w:r></w:p>"),
        )
        .unwrap();

        let units = extract_file(&path).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "Remote work needs approval.");
        assert_eq!(units[0].source_document, "policy.docx");
        assert_eq!(units[0].locator, Locator::Section(1));
    }

    #[test]
    fn test_extract_corrupt_docx() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.docx");
        fs::write(&path, b"PK\x03\x04").unwrap();

        assert!(matches!(extract_file(&path), Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_split_sections() {
        let text = "# Leave policy\r\n\r\nStaff accrue leave monthly.\nLeave must be approved.\n\n\n\nSick leave needs a note.\n";
        let units = split_sections(text, "policy.md");

        assert_eq!(units.len(), 3);
        assert_eq!(units[0].text, "# Leave policy");
        assert_eq!(units[0].locator, Locator::Section(1));
        assert_eq!(
            units[1].text,
            "Staff accrue leave monthly.\nLeave must be approved."
        );
        assert_eq!(units[2].locator, Locator::Section(3));
    }

    #[test]
    fn test_split_sections_empty_document() {
        assert!(split_sections("", "empty.txt").is_empty());
        assert!(split_sections("\n  \n\t\n", "blank.txt").is_empty());
    }

    #[test]
    fn test_extract_text_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("guide.txt");
        fs::write(&path, "Intro paragraph.\n\nSecond paragraph.").unwrap();

        let units = extract_file(&path).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].source_document, "guide.txt");
        assert_eq!(units[1].locator, Locator::Section(2));
    }

    #[test]
    fn test_extract_unsupported_type() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("policy.rtf");
        fs::write(&path, b"{\\rtf1}").unwrap();

        let result = extract_file(&path);
        assert!(matches!(result, Err(AppError::Extraction(ref m)) if m.contains("rtf")));
    }

    #[test]
    fn test_collect_documents_walks_directories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(nested.join("a.md"), "a").unwrap();
        fs::write(temp.path().join("image.png"), "not text").unwrap();

        let docs = collect_documents(&[temp.path().to_path_buf()]).unwrap();
        let names: Vec<String> = docs.iter().map(|p| document_name(p)).collect();

        assert_eq!(names.len(), 2);
        assert!(names.contains(&"a.md".to_string()));
        assert!(names.contains(&"b.txt".to_string()));
    }

    #[test]
    fn test_collect_documents_missing_path() {
        let temp = TempDir::new().unwrap();
        let result = collect_documents(&[temp.path().join("missing.pdf")]);
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }
}
