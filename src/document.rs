//! Plain-text document parsing
//!
//! Turns a file (or in-memory text) into a [`ParsedDocument`]: the raw
//! content, the formatted content, and metadata describing both. Only plain
//! text is decoded here; PDF and Word files are recognised but need an
//! external decoder.

use crate::analysis::{FormatMetadata, analyze_text_format};
use crate::engine::format_text;
use crate::error::FormatError;
use crate::language::{Language, LanguageHint, detect_language};
use crate::options::FormatOptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Threshold for using memory-mapped I/O (1MB)
const MMAP_THRESHOLD: u64 = 1024 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Extensions a document may carry
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "pdf", "doc", "docx"];

/// Supported document kinds, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Txt,
    Pdf,
    Doc,
    Docx,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_extension)
    }

    /// Whether this crate can decode the file into text itself
    pub fn is_plain_text(self) -> bool {
        matches!(self, Self::Txt)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Txt => write!(f, "txt"),
            Self::Pdf => write!(f, "pdf"),
            Self::Doc => write!(f, "doc"),
            Self::Docx => write!(f, "docx"),
        }
    }
}

/// Descriptive data about a parsed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub file_name: String,
    pub file_type: FileType,
    /// Size of the source in bytes
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    pub encoding: String,
    pub language: Language,
    pub format_metadata: FormatMetadata,
}

/// A decoded and formatted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub content: String,
    pub formatted_content: String,
    pub metadata: DocumentMetadata,
}

/// Errors that can occur while parsing a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Failed to read the file
    #[error("Failed to read {}: {source}", path.display())]
    Io { source: io::Error, path: PathBuf },

    /// The extension is missing or not one of the accepted ones
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// A known format that needs an external decoder
    #[error("No decoder available for {0} files; extract the text first")]
    DecoderUnavailable(FileType),

    /// Formatting failed with the given options
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Read and format the document at `path`
pub fn parse_file(path: &Path, options: &FormatOptions) -> Result<ParsedDocument, DocumentError> {
    let file_type = FileType::from_path(path).ok_or_else(|| {
        DocumentError::UnsupportedFileType(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        )
    })?;

    if !file_type.is_plain_text() {
        return Err(DocumentError::DecoderUnavailable(file_type));
    }

    let content = read_text_file(path)?;
    let fs_meta = fs::metadata(path).ok();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut document = parse_text(&file_name, &content, options)?;
    if let Some(fs_meta) = fs_meta {
        document.metadata.file_size = fs_meta.len();
        document.metadata.last_modified = fs_meta.modified().ok().map(DateTime::<Utc>::from);
    }
    Ok(document)
}

/// Read a file as text regardless of its extension
///
/// Large files are memory-mapped. A UTF-8 BOM is dropped and invalid
/// sequences are replaced with U+FFFD.
pub fn read_text_file(path: &Path) -> Result<String, DocumentError> {
    let io_err = |source| DocumentError::Io {
        source,
        path: path.to_path_buf(),
    };
    let file_size = fs::metadata(path).map_err(io_err)?.len();
    let bytes = read_bytes(path, file_size).map_err(io_err)?;
    Ok(decode_utf8(&bytes))
}

/// Format in-memory plain text as if it came from a file called `file_name`
///
/// The language is detected from the raw content and used for formatting
/// unless `options` carry an explicit hint.
pub fn parse_text(file_name: &str, content: &str, options: &FormatOptions) -> Result<ParsedDocument, FormatError> {
    let language = detect_language(content);
    let effective = match options.language_hint {
        LanguageHint::Auto => options.with_language_hint(language),
        LanguageHint::Language(_) => *options,
    };

    let formatted_content = format_text(content, &effective)?;
    let format_metadata = analyze_text_format(&formatted_content);
    log::debug!(
        "Parsed {file_name}: {} paragraph(s), language {language}",
        format_metadata.paragraph_count
    );

    Ok(ParsedDocument {
        content: content.to_string(),
        formatted_content,
        metadata: DocumentMetadata {
            file_name: file_name.to_string(),
            file_type: FileType::Txt,
            file_size: content.len() as u64,
            last_modified: None,
            encoding: "utf-8".to_string(),
            language,
            format_metadata,
        },
    })
}

/// Decode UTF-8, dropping a leading BOM and replacing invalid sequences with U+FFFD
pub fn decode_utf8(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(not(target_arch = "wasm32"))]
fn read_bytes(path: &Path, file_size: u64) -> io::Result<Vec<u8>> {
    if file_size > MMAP_THRESHOLD {
        // Use memory mapping for large files
        let file = fs::File::open(path)?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Ok(mmap.to_vec())
    } else {
        fs::read(path)
    }
}

#[cfg(target_arch = "wasm32")]
fn read_bytes(path: &Path, _file_size: u64) -> io::Result<Vec<u8>> {
    fs::read(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(FileType::from_path(Path::new("notes.TXT")), Some(FileType::Txt));
        assert_eq!(FileType::from_path(Path::new("a/b/report.docx")), Some(FileType::Docx));
        assert_eq!(FileType::from_path(Path::new("scan.pdf")), Some(FileType::Pdf));
        assert_eq!(FileType::from_path(Path::new("image.png")), None);
        assert_eq!(FileType::from_path(Path::new("README")), None);
        for ext in ACCEPTED_EXTENSIONS {
            assert!(FileType::from_extension(ext).is_some());
        }
    }

    #[test]
    fn test_decode_strips_bom_and_replaces_invalid() {
        assert_eq!(decode_utf8(b"\xEF\xBB\xBFhello"), "hello");
        assert_eq!(decode_utf8(b"bad \xFF byte"), "bad \u{FFFD} byte");
    }

    #[test]
    fn test_parse_text_uses_detected_language() {
        let doc = parse_text("memo.txt", "Tôi   sẽ được   khen.", &FormatOptions::default()).unwrap();
        assert_eq!(doc.metadata.language, Language::Vietnamese);
        assert_eq!(doc.formatted_content, "Tôi sẽ được khen.");
        assert_eq!(doc.metadata.format_metadata.sentence_count, 1);
        assert_eq!(doc.metadata.encoding, "utf-8");
        assert_eq!(doc.metadata.file_type, FileType::Txt);
    }

    #[test]
    fn test_parse_text_respects_explicit_hint() {
        let options = FormatOptions::default().with_line_width(11).with_language_hint(Language::English);
        let doc = parse_text("memo.txt", "anh ấy sẽ được khen", &options).unwrap();
        // Metadata still reports what was detected
        assert_eq!(doc.metadata.language, Language::Vietnamese);
        assert_eq!(doc.formatted_content, "anh ấy sẽ\nđược khen");
    }

    #[test]
    fn test_parse_file_reads_plain_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "\u{FEFF}Hello   world.\r\n\r\n\r\nSecond paragraph.").unwrap();

        let doc = parse_file(file.path(), &FormatOptions::default()).unwrap();
        assert_eq!(doc.content, "Hello   world.\r\n\r\n\r\nSecond paragraph.");
        assert_eq!(doc.formatted_content, "Hello world.\n\nSecond paragraph.");
        assert_eq!(doc.metadata.format_metadata.paragraph_count, 2);
        assert!(doc.metadata.file_size > 0);
        assert!(doc.metadata.last_modified.is_some());
    }

    #[test]
    fn test_parse_file_rejects_binary_formats() {
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        assert!(matches!(
            parse_file(file.path(), &FormatOptions::default()),
            Err(DocumentError::DecoderUnavailable(FileType::Pdf))
        ));

        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        assert!(matches!(
            parse_file(file.path(), &FormatOptions::default()),
            Err(DocumentError::UnsupportedFileType(ext)) if ext == "png"
        ));
    }

    #[test]
    fn test_read_text_file_ignores_extension() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "# notes").unwrap();
        assert_eq!(read_text_file(file.path()).unwrap(), "# notes");
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file(Path::new("/definitely/not/here.txt"), &FormatOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
