//! Provides the `first_and_rest` function, which returns the parsed first
//! operand and an iterator over the remaining operands. The first operand
//! also decides the output's layout (Byte Order Mark and line terminator).
use encoding_rs_io::DecodeReaderBytesBuilder;
use memchr::memchr;
use std::{
    fs,
    fs::File,
    io::Read,
    path::PathBuf,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::format::Layout;
use crate::opcode::OpcodeTable;
use crate::parse::{parse, Parsed};

/// A rule file's name, its parsed contents, and its layout
#[derive(Debug, Clone)]
pub struct RuleFile {
    path_display: String,
    parsed: Parsed,
    layout: Layout,
}

impl RuleFile {
    /// Parses `text` as hashcat rules. A leading Byte Order Mark is noted in
    /// the layout and skipped.
    #[must_use]
    pub fn from_text(path_display: impl Into<String>, text: &str) -> Self {
        let layout = layout_of(text);
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        let parsed = parse(text, OpcodeTable::hashcat());
        RuleFile { path_display: path_display.into(), parsed, layout }
    }

    /// The file's path, formatted for messages
    #[must_use]
    pub fn path_display(&self) -> &str {
        &self.path_display
    }

    /// The file's programs and diagnostics
    #[must_use]
    pub fn parsed(&self) -> &Parsed {
        &self.parsed
    }

    /// Byte Order Mark and line terminator of the file
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Logs each diagnostic as a warning, and returns how many there were.
    pub fn report(&self) -> usize {
        let Parsed { programs, diagnostics } = &self.parsed;
        for diagnostic in diagnostics {
            warn!("{}: {diagnostic}", self.path_display);
        }
        debug!(
            "{}: {} rules, {} skipped with problems",
            self.path_display,
            programs.len(),
            diagnostics.len()
        );
        diagnostics.len()
    }
}

/// Return the first file named in `files`, parsed, and an iterator over the
/// subsequent files. Every file is opened before anything is parsed, so a
/// missing file is reported before any work is done.
pub fn first_and_rest(files: &[PathBuf]) -> Result<Option<(RuleFile, Remaining<File>)>> {
    match files {
        [] => Ok(None),
        [first, rest @ ..] => {
            let path = format!("{}", first.display());
            let bytes = fs::read(first)
                .map_err(|source| Error::UnreadableFile { path: path.clone(), source })?;
            let text = String::from_utf8(decode_if_utf16(bytes))
                .map_err(|source| Error::InvalidEncoding { path: path.clone(), source })?;
            let remaining = Remaining::from_paths(rest.to_vec())?;
            Ok(Some((RuleFile::from_text(path, &text), remaining)))
        }
    }
}

/// Decode UTF-16 to UTF-8 if we see a UTF-16 Byte Order Mark at the beginning of `candidate`.
/// Otherwise return `candidate` unchanged
fn decode_if_utf16(candidate: Vec<u8>) -> Vec<u8> {
    // "without BOM handling" means that the UTF-16 BOM is translated to a UTF-8 BOM,
    // so the output layout still remembers it
    if let Some((enc, _)) = encoding_rs::Encoding::for_bom(&candidate) {
        if [encoding_rs::UTF_16LE, encoding_rs::UTF_16BE].contains(&enc) {
            let (translated, _had_malformed_sequences) =
                enc.decode_without_bom_handling(&candidate);
            return translated.into_owned().into_bytes();
        }
    }
    return candidate;
}

/// Returns the `Layout` of `text`: whether it begins with a Byte Order
/// Mark, and whether its first line ends with `\r\n` rather than `\n`.
fn layout_of(text: &str) -> Layout {
    let bytes = text.as_bytes();
    let mut layout = Layout { bom: text.starts_with('\u{FEFF}'), ..Layout::default() };
    if let Some(n) = memchr(b'\n', bytes) {
        if n > 0 && bytes[n - 1] == b'\r' {
            layout.line_terminator = "\r\n";
        }
    }
    layout
}

/// The first operand is read and parsed right away. The `Remaining`
/// structure is an iterator over the other operands, parsing each one only
/// when it's needed.
///
/// * `T` - The type of the data being read
pub struct Remaining<T: Read> {
    files: std::vec::IntoIter<(String, T)>,
}

impl<T: Read> From<Vec<(String, T)>> for Remaining<T> {
    fn from(files: Vec<(String, T)>) -> Self {
        Remaining { files: files.into_iter() }
    }
}

impl Remaining<File> {
    /// Create a `Remaining` from the list of paths to the remaining files
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Remaining<File>> {
        let mut files: Vec<(String, File)> = Vec::new();
        for path in paths {
            let path_display = format!("{}", path.display());
            match File::open(path) {
                Ok(file) => files.push((path_display, file)),
                Err(source) => return Err(Error::UnreadableFile { path: path_display, source }),
            }
        }
        Ok(Remaining::from(files))
    }
}

impl<T: Read> Iterator for Remaining<T> {
    type Item = Result<RuleFile>;

    fn next(&mut self) -> Option<Self::Item> {
        self.files.next().map(|(path_display, file)| {
            let mut reader = DecodeReaderBytesBuilder::new()
                .bom_sniffing(true) // Look at the BOM to detect UTF-16 files and convert to UTF-8
                .strip_bom(true) // Remove the BOM before sending data to us
                .utf8_passthru(true) // Don't transcode BOM-less input; we check it below
                .build(file);
            let mut bytes = Vec::new();
            if let Err(source) = reader.read_to_end(&mut bytes) {
                return Err(Error::UnreadableFile { path: path_display, source });
            }
            match String::from_utf8(bytes) {
                Ok(text) => Ok(RuleFile::from_text(path_display, &text)),
                Err(source) => Err(Error::InvalidEncoding { path: path_display, source }),
            }
        })
    }
}
