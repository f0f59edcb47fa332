/// Small text and file-name helpers used by several modules.
use std::ffi::OsStr;
use std::path::Path;

/// Whether `c` can be part of an identifier.
pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Find the identifier surrounding character column `col` of `line`.
///
/// A caret sitting directly after a word still selects that word.
/// Returns `(start, end)` as char columns, or `None` on whitespace or
/// punctuation.
pub fn word_bounds(line: &str, col: usize) -> Option<(usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    if col > chars.len() {
        return None;
    }

    let mut start = col;
    let mut end = col;

    while start > 0 && is_identifier_char(chars[start - 1]) {
        start -= 1;
    }
    while end < chars.len() && is_identifier_char(chars[end]) {
        end += 1;
    }

    (start < end).then_some((start, end))
}

/// Convert an LSP column (UTF-16 code units) into a char column of `line`.
///
/// Columns past the end of the line clamp to the line length.
pub fn utf16_to_char_column(line: &str, utf16: u32) -> u32 {
    let mut units = 0u32;
    for (index, c) in line.chars().enumerate() {
        if units >= utf16 {
            return index as u32;
        }
        units += c.len_utf16() as u32;
    }
    line.chars().count() as u32
}

/// Take the `[start, end)` char range of `line`.
pub(crate) fn char_slice(line: &str, start: usize, end: usize) -> String {
    line.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Compare two file names the way the editor does: exact apart from case.
pub fn filenames_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Whether the last component of `path` matches `file_name`.
pub fn path_has_file_name(path: &Path, file_name: &str) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| filenames_match(name, file_name))
}

/// Build the file name a class is expected to live in: the class name plus
/// the extension of the document it was referenced from.
pub fn file_name_for(name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{}.{}", name, ext),
        _ => name.to_string(),
    }
}

/// Strip a leading `\` and any namespace qualifier from a class name.
///
/// `\App\Models\User` becomes `User`; plain names pass through unchanged.
pub fn short_class_name(name: &str) -> &str {
    let name = name.strip_prefix('\\').unwrap_or(name);
    name.rsplit('\\').next().unwrap_or(name)
}
