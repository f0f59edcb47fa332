//! Selection classification.
//!
//! Turns the raw editor state (selected text, caret, line text) into a
//! [`Selection`]: the identifier to look for and, when a call operator is
//! adjacent, the receiver expression it belongs to.
//!
//! | Line                       | Selected | Text     | Object      | Method call |
//! |----------------------------|----------|----------|-------------|-------------|
//! | `$this->save();`           | `save`   | `save`   | `$this`     | yes         |
//! | `$user = $repo->find(1);`  | `find`   | `find`   | `$repo`     | yes         |
//! | `parent::boot();`          | `boot`   | `boot`   | `parent`    | yes         |
//! | `var x = api.fetch();`     | `fetch`  | `fetch`  | `api`       | yes         |
//! | `$repo->find(1);`          | `repo`   | `repo`   | `$repo`     | no          |
//! | `new Invoice();`           | `Invoice`| `Invoice`| none        | no          |
//!
//! Operators are tried in the order the language declares them; the first
//! one adjacent to the selection wins.

use crate::error::NavigationError;
use crate::host::Editor;
use crate::types::{Selection, TextRange};
use crate::util::char_slice;

/// Characters that end a receiver expression when scanning backwards.
const RECEIVER_DELIMITERS: &[char] = &['(', '[', '{', ',', ';', '!', '&', '|'];

/// Read the selection from `editor` and classify it.
///
/// Multi-line selections are rejected.  An empty selection expands to the
/// word under the caret.
pub fn analyze_editor(editor: &dyn Editor, operators: &[String]) -> Result<Selection, NavigationError> {
    let mut range = editor.selection();
    if !range.is_single_line() {
        return Err(NavigationError::SelectionInvalid);
    }

    let line = editor.line_text(range.start.line).unwrap_or_default();

    let mut text = editor.selected_text();
    if text.is_empty() {
        range = editor
            .select_word_at(range.start)
            .ok_or(NavigationError::EmptySelection)?;
        text = range_text(&line, range);
    }
    if text.trim().is_empty() {
        return Err(NavigationError::EmptySelection);
    }

    let (start, end) = ordered_columns(range);
    tracing::debug!("analyzing selection `{}` at {}:{}", text, range.start.line, start);
    Ok(analyze(&line, start, end, operators))
}

fn ordered_columns(range: TextRange) -> (usize, usize) {
    let a = range.start.character as usize;
    let b = range.end.character as usize;
    (a.min(b), a.max(b))
}

fn range_text(line: &str, range: TextRange) -> String {
    let (start, end) = ordered_columns(range);
    char_slice(line, start, end)
}

/// Classify the selection spanning char columns `[start, end)` of `line`.
pub fn analyze(line: &str, start: usize, end: usize, operators: &[String]) -> Selection {
    let chars: Vec<char> = line.chars().collect();
    let end = end.min(chars.len());
    let start = start.min(end);

    let text: String = chars[start..end].iter().collect();
    let before: String = chars[..start].iter().collect();
    let after: String = chars[end..].iter().collect();

    for op in operators {
        // `$obj->method`: the selection is the method, the receiver sits
        // in front of the operator.
        if let Some(prefix) = before.strip_suffix(op.as_str()) {
            let receiver = extract_receiver(prefix);
            return Selection {
                text,
                object: (!receiver.is_empty()).then_some(receiver),
                is_method_call: true,
            };
        }

        // `$obj->`: the selection is itself the receiver.
        if after.starts_with(op.as_str()) {
            let through_selection: String = chars[..end].iter().collect();
            let receiver = extract_receiver(&through_selection);
            return Selection {
                text,
                object: (!receiver.is_empty()).then_some(receiver),
                is_method_call: false,
            };
        }
    }

    Selection::bare(text)
}

/// Extract the receiver expression ending at the end of `prefix`.
///
/// Text after the last `=` is preferred so declaration keywords
/// (`var x = api.`) are skipped; otherwise the text after the last space.
/// Opening brackets and argument separators also end the receiver, and a
/// trailing nullsafe `?` is dropped.
pub fn extract_receiver(prefix: &str) -> String {
    let prefix = prefix.trim_end();
    // `=>` in array literals counts as an assignment too.
    let after_assignment = prefix
        .rsplit('=')
        .next()
        .unwrap_or(prefix)
        .trim_start_matches('>');
    let receiver = after_assignment
        .rsplit(|c: char| c.is_whitespace() || RECEIVER_DELIMITERS.contains(&c))
        .next()
        .unwrap_or_default();
    receiver.trim_end_matches('?').to_string()
}
