#![forbid(unsafe_code)]

//! Line-level rewriting of one `work_items` entry.
//!
//! The document is never re-serialized as a whole. Entries and their keys are
//! located by indentation, and only the lines belonging to updated keys are
//! replaced, so comments, quoting and key order elsewhere survive untouched.

use super::{FieldUpdates, FieldValue, UpdateField};
use crate::StoreError;
use serde_yaml::{Mapping, Value};

#[derive(Debug, PartialEq, Eq)]
struct EntrySpan {
    start: usize,
    /// One past the entry's last non-blank, non-comment line.
    end: usize,
    key_col: usize,
}

#[derive(Debug, PartialEq, Eq)]
struct FieldSpan<'a> {
    key: &'a str,
    start: usize,
    end: usize,
}

struct Edit {
    start: usize,
    end: usize,
    lines: Vec<String>,
}

/// Applies `updates` to entry number `index` of the block sequence under
/// `work_items`. `expected` is the entry count the parsed document reports; a
/// layout the scanner reads differently is refused rather than guessed at.
pub(super) fn patch_entry(
    text: &str,
    index: usize,
    expected: usize,
    updates: &FieldUpdates,
) -> Result<String, StoreError> {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let lines: Vec<&str> = text.lines().collect();

    let entries = scan_entries(&lines)
        .filter(|entries| entries.len() == expected)
        .ok_or_else(unsupported_layout)?;
    let entry = entries.get(index).ok_or_else(unsupported_layout)?;
    let fields = scan_fields(&lines, entry);
    let pad = " ".repeat(entry.key_col);

    let mut edits = Vec::new();
    let mut appended = Vec::new();
    for (field, value) in updates.iter() {
        let rendered = render_field(field, value)?;
        match fields.iter().find(|span| span.key == field.as_str()) {
            Some(span) => edits.push(replace_field(&lines, span, entry.key_col, &rendered)),
            None => appended.extend(rendered.iter().map(|line| format!("{pad}{line}"))),
        }
    }
    if !appended.is_empty() {
        edits.push(Edit {
            start: entry.end,
            end: entry.end,
            lines: appended,
        });
    }

    edits.sort_by(|a, b| b.start.cmp(&a.start));
    let mut out: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
    for edit in edits {
        out.splice(edit.start..edit.end, edit.lines);
    }

    let mut patched = out.join(newline);
    if text.ends_with('\n') {
        patched.push_str(newline);
    }
    Ok(patched)
}

fn unsupported_layout() -> StoreError {
    StoreError::Corrupt(
        "'work_items' must be a block sequence of mappings to update in place".to_string(),
    )
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_trivia(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn is_dash(rest: &str) -> bool {
    rest == "-" || rest.starts_with("- ")
}

fn scan_entries(lines: &[&str]) -> Option<Vec<EntrySpan>> {
    let root = lines.iter().position(|line| {
        line.strip_prefix("work_items:").is_some_and(is_trivia)
    })?;

    let mut entries: Vec<EntrySpan> = Vec::new();
    let mut seq_indent = None;
    let mut pending_key_col = false;

    for (idx, line) in lines.iter().enumerate().skip(root + 1) {
        if is_trivia(line) {
            continue;
        }
        let indent = indent_of(line);
        let rest = &line[indent..];
        let dash = is_dash(rest.trim_end());

        if seq_indent.is_none() {
            if dash {
                seq_indent = Some(indent);
            } else if indent == 0 {
                break;
            } else {
                return None;
            }
        }
        let seq = seq_indent.unwrap_or(indent);
        if indent < seq || (indent == seq && !dash) {
            break;
        }

        if indent == seq && dash {
            let after = rest.trim_end().get(1..).unwrap_or("");
            pending_key_col = after.trim().is_empty();
            let key_col = indent + 1 + (after.len() - after.trim_start().len());
            entries.push(EntrySpan {
                start: idx,
                end: idx + 1,
                key_col,
            });
            continue;
        }

        let entry = entries.last_mut()?;
        if pending_key_col {
            entry.key_col = indent;
            pending_key_col = false;
        }
        entry.end = idx + 1;
    }
    Some(entries)
}

fn scan_fields<'a>(lines: &[&'a str], entry: &EntrySpan) -> Vec<FieldSpan<'a>> {
    let mut fields: Vec<FieldSpan<'a>> = Vec::new();
    for (offset, line) in lines[entry.start..entry.end].iter().enumerate() {
        let idx = entry.start + offset;
        let at_key_col = offset == 0 || (!is_trivia(line) && indent_of(line) == entry.key_col);
        if at_key_col && let Some(key) = line.get(entry.key_col..).and_then(key_name) {
            fields.push(FieldSpan {
                key,
                start: idx,
                end: idx + 1,
            });
            continue;
        }
        if is_trivia(line) {
            continue;
        }
        if let Some(last) = fields.last_mut() {
            last.end = idx + 1;
        }
    }
    fields
}

fn key_name(text: &str) -> Option<&str> {
    let colon = text.find(':')?;
    let key = &text[..colon];
    let after = &text[colon + 1..];
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    (plain && (after.is_empty() || after.starts_with(' '))).then_some(key)
}

/// The `# ...` tail of a single-line `key: value` pair, if any.
fn inline_comment(field: &str) -> Option<&str> {
    let colon = field.find(':')?;
    let value = &field[colon + 1..];
    let trimmed = value.trim_start();
    let value_start = colon + 1 + (value.len() - trimmed.len());

    if trimmed.starts_with('#') {
        return Some(&field[value_start..]);
    }
    let search_from = match trimmed.chars().next() {
        Some(quote @ ('\'' | '"')) => value_start + 1 + trimmed[1..].find(quote)? + 1,
        _ => value_start,
    };
    let tail = field.get(search_from..)?;
    tail.find(" #").map(|pos| &tail[pos + 1..])
}

fn render_field(field: UpdateField, value: &FieldValue) -> Result<Vec<String>, StoreError> {
    let mut mapping = Mapping::new();
    mapping.insert(Value::String(field.as_str().to_string()), value.to_yaml());
    let text = serde_yaml::to_string(&mapping)
        .map_err(|err| StoreError::invalid_value(field.as_str(), err.to_string()))?;
    Ok(text.lines().map(str::to_string).collect())
}

fn replace_field(lines: &[&str], span: &FieldSpan<'_>, key_col: usize, rendered: &[String]) -> Edit {
    let head = lines[span.start];
    let prefix = head.get(..key_col).unwrap_or("");
    let comment = if span.end - span.start == 1 && rendered.len() == 1 {
        head.get(key_col..).and_then(inline_comment)
    } else {
        None
    };

    let pad = " ".repeat(key_col);
    let mut out: Vec<String> = rendered
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let lead = if i == 0 { prefix } else { pad.as_str() };
            format!("{lead}{line}")
        })
        .collect();
    if let Some(comment) = comment
        && let Some(first) = out.first_mut()
    {
        first.push(' ');
        first.push_str(comment);
    }

    Edit {
        start: span.start,
        end: span.end,
        lines: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(field: UpdateField, value: FieldValue) -> FieldUpdates {
        let mut updates = FieldUpdates::default();
        updates.set(field, value);
        updates
    }

    #[test]
    fn scans_indentless_and_indented_sequences() {
        let flat = ["work_items:", "- a: 1", "  b:", "  - x", "- a: 2"];
        let spans = scan_entries(&flat).expect("flat layout");
        assert_eq!(
            spans,
            vec![
                EntrySpan { start: 1, end: 4, key_col: 2 },
                EntrySpan { start: 4, end: 5, key_col: 2 },
            ]
        );

        let nested = ["work_items:", "  -   a: 1", "      b: 2", "other: 3"];
        let spans = scan_entries(&nested).expect("nested layout");
        assert_eq!(spans, vec![EntrySpan { start: 1, end: 3, key_col: 6 }]);
    }

    #[test]
    fn bare_dash_takes_key_column_from_next_line() {
        let lines = ["work_items:", "-", "  a: 1", "  b: 2"];
        let spans = scan_entries(&lines).expect("layout");
        assert_eq!(spans, vec![EntrySpan { start: 1, end: 4, key_col: 2 }]);
        let fields = scan_fields(&lines, &spans[0]);
        let keys: Vec<&str> = fields.iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn field_spans_cover_continuations_but_not_trailing_comments() {
        let lines = [
            "work_items:",
            "- wbs_id: A",
            "  assignees:",
            "  - alice",
            "  - bob",
            "  # about the description",
            "  description: |",
            "    first",
            "    second",
            "  # trailing",
        ];
        let spans = scan_entries(&lines).expect("layout");
        assert_eq!(spans[0].end, 9);
        let fields = scan_fields(&lines, &spans[0]);
        assert_eq!(
            fields,
            vec![
                FieldSpan { key: "wbs_id", start: 1, end: 2 },
                FieldSpan { key: "assignees", start: 2, end: 5 },
                FieldSpan { key: "description", start: 6, end: 9 },
            ]
        );
    }

    #[test]
    fn inline_comments_are_found_outside_quotes() {
        assert_eq!(inline_comment("status: Todo  # keep"), Some("# keep"));
        assert_eq!(inline_comment("title: 'a # b' # real"), Some("# real"));
        assert_eq!(inline_comment("title: C# rocks"), None);
        assert_eq!(inline_comment("milestone: # none yet"), Some("# none yet"));
        assert_eq!(inline_comment("status: Todo"), None);
    }

    #[test]
    fn patch_keeps_comment_and_prefix() {
        let text = "work_items:\n- status: Todo # board column\n  wbs_id: A\n";
        let patched = patch_entry(
            text,
            0,
            1,
            &single(UpdateField::Status, FieldValue::Text("Done".to_string())),
        )
        .expect("patch");
        assert_eq!(patched, "work_items:\n- status: Done # board column\n  wbs_id: A\n");
    }

    #[test]
    fn patch_appends_missing_keys_inside_the_entry() {
        let text = "work_items:\n- wbs_id: A\n  title: a\n# between\n- wbs_id: B\n";
        let patched = patch_entry(
            text,
            0,
            2,
            &single(UpdateField::Assignees, FieldValue::List(vec!["ann".to_string()])),
        )
        .expect("patch");
        assert_eq!(
            patched,
            "work_items:\n- wbs_id: A\n  title: a\n  assignees:\n  - ann\n# between\n- wbs_id: B\n"
        );
    }

    #[test]
    fn patch_preserves_crlf() {
        let text = "work_items:\r\n- wbs_id: A\r\n  effort_days: 1\r\n";
        let patched = patch_entry(
            text,
            0,
            1,
            &single(UpdateField::EffortDays, FieldValue::Number(3.0)),
        )
        .expect("patch");
        assert_eq!(patched, "work_items:\r\n- wbs_id: A\r\n  effort_days: 3\r\n");
    }

    #[test]
    fn mismatched_entry_count_is_refused() {
        let text = "work_items: [{wbs_id: A}]\n";
        let err = patch_entry(
            text,
            0,
            1,
            &single(UpdateField::Title, FieldValue::Text("x".to_string())),
        )
        .expect_err("flow sequences are not patched");
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
