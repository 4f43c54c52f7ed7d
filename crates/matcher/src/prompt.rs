//! Instruction text sent to the chat model.
//!
//! Without a template a fixed instruction is produced. Template files are
//! plain text with `{input_name}` and `{candidates}` placeholders; `{{` and
//! `}}` render as literal braces so templates can carry JSON examples.

use std::fs;
use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::types::MatchError;

const INPUT_PLACEHOLDER: &str = "input_name";
const CANDIDATES_PLACEHOLDER: &str = "candidates";

/// Build the system prompt for one match request.
///
/// `template_path` names an external template; `None` selects the built-in
/// instruction.
pub fn build_prompt(
    input_string: &str,
    candidates: &[String],
    template_path: Option<&str>,
) -> Result<String, MatchError> {
    match template_path {
        Some(path) => {
            let template = load_prompt_text(path)?;
            let candidates_json = candidates_to_json(candidates, true)?;
            render_template(path, &template, input_string, &candidates_json)
        }
        None => Ok(default_prompt(&candidates_to_json(candidates, false)?)),
    }
}

/// Read a prompt template from disk.
pub fn load_prompt_text(path: &str) -> Result<String, MatchError> {
    fs::read_to_string(path).map_err(|err| {
        tracing::debug!(path, error = %err, "prompt template unreadable");
        MatchError::TemplateNotFound {
            path: path.to_string(),
        }
    })
}

fn default_prompt(candidates_json: &str) -> String {
    format!(
        "Match the input string to one of these: {candidates_json}. \
         Reply with exactly one of them, copied verbatim. \
         If you can't find a match, reply with None."
    )
}

fn render_template(
    path: &str,
    template: &str,
    input_string: &str,
    candidates_json: &str,
) -> Result<String, MatchError> {
    let malformed = |detail: String| MatchError::TemplateMalformed {
        path: path.to_string(),
        detail,
    };

    let mut out =
        String::with_capacity(template.len() + input_string.len() + candidates_json.len());
    let mut saw_input = false;
    let mut saw_candidates = false;

    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            out.push('{');
            rest = after;
            continue;
        }
        if let Some(after) = tail.strip_prefix("}}") {
            out.push('}');
            rest = after;
            continue;
        }
        if tail.starts_with('}') {
            return Err(malformed("single '}' outside a placeholder".into()));
        }

        let end = tail
            .find('}')
            .ok_or_else(|| malformed("unterminated placeholder".into()))?;
        match &tail[1..end] {
            INPUT_PLACEHOLDER => {
                out.push_str(input_string);
                saw_input = true;
            }
            CANDIDATES_PLACEHOLDER => {
                out.push_str(candidates_json);
                saw_candidates = true;
            }
            other => return Err(malformed(format!("unknown placeholder {{{other}}}"))),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);

    let mut missing = Vec::new();
    if !saw_input {
        missing.push("{input_name}");
    }
    if !saw_candidates {
        missing.push("{candidates}");
    }
    if !missing.is_empty() {
        return Err(malformed(format!(
            "missing placeholder(s) {}",
            missing.join(", ")
        )));
    }

    Ok(out)
}

/// JSON array of the candidates with `", "` between items.
///
/// Template substitution escapes non-ASCII as `\uXXXX`; the built-in prompt
/// keeps the names as written.
fn candidates_to_json(candidates: &[String], escape_non_ascii: bool) -> Result<String, MatchError> {
    let mut buf = Vec::new();
    let formatter = ListFormatter { escape_non_ascii };
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    candidates.serialize(&mut ser).map_err(io::Error::from)?;
    String::from_utf8(buf).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

struct ListFormatter {
    escape_non_ascii: bool,
}

impl Formatter for ListFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.escape_non_ascii {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}
