//! Call-syntax parser.
//!
//! Parses one comment-stripped, trimmed line of the form
//! `name(arg arg nested(a b) arg)` into a [`RawCall`], recursing into
//! nested calls. Arguments are delimited by spaces or commas at the top
//! parenthesis level only; delimiters inside nested calls are part of
//! the nested text. Consecutive delimiters contribute nothing.

use super::ast::{Argument, RawCall};
use super::error::CompileError;

/// Parse a call and return it together with the text remaining after its
/// closing parenthesis (used by sequence declarations to find the `{`).
pub fn parse_call(line: &str, line_no: usize) -> Result<(RawCall, &str), CompileError> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();

    let mut name = String::new();
    let mut args: Vec<Argument> = Vec::new();
    let mut param = String::new();
    let mut depth = 0usize;
    // Position (in `chars`) of the first character of the current
    // depth-1 nested call, including its name.
    let mut nested_start = 0usize;

    let mut pos = 0usize;
    while pos < chars.len() {
        let (byte, ch) = chars[pos];

        if depth == 0 {
            if ch == '(' {
                depth = 1;
            } else if ch.is_ascii_alphanumeric() {
                name.push(ch);
            } else {
                return Err(CompileError::syntax(
                    format!("'{ch}' is not allowed in a call name"),
                    line_no,
                ));
            }
            pos += 1;
            continue;
        }

        match ch {
            '(' => {
                depth += 1;
                if depth == 2 {
                    // The nested call's name has been accumulating in
                    // `param`; the call starts where that name began.
                    nested_start = pos - param.chars().count();
                    param.clear();
                }
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if !param.is_empty() {
                        args.push(Argument::Literal(std::mem::take(&mut param)));
                    }
                    let rest = &line[byte + 1..];
                    return Ok((RawCall { name, args }, rest));
                }
                if depth == 1 {
                    param.clear();
                    let sub = &line[chars[nested_start].0..=byte];
                    let (call, _) = parse_call(sub, line_no)?;
                    args.push(Argument::Call(call));
                }
            }
            ' ' | ',' if depth == 1 => {
                if !param.is_empty() {
                    args.push(Argument::Literal(std::mem::take(&mut param)));
                }
            }
            _ => param.push(ch),
        }
        pos += 1;
    }

    // Ran off the end still inside the name or an open parameter list.
    Err(CompileError::syntax("unterminated call syntax", line_no))
}
