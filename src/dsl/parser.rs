//! Line-mode parser for ARGBEX presets.
//!
//! Walks the source line by line through a small state machine: sequence
//! declarations and their bodies on one side, the timestamped playback
//! list on the other. Produces a [`Program`]; nothing is resolved yet.

use super::ast::{MacroDef, MacroRegistry, PlaybackEntry, Program, RawCall};
use super::call::parse_call;
use super::error::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Before any section marker. Lines are ignored.
    Idle,
    /// Inside `<sequences>`, expecting a declaration.
    Sequences,
    /// Declaration seen, `{` still missing.
    AwaitBrace,
    /// Collecting a sequence body.
    Body,
    /// Inside `<playback>`.
    Playback,
}

pub struct Parser {
    mode: Mode,
    macros: MacroRegistry,
    playback: Vec<PlaybackEntry>,
    current: Option<MacroDef>,
    loop_depth: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            macros: MacroRegistry::new(),
            playback: Vec::new(),
            current: None,
            loop_depth: 0,
        }
    }

    pub fn parse(mut self, source: &str) -> Result<Program, CompileError> {
        for (idx, raw_line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            // Section markers switch mode from anywhere.
            if line.eq_ignore_ascii_case("<sequences>") {
                self.close_current();
                self.mode = Mode::Sequences;
                continue;
            }
            if line.eq_ignore_ascii_case("<playback>") {
                self.close_current();
                self.mode = Mode::Playback;
                continue;
            }

            match self.mode {
                Mode::Idle => {}
                Mode::Sequences => self.declaration_line(line, line_no)?,
                Mode::AwaitBrace => self.await_brace_line(line, line_no)?,
                Mode::Body => self.body_line(line, line_no)?,
                Mode::Playback => self.playback_line(line, line_no)?,
            }
        }

        self.close_current();
        Ok(Program {
            macros: self.macros,
            playback: self.playback,
        })
    }

    fn declaration_line(&mut self, line: &str, line_no: usize) -> Result<(), CompileError> {
        let (decl, rest) = parse_call(line, line_no)?;
        let mut params = Vec::with_capacity(decl.args.len());
        for arg in &decl.args {
            match arg {
                super::ast::Argument::Literal(tok) => params.push(tok.clone()),
                super::ast::Argument::Call(_) => {
                    return Err(CompileError::syntax(
                        format!("formal parameters of '{}' must be bare names", decl.name),
                        line_no,
                    ));
                }
            }
        }
        self.current = Some(MacroDef {
            name: decl.name,
            params,
            body: Vec::new(),
        });
        self.loop_depth = 0;
        self.mode = if rest.contains('{') {
            Mode::Body
        } else {
            Mode::AwaitBrace
        };
        Ok(())
    }

    fn await_brace_line(&mut self, line: &str, line_no: usize) -> Result<(), CompileError> {
        let Some(brace) = line.find('{') else {
            let name = self
                .current
                .as_ref()
                .map(|m| m.name.as_str())
                .unwrap_or("<unknown>");
            return Err(CompileError::syntax(
                format!("no opening brace found for sequence '{name}'"),
                line_no,
            ));
        };
        self.mode = Mode::Body;
        // Whatever follows the brace is already the first body line.
        let rest = line[brace + 1..].trim();
        if rest.is_empty() {
            return Ok(());
        }
        self.body_line(rest, line_no)
    }

    fn body_line(&mut self, line: &str, line_no: usize) -> Result<(), CompileError> {
        if line.contains("loop") {
            self.loop_depth += 1;
        }
        if line.contains('}') {
            if self.loop_depth == 0 {
                self.close_current();
                self.mode = Mode::Sequences;
            } else {
                self.push_body(RawCall {
                    name: "endloop".to_string(),
                    args: Vec::new(),
                });
                self.loop_depth -= 1;
            }
            return Ok(());
        }
        let (call, _) = parse_call(line, line_no)?;
        self.push_body(call);
        Ok(())
    }

    fn playback_line(&mut self, line: &str, line_no: usize) -> Result<(), CompileError> {
        let Some((timestamp, action)) = line.split_once(' ') else {
            return Err(CompileError::syntax(
                "expected 'MM:SS:CS action' on playback line",
                line_no,
            ));
        };
        let time_ms = parse_timestamp(timestamp, line_no)?;
        let action = action.trim();
        if action.is_empty() {
            return Err(CompileError::syntax("missing playback action", line_no));
        }
        let (call, _) = parse_call(action, line_no)?;
        if call.name == "nothing" {
            return Ok(());
        }
        self.playback.push(PlaybackEntry {
            time_ms,
            call,
            line: line_no,
        });
        Ok(())
    }

    fn push_body(&mut self, call: RawCall) {
        if let Some(def) = self.current.as_mut() {
            def.body.push(call);
        }
    }

    /// Register the sequence being built, if any. Redefinition overwrites.
    fn close_current(&mut self) {
        if let Some(def) = self.current.take() {
            self.macros.insert(def.name.clone(), def);
        }
        self.loop_depth = 0;
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a `//` comment and everything after it.
fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(at) => &line[..at],
        None => line,
    }
}

/// Convert an `MM:SS:CS` timestamp to milliseconds.
fn parse_timestamp(text: &str, line_no: usize) -> Result<u64, CompileError> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return Err(CompileError::syntax(
            format!("invalid timestamp '{text}', expected MM:SS:CS"),
            line_no,
        ));
    }
    let mut fields = [0u64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| {
            CompileError::syntax(format!("invalid timestamp '{text}', expected MM:SS:CS"), line_no)
        })?;
    }
    let [minutes, seconds, centis] = fields;
    Ok(((minutes * 60 + seconds) * 100 + centis) * 10)
}
