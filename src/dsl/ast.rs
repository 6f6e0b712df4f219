//! Raw call trees and the program structure produced by parsing.
//!
//! A `RawCall` is unresolved: its arguments are literal tokens or nested
//! raw calls. Meaning is assigned later by the resolver against the
//! built-in registry and the sequence registry.

use std::collections::HashMap;

/// One parsed call: a name and its ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCall {
    pub name: String,
    pub args: Vec<Argument>,
}

/// A call argument: a bare token or a nested call.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Literal(String),
    Call(RawCall),
}

/// A user-defined sequence: name, formal parameter names, and a body of
/// raw calls collected line by line. Read-only once parsing finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<RawCall>,
}

/// Declared sequences by name. Redefinition overwrites.
pub type MacroRegistry = HashMap<String, MacroDef>;

/// One playback line: an absolute start time and the action to place there.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackEntry {
    pub time_ms: u64,
    pub call: RawCall,
    pub line: usize,
}

/// A parsed preset: every declared sequence plus the playback list in
/// source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub macros: MacroRegistry,
    pub playback: Vec<PlaybackEntry>,
}
