//! ARGBEX compiler — source text → raw call trees → resolved actions →
//! quantized timeline.

pub mod ast;
pub mod builtins;
pub mod call;
pub mod compile;
pub mod error;
pub mod parser;
pub mod resolve;

pub use ast::{Argument, MacroDef, MacroRegistry, PlaybackEntry, Program, RawCall};
pub use builtins::ResolvedAction;
pub use compile::CompiledShow;
pub use error::{CompileError, ErrorKind};

use crate::schedule::DEFAULT_MAX_APS;
use compile::compile_program;
use parser::Parser;

/// The ARGBEX compiler.
///
/// Parses preset text through the line-mode parser, then resolves and
/// merges the playback list into a quantized schedule.
pub struct Compiler;

impl Compiler {
    /// Parse preset source into a Program (sequences + playback list).
    pub fn parse(source: &str) -> Result<Program, CompileError> {
        Parser::new().parse(source)
    }

    /// Parse and compile preset source at the default frame rate.
    pub fn compile(source: &str) -> Result<CompiledShow, CompileError> {
        Self::compile_with(source, DEFAULT_MAX_APS)
    }

    /// Parse and compile preset source at `max_aps` actions per second.
    pub fn compile_with(source: &str, max_aps: u32) -> Result<CompiledShow, CompileError> {
        let program = Self::parse(source)?;
        compile_program(&program, max_aps)
    }
}
