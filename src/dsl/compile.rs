//! Compilation — walks the playback list, resolves every entry, and
//! merges the resulting schedules into the global timeline.
//!
//! Entries are processed in source order; at a given quantized instant
//! the first writer wins per LED, so earlier playback lines take
//! priority over later ones.

use crate::schedule::{LocalSchedule, Timeline};

use super::ast::Program;
use super::builtins::{ResolvedAction, Value};
use super::error::CompileError;
use super::resolve::{Item, Resolution, Resolver};

/// The result of compiling an ARGBEX preset.
#[derive(Debug, Clone)]
pub struct CompiledShow {
    pub timeline: Timeline,
    /// Declared sequences, whether or not playback used them.
    pub sequence_count: usize,
    /// Playback entries that produced at least a resolution (excludes
    /// `nothing` lines, which are dropped during parsing).
    pub entry_count: usize,
}

/// Compile a parsed program into its quantized schedule.
pub fn compile_program(program: &Program, max_aps: u32) -> Result<CompiledShow, CompileError> {
    let mut timeline = Timeline::new(max_aps);
    let resolver = Resolver::new(&program.macros, max_aps);

    for entry in &program.playback {
        match resolver.resolve(&entry.call, entry.line)? {
            Resolution::Value(Value::Action(action)) => {
                timeline.add_action(entry.time_ms, &local_schedule(&action));
            }
            // A bare wait at playback top level has nothing to delay.
            Resolution::Value(Value::Wait(_)) => {}
            Resolution::Value(value) => {
                return Err(CompileError::type_mismatch(
                    format!("'{}' is not a playable action (got {value})", entry.call.name),
                    entry.line,
                ));
            }
            Resolution::Expansion(items) => {
                let mut offset_ms = 0u64;
                for item in items {
                    match item {
                        Item::Action(action) => {
                            timeline.add_action(entry.time_ms + offset_ms, &local_schedule(&action));
                        }
                        Item::Wait(secs) => {
                            offset_ms += (secs * 1000.0).round() as u64;
                        }
                        // Loop repetition is not supported; the markers
                        // place nothing on the timeline.
                        Item::LoopStart(_) | Item::LoopEnd => {}
                    }
                }
            }
        }
    }

    Ok(CompiledShow {
        timeline,
        sequence_count: program.macros.len(),
        entry_count: program.playback.len(),
    })
}

/// Pair an action's selector with each of its color frames.
fn local_schedule(action: &ResolvedAction) -> LocalSchedule {
    let mut local = LocalSchedule::new();
    for frame in &action.frames {
        let slot = local.entry(frame.time_ms).or_default();
        for &led in action.selector.indices() {
            slot.insert(led, frame.color);
        }
    }
    local
}
