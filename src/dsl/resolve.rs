//! Semantic resolution — turns raw call trees into values and expansions.
//!
//! Arguments resolve depth-first; built-ins are checked against their
//! declared parameter kinds and constructed; sequence calls substitute
//! actual arguments into a copy of the body and resolve it in order.
//! Sequences may call other sequences at body top level, but never
//! appear as arguments.

use super::ast::{Argument, MacroRegistry, RawCall};
use super::builtins::{coerce, Builtin, ParamKind, ResolvedAction, Value};
use super::error::CompileError;

/// Cap on nested sequence expansion, so a recursive definition reports
/// an error instead of overflowing the stack.
const MAX_EXPANSION_DEPTH: usize = 32;

/// One element of a resolved sequence expansion, in body order.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Action(ResolvedAction),
    /// Advance the expansion clock by this many seconds.
    Wait(f64),
    /// `loop(...)` marker. Repetition is not supported; the marker and
    /// its raw arguments are carried through untouched.
    LoopStart(Vec<Argument>),
    /// `}` closing a loop level.
    LoopEnd,
}

/// The outcome of resolving one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A fully constructed primitive value.
    Value(Value),
    /// A sequence call, expanded into its resolved body items.
    Expansion(Vec<Item>),
}

pub struct Resolver<'a> {
    registry: &'a MacroRegistry,
    max_aps: u32,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a MacroRegistry, max_aps: u32) -> Self {
        Self { registry, max_aps }
    }

    /// Resolve a top-level call from the playback list or a body.
    pub fn resolve(&self, call: &RawCall, line: usize) -> Result<Resolution, CompileError> {
        self.resolve_at(call, line, 0)
    }

    fn resolve_at(
        &self,
        call: &RawCall,
        line: usize,
        depth: usize,
    ) -> Result<Resolution, CompileError> {
        if depth > MAX_EXPANSION_DEPTH {
            return Err(CompileError::recursion(
                format!("expansion of '{}' exceeds depth limit (recursive sequence?)", call.name),
                line,
            ));
        }

        // Built-ins shadow sequences of the same name.
        if let Some(builtin) = Builtin::lookup(&call.name) {
            let mut args = Vec::with_capacity(call.args.len());
            for arg in &call.args {
                args.push(self.resolve_arg(arg, line, depth)?);
            }
            let value = apply_builtin(builtin, &call.name, args, line, self.max_aps)?;
            return Ok(Resolution::Value(value));
        }

        let Some(def) = self.registry.get(&call.name) else {
            return Err(CompileError::registry(
                format!("declaration '{}' not found", call.name),
                line,
            ));
        };

        if call.args.len() != def.params.len() {
            return Err(CompileError::arity(format!(
                "wrong number of parameters passed to '{}': expected {}, got {}",
                call.name,
                def.params.len(),
                call.args.len()
            ), line));
        }

        // Substitution works on a copy; the registered body never changes.
        let body = substitute_body(&def.body, &def.params, &call.args);
        let mut items = Vec::new();
        for body_call in &body {
            match body_call.name.as_str() {
                "loop" => items.push(Item::LoopStart(body_call.args.clone())),
                "endloop" => items.push(Item::LoopEnd),
                _ => match self.resolve_at(body_call, line, depth + 1)? {
                    Resolution::Value(Value::Action(action)) => items.push(Item::Action(action)),
                    Resolution::Value(Value::Wait(secs)) => items.push(Item::Wait(secs)),
                    Resolution::Value(value) => {
                        return Err(CompileError::type_mismatch(
                            format!(
                                "'{}' in sequence '{}' does not produce an action (got {value})",
                                body_call.name, call.name
                            ),
                            line,
                        ));
                    }
                    Resolution::Expansion(nested) => items.extend(nested),
                },
            }
        }
        Ok(Resolution::Expansion(items))
    }

    fn resolve_arg(
        &self,
        arg: &Argument,
        line: usize,
        depth: usize,
    ) -> Result<Value, CompileError> {
        match arg {
            Argument::Literal(token) => Ok(Value::Literal(token.clone())),
            Argument::Call(call) => {
                if Builtin::lookup(&call.name).is_none() && self.registry.contains_key(&call.name) {
                    return Err(CompileError::type_mismatch(
                        format!("sequence '{}' cannot be used inside another call", call.name),
                        line,
                    ));
                }
                match self.resolve_at(call, line, depth)? {
                    Resolution::Value(value) => Ok(value),
                    Resolution::Expansion(_) => Err(CompileError::type_mismatch(
                        format!("sequence '{}' cannot be used inside another call", call.name),
                        line,
                    )),
                }
            }
        }
    }
}

/// Run the generic arity/coercion/tag machinery for one built-in and
/// construct its value.
fn apply_builtin(
    builtin: Builtin,
    name: &str,
    args: Vec<Value>,
    line: usize,
    max_aps: u32,
) -> Result<Value, CompileError> {
    let kinds = builtin.kinds();
    let variadic = kinds.last().copied().filter(|k| k.is_variadic());
    let required = if variadic.is_some() {
        kinds.len() - 1
    } else {
        kinds.len()
    };

    if args.len() < required || (args.len() > required && variadic.is_none()) {
        return Err(CompileError::arity(
            format!(
                "wrong number of parameters passed to '{name}': expected {required}, got {}",
                args.len()
            ),
            line,
        ));
    }

    let mut coerced = Vec::with_capacity(args.len());
    let mut tags = Vec::new();
    for (i, arg) in args.into_iter().enumerate() {
        if i < required {
            coerced.push(coerce(arg, kinds[i], line)?);
        } else {
            match variadic {
                Some(ParamKind::Tags) => tags.push(arg.to_string()),
                Some(kind) => coerced.push(coerce(arg, kind, line)?),
                None => unreachable!("excess argument without variadic kind"),
            }
        }
    }

    builtin.construct(coerced, tags, line, max_aps)
}

fn substitute_body(body: &[RawCall], formals: &[String], actuals: &[Argument]) -> Vec<RawCall> {
    body.iter()
        .map(|call| substitute_call(call, formals, actuals))
        .collect()
}

/// Replace every leaf token equal to a formal name with the matching
/// actual argument, recursing into nested calls.
fn substitute_call(call: &RawCall, formals: &[String], actuals: &[Argument]) -> RawCall {
    let args = call
        .args
        .iter()
        .map(|arg| match arg {
            Argument::Literal(token) => match formals.iter().position(|f| f == token) {
                Some(i) => actuals[i].clone(),
                None => arg.clone(),
            },
            Argument::Call(nested) => Argument::Call(substitute_call(nested, formals, actuals)),
        })
        .collect();
    RawCall {
        name: call.name.clone(),
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::call::parse_call;
    use crate::dsl::error::ErrorKind;
    use crate::dsl::parser::Parser;
    use crate::led::Rgb;

    fn raw(line: &str) -> RawCall {
        parse_call(line, 1).unwrap().0
    }

    fn registry_from(src: &str) -> MacroRegistry {
        Parser::new().parse(src).unwrap().macros
    }

    fn resolve(registry: &MacroRegistry, line: &str) -> Result<Resolution, CompileError> {
        Resolver::new(registry, 100).resolve(&raw(line), 1)
    }

    #[test]
    fn builtin_static_resolves_to_action() {
        let registry = MacroRegistry::new();
        let Resolution::Value(Value::Action(action)) =
            resolve(&registry, "static(ID(5) C(255 0 0))").unwrap()
        else {
            panic!("expected action");
        };
        assert_eq!(action.selector.indices(), &[5]);
        assert_eq!(action.frames[0].color, Rgb::new(255, 0, 0));
        assert!(action.tags.is_empty());
    }

    #[test]
    fn excess_static_arguments_become_tags() {
        let registry = MacroRegistry::new();
        let Resolution::Value(Value::Action(action)) =
            resolve(&registry, "static(All() C(1 2 3) pulse fast)").unwrap()
        else {
            panic!("expected action");
        };
        assert_eq!(action.tags, vec!["pulse", "fast"]);
    }

    #[test]
    fn unknown_declaration_is_a_registry_error() {
        let registry = MacroRegistry::new();
        let err = resolve(&registry, "sparkle(1)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Registry);
        assert!(err.message.contains("sparkle"));
    }

    #[test]
    fn builtin_arity_too_few() {
        let registry = MacroRegistry::new();
        let err = resolve(&registry, "static(All())").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Arity);
    }

    #[test]
    fn builtin_arity_too_many_without_variadic() {
        let registry = MacroRegistry::new();
        let err = resolve(&registry, "Range(1 2 3)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Arity);
    }

    #[test]
    fn coercion_failure_is_a_type_error() {
        let registry = MacroRegistry::new();
        let err = resolve(&registry, "Range(1 abc)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn sequence_expands_with_substitution() {
        let registry = registry_from("<sequences>\ns1(n) {\nstatic(ID(n) C(255 0 0))\n}\n");
        let Resolution::Expansion(items) = resolve(&registry, "s1(7)").unwrap() else {
            panic!("expected expansion");
        };
        assert_eq!(items.len(), 1);
        let Item::Action(action) = &items[0] else {
            panic!("expected action item");
        };
        assert_eq!(action.selector.indices(), &[7]);
    }

    #[test]
    fn substitution_accepts_call_arguments() {
        let registry = registry_from("<sequences>\npaint(c) {\nstatic(All() c)\n}\n");
        let Resolution::Expansion(items) = resolve(&registry, "paint(C(0 255 0))").unwrap() else {
            panic!("expected expansion");
        };
        let Item::Action(action) = &items[0] else {
            panic!("expected action item");
        };
        assert_eq!(action.frames[0].color, Rgb::new(0, 255, 0));
    }

    #[test]
    fn substitution_does_not_mutate_the_registry() {
        let registry = registry_from("<sequences>\ns1(n) {\nstatic(ID(n) C(255 0 0))\n}\n");
        let before = registry.get("s1").unwrap().clone();
        resolve(&registry, "s1(7)").unwrap();
        assert_eq!(registry.get("s1").unwrap(), &before);
    }

    #[test]
    fn sequence_arity_is_checked() {
        let registry = registry_from("<sequences>\ns1(a b) {\nstatic(ID(a) C(0 0 0))\n}\n");
        for call in ["s1(1)", "s1(1 2 3)"] {
            let err = resolve(&registry, call).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Arity, "expected arity error for {call}");
        }
        assert!(resolve(&registry, "s1(1 2)").is_ok());
    }

    #[test]
    fn sequence_as_argument_is_rejected() {
        let registry = registry_from("<sequences>\ns1(n) {\nstatic(ID(n) C(0 0 0))\n}\n");
        let err = resolve(&registry, "static(ID(s1(3)) C(0 0 0))").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("s1"));
    }

    #[test]
    fn sequence_may_call_sequence_in_body() {
        let registry = registry_from(
            "<sequences>\ninner(n) {\nstatic(ID(n) C(9 9 9))\n}\nouter(m) {\ninner(m)\n}\n",
        );
        let Resolution::Expansion(items) = resolve(&registry, "outer(4)").unwrap() else {
            panic!("expected expansion");
        };
        let Item::Action(action) = &items[0] else {
            panic!("expected action item");
        };
        assert_eq!(action.selector.indices(), &[4]);
    }

    #[test]
    fn recursive_sequence_reports_recursion_error() {
        let registry = registry_from("<sequences>\nagain() {\nagain()\n}\n");
        let err = resolve(&registry, "again()").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Recursion);
    }

    #[test]
    fn wait_in_body_becomes_wait_item() {
        let registry = registry_from(
            "<sequences>\nblink(n) {\nstatic(ID(n) C(255 0 0))\nWait(0.5)\nstatic(ID(n) C(0 0 0))\n}\n",
        );
        let Resolution::Expansion(items) = resolve(&registry, "blink(2)").unwrap() else {
            panic!("expected expansion");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], Item::Wait(0.5));
    }

    #[test]
    fn loop_markers_survive_expansion() {
        let registry =
            registry_from("<sequences>\ns() {\nloop(3)\nstatic(All() C(1 1 1))\n}\n}\n");
        let Resolution::Expansion(items) = resolve(&registry, "s()").unwrap() else {
            panic!("expected expansion");
        };
        assert!(matches!(items[0], Item::LoopStart(_)));
        assert!(matches!(items[1], Item::Action(_)));
        assert_eq!(items[2], Item::LoopEnd);
    }

    #[test]
    fn non_action_body_value_is_a_type_error() {
        let registry = registry_from("<sequences>\nbad() {\nAll()\n}\n");
        let err = resolve(&registry, "bad()").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }
}
