//! Built-in primitives: the closed registry of constructible values.
//!
//! Each built-in exposes its expected parameter kinds as static metadata;
//! the resolver drives arity checking and coercion from that list and
//! then hands the coerced values to [`Builtin::construct`]. `Tags` and
//! `Ints` are variadic and only valid as the trailing kind.

use std::fmt;

use crate::led::{ColorValue, Frame, Rgb, Selector};

use super::error::CompileError;

/// The expected kind of one built-in parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Seconds,
    Selector,
    Color,
    /// Trailing variadic integer list.
    Ints,
    /// Trailing variadic tag list; excess arguments are stringified.
    Tags,
}

impl ParamKind {
    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::Ints | ParamKind::Tags)
    }
}

/// A fully resolved value: what a call argument or a whole call becomes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Literal(String),
    Int(i64),
    Seconds(f64),
    Selector(Selector),
    Color(ColorValue),
    Wait(f64),
    Action(ResolvedAction),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Seconds(s) => write!(f, "{s}"),
            Value::Selector(sel) => write!(f, "<selector of {} leds>", sel.len()),
            Value::Color(ColorValue::Static(c)) => write!(f, "C({},{},{})", c.r, c.g, c.b),
            Value::Color(ColorValue::Shift { .. }) => f.write_str("<color shift>"),
            Value::Wait(s) => write!(f, "Wait({s})"),
            Value::Action(_) => f.write_str("<action>"),
        }
    }
}

/// The unit produced by resolving one `static` call: which LEDs, which
/// color frames, and any tags carried through for downstream consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAction {
    pub selector: Selector,
    pub frames: Vec<Frame>,
    pub tags: Vec<String>,
}

/// The closed set of built-in constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Static,
    All,
    Range,
    Id,
    Checker,
    Color,
    ColorShift,
    Wait,
}

impl Builtin {
    /// Look a call name up in the registry. Case-sensitive.
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "static" => Some(Builtin::Static),
            "All" => Some(Builtin::All),
            "Range" => Some(Builtin::Range),
            "ID" => Some(Builtin::Id),
            "Checker" => Some(Builtin::Checker),
            "C" => Some(Builtin::Color),
            "ColorShift" => Some(Builtin::ColorShift),
            "Wait" => Some(Builtin::Wait),
            _ => None,
        }
    }

    /// Declared parameter kinds, in order.
    pub fn kinds(self) -> &'static [ParamKind] {
        match self {
            Builtin::Static => &[ParamKind::Selector, ParamKind::Color, ParamKind::Tags],
            Builtin::All => &[],
            Builtin::Range => &[ParamKind::Int, ParamKind::Int],
            Builtin::Id => &[ParamKind::Ints],
            Builtin::Checker => &[ParamKind::Int, ParamKind::Int, ParamKind::Int],
            Builtin::Color => &[ParamKind::Int, ParamKind::Int, ParamKind::Int],
            Builtin::ColorShift => &[ParamKind::Color, ParamKind::Color, ParamKind::Seconds],
            Builtin::Wait => &[ParamKind::Seconds],
        }
    }

    /// Build the value from pre-coerced arguments. `args` matches
    /// [`Builtin::kinds`] (with variadic entries appended); `tags` holds
    /// stringified excess arguments when the trailing kind is `Tags`.
    pub fn construct(
        self,
        args: Vec<Value>,
        tags: Vec<String>,
        line: usize,
        max_aps: u32,
    ) -> Result<Value, CompileError> {
        match self {
            Builtin::Static => {
                let [Value::Selector(selector), Value::Color(color)] = &args[..] else {
                    return Err(internal_shape("static", line));
                };
                Ok(Value::Action(ResolvedAction {
                    selector: selector.clone(),
                    frames: color.frames(max_aps),
                    tags,
                }))
            }
            Builtin::All => Ok(Value::Selector(Selector::all())),
            Builtin::Range => {
                let &[Value::Int(start), Value::Int(end)] = &args[..] else {
                    return Err(internal_shape("Range", line));
                };
                Ok(Value::Selector(Selector::range(start, end)))
            }
            Builtin::Id => {
                let mut ids = Vec::with_capacity(args.len());
                for arg in &args {
                    let Value::Int(id) = arg else {
                        return Err(internal_shape("ID", line));
                    };
                    ids.push(*id);
                }
                Ok(Value::Selector(Selector::id_list(ids)))
            }
            Builtin::Checker => {
                let &[Value::Int(start), Value::Int(run), Value::Int(pitch)] = &args[..] else {
                    return Err(internal_shape("Checker", line));
                };
                if run < 1 {
                    return Err(CompileError::type_mismatch(
                        format!("Checker run length must be at least 1, got {run}"),
                        line,
                    ));
                }
                if pitch < 1 {
                    return Err(CompileError::type_mismatch(
                        format!("Checker pitch must be at least 1, got {pitch}"),
                        line,
                    ));
                }
                Ok(Value::Selector(Selector::checker(start, run, pitch)))
            }
            Builtin::Color => {
                let &[Value::Int(r), Value::Int(g), Value::Int(b)] = &args[..] else {
                    return Err(internal_shape("C", line));
                };
                Ok(Value::Color(ColorValue::Static(Rgb::new(r, g, b))))
            }
            Builtin::ColorShift => {
                let [Value::Color(start), Value::Color(end), Value::Seconds(duration)] = &args[..]
                else {
                    return Err(internal_shape("ColorShift", line));
                };
                let (ColorValue::Static(start), ColorValue::Static(end)) = (start, end) else {
                    return Err(CompileError::type_mismatch(
                        "ColorShift endpoints must be static colors",
                        line,
                    ));
                };
                if *duration < 0.0 {
                    return Err(CompileError::type_mismatch(
                        format!("ColorShift duration must not be negative, got {duration}"),
                        line,
                    ));
                }
                Ok(Value::Color(ColorValue::Shift {
                    start: *start,
                    end: *end,
                    duration_secs: *duration,
                }))
            }
            Builtin::Wait => {
                let &[Value::Seconds(secs)] = &args[..] else {
                    return Err(internal_shape("Wait", line));
                };
                if secs < 0.0 {
                    return Err(CompileError::type_mismatch(
                        format!("Wait duration must not be negative, got {secs}"),
                        line,
                    ));
                }
                Ok(Value::Wait(secs))
            }
        }
    }
}

fn internal_shape(name: &str, line: usize) -> CompileError {
    CompileError::type_mismatch(format!("arguments to '{name}' have the wrong shape"), line)
}

/// Coerce a value to the declared kind. A value already of that kind
/// passes through; literal tokens are parsed; anything else fails.
pub fn coerce(value: Value, kind: ParamKind, line: usize) -> Result<Value, CompileError> {
    match (kind, value) {
        (ParamKind::Int | ParamKind::Ints, v @ Value::Int(_)) => Ok(v),
        (ParamKind::Int | ParamKind::Ints, Value::Literal(s)) => {
            s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                CompileError::type_mismatch(format!("cannot convert '{s}' to an integer"), line)
            })
        }
        (ParamKind::Seconds, v @ Value::Seconds(_)) => Ok(v),
        (ParamKind::Seconds, Value::Int(n)) => Ok(Value::Seconds(n as f64)),
        (ParamKind::Seconds, Value::Literal(s)) => {
            s.trim().parse::<f64>().map(Value::Seconds).map_err(|_| {
                CompileError::type_mismatch(format!("cannot convert '{s}' to seconds"), line)
            })
        }
        (ParamKind::Selector, v @ Value::Selector(_)) => Ok(v),
        (ParamKind::Color, v @ Value::Color(_)) => Ok(v),
        (kind, value) => Err(CompileError::type_mismatch(
            format!("expected {kind:?}, got '{value}'"),
            line,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Builtin::lookup("static"), Some(Builtin::Static));
        assert_eq!(Builtin::lookup("Static"), None);
        assert_eq!(Builtin::lookup("ID"), Some(Builtin::Id));
        assert_eq!(Builtin::lookup("id"), None);
        assert_eq!(Builtin::lookup("unknown"), None);
    }

    #[test]
    fn only_trailing_kinds_are_variadic() {
        for builtin in [
            Builtin::Static,
            Builtin::All,
            Builtin::Range,
            Builtin::Id,
            Builtin::Checker,
            Builtin::Color,
            Builtin::ColorShift,
            Builtin::Wait,
        ] {
            let kinds = builtin.kinds();
            for kind in &kinds[..kinds.len().saturating_sub(1)] {
                assert!(!kind.is_variadic(), "{builtin:?} has a non-trailing variadic");
            }
        }
    }

    #[test]
    fn coerce_literal_to_int() {
        assert_eq!(
            coerce(Value::Literal("42".into()), ParamKind::Int, 1).unwrap(),
            Value::Int(42)
        );
        assert_eq!(
            coerce(Value::Literal("-7".into()), ParamKind::Int, 1).unwrap(),
            Value::Int(-7)
        );
    }

    #[test]
    fn coerce_literal_to_seconds() {
        assert_eq!(
            coerce(Value::Literal("1.5".into()), ParamKind::Seconds, 1).unwrap(),
            Value::Seconds(1.5)
        );
    }

    #[test]
    fn coerce_rejects_garbage() {
        let err = coerce(Value::Literal("red".into()), ParamKind::Int, 9).unwrap_err();
        assert_eq!(err.kind, crate::dsl::error::ErrorKind::Type);
        assert_eq!(err.line, 9);
    }

    #[test]
    fn coerce_rejects_literal_as_selector() {
        let err = coerce(Value::Literal("5".into()), ParamKind::Selector, 2).unwrap_err();
        assert_eq!(err.kind, crate::dsl::error::ErrorKind::Type);
    }

    #[test]
    fn color_constructor_clamps() {
        let v = Builtin::Color
            .construct(
                vec![Value::Int(300), Value::Int(-10), Value::Int(256)],
                Vec::new(),
                1,
                100,
            )
            .unwrap();
        assert_eq!(v, Value::Color(ColorValue::Static(Rgb::new(255, 0, 255))));
    }

    #[test]
    fn checker_rejects_degenerate_geometry() {
        let err = Builtin::Checker
            .construct(
                vec![Value::Int(1), Value::Int(2), Value::Int(0)],
                Vec::new(),
                4,
                100,
            )
            .unwrap_err();
        assert_eq!(err.kind, crate::dsl::error::ErrorKind::Type);
    }

    #[test]
    fn colorshift_rejects_shift_endpoints() {
        let inner = ColorValue::Shift {
            start: Rgb::new(0, 0, 0),
            end: Rgb::new(1, 1, 1),
            duration_secs: 1.0,
        };
        let err = Builtin::ColorShift
            .construct(
                vec![
                    Value::Color(inner),
                    Value::Color(ColorValue::Static(Rgb::new(0, 0, 0))),
                    Value::Seconds(1.0),
                ],
                Vec::new(),
                3,
                100,
            )
            .unwrap_err();
        assert_eq!(err.kind, crate::dsl::error::ErrorKind::Type);
    }

    #[test]
    fn wait_rejects_negative_seconds() {
        let err = Builtin::Wait
            .construct(vec![Value::Seconds(-0.5)], Vec::new(), 2, 100)
            .unwrap_err();
        assert_eq!(err.kind, crate::dsl::error::ErrorKind::Type);
    }

    #[test]
    fn static_builds_action_with_frames_and_tags() {
        let v = Builtin::Static
            .construct(
                vec![
                    Value::Selector(Selector::range(1, 3)),
                    Value::Color(ColorValue::Static(Rgb::new(255, 0, 0))),
                ],
                vec!["fade".into(), "slow".into()],
                1,
                100,
            )
            .unwrap();
        let Value::Action(action) = v else {
            panic!("expected action");
        };
        assert_eq!(action.selector.indices(), &[1, 2, 3]);
        assert_eq!(action.frames.len(), 1);
        assert_eq!(action.tags, vec!["fade", "slow"]);
    }
}
