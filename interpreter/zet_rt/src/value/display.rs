//! Printed forms of values.
//!
//! `Display` produces the canonical form: strings carry quotes so that
//! container members are unambiguous. `display_unquoted` is the form the
//! `print` function and string concatenation use, where a top-level string
//! appears without quotes.

use std::fmt;

use zet_ir::render;

use crate::value::Value;

impl Value {
    /// Printed form with top-level strings unquoted.
    pub fn display_unquoted(&self) -> String {
        match self {
            Value::Str(s) => s.as_ref().clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Om => f.write_str("om"),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Rational(r) => write!(f, "{r}"),
            Value::Real(r) => {
                let mut sb = String::new();
                render::append_real(&mut sb, *r);
                f.write_str(&sb)
            }
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::List(items) => {
                f.write_str("[")?;
                write_members(f, items.iter())?;
                f.write_str("]")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                write_members(f, items.iter())?;
                f.write_str("}")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_members(f, items.iter())?;
                f.write_str(")")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in entries.iter() {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{k} => {v}")?;
                }
                f.write_str("}")
            }
            Value::Term(term) => write!(f, "{term}"),
            Value::Procedure(p) => write!(f, "{p}"),
            Value::Builtin(b) => f.write_str(b.name()),
            Value::ScopeRef(_) => f.write_str("<scope>"),
            Value::Object(obj) => write!(f, "{obj}"),
        }
    }
}

fn write_members<'a>(
    f: &mut fmt::Formatter<'_>,
    members: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    let mut first = true;
    for member in members {
        if !first {
            f.write_str(", ")?;
        }
        first = false;
        write!(f, "{member}")?;
    }
    Ok(())
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoms() {
        assert_eq!(Value::Om.to_string(), "om");
        assert_eq!(Value::int(-7).to_string(), "-7");
        assert_eq!(Value::real(2.0).to_string(), "2.0");
        assert_eq!(Value::string("hi").to_string(), "\"hi\"");
        assert_eq!(Value::string("hi").display_unquoted(), "hi");
    }

    #[test]
    fn containers() {
        let v = Value::list(vec![Value::int(1), Value::string("a")]);
        assert_eq!(v.to_string(), "[1, \"a\"]");
        let s = Value::set(vec![Value::int(2), Value::int(1)]);
        assert_eq!(s.to_string(), "{1, 2}");
    }
}
