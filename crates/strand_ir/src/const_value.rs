//! Constant values used for instance parameters and primitive attributes.

use serde::{Deserialize, Serialize};
use std::fmt;
use strand_common::Logic;

/// A compile-time constant.
///
/// Instances carry a list of named parameters (for example `width = 8`) that
/// the flattener copies verbatim onto the leaf it creates. The core never
/// interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    /// An integer constant.
    Int(i64),
    /// A floating-point constant.
    Real(f64),
    /// A single logic level.
    Logic(Logic),
    /// A string constant.
    String(String),
    /// A boolean constant.
    Bool(bool),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::Real(v) => write!(f, "{v}"),
            ConstValue::Logic(v) => write!(f, "1'b{v}"),
            ConstValue::String(v) => write!(f, "{v:?}"),
            ConstValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        assert_eq!(ConstValue::Int(8).to_string(), "8");
        assert_eq!(ConstValue::Logic(Logic::One).to_string(), "1'b1");
        assert_eq!(ConstValue::String("coreir_and".into()).to_string(), "\"coreir_and\"");
        assert_eq!(ConstValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn const_value_serde_roundtrip() {
        let vals = vec![
            ConstValue::Int(-100),
            ConstValue::Real(9.81),
            ConstValue::Logic(Logic::Z),
            ConstValue::String("test".to_string()),
            ConstValue::Bool(false),
        ];
        for val in vals {
            let json = serde_json::to_string(&val).unwrap();
            let restored: ConstValue = serde_json::from_str(&json).unwrap();
            assert_eq!(val, restored);
        }
    }
}
