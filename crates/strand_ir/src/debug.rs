//! Source locations attached to wiring calls.

use std::fmt;
use std::panic::Location;

/// Where a wire was made.
///
/// Captured automatically from the caller of [`Design::wire`](crate::Design::wire).
/// Purely diagnostic; its absence never changes the netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebugInfo {
    /// Source file of the call.
    pub file: &'static str,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl DebugInfo {
    /// Captures the location of the calling function's caller.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for DebugInfo {
    fn from(loc: &'static Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
            column: loc.column(),
        }
    }
}

impl fmt::Display for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
