//! Error codes for all compiler diagnostics.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Syntax shape errors (a name that must be an identifier is not,
///   a layout bound with the wrong number of arguments)
/// - E2xxx: Name resolution and registration errors
/// - E6xxx: Constant evaluation errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax shape (E1xxx)
    /// Expected an identifier
    E1001,
    /// Wrong number of layout arguments
    E1002,

    // Registration (E2xxx)
    /// Duplicate definition of a structure, layout, constant or member
    E2001,
    /// Duplicate layout parameter
    E2002,
    /// Member name shadows a global constant
    E2003,
    /// Unknown identifier
    E2004,
    /// Unknown structure
    E2005,
    /// Structure re-entered while it is still being registered
    E2006,
    /// Layout arguments configured for a layout that does not exist
    E2007,

    // Evaluation (E6xxx)
    /// Division by zero
    E6001,
    /// Modulo by zero
    E6002,
    /// Integer overflow
    E6003,
    /// Type mismatch
    E6004,
    /// Shift amount out of range
    E6005,
    /// Value does not fit its output encoding
    E6006,

    // Internal (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_code() {
        assert_eq!(ErrorCode::E2007.to_string(), "E2007");
        assert_eq!(ErrorCode::E9002.to_string(), "E9002");
    }
}
