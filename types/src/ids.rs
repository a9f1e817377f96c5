//! Identifier newtypes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identity of a managed tool: `server:tool`.
///
/// The server part is everything before the first `:`; the tool part may
/// itself contain colons. Both parts are non-empty by construction, enforced
/// at the serde boundary via `try_from`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolIdError {
    #[error("tool identity must be of the form 'server:tool'")]
    MissingSeparator,
    #[error("tool identity has an empty server or tool part")]
    EmptyPart,
}

impl ToolId {
    pub fn new(server: &str, tool: &str) -> Result<Self, ToolIdError> {
        if server.is_empty() || tool.is_empty() {
            return Err(ToolIdError::EmptyPart);
        }
        Ok(Self(format!("{server}:{tool}")))
    }

    /// The owning server's name (everything before the first `:`).
    #[must_use]
    pub fn server(&self) -> &str {
        // Constructor and parser guarantee the separator exists.
        self.0.split_once(':').map(|(s, _)| s).unwrap_or(&self.0)
    }

    /// The bare tool name (everything after the first `:`).
    #[must_use]
    pub fn tool(&self) -> &str {
        self.0.split_once(':').map(|(_, t)| t).unwrap_or(&self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ToolId {
    type Err = ToolIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (server, tool) = s.split_once(':').ok_or(ToolIdError::MissingSeparator)?;
        if server.is_empty() || tool.is_empty() {
            return Err(ToolIdError::EmptyPart);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ToolId {
    type Error = ToolIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToolId> for String {
    fn from(id: ToolId) -> Self {
        id.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to a control request parked for user approval.
///
/// The engine mints these (UUID v4); this type never inspects the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ApprovalToken(String);

impl ApprovalToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApprovalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_and_tool_parts() {
        let id: ToolId = "srv:echo".parse().expect("valid id");
        assert_eq!(id.server(), "srv");
        assert_eq!(id.tool(), "echo");
        assert_eq!(id.to_string(), "srv:echo");
    }

    #[test]
    fn tool_part_may_contain_colons() {
        let id: ToolId = "srv:ns:echo".parse().expect("valid id");
        assert_eq!(id.server(), "srv");
        assert_eq!(id.tool(), "ns:echo");
    }

    #[test]
    fn rejects_malformed_identities() {
        assert_eq!(
            "noseparator".parse::<ToolId>(),
            Err(ToolIdError::MissingSeparator)
        );
        assert_eq!(":tool".parse::<ToolId>(), Err(ToolIdError::EmptyPart));
        assert_eq!("srv:".parse::<ToolId>(), Err(ToolIdError::EmptyPart));
        assert_eq!(ToolId::new("", "echo"), Err(ToolIdError::EmptyPart));
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let id: ToolId = "srv:echo".parse().expect("valid id");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"srv:echo\"");
        let back: ToolId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ToolId>("\"bad\"").is_err());
    }
}
