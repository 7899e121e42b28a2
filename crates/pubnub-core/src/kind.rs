//! Operation kinds: the tag carried by every request.
//!
//! The kind drives error messages and the per-operation rewrites the
//! request assembler applies after signing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of API operation a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum OperationKind {
    // Messaging (0x0000 - 0x00FF)
    /// Publish a message to a channel.
    Publish = 0x0001,
    /// Fetch stored messages from a channel.
    History = 0x0002,

    // Presence (0x0100 - 0x01FF)
    /// Set presence state for a UUID.
    SetState = 0x0100,

    // Channel groups (0x0200 - 0x02FF)
    /// Register channels in a channel group.
    AddChannelsToChannelGroup = 0x0200,
    /// Unregister channels from a channel group.
    RemoveChannelsFromChannelGroup = 0x0201,

    // Access manager (0x0300 - 0x03FF)
    /// Grant permissions.
    AccessManagerGrant = 0x0300,
    /// Revoke permissions.
    AccessManagerRevoke = 0x0301,
}

impl OperationKind {
    /// Convert to u16 for compact logging.
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Try to parse from u16.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0001 => Some(Self::Publish),
            0x0002 => Some(Self::History),
            0x0100 => Some(Self::SetState),
            0x0200 => Some(Self::AddChannelsToChannelGroup),
            0x0201 => Some(Self::RemoveChannelsFromChannelGroup),
            0x0300 => Some(Self::AccessManagerGrant),
            0x0301 => Some(Self::AccessManagerRevoke),
            _ => None,
        }
    }

    /// Check if this is an access manager operation.
    ///
    /// Access manager requests sign the literal `grant` segment instead of
    /// their path.
    pub fn is_access_manager(self) -> bool {
        (self.to_u16() & 0xFF00) == 0x0300
    }

    /// Human-readable operation name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "Publish",
            Self::History => "History",
            Self::SetState => "SetState",
            Self::AddChannelsToChannelGroup => "AddChannelsToChannelGroup",
            Self::RemoveChannelsFromChannelGroup => "RemoveChannelsFromChannelGroup",
            Self::AccessManagerGrant => "Grant",
            Self::AccessManagerRevoke => "Revoke",
        }
    }

    /// All operation kinds.
    pub const ALL: [OperationKind; 7] = [
        Self::Publish,
        Self::History,
        Self::SetState,
        Self::AddChannelsToChannelGroup,
        Self::RemoveChannelsFromChannelGroup,
        Self::AccessManagerGrant,
        Self::AccessManagerRevoke,
    ];
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method a request is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// The method as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
