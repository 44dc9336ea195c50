//! WebSocket close codes
//!
//! Defines bridge-specific close codes sent to the protocol adapter.

/// Bridge WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    /// The adapter sent an op only the gateway may send
    UnknownOpcode = 4001,
    /// Invalid payload encoding (JSON decode error)
    DecodeError = 4002,
    /// Another adapter already holds the bridge
    AlreadyConnected = 4005,
    /// The gateway is no longer processing events
    ShuttingDown = 4010,
}

impl CloseCode {
    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownOpcode => "Op not accepted from the adapter",
            Self::DecodeError => "Invalid payload encoding",
            Self::AlreadyConnected => "Another adapter is connected",
            Self::ShuttingDown => "Gateway shutting down",
        }
    }

    /// Get the name of this close code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnknownOpcode => "UnknownOpcode",
            Self::DecodeError => "DecodeError",
            Self::AlreadyConnected => "AlreadyConnected",
            Self::ShuttingDown => "ShuttingDown",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
