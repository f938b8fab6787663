//! Extension-internal messages routed by the host environment.

use serde::{Deserialize, Serialize};

/// A request addressed to the host environment rather than the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionMessage {
    /// Open the settings surface.
    OpenOptionsPage,
}
