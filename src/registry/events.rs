//! Outward notifications of membership transitions.

use serde::{Deserialize, Serialize};

use crate::core::{ObjectId, SubjectId};

/// A confirmed enter or exit, buffered until the host drains it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneNotification {
    SubjectEntered { zone: String, subject: SubjectId },
    SubjectExited { zone: String, subject: SubjectId },
    ObjectEntered { zone: String, object: ObjectId },
    ObjectExited { zone: String, object: ObjectId },
}

impl ZoneNotification {
    /// Id of the zone the transition happened in.
    #[must_use]
    pub fn zone(&self) -> &str {
        match self {
            ZoneNotification::SubjectEntered { zone, .. }
            | ZoneNotification::SubjectExited { zone, .. }
            | ZoneNotification::ObjectEntered { zone, .. }
            | ZoneNotification::ObjectExited { zone, .. } => zone,
        }
    }

    #[must_use]
    pub fn is_enter(&self) -> bool {
        matches!(
            self,
            ZoneNotification::SubjectEntered { .. } | ZoneNotification::ObjectEntered { .. }
        )
    }
}

/// Why a subject is leaving a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExitCause {
    /// Walked out. Keep-in rules may refuse the exit.
    Left,
    /// The zone was disabled, rebuilt or erased, or a sleeper was ejected.
    Evicted,
    /// The subject disconnected or stopped existing. No message is sent.
    Removed,
}

impl ExitCause {
    pub(crate) fn is_forced(self) -> bool {
        self != ExitCause::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let enter = ZoneNotification::SubjectEntered {
            zone: "Safe1".to_string(),
            subject: SubjectId(1),
        };
        let exit = ZoneNotification::ObjectExited {
            zone: "Safe1".to_string(),
            object: ObjectId(2),
        };
        assert_eq!(enter.zone(), "Safe1");
        assert!(enter.is_enter());
        assert!(!exit.is_enter());
        assert!(ExitCause::Removed.is_forced());
        assert!(!ExitCause::Left.is_forced());
    }
}
