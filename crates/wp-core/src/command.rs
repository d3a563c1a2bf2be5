//! Command kinds understood by the agent.
//!
//! The wire carries the kind as a free string.  Known kinds get their own
//! variant; anything else is preserved verbatim in `Other` so it can be
//! echoed back in the `complete` report.

/// Discriminator of a remote command.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum CommandKind {
    /// Walk to a named location.
    GoTo,
    /// Stay in place (working) for `value` seconds.
    Waiting,
    /// Pop a status delta on the HUD.  Never queued.
    UpdateState,
    /// Any kind this build does not know.  Acknowledged as a no-op.
    Other(String),
}

impl CommandKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "go_to"        => CommandKind::GoTo,
            "waiting"      => CommandKind::Waiting,
            "update_state" => CommandKind::UpdateState,
            other          => CommandKind::Other(other.to_owned()),
        }
    }

    /// Wire label.
    pub fn as_str(&self) -> &str {
        match self {
            CommandKind::GoTo        => "go_to",
            CommandKind::Waiting     => "waiting",
            CommandKind::UpdateState => "update_state",
            CommandKind::Other(s)    => s,
        }
    }

    /// `true` for kinds that occupy the agent physically (and can therefore
    /// be deferred by a suspend cooldown).
    #[inline]
    pub fn is_physical(&self) -> bool {
        matches!(self, CommandKind::GoTo | CommandKind::Waiting)
    }
}

impl From<&str> for CommandKind {
    fn from(s: &str) -> Self {
        CommandKind::parse(s)
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
