/// Invite status stored as an integer column: rejected=0, accepted=1,
/// pending=2. Accepted and rejected are terminal; enforcement lives in the
/// operation guards, not the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteStatus {
    Rejected,
    Accepted,
    Pending,
}

impl InviteStatus {
    pub fn as_i64(&self) -> i64 {
        match self {
            InviteStatus::Rejected => 0,
            InviteStatus::Accepted => 1,
            InviteStatus::Pending => 2,
        }
    }

    pub fn from_i64(v: i64) -> Option<Self> {
        match v {
            0 => Some(InviteStatus::Rejected),
            1 => Some(InviteStatus::Accepted),
            2 => Some(InviteStatus::Pending),
            _ => None,
        }
    }
}
