/// Capability handed to admin-only operations.
///
/// Holding one means the calling surface already evaluated its own admin
/// predicate (a guild permission or role match, or the local operator console).
/// Nothing in this crate re-checks authorization.
#[derive(Clone, Copy, Debug)]
pub struct AdminGrant {
    _sealed: (),
}

impl AdminGrant {
    pub fn issue() -> Self {
        Self { _sealed: () }
    }
}
