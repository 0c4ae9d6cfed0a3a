#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarningRecord {
    pub warn_number: u64,
}
