/// Outcome of a strength check. `ok` alone decides acceptance; `reasons`
/// lists every violated rule so the caller can show all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PasswordStrength {
    pub ok: bool,
    pub reasons: Vec<String>,
}

impl PasswordStrength {
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}
