/// Outcome of one verification task. Failure is kept distinct from a
/// confident "not the same face" so the two are observable separately,
/// even though the overlay renders both as "NO MATCH!".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Verdict {
    Match,
    #[default]
    NoMatch,
    Failed(String),
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }
}
