//! Runtime configuration shared by the checker library and its thin CLI front-end.

/// Tunables for one checking/minimisation run.
#[derive(Debug, Clone)]
pub struct CheckerOptions {
    /// Promote `ContradictionAbsent` from a logged warning to a hard error.
    pub strict_contradiction_checks: bool,
    /// Where to write the antecedent side-band, overriding the driver's default path.
    pub antecedent_sideband_path: Option<std::path::PathBuf>,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            strict_contradiction_checks: false,
            antecedent_sideband_path: None,
        }
    }
}
