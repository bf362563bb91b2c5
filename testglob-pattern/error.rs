/// The regex engine rejected the alternation built from a pattern list.
///
/// [`crate::compile`] never produces unbalanced classes, so this indicates
/// a bug in the compiler or an input the engine's dialect refuses (for
/// example an inverted range like `[z-a]`).
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid regex `{regex}` compiled from `{patterns}`")]
pub struct RegexCompileError {
    pub patterns: String,
    pub regex: String,
    #[source]
    pub source: regex::Error,
}
