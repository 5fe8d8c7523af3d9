/// A single calendar row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The impact cell has a marker element but the marker carries no class.
    MissingImpactClass,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::MissingImpactClass => {
                write!(f, "impact marker has no class attribute")
            }
        }
    }
}

impl std::error::Error for RowError {}
