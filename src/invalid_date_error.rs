
#[derive(Debug)]
pub struct InvalidDateError {
    pub input: String,
    pub format: String,
}

impl std::fmt::Display for InvalidDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid date format {:?}! Please use {}.",
            self.input,
            human_format(&self.format)
        )
    }
}

impl std::error::Error for InvalidDateError {}

// "%Y-%m-%d" reads better to an operator as "YYYY-MM-DD".
pub fn human_format(format: &str) -> String {
    format
        .replace("%Y", "YYYY")
        .replace("%m", "MM")
        .replace("%d", "DD")
}
