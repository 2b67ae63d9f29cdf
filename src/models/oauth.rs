/// Query string GitHub appends when it redirects back to us.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
}

impl CallbackParams {
    /// Built from raw query pairs so a repeated `code` does not fail
    /// extraction; the last occurrence wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let code = pairs
            .into_iter()
            .filter(|(key, _)| key == "code")
            .map(|(_, value)| value)
            .last();

        Self { code }
    }
}
