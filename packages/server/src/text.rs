//! Request text admission.

use regex::Regex;
use refvoice_domain::TextPolicy;

/// Everything outside ASCII alphanumerics, whitespace and the punctuation the
/// model understands, including the brackets of tags such as `[laugh]`.
const DISALLOWED: &str = r#"[^A-Za-z0-9\s.,!?'\-"\[\]()]+"#;

/// Trims, filters and truncates text before it reaches the model.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    policy: TextPolicy,
    max_chars: usize,
    disallowed: Regex,
}

impl TextCleaner {
    pub fn new(policy: TextPolicy, max_chars: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            policy,
            max_chars,
            disallowed: Regex::new(DISALLOWED)?,
        })
    }

    pub fn policy(&self) -> TextPolicy {
        self.policy
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Trim, filter per policy, then keep at most `max_chars` characters.
    pub fn clean(&self, text: &str) -> String {
        let trimmed = text.trim();
        let filtered = match self.policy {
            TextPolicy::AllowList => self.disallowed.replace_all(trimmed, "").into_owned(),
            TextPolicy::StripControl => trimmed.chars().filter(|c| !c.is_control()).collect(),
        };
        match filtered.char_indices().nth(self.max_chars) {
            Some((cut, _)) => filtered[..cut].to_string(),
            None => filtered,
        }
    }
}
