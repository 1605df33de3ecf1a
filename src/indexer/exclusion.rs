use regex::Regex;
use std::path::Path;

/// Name of the rule file looked up at the root of an indexed directory.
pub const EXCLUDE_FILE_NAME: &str = ".exclude_patterns";

/// Ordered regular expressions; a path is excluded if any of them matches
/// anywhere in it.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    rules: Vec<Regex>,
}

impl ExclusionRules {
    pub fn empty() -> Self {
        Self::default()
    }

    /// One rule per non-blank line. Lines that are not valid regexes are
    /// logged and dropped; the rest still apply.
    pub fn parse(text: &str) -> Self {
        let rules = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match Regex::new(line) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    tracing::warn!("Skipping invalid exclusion pattern {:?}: {}", line, e);
                    None
                }
            })
            .collect();

        Self { rules }
    }

    /// Reads `<root>/.exclude_patterns`. A missing or unreadable file
    /// yields no rules.
    pub fn load(root: &Path) -> Self {
        let file = root.join(EXCLUDE_FILE_NAME);
        if !file.exists() {
            return Self::empty();
        }

        match std::fs::read_to_string(&file) {
            Ok(text) => {
                let rules = Self::parse(&text);
                tracing::info!(
                    "Loaded {} exclusion pattern(s) from {}",
                    rules.len(),
                    file.display()
                );
                rules
            }
            Err(e) => {
                tracing::error!("Failed to read exclusion patterns {}: {}", file.display(), e);
                Self::empty()
            }
        }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        match self.rules.iter().find(|rule| rule.is_match(path)) {
            Some(rule) => {
                tracing::debug!("{} excluded by pattern {}", path, rule.as_str());
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }
}
