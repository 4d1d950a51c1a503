use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

const DEFAULT_TAGS: [&str; 2] = ["journal", "driving-school"];
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DELIMITER: &str = "---\n";

/// Front matter synthesized for a markdown file that has none.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub(crate) struct FrontMatter {
    #[serde(rename = "tag")]
    pub tags: Vec<String>,
    pub date: String,
    pub draft: bool,
}

impl FrontMatter {
    pub fn new(created: NaiveDateTime) -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            date: created.format(DATE_FORMAT).to_string(),
            draft: true,
        }
    }

    /// YAML body wrapped in `---` delimiters, ready to be prepended.
    pub fn to_block(&self) -> Result<String, serde_yaml::Error> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("{DELIMITER}{yaml}{DELIMITER}"))
    }
}

static FRONT_MATTER_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Whether `content` starts with a `---` delimited block.
///
/// Only the delimiters are inspected, the block itself may not even be valid YAML.
pub(crate) fn has_front_matter(content: &str) -> bool {
    FRONT_MATTER_PATTERN
        .get_or_init(|| {
            regex::RegexBuilder::new(r"^---\s*\n(.+\n)*---\s*\n")
                .dot_matches_new_line(true)
                .build()
                .expect("front matter pattern is a valid regex")
        })
        .is_match(content)
}
