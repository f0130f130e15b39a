pub const DATE_COLUMN: &str = "LICENSE_START_DATE";
pub const PHONE_COLUMN: &str = "PHONE";
pub const LINK_COLUMN: &str = "WHATSAPP";

pub const PRUNED_COLUMNS: [&str; 5] = [
    "GENDER_EN",
    "LICENSE_END_DATE",
    "WEBPAGE",
    "FAX",
    "REAL_ESTATE_NUMBER",
];

pub const DEFAULT_DISPLAY_KEYWORDS: [&str; 2] = ["BROKER", "NAME"];

/// Chooses the column shown next to the link in the minimal layout.
pub trait DisplayColumnPolicy {
    fn display_column<'a>(&self, candidates: &'a [String]) -> Option<&'a str>;
}

/// Picks the first column whose name contains one of the keywords,
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameLikeColumn {
    keywords: Vec<String>,
}

impl NameLikeColumn {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_uppercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for NameLikeColumn {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_KEYWORDS)
    }
}

impl DisplayColumnPolicy for NameLikeColumn {
    fn display_column<'a>(&self, candidates: &'a [String]) -> Option<&'a str> {
        candidates
            .iter()
            .find(|column| {
                let upper = column.to_uppercase();
                self.keywords
                    .iter()
                    .any(|keyword| upper.contains(keyword.as_str()))
            })
            .map(String::as_str)
    }
}
