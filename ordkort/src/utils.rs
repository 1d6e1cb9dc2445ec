use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

/// Matches a parenthetical group along with the whitespace preceding it.
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("parenthetical regex"));

/// Removes every parenthetical group from `s` and trims the result.
///
/// `"bok (bøker)"` becomes `"bok"`.
#[must_use]
pub fn strip_parentheticals(s: &str) -> Cow<'_, str> {
    match PARENTHETICAL.replace_all(s, "") {
        Cow::Borrowed(stripped) => Cow::Borrowed(stripped.trim()),
        Cow::Owned(stripped) => Cow::Owned(stripped.trim().to_string()),
    }
}

/// Removes HTML tags from `s` and decodes its entities. Non-breaking spaces become plain spaces.
#[must_use]
pub fn strip_html(s: &str) -> String {
    Html::parse_fragment(s)
        .root_element()
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}
