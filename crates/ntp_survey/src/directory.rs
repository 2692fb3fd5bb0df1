// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Pattern matching over directory pages.
//!
//! Listings and detail pages are loosely structured HTML. Nothing here parses
//! markup: rows and labels are recognized by small line-oriented matchers that
//! return `None` on any mismatch, so a change in page layout yields fewer
//! results rather than an error.

use reqwest::Url;

use crate::country::CountryCode;

/// Label preceding the advertised host name on a detail page.
pub const HOSTNAME_LABEL: &str = "Hostname";

/// A fetched directory page.
#[derive(Clone, Debug)]
pub struct DirectoryPage {
    text: String,
}

impl DirectoryPage {
    /// Wrap raw page text.
    pub fn new(text: impl Into<String>) -> Self {
        DirectoryPage { text: text.into() }
    }

    /// The raw page text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Links in listing rows that mention `code`, in page order.
    pub fn candidate_links<'a>(
        &'a self,
        code: &'a CountryCode,
        base: &'a Url,
    ) -> impl Iterator<Item = Url> + 'a {
        let word = code.upper();
        self.text
            .lines()
            .filter_map(move |line| match_row_word(line, &word, base))
    }

    /// The advertised host name of a detail page.
    ///
    /// This is the trimmed line after a line containing [`HOSTNAME_LABEL`].
    /// When the label appears more than once the last occurrence wins.
    ///
    /// ```
    /// use ntp_survey::directory::DirectoryPage;
    ///
    /// let page = DirectoryPage::new("Hostname:\n  ntp.example.fr\n");
    /// assert_eq!(page.hostname(), Some("ntp.example.fr"));
    /// ```
    pub fn hostname(&self) -> Option<&str> {
        let mut cursor = LabelCursor::new(HOSTNAME_LABEL);
        for line in self.text.lines() {
            cursor.feed(line);
        }
        cursor.value()
    }
}

/// Tracks "label on one line, value on the next".
#[derive(Debug)]
struct LabelCursor<'a> {
    label: &'static str,
    armed: bool,
    value: Option<&'a str>,
}

impl<'a> LabelCursor<'a> {
    fn new(label: &'static str) -> Self {
        LabelCursor {
            label,
            armed: false,
            value: None,
        }
    }

    fn feed(&mut self, line: &'a str) {
        if self.armed {
            self.value = Some(line.trim());
        }
        self.armed = line.contains(self.label);
    }

    fn value(&self) -> Option<&'a str> {
        self.value.filter(|v| !v.is_empty())
    }
}

/// Match one listing line against a country code.
///
/// The line qualifies when the upper-cased code occurs as a whole word. The
/// link is the whitespace-separated field third from the end, which must start
/// with `href`; its value (after the first `=`, up to `>`, unquoted) is
/// resolved against `base`.
pub fn match_row(line: &str, code: &CountryCode, base: &Url) -> Option<Url> {
    match_row_word(line, &code.upper(), base)
}

fn match_row_word(line: &str, word: &str, base: &Url) -> Option<Url> {
    if word.is_empty() || !contains_word(line, word) {
        return None;
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    let field = fields.len().checked_sub(3).map(|i| fields[i])?;
    if !field.starts_with("href") {
        return None;
    }
    let (_, value) = field.split_once('=')?;
    let value = value.split('>').next()?;
    let link = value.trim_matches(|c| c == '"' || c == '\'');
    if link.is_empty() {
        return None;
    }
    base.join(link).ok()
}

/// True when `word` occurs in `line` with no ASCII alphanumeric neighbour.
fn contains_word(line: &str, word: &str) -> bool {
    let bytes = line.as_bytes();
    line.match_indices(word).any(|(start, m)| {
        let end = start + m.len();
        let before = start.checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(end).copied();
        !before.is_some_and(|b| b.is_ascii_alphanumeric())
            && !after.is_some_and(|b| b.is_ascii_alphanumeric())
    })
}
