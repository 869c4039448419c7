//! Receipt text parser - splits recognized text into title and body.

/// Parsed receipt text: the first recognized line and the remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReceipt {
    /// First non-empty portion of the first line, title-cased.
    pub title: String,
    /// Remaining lines, title-cased per line.
    pub body: String,
}

impl ParsedReceipt {
    /// Title and body joined, as fed to the classifier.
    pub fn combined(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.body)
        }
    }
}

/// Parser for raw recognized text.
///
/// Total over any input: no newline means the whole input becomes the
/// title, empty input yields empty title and body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptParser;

impl ReceiptParser {
    pub fn new() -> Self {
        Self
    }

    /// Split `raw` into a title-cased (title, body) pair.
    pub fn parse(&self, raw: &str) -> ParsedReceipt {
        if raw.is_empty() {
            return ParsedReceipt {
                title: String::new(),
                body: String::new(),
            };
        }

        let (head, rest) = match raw.find('\n') {
            Some(idx) => (&raw[..idx], &raw[idx + 1..]),
            None => (raw, ""),
        };

        let title = capitalize_words(head.trim());
        let body = rest
            .lines()
            .map(|line| capitalize_words(line.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        ParsedReceipt { title, body }
    }
}

/// Title-case every whitespace-separated word: first character uppercased,
/// the rest lowercased. Inner whitespace runs collapse to a single space.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_title_and_body() {
        let parser = ReceiptParser::new();
        let parsed = parser.parse("Cotton On\nTEE - $12.00, PANTS - $23.99");

        assert_eq!(parsed.title, "Cotton On");
        assert_eq!(parsed.body, "Tee - $12.00, Pants - $23.99");
    }

    #[test]
    fn empty_input_yields_empty_outputs() {
        let parsed = ReceiptParser::new().parse("");
        assert_eq!(parsed.title, "");
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn input_without_newline_becomes_title() {
        let parsed = ReceiptParser::new().parse("countdown auckland");
        assert_eq!(parsed.title, "Countdown Auckland");
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn multi_line_body_is_capitalized_per_line() {
        let parsed = ReceiptParser::new().parse("PAK N SAVE\nMILK 2L\nBREAD white");
        assert_eq!(parsed.title, "Pak N Save");
        assert_eq!(parsed.body, "Milk 2l\nBread White");
    }

    #[test]
    fn leading_whitespace_on_title_is_trimmed() {
        let parsed = ReceiptParser::new().parse("  new world  \nAPPLES");
        assert_eq!(parsed.title, "New World");
        assert_eq!(parsed.body, "Apples");
    }

    #[test]
    fn title_only_newline_yields_empty_title() {
        let parsed = ReceiptParser::new().parse("\nSOMETHING");
        assert_eq!(parsed.title, "");
        assert_eq!(parsed.body, "Something");
    }

    #[test]
    fn combined_joins_title_and_body() {
        let parsed = ReceiptParser::new().parse("Countdown\nMILK");
        assert_eq!(parsed.combined(), "Countdown\nMilk");

        let title_only = ReceiptParser::new().parse("Countdown");
        assert_eq!(title_only.combined(), "Countdown");
    }
}
