//! Word segmentation for identifiers
//!
//! Architectural Principle: Explicit State Machines - Segmentation is a scanner over character
//! classes with one character of lookahead at acronym boundaries, not a regular expression.
//!
//! Rules:
//! - a lowercase-or-digit to uppercase transition starts a new word
//! - an uppercase run of three or more followed by a lowercase letter is an acronym that
//!   ends before the run's last capital (`XMLParser` -> `XML`, `Parser`)
//! - an uppercase pair followed by two or more lowercase letters is one word
//!   (`OAuth2Client` -> `OAuth2`, `Client`)
//! - an uppercase run that starts the identifier (or follows a separator) and is followed by
//!   exactly one lowercase letter is ambiguous (`ABcService` -> `A`, `Bc`, `Service` and
//!   `ABCdService` -> `AB`, `Cd`, `Service`, both flagged)
//! - after a lowercase letter or digit the same shape is a pluralized acronym
//!   (`userIDs` -> `user`, `IDs`)
//! - digits attach to the preceding word; separators end the current word

/// Character classes the scanner distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Upper,
    Lower,
    Digit,
    /// `_`, `-` and `.`
    Separator,
    Other,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        if c.is_uppercase() {
            Self::Upper
        } else if c.is_lowercase() {
            Self::Lower
        } else if c.is_numeric() {
            Self::Digit
        } else if matches!(c, '_' | '-' | '.') {
            Self::Separator
        } else if c.is_alphabetic() {
            // Caseless scripts continue words like lowercase letters do
            Self::Lower
        } else {
            Self::Other
        }
    }
}

/// How a word is cased
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordShape {
    /// `user`
    Lower,
    /// `Parser`, `X`
    Capitalized,
    /// `XML`, `MP3`
    Acronym,
    /// `OAuth`
    MixedPrefix,
    /// Starts with a digit
    Numeric,
}

/// One segmented word, borrowed from the identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    /// Byte offset in the identifier
    pub start: usize,
    pub shape: WordShape,
}

impl<'a> Word<'a> {
    /// Capitals of an acronym word without its digit or plural tail (`MP3` -> `MP`, `IDs` -> `ID`)
    pub fn letters(&self) -> &'a str {
        self.text.trim_end_matches(|c: char| c.is_numeric() || c.is_lowercase())
    }
}

/// Result of segmenting one identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation<'a> {
    pub words: Vec<Word<'a>>,
    /// The first word-initial uppercase run + single lowercase letter found, e.g. `ABc`
    pub ambiguous_run: Option<&'a str>,
}

impl<'a> Segmentation<'a> {
    pub fn texts(&self) -> Vec<&'a str> {
        self.words.iter().map(|w| w.text).collect()
    }

    pub fn acronyms(&self) -> impl Iterator<Item = &Word<'a>> {
        self.words.iter().filter(|w| w.shape == WordShape::Acronym)
    }
}

struct Scanner<'a> {
    identifier: &'a str,
    open: Option<(usize, WordShape)>,
    words: Vec<Word<'a>>,
    ambiguous_run: Option<&'a str>,
}

impl<'a> Scanner<'a> {
    fn new(identifier: &'a str) -> Self {
        Self { identifier, open: None, words: Vec::new(), ambiguous_run: None }
    }

    fn open(&mut self, start: usize, shape: WordShape) {
        self.open = Some((start, shape));
    }

    fn continue_or_open(&mut self, start: usize, shape: WordShape) {
        if self.open.is_none() {
            self.open(start, shape);
        }
    }

    fn close(&mut self, end: usize) {
        if let Some((start, shape)) = self.open.take() {
            if end > start {
                self.words.push(Word { text: &self.identifier[start..end], start, shape });
            }
        }
    }

    fn flag_ambiguous(&mut self, start: usize, end: usize) {
        if self.ambiguous_run.is_none() {
            self.ambiguous_run = Some(&self.identifier[start..end]);
        }
    }

    fn finish(mut self) -> Segmentation<'a> {
        self.close(self.identifier.len());
        Segmentation { words: self.words, ambiguous_run: self.ambiguous_run }
    }
}

/// Split an identifier into words
pub fn segment(identifier: &str) -> Segmentation<'_> {
    let chars: Vec<(usize, CharClass)> =
        identifier.char_indices().map(|(offset, c)| (offset, CharClass::of(c))).collect();
    let offset_at = |index: usize| chars.get(index).map_or(identifier.len(), |c| c.0);
    let class_at = |index: usize| chars.get(index).map(|c| c.1);

    let mut scanner = Scanner::new(identifier);
    let mut i = 0;

    while i < chars.len() {
        let (offset, class) = chars[i];
        match class {
            CharClass::Separator | CharClass::Other => {
                scanner.close(offset);
                i += 1;
            }
            CharClass::Digit => {
                scanner.continue_or_open(offset, WordShape::Numeric);
                i += 1;
            }
            CharClass::Lower => {
                scanner.continue_or_open(offset, WordShape::Lower);
                i += 1;
            }
            CharClass::Upper => {
                scanner.close(offset);

                let run_end = (i..chars.len())
                    .find(|&j| chars[j].1 != CharClass::Upper)
                    .unwrap_or(chars.len());
                let run_len = run_end - i;

                if class_at(run_end) != Some(CharClass::Lower) {
                    let shape = if run_len == 1 { WordShape::Capitalized } else { WordShape::Acronym };
                    scanner.open(offset, shape);
                } else if run_len == 1 {
                    scanner.open(offset, WordShape::Capitalized);
                } else {
                    let lower_tail = (run_end..chars.len())
                        .take_while(|&j| chars[j].1 == CharClass::Lower)
                        .count();

                    let after_boundary =
                        i > 0 && matches!(chars[i - 1].1, CharClass::Lower | CharClass::Digit);

                    if run_len == 2 && lower_tail >= 2 {
                        scanner.open(offset, WordShape::MixedPrefix);
                    } else if lower_tail == 1 && after_boundary {
                        // the lowercase letter continues the acronym word
                        scanner.open(offset, WordShape::Acronym);
                    } else {
                        if lower_tail == 1 {
                            scanner.flag_ambiguous(offset, offset_at(run_end + 1));
                        }
                        let last_capital = offset_at(run_end - 1);
                        scanner.open(offset, WordShape::Acronym);
                        scanner.close(last_capital);
                        scanner.open(last_capital, WordShape::Capitalized);
                    }
                }

                i = run_end;
            }
        }
    }

    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("XMLParser", &["XML", "Parser"])]
    #[case("OAuth2Client", &["OAuth2", "Client"])]
    #[case("ABcService", &["A", "Bc", "Service"])]
    #[case("ABCdService", &["AB", "Cd", "Service"])]
    #[case("userIDs", &["user", "IDs"])]
    #[case("allURLsLoaded", &["all", "URLs", "Loaded"])]
    #[case("getABc", &["get", "ABc"])]
    #[case("getXMLParser", &["get", "XML", "Parser"])]
    #[case("parseXML", &["parse", "XML"])]
    #[case("MP3Player", &["MP3", "Player"])]
    #[case("IOStream", &["IO", "Stream"])]
    #[case("userProfileManager", &["user", "Profile", "Manager"])]
    #[case("userprofilemanager", &["userprofilemanager"])]
    #[case("DATAPROCESSOR", &["DATAPROCESSOR"])]
    #[case("DATABASE_URL", &["DATABASE", "URL"])]
    #[case("max_count", &["max", "count"])]
    #[case("Product-Manager", &["Product", "Manager"])]
    #[case("com.example.naming", &["com", "example", "naming"])]
    #[case("getX", &["get", "X"])]
    #[case("x", &["x"])]
    #[case("user2name", &["user2name"])]
    #[case("", &[])]
    fn test_segmentation(#[case] identifier: &str, #[case] expected: &[&str]) {
        assert_eq!(segment(identifier).texts(), expected);
    }

    #[test]
    fn test_shapes() {
        let seg = segment("OAuth2ClientXML");
        let shapes: Vec<_> = seg.words.iter().map(|w| w.shape).collect();
        assert_eq!(
            shapes,
            vec![WordShape::MixedPrefix, WordShape::Capitalized, WordShape::Acronym]
        );
    }

    #[test]
    fn test_ambiguous_run_is_reported() {
        assert_eq!(segment("ABcService").ambiguous_run, Some("ABc"));
        assert_eq!(segment("ABCdService").ambiguous_run, Some("ABCd"));
        assert_eq!(segment("getABc").ambiguous_run, None);
        assert_eq!(segment("userIDs").ambiguous_run, None);
        assert_eq!(segment("XMLParser").ambiguous_run, None);
        assert_eq!(segment("OAuth2Client").ambiguous_run, None);
    }

    #[test]
    fn test_word_offsets() {
        let seg = segment("getXMLParser");
        let starts: Vec<_> = seg.words.iter().map(|w| w.start).collect();
        assert_eq!(starts, vec![0, 3, 6]);
    }

    #[test]
    fn test_acronym_letters_strip_digits() {
        let seg = segment("MP3Player");
        let acronym = seg.acronyms().next().unwrap();
        assert_eq!(acronym.letters(), "MP");

        let seg = segment("userIDs");
        let acronym = seg.acronyms().next().unwrap();
        assert_eq!(acronym.letters(), "ID");
    }

    #[test]
    fn test_non_ascii_identifiers() {
        assert_eq!(segment("überGröße").texts(), vec!["über", "Größe"]);
        assert_eq!(segment("ÄÖÜber").texts(), vec!["ÄÖ", "Über"]);
    }
}
