use std::fmt;

/// Ordered, case-insensitive set of tokens stored in a single parameter,
/// such as the `domain` or `qop` directive of a Digest challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits on whitespace and commas; duplicates are dropped.
    pub fn parse(value: &str) -> Self {
        value
            .split(is_separator)
            .filter(|token| !token.is_empty())
            .collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.find(token).is_some()
    }

    pub fn find(&self, token: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t.eq_ignore_ascii_case(token))
    }

    /// Returns `true` if the token was not already present.
    ///
    /// Empty tokens and tokens containing a separator are refused, since they
    /// would not read back as a single entry.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.is_empty() || token.contains(is_separator) || self.contains(&token) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Returns `true` if the token was present.
    pub fn remove(&mut self, token: &str) -> bool {
        match self.find(token) {
            Some(idx) => {
                self.tokens.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Space-joined form used as the parameter value.
    pub fn to_value(&self) -> String {
        self.tokens.join(" ")
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_ascii_whitespace()
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}
