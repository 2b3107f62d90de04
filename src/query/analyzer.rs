use tantivy::tokenizer::{RawTokenizer, TextAnalyzer, TokenStream, WhitespaceTokenizer};

/// How query text is turned into terms at search time.
///
/// Index time never tokenizes: every leaf is a single keyword term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchAnalyzer {
    /// The whole query string is one term.
    #[default]
    Keyword,
    /// The query string is split on whitespace; each piece is a term.
    Whitespace,
}

impl SearchAnalyzer {
    pub fn name(&self) -> &'static str {
        match self {
            SearchAnalyzer::Keyword => "keyword",
            SearchAnalyzer::Whitespace => "whitespace",
        }
    }

    pub fn text_analyzer(&self) -> TextAnalyzer {
        match self {
            SearchAnalyzer::Keyword => TextAnalyzer::from(RawTokenizer::default()),
            SearchAnalyzer::Whitespace => TextAnalyzer::from(WhitespaceTokenizer::default()),
        }
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        let mut analyzer = self.text_analyzer();
        let mut stream = analyzer.token_stream(text);
        let mut terms = Vec::new();
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_keeps_whole_string() {
        assert_eq!(
            SearchAnalyzer::Keyword.analyze("some value here"),
            vec!["some value here"]
        );
    }

    #[test]
    fn test_whitespace_splits() {
        assert_eq!(
            SearchAnalyzer::Whitespace.analyze("  some value\there "),
            vec!["some", "value", "here"]
        );
        assert!(SearchAnalyzer::Whitespace.analyze("   ").is_empty());
    }

    #[test]
    fn test_keyword_does_not_lowercase() {
        assert_eq!(SearchAnalyzer::Keyword.analyze("MiXeD"), vec!["MiXeD"]);
    }
}
