use logos::Logos;

/// The tokens of an embedded solve call, such as `solve("x^2", operation='derivative')`.
///
/// Quoted strings are not tokens: free text is full of apostrophes, and a string token would
/// swallow everything up to the next one. The parser reads string contents itself, starting at a
/// [`CallToken::Quote`].
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum CallToken {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token(",")]
    Comma,

    #[token("=")]
    Equals,

    #[regex(r#"["']"#)]
    Quote,
}
