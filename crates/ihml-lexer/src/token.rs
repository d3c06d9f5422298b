/// Token classification for IHML source.
///
/// The vocabulary is closed: every identifier the scanner reads is matched
/// against the fixed keyword table and anything unrecognized stays an
/// `Identifier`. Lexical failures are tokens too (`Error`) so the scanner
/// itself never fails; the compiler decides what is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // End of input
    Eof,
    // Lexical failure: unterminated literal or unrecognized character
    Error,

    // Structural keywords
    Document,
    Head,
    Body,
    Title,
    Container,

    // Leaf keywords
    Heading(u8), // h1..h6
    Paragraph,
    Css,

    // Literals
    Text,    // "…", delimiters kept in the lexeme
    RawHtml, // `…`, delimiters kept in the lexeme

    // Punctuation
    LParen,
    RParen,
    Exclamation,

    // Macro definition sigil (`@name` plus captured block)
    MacroDef,

    // Unrecognized identifier
    Identifier,
}

/// A token produced by the IHML scanner.
///
/// `text` is the raw lexeme copied from the source (quoted literals keep
/// both delimiters; a `MacroDef` carries the raw captured block). `indent`
/// is the leading tab count of the line the token starts on — the sole
/// signal the compiler uses for structural nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub indent: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: String, line: usize, column: usize, indent: usize) -> Self {
        Self {
            kind,
            text,
            line,
            column,
            indent,
        }
    }
}
