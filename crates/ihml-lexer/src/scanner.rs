use crate::table::MacroTable;
use crate::token::{Token, TokenKind};

/// IHML source scanner.
///
/// Produces tokens one at a time from an in-memory source buffer while
/// tracking line, column, and the tab-indent depth of the current line.
/// Recognizes quoted text and raw-HTML literals, `//` comments, `( ) !`
/// punctuation, the fixed keyword vocabulary, and `@name` macro
/// definitions, whose indented bodies are captured into the macro table.
///
/// The scanner never fails: lexical problems (an unterminated literal, a
/// stray symbol) come back as `TokenKind::Error` tokens and the caller
/// decides what to do with them.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    start: usize,
    start_line: usize,
    start_column: usize,
    line: usize,
    column: usize,
    indent: usize,
    macros: MacroTable,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        let mut scanner = Self {
            chars: source.chars().collect(),
            pos: 0,
            start: 0,
            start_line: 1,
            start_column: 1,
            line: 1,
            column: 1,
            indent: 0,
            macros: MacroTable::new(),
        };
        scanner.count_indentation();
        scanner
    }

    /// Macros captured so far.
    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Consume the scanner, handing over the macro table.
    pub fn into_macros(self) -> MacroTable {
        self.macros
    }

    /// Scan the next token.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            self.start = self.pos;
            self.start_line = self.line;
            self.start_column = self.column;

            let ch = self.peek();

            return match ch {
                '\0' => self.make(TokenKind::Eof),

                '"' => self.quoted(TokenKind::Text, '"'),
                '`' => self.quoted(TokenKind::RawHtml, '`'),

                // Comments run to end of line and are not tokens
                '/' if self.peek_next() == '/' => {
                    while self.peek() != '\0' && self.peek() != '\n' {
                        self.advance();
                    }
                    continue;
                }

                '(' => {
                    self.advance();
                    self.make(TokenKind::LParen)
                }
                ')' => {
                    self.advance();
                    self.make(TokenKind::RParen)
                }
                '!' => {
                    self.advance();
                    self.make(TokenKind::Exclamation)
                }

                '@' => self.macro_definition(),

                c if c.is_ascii_alphanumeric() => self.identifier(),

                // Stray symbol that cannot start any token
                _ => {
                    self.advance();
                    self.make(TokenKind::Error)
                }
            };
        }
    }

    // --- Whitespace and indentation ---

    /// Skip spaces, carriage returns, tabs, and newlines between tokens.
    /// Crossing a newline recounts the next line's indentation.
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\r' | '\t' => self.advance(),
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                    self.count_indentation();
                }
                _ => break,
            }
        }
    }

    /// Count the run of leading tabs on the current line. Only `\t` is an
    /// indentation character; spaces and carriage returns never contribute
    /// to depth.
    fn count_indentation(&mut self) {
        self.indent = 0;
        while self.peek() == '\t' {
            self.advance();
            self.indent += 1;
        }
    }

    // --- Scanners ---

    /// Scan a quoted literal (`"…"` text or `` `…` `` raw HTML). Both
    /// delimiters stay in the lexeme. An embedded line break is tolerated
    /// and advances the line counter; hitting end of input first yields an
    /// `Error` token spanning from the opening delimiter.
    fn quoted(&mut self, kind: TokenKind, end: char) -> Token {
        self.advance(); // opening delimiter

        loop {
            match self.peek() {
                '\0' => return self.make(TokenKind::Error),
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                c if c == end => break,
                _ => self.advance(),
            }
        }

        self.advance(); // closing delimiter
        self.make(kind)
    }

    /// Scan a maximal alphanumeric run and classify it against the keyword
    /// table.
    fn identifier(&mut self) -> Token {
        while self.peek().is_ascii_alphanumeric() {
            self.advance();
        }
        let ident: String = self.chars[self.start..self.pos].iter().collect();
        self.make(Self::keyword_or_ident(&ident))
    }

    /// Scan a macro definition: `@name` followed by an indented block.
    ///
    /// The block is every token scanned until one appears at indent depth
    /// zero (or the input ends). Its raw source text, trailing whitespace
    /// trimmed, is registered under `name`; the cursor is then rewound so
    /// the terminating token is scanned again normally. The returned
    /// `MacroDef` token is positioned at the start of the captured block.
    fn macro_definition(&mut self) -> Token {
        self.advance(); // '@'

        let name_start = self.pos;
        while self.peek().is_ascii_alphanumeric() {
            self.advance();
        }
        if self.pos == name_start {
            return self.make(TokenKind::Error);
        }
        let name: String = self.chars[name_start..self.pos].iter().collect();

        self.skip_whitespace();

        let block_start = self.pos;
        let block_line = self.line;
        let block_column = self.column;
        let block_indent = self.indent;

        let mut terminator = self.next_token();
        while terminator.indent > 0
            && !matches!(terminator.kind, TokenKind::Eof | TokenKind::Error)
        {
            terminator = self.next_token();
        }

        // `start` still marks where the terminating token began
        let block_end = self.start;
        let body: String = self.chars[block_start..block_end].iter().collect();
        self.macros
            .set(name, body.trim_end().to_string());

        // Rewind so the terminating token is produced again on the next call
        self.pos = block_end;
        self.line = terminator.line;
        self.column = terminator.column;
        self.indent = terminator.indent;

        Token::new(
            TokenKind::MacroDef,
            body,
            block_line,
            block_column,
            block_indent,
        )
    }

    // --- Keyword detection ---

    /// Classify a scanned identifier against the fixed keyword vocabulary.
    /// Matching is case-sensitive and exact; anything else stays an
    /// identifier.
    fn keyword_or_ident(ident: &str) -> TokenKind {
        match ident {
            "document" => TokenKind::Document,
            "head" | "data" => TokenKind::Head,
            "body" | "content" => TokenKind::Body,
            "div" | "container" => TokenKind::Container,
            "title" => TokenKind::Title,
            "css" => TokenKind::Css,
            "p" => TokenKind::Paragraph,
            "h1" => TokenKind::Heading(1),
            "h2" => TokenKind::Heading(2),
            "h3" => TokenKind::Heading(3),
            "h4" => TokenKind::Heading(4),
            "h5" => TokenKind::Heading(5),
            "h6" => TokenKind::Heading(6),
            _ => TokenKind::Identifier,
        }
    }

    // --- Helpers ---

    fn make(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            self.chars[self.start..self.pos].iter().collect(),
            self.start_line,
            self.start_column,
            self.indent,
        )
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.pos]
        }
    }

    fn peek_next(&self) -> char {
        if self.pos + 1 >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.pos + 1]
        }
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
            self.column += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}
