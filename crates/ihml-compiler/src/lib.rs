//! IHML Compiler
//!
//! Compiles an IHML source buffer into a single HTML document in one
//! forward pass. There is no AST: the compiler pulls tokens straight from
//! the scanner, keeps a stack of currently-open structural tags keyed by
//! indent depth, and appends opening/closing markup directly to an
//! append-only output buffer. A structural element stays open exactly as
//! long as subsequent content is indented strictly deeper than the
//! element's own line.
//!
//! ```text
//! source text → Scanner::next_token() → Compiler → "<!DOCTYPE html>…"
//! ```

use ihml_lexer::{Scanner, Token, TokenKind};

/// Hard ceiling on structural nesting. Deeper documents fail with
/// [`CompileError::NestingTooDeep`] instead of growing without bound.
pub const MAX_NESTING: usize = 256;

/// Compilation error with position information. Every variant is fatal:
/// the first error encountered ends the compile and no output is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Compile error at line {line}, column {column}: unterminated or unrecognized input '{lexeme}'")]
    Lexical {
        lexeme: String,
        line: usize,
        column: usize,
    },

    #[error("Compile error at line {line}, column {column}: expected quoted text after '{tag}'")]
    ExpectedText {
        tag: String,
        line: usize,
        column: usize,
    },

    #[error("Compile error at line {line}, column {column}: expected a container keyword after 'in'")]
    ExpectedContainer { line: usize, column: usize },

    #[error("Compile error at line {line}, column {column}: unexpected token '{lexeme}'")]
    UnexpectedToken {
        lexeme: String,
        line: usize,
        column: usize,
    },

    #[error("Compile error at line {line}: nesting deeper than {limit} levels", limit = MAX_NESTING)]
    NestingTooDeep { line: usize },
}

/// Compile IHML source into a complete HTML document.
pub fn compile(source: &str) -> Result<String, CompileError> {
    Compiler::new(source).compile()
}

/// Single-pass IHML compiler.
///
/// Owns one scanner per compilation — no global state, so independent
/// documents can be compiled concurrently or re-entrantly by creating one
/// compiler each.
pub struct Compiler {
    scanner: Scanner,
    open_tags: Vec<Token>,
    output: String,
}

impl Compiler {
    /// Create a compiler for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
            open_tags: Vec::new(),
            output: String::new(),
        }
    }

    /// Drive the compilation to completion and return the finished buffer.
    pub fn compile(mut self) -> Result<String, CompileError> {
        self.output.push_str("<!DOCTYPE html>");

        let mut token = self.scanner.next_token();
        while token.kind != TokenKind::Eof {
            self.finish_tags(token.indent);
            self.dispatch(token)?;
            token = self.scanner.next_token();
        }

        // End of input closes everything still open
        self.finish_tags(0);

        Ok(self.output)
    }

    /// Close every open tag whose indent depth no longer encloses `indent`,
    /// most recently opened first.
    fn finish_tags(&mut self, indent: usize) {
        while let Some(open) = self.open_tags.pop() {
            if open.indent < indent {
                self.open_tags.push(open);
                break;
            }
            self.output.push_str(closing_markup(open.kind));
        }
    }

    fn dispatch(&mut self, token: Token) -> Result<(), CompileError> {
        match token.kind {
            TokenKind::Document
            | TokenKind::Head
            | TokenKind::Body
            | TokenKind::Container => self.open_container(token),

            // `in` is a surface prefix, not a token kind of its own; it
            // must be followed by a container keyword
            TokenKind::Identifier if token.text == "in" => {
                let container = self.scanner.next_token();
                self.open_container(container)
            }

            TokenKind::Heading(level) => self.text_tag(&format!("h{level}")),
            TokenKind::Title => self.text_tag("title"),

            TokenKind::RawHtml => {
                // Passed through verbatim, unescaped, with no wrapping tags
                self.output.push_str(strip_delimiters(&token.text));
                Ok(())
            }

            // The definition was registered during scanning; there is no
            // expansion syntax, so the token itself produces nothing
            TokenKind::MacroDef => Ok(()),

            TokenKind::Error => Err(CompileError::Lexical {
                lexeme: token.text,
                line: token.line,
                column: token.column,
            }),

            _ => Err(CompileError::UnexpectedToken {
                lexeme: token.text,
                line: token.line,
                column: token.column,
            }),
        }
    }

    /// Append the opening markup for a container token and push it onto the
    /// open-tag stack.
    fn open_container(&mut self, token: Token) -> Result<(), CompileError> {
        let markup = match token.kind {
            TokenKind::Document => "<html>",
            TokenKind::Head => "<head>",
            TokenKind::Body => "<body>",
            TokenKind::Container => "<div>",
            _ => {
                return Err(CompileError::ExpectedContainer {
                    line: token.line,
                    column: token.column,
                })
            }
        };

        if self.open_tags.len() >= MAX_NESTING {
            return Err(CompileError::NestingTooDeep { line: token.line });
        }

        self.output.push_str(markup);
        self.open_tags.push(token);
        Ok(())
    }

    /// Emit `<tag>text</tag>` where the text is the next scanned token,
    /// which must be a quoted text literal.
    fn text_tag(&mut self, tag: &str) -> Result<(), CompileError> {
        let text = self.scanner.next_token();
        if text.kind != TokenKind::Text {
            return Err(CompileError::ExpectedText {
                tag: tag.to_string(),
                line: text.line,
                column: text.column,
            });
        }

        self.output.push('<');
        self.output.push_str(tag);
        self.output.push('>');
        self.output.push_str(strip_delimiters(&text.text));
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
        Ok(())
    }
}

/// Closing markup for an open container token.
fn closing_markup(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Document => "</html>",
        TokenKind::Head => "</head>",
        TokenKind::Body => "</body>",
        TokenKind::Container => "</div>",
        // Only the four container kinds are ever pushed
        _ => "",
    }
}

/// Strip the surrounding quote/backtick delimiters from a literal lexeme.
/// The scanner guarantees both delimiters are present.
fn strip_delimiters(lexeme: &str) -> &str {
    &lexeme[1..lexeme.len() - 1]
}
