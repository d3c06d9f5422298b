//! IHML Lexer
//!
//! Turns `.ihml` source into a lazy stream of tokens, one `next_token()`
//! call at a time. Tracks line, column, and per-line tab-indent depth,
//! recognizes the fixed keyword vocabulary, quoted text and raw-HTML
//! literals, `//` comments, and `@name` macro definitions whose indented
//! bodies are captured into the macro table.
//!
//! # Example
//!
//! ```
//! use ihml_lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("title \"Home\"");
//! assert_eq!(scanner.next_token().kind, TokenKind::Title);
//! assert_eq!(scanner.next_token().kind, TokenKind::Text);
//! assert_eq!(scanner.next_token().kind, TokenKind::Eof);
//! ```

pub mod scanner;
pub mod table;
pub mod token;

pub use scanner::Scanner;
pub use table::MacroTable;
pub use token::{Token, TokenKind};
