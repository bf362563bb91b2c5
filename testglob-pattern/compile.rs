/// Regex fragment that matches nothing, not even the empty string.
///
/// Unterminated character classes compile to this. The `regex` crate has no
/// look-around, so an empty class stands in for the usual `(?!)`.
pub const NEVER_MATCH: &str = r"[^\s\S]";

/// What a top-level `-` turns into in [`Dashes::WordBoundary`] mode.
pub const WORD_BOUNDARY: &str = "[A-Z0-9]";

/// How `-` outside a character class is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dashes {
    /// `-` is a literal dash.
    #[default]
    Literal,
    /// `-` marks the boundary between a lowercase run and an uppercase or
    /// digit run, so `Test-Case` stands for `TestCase`-style class names.
    WordBoundary,
}

/// Translates one wildcard pattern into a regex fragment.
///
/// The fragment is unanchored and suitable as one alternative of a larger
/// regex. Supported syntax:
///
/// - `*` matches any run of characters, `?` exactly one
/// - `[...]` is a character class, `[!...]` a negated one
/// - `\` escapes the next character (a trailing `\` is literal)
///
/// A `]` right after `[` or `[!` is a member of the class, so `[]a]` matches
/// `]` or `a`.
///
/// This function never fails. A pattern with an unterminated `[` compiles to
/// [`NEVER_MATCH`], which is `[^\s\S]` rather than `(?!)`; the `regex`
/// crate has no look-around.
///
/// ```
/// use testglob_pattern::{compile, Dashes, NEVER_MATCH};
///
/// assert_eq!(compile("test_*", Dashes::Literal), "test_.*");
/// assert_eq!(compile("[!abc]*", Dashes::Literal), "[^abc].*");
/// assert_eq!(compile("Test-Case", Dashes::WordBoundary), "Test[A-Z0-9]Case");
/// assert_eq!(compile("Test[", Dashes::Literal), NEVER_MATCH);
/// ```
#[must_use]
pub fn compile(pattern: &str, dashes: Dashes) -> String {
    let fragment = Compiler::new(dashes).compile(pattern);
    tracing::trace!("compiled `{pattern}` to `{fragment}`");
    fragment
}

struct Compiler {
    dashes: Dashes,
    output: String,
    escaping: bool,
    /// The previous character opened a class (`[`, or the `!` of `[!`).
    class_start: bool,
    class_depth: usize,
}

impl Compiler {
    fn new(dashes: Dashes) -> Self {
        Self {
            dashes,
            output: String::new(),
            escaping: false,
            class_start: false,
            class_depth: 0,
        }
    }

    #[inline]
    fn in_class(&self) -> bool {
        self.class_depth > 0
    }

    #[inline]
    fn push_escaped(&mut self, ch: char) {
        self.output.push('\\');
        self.output.push(ch);
    }

    fn compile(mut self, pattern: &str) -> String {
        for (index, ch) in pattern.char_indices() {
            // Look back in the raw pattern; the output may contain escapes.
            let prev = pattern[..index].chars().next_back();
            self.push(ch, prev);
        }

        if self.in_class() {
            return NEVER_MATCH.to_owned();
        }

        if self.escaping {
            self.output.push_str(r"\\");
        }

        self.output
    }

    fn push(&mut self, ch: char, prev: Option<char>) {
        // Whatever follows a backslash consumes the escape.
        let escaping = std::mem::take(&mut self.escaping);
        let class_start = std::mem::take(&mut self.class_start);

        match ch {
            '*' | '?' => {
                if self.in_class() {
                    self.output.push(ch);
                } else if escaping {
                    self.push_escaped(ch);
                } else if ch == '*' {
                    self.output.push_str(".*");
                } else {
                    self.output.push('.');
                }
            }
            '.' | '(' | ')' | '^' | '+' | '|' | '$' => {
                if self.in_class() && ch != '^' {
                    self.output.push(ch);
                } else {
                    self.push_escaped(ch);
                }
            }
            // A bare `{` is a syntax error in the regex crate.
            '{' | '}' if !self.in_class() => self.push_escaped(ch),
            // Never let `&&` or `~~` read as class set operations.
            '&' | '~' if self.in_class() => self.push_escaped(ch),
            '\\' => {
                if escaping {
                    self.output.push_str(r"\\");
                } else {
                    self.escaping = true;
                }
            }
            '[' => {
                if escaping {
                    self.push_escaped(ch);
                } else {
                    self.output.push('[');
                    self.class_depth += 1;
                    self.class_start = true;
                }
            }
            ']' => {
                if class_start && !escaping {
                    // First member of the class, not its end.
                    self.output.push(']');
                } else if escaping || !self.in_class() {
                    self.push_escaped(ch);
                } else {
                    self.output.push(']');
                    self.class_depth -= 1;
                }
            }
            '!' => {
                if self.in_class() && prev == Some('[') {
                    self.output.push('^');
                    self.class_start = class_start;
                } else {
                    self.output.push('!');
                }
            }
            '-' => {
                if self.dashes == Dashes::WordBoundary && !self.in_class() {
                    self.output.push_str(WORD_BOUNDARY);
                } else {
                    self.output.push('-');
                }
            }
            _ => self.output.push(ch),
        }
    }
}
