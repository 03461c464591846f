//! # Syntax highlighting
//!
//! Highlight classes and the built-in table of language configurations.

/// The highlight class of a rendered byte, mapped to an ANSI color when the
/// row is drawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HlType {
    Normal,
    Comment,
    MlComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Match,
}

impl HlType {
    /// The ANSI SGR color code used to draw this highlight class.
    pub fn sgr_color(self) -> u8 {
        match self {
            Self::Normal => 39,
            Self::Comment | Self::MlComment => 36,
            Self::Keyword1 => 33,
            Self::Keyword2 => 32,
            Self::String => 35,
            Self::Number => 31,
            Self::Match => 34,
        }
    }
}

/// A syntax highlighting configuration for one language.
pub struct SyntaxConf {
    /// The name of the language, displayed in the status bar.
    pub name: &'static str,
    /// Patterns matched against the file name. A pattern starting with a dot
    /// must be equal to the file extension; any other pattern matches as a
    /// substring of the file name.
    pub file_match: &'static [&'static str],
    /// Keywords of the language, highlighted as `HlType::Keyword1`.
    pub keywords1: &'static [&'static str],
    /// Type names of the language, highlighted as `HlType::Keyword2`.
    pub keywords2: &'static [&'static str],
    /// The marker that starts a comment running to the end of the line.
    pub sl_comment_start: Option<&'static str>,
    /// The markers that open and close a multi-line comment.
    pub ml_comment_delims: Option<(&'static str, &'static str)>,
    /// Whether to highlight numbers.
    pub highlight_numbers: bool,
    /// Whether to highlight strings.
    pub highlight_strings: bool,
}

/// The built-in language table. Lives for the whole process.
const SYNTAX_DB: &[SyntaxConf] = &[
    SyntaxConf {
        name: "c",
        file_match: &[".c", ".h", ".cpp"],
        keywords1: &[
            "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
            "union", "typedef", "static", "enum", "class", "case",
        ],
        keywords2: &["int", "long", "double", "float", "char", "unsigned", "signed", "void"],
        sl_comment_start: Some("//"),
        ml_comment_delims: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
    SyntaxConf {
        name: "rust",
        file_match: &[".rs"],
        keywords1: &[
            "as", "break", "const", "continue", "else", "enum", "fn", "for", "if", "impl", "in",
            "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static",
            "struct", "trait", "type", "unsafe", "use", "where", "while",
        ],
        keywords2: &[
            "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "str", "u8",
            "u16", "u32", "u64", "u128", "usize", "String", "Vec", "Option", "Result", "Self",
        ],
        sl_comment_start: Some("//"),
        ml_comment_delims: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
];

impl SyntaxConf {
    /// Select the syntax configuration matching the given file name, if any.
    pub fn select(file_name: &str) -> Option<&'static Self> {
        // The extension is the substring from the last dot, dot included.
        let extension = file_name.rfind('.').map(|index| &file_name[index..]);
        SYNTAX_DB.iter().find(|conf| {
            conf.file_match.iter().any(|pattern| {
                if pattern.starts_with('.') {
                    extension == Some(*pattern)
                } else {
                    file_name.contains(pattern)
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SyntaxConf;

    #[test]
    fn extension_patterns_match_the_file_extension() {
        assert_eq!(SyntaxConf::select("main.c").map(|conf| conf.name), Some("c"));
        assert_eq!(SyntaxConf::select("lib.rs").map(|conf| conf.name), Some("rust"));
        // The extension is taken from the last dot.
        assert_eq!(SyntaxConf::select("archive.tar.c").map(|conf| conf.name), Some("c"));
    }

    #[test]
    fn unknown_extensions_select_nothing() {
        assert!(SyntaxConf::select("notes.txt").is_none());
        assert!(SyntaxConf::select("Makefile").is_none());
        // ".c" must match the extension exactly, not a substring of it.
        assert!(SyntaxConf::select("main.cxx").is_none());
    }
}
