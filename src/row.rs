//! # Row
//!
//! A row of text: the raw bytes, the rendered form shown on screen (tabs
//! expanded to spaces) and the per-byte syntax highlighting derived from it.

use crate::ansi_escape::{DEFAULT_FOREGROUND, RESET_FMT, REVERSE_VIDEO};
use crate::append_buffer::AppendBuffer;
use crate::syntax::{HlType, SyntaxConf};

/// The state of the syntax highlighter at the end of a row. It seeds the
/// highlighter of the next row, which is how multi-line comments span rows.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HlState {
    #[default]
    Normal,
    /// The row ends inside an unterminated multi-line comment.
    MultiLineComment,
}

/// A row of text, owned by the editor's row collection.
pub struct Row {
    /// The raw bytes of the row, without a line terminator.
    pub chars: Vec<u8>,
    /// The bytes shown on screen: `chars` with tabs expanded to spaces.
    pub render: Vec<u8>,
    /// The highlight class of each byte of `render`. Always the same length
    /// as `render`.
    pub hl: Vec<HlType>,
    /// The highlight state at the end of the row.
    pub hl_state: HlState,
}

/// Return whether the given byte separates tokens for syntax highlighting.
fn is_separator(c: u8) -> bool {
    c.is_ascii_whitespace() || c == b'\0' || b",.()+-/=~%<>[];".contains(&c)
}

impl Row {
    pub fn new(chars: Vec<u8>) -> Self {
        Self { chars, render: Vec::new(), hl: Vec::new(), hl_state: HlState::Normal }
    }

    /// Regenerate `render` and `hl` after `chars` has changed. `previous` is
    /// the highlight state at the end of the previous row; the state at the
    /// end of this row is stored and returned, so that the caller can keep
    /// updating the following rows while the state keeps changing.
    pub fn update(
        &mut self,
        syntax: Option<&SyntaxConf>,
        previous: HlState,
        tab_stop: usize,
    ) -> HlState {
        self.render.clear();
        for &c in &self.chars {
            if c == b'\t' {
                // A tab is at least one space, up to the next tab stop.
                self.render.push(b' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(c);
            }
        }
        self.update_syntax(syntax, previous)
    }

    /// Regenerate `hl` from `render` and return the end-of-row state.
    fn update_syntax(&mut self, syntax: Option<&SyntaxConf>, previous: HlState) -> HlState {
        let mut hl = vec![HlType::Normal; self.render.len()];
        self.hl_state = match syntax {
            Some(syntax) => {
                let mut prev_sep = true;
                let mut in_string: Option<u8> = None;
                let mut in_comment = previous == HlState::MultiLineComment;

                let mut i = 0;
                while i < self.render.len() {
                    let c = self.render[i];
                    let prev_hl = if i > 0 { hl[i - 1] } else { HlType::Normal };

                    if in_string.is_none() && !in_comment {
                        if let Some(start) = syntax.sl_comment_start {
                            if self.render[i..].starts_with(start.as_bytes()) {
                                hl[i..].fill(HlType::Comment);
                                break;
                            }
                        }
                    }

                    if in_string.is_none() {
                        if let Some((open, close)) = syntax.ml_comment_delims {
                            if in_comment {
                                if self.render[i..].starts_with(close.as_bytes()) {
                                    hl[i..i + close.len()].fill(HlType::MlComment);
                                    i += close.len();
                                    in_comment = false;
                                    prev_sep = true;
                                } else {
                                    hl[i] = HlType::MlComment;
                                    i += 1;
                                }
                                continue;
                            } else if self.render[i..].starts_with(open.as_bytes()) {
                                hl[i..i + open.len()].fill(HlType::MlComment);
                                i += open.len();
                                in_comment = true;
                                continue;
                            }
                        }
                    }

                    if syntax.highlight_strings {
                        if let Some(quote) = in_string {
                            hl[i] = HlType::String;
                            // A backslash protects the next byte.
                            if c == b'\\' && i + 1 < self.render.len() {
                                hl[i + 1] = HlType::String;
                                i += 2;
                                continue;
                            }
                            if c == quote {
                                in_string = None;
                            }
                            i += 1;
                            prev_sep = true;
                            continue;
                        } else if c == b'"' || c == b'\'' {
                            in_string = Some(c);
                            hl[i] = HlType::String;
                            i += 1;
                            continue;
                        }
                    }

                    if syntax.highlight_numbers
                        && (c.is_ascii_digit() && (prev_sep || prev_hl == HlType::Number)
                            || c == b'.' && prev_hl == HlType::Number)
                    {
                        hl[i] = HlType::Number;
                        i += 1;
                        prev_sep = false;
                        continue;
                    }

                    if prev_sep {
                        // Keywords must start after a separator and be
                        // followed by one (or by the end of the row).
                        let keywords1 = syntax.keywords1.iter().map(|kw| (kw, HlType::Keyword1));
                        let keywords2 = syntax.keywords2.iter().map(|kw| (kw, HlType::Keyword2));
                        let matched = keywords1.chain(keywords2).find_map(|(keyword, hl_type)| {
                            let keyword = keyword.as_bytes();
                            let followed_by_sep = self
                                .render
                                .get(i + keyword.len())
                                .map_or(true, |&next| is_separator(next));
                            (self.render[i..].starts_with(keyword) && followed_by_sep)
                                .then_some((keyword.len(), hl_type))
                        });
                        if let Some((len, hl_type)) = matched {
                            hl[i..i + len].fill(hl_type);
                            i += len;
                            prev_sep = false;
                            continue;
                        }
                    }

                    prev_sep = is_separator(c);
                    i += 1;
                }

                if in_comment { HlState::MultiLineComment } else { HlState::Normal }
            }
            None => HlState::Normal,
        };
        self.hl = hl;
        self.hl_state
    }

    /// Convert a position in `chars` to the column it occupies on screen.
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        self.chars[..cx].iter().fold(0, |rx, &c| {
            rx + if c == b'\t' { tab_stop - rx % tab_stop } else { 1 }
        })
    }

    /// Convert a screen column to the position, in `chars`, of the character
    /// occupying that column. Returns the row length if the column is past
    /// the end of the row.
    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            cur_rx += if c == b'\t' { tab_stop - cur_rx % tab_stop } else { 1 };
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    /// Draw the visible part of the row into the frame buffer, emitting color
    /// escape sequences only when the color changes from byte to byte.
    pub(crate) fn draw(&self, coloff: usize, screen_cols: usize, buffer: &mut AppendBuffer) {
        let mut current_color = None;
        let end = self.render.len().min(coloff.saturating_add(screen_cols));
        for i in coloff..end {
            let c = self.render[i];
            if c.is_ascii_control() {
                // Control bytes are drawn as an inverse-video placeholder.
                let sym = if c <= 26 { b'@' + c } else { b'?' };
                buffer.push_str(REVERSE_VIDEO);
                buffer.push(sym);
                buffer.push_str(RESET_FMT);
                // RESET_FMT also dropped the color; switch back to the one
                // in use.
                if let Some(color) = current_color {
                    buffer.push_str(&format!("\x1b[{}m", color));
                }
            } else if self.hl[i] == HlType::Normal {
                if current_color.is_some() {
                    buffer.push_str(DEFAULT_FOREGROUND);
                    current_color = None;
                }
                buffer.push(c);
            } else {
                let color = self.hl[i].sgr_color();
                if current_color != Some(color) {
                    current_color = Some(color);
                    buffer.push_str(&format!("\x1b[{}m", color));
                }
                buffer.push(c);
            }
        }
        buffer.push_str(DEFAULT_FOREGROUND);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB_STOP: usize = 8;

    fn c_syntax() -> Option<&'static SyntaxConf> { SyntaxConf::select("t.c") }

    fn updated_row(chars: &[u8], syntax: Option<&SyntaxConf>, previous: HlState) -> Row {
        let mut row = Row::new(chars.to_vec());
        row.update(syntax, previous, TAB_STOP);
        row
    }

    #[test]
    fn tabs_expand_to_the_next_tab_stop() {
        let row = updated_row(b"\tX", None, HlState::Normal);
        assert_eq!(row.render, b"        X".to_vec());
        assert_eq!(row.render.len(), row.hl.len());

        let row = updated_row(b"ab\tc", None, HlState::Normal);
        assert_eq!(row.render, b"ab      c".to_vec());
    }

    #[test]
    fn cursor_positions_convert_to_screen_columns_and_back() {
        let row = updated_row(b"\tX", None, HlState::Normal);
        assert_eq!(row.cx_to_rx(0, TAB_STOP), 0);
        assert_eq!(row.cx_to_rx(1, TAB_STOP), 8);
        assert_eq!(row.cx_to_rx(2, TAB_STOP), 9);
        // Columns 0..8 are all inside the tab.
        assert_eq!(row.rx_to_cx(0, TAB_STOP), 0);
        assert_eq!(row.rx_to_cx(4, TAB_STOP), 0);
        assert_eq!(row.rx_to_cx(7, TAB_STOP), 0);
        assert_eq!(row.rx_to_cx(8, TAB_STOP), 1);
        // Past the end of the row.
        assert_eq!(row.rx_to_cx(9, TAB_STOP), 2);
        assert_eq!(row.rx_to_cx(100, TAB_STOP), 2);

        // The round trip lands back on the original character.
        for cx in 0..=row.chars.len() {
            assert_eq!(row.rx_to_cx(row.cx_to_rx(cx, TAB_STOP), TAB_STOP), cx);
        }
    }

    #[test]
    fn keywords_and_numbers_are_highlighted() {
        let row = updated_row(b"int x = 42;", c_syntax(), HlState::Normal);
        assert!(row.hl[..3].iter().all(|&hl| hl == HlType::Keyword2));
        assert_eq!(row.hl[4], HlType::Normal);
        assert!(row.hl[8..10].iter().all(|&hl| hl == HlType::Number));

        // A keyword at the very end of the row still matches.
        let row = updated_row(b"return", c_syntax(), HlState::Normal);
        assert!(row.hl.iter().all(|&hl| hl == HlType::Keyword1));

        // "intx" is an identifier, not the keyword "int".
        let row = updated_row(b"intx", c_syntax(), HlState::Normal);
        assert!(row.hl.iter().all(|&hl| hl == HlType::Normal));
    }

    #[test]
    fn strings_are_highlighted_with_escapes() {
        let row = updated_row(br#""a\"b" x"#, c_syntax(), HlState::Normal);
        assert!(row.hl[..6].iter().all(|&hl| hl == HlType::String));
        assert_eq!(row.hl[7], HlType::Normal);
    }

    #[test]
    fn single_line_comments_run_to_the_end_of_the_row() {
        let row = updated_row(b"x // if 42", c_syntax(), HlState::Normal);
        assert_eq!(row.hl[0], HlType::Normal);
        assert!(row.hl[2..].iter().all(|&hl| hl == HlType::Comment));
        assert_eq!(row.hl_state, HlState::Normal);
    }

    #[test]
    fn unterminated_multi_line_comments_leave_the_row_open() {
        let mut row = Row::new(b"int /* a".to_vec());
        let state = row.update(c_syntax(), HlState::Normal, TAB_STOP);
        assert_eq!(state, HlState::MultiLineComment);
        assert!(row.hl[4..].iter().all(|&hl| hl == HlType::MlComment));

        // A row seeded in-comment highlights up to the closing marker, and
        // keywords match again right after it.
        let mut row = Row::new(b"*/int x".to_vec());
        let state = row.update(c_syntax(), HlState::MultiLineComment, TAB_STOP);
        assert_eq!(state, HlState::Normal);
        assert!(row.hl[..2].iter().all(|&hl| hl == HlType::MlComment));
        assert!(row.hl[2..5].iter().all(|&hl| hl == HlType::Keyword2));
    }

    #[test]
    fn comment_markers_inside_strings_are_ignored() {
        let row = updated_row(br#""/* not a comment""#, c_syntax(), HlState::Normal);
        assert!(row.hl.iter().all(|&hl| hl == HlType::String));
        assert_eq!(row.hl_state, HlState::Normal);
    }

    #[test]
    fn rows_without_a_syntax_are_all_normal() {
        let row = updated_row(b"int x = 42; // c", None, HlState::Normal);
        assert!(row.hl.iter().all(|&hl| hl == HlType::Normal));
    }

    #[test]
    fn control_bytes_draw_as_inverse_video_glyphs() {
        let row = updated_row(&[0x01], None, HlState::Normal);
        let mut buffer = AppendBuffer::default();
        row.draw(0, 80, &mut buffer);
        assert_eq!(buffer.as_bytes(), b"\x1b[7mA\x1b[m\x1b[39m");
    }

    #[test]
    fn colored_bytes_emit_one_escape_per_color_change() {
        let row = updated_row(b"42", c_syntax(), HlState::Normal);
        let mut buffer = AppendBuffer::default();
        row.draw(0, 80, &mut buffer);
        assert_eq!(buffer.as_bytes(), b"\x1b[31m42\x1b[39m");
    }
}
