#![allow(clippy::wildcard_imports)]

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::time::Instant;

use crate::append_buffer::AppendBuffer;
use crate::row::{HlState, Row};
use crate::syntax::{HlType, SyntaxConf};
use crate::{ansi_escape::*, sys, terminal, Config, Error};

const fn ctrl_key(key: u8) -> u8 { key & 0x1f }

const EXIT: u8 = ctrl_key(b'Q');
const DELETE_BIS: u8 = ctrl_key(b'H');
const REFRESH_SCREEN: u8 = ctrl_key(b'L');
const SAVE: u8 = ctrl_key(b'S');
const FIND: u8 = ctrl_key(b'F');
const BACKSPACE: u8 = 127;

const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// `set_status!` sets a formatted status message for the editor.
/// Example usage: `set_status!(editor, "{} written to {}", file_size, file_name)`
macro_rules! set_status {
    ($editor:expr, $($arg:expr),*) => ($editor.status_msg = Some(StatusMessage::new(format!($($arg),*))))
}

/// Enum of input keys
enum Key {
    Arrow(AKey),
    Page(PageKey),
    Home,
    End,
    Delete,
    Escape,
    Char(u8),
}

/// Enum of arrow keys
enum AKey {
    Left,
    Right,
    Up,
    Down,
}

/// Enum of page keys
enum PageKey {
    Up,
    Down,
}

/// Describes the cursor position and the screen offset
#[derive(Default, Clone)]
struct CursorState {
    /// x position (indexing the characters of the row, not the screen columns)
    x: usize,
    /// y position (row number, 0-indexed); the index one past the last row is
    /// legal and denotes the virtual empty line after the text.
    y: usize,
    /// Row offset
    roff: usize,
    /// Column offset
    coff: usize,
}

impl CursorState {
    fn move_to_next_line(&mut self) {
        self.y += 1;
        self.x = 0;
    }

    /// Scroll the terminal window vertically and horizontally (i.e. adjusting the row offset and
    /// the column offset) so that the cursor can be shown.
    fn scroll(&mut self, rx: usize, screen_rows: usize, screen_cols: usize) {
        self.roff = self.roff.clamp(self.y.saturating_sub(screen_rows.saturating_sub(1)), self.y);
        self.coff = self.coff.clamp(rx.saturating_sub(screen_cols.saturating_sub(1)), rx);
    }
}

/// Describes a status message, shown at the bottom of the screen.
struct StatusMessage {
    /// The message to display.
    msg: String,
    /// The `Instant` the status message was first displayed.
    time: Instant,
}

impl StatusMessage {
    /// Create a new status message and set time to the current date/time.
    fn new(msg: String) -> Self { Self { msg, time: Instant::now() } }
}

/// `slice_find` returns the index of `needle` in slice `s` if `needle` is a subslice of `s`,
/// otherwise returns `None`.
fn slice_find<T: PartialEq>(s: &[T], needle: &[T]) -> Option<usize> {
    (0..(s.len() + 1).saturating_sub(needle.len())).find(|&i| s[i..].starts_with(needle))
}

/// Block until the next byte arrives from the terminal, then decode it into a
/// `Key`. Reads time out every 100ms with no byte and are simply retried.
fn loop_until_keypress() -> Result<Key, Error> {
    let mut bytes = sys::stdin()?.bytes();
    loop {
        if let Some(byte) = bytes.next().transpose()? {
            return decode_key(byte, &mut bytes);
        }
    }
}

/// Decode one keypress, reading the remaining bytes of an ANSI escape
/// sequence from the same stream. An unrecognized or timed-out sequence
/// yields `Key::Escape`.
fn decode_key(byte: u8, bytes: &mut impl Iterator<Item = io::Result<u8>>) -> Result<Key, Error> {
    if byte != b'\x1b' {
        return Ok(Key::Char(byte));
    }
    Ok(match bytes.next().transpose()? {
        Some(b @ (b'[' | b'O')) => match (b, bytes.next().transpose()?) {
            (b'[', Some(b'A')) => Key::Arrow(AKey::Up),
            (b'[', Some(b'B')) => Key::Arrow(AKey::Down),
            (b'[', Some(b'C')) => Key::Arrow(AKey::Right),
            (b'[', Some(b'D')) => Key::Arrow(AKey::Left),
            (b'[' | b'O', Some(b'H')) => Key::Home,
            (b'[' | b'O', Some(b'F')) => Key::End,
            (b'[', Some(c @ b'0'..=b'9')) => match (c, bytes.next().transpose()?) {
                (b'1' | b'7', Some(b'~')) => Key::Home,
                (b'4' | b'8', Some(b'~')) => Key::End,
                (b'3', Some(b'~')) => Key::Delete,
                (b'5', Some(b'~')) => Key::Page(PageKey::Up),
                (b'6', Some(b'~')) => Key::Page(PageKey::Down),
                _ => Key::Escape,
            },
            _ => Key::Escape,
        },
        _ => Key::Escape,
    })
}

/// The `Editor` struct, contains the state and configuration of the text editor.
#[derive(Default)]
pub struct Editor {
    /// If not `None`, the current prompt mode (Save or Find). If `None`, we are in regular edition
    /// mode.
    prompt_mode: Option<PromptMode>,
    /// The current state of the cursor.
    cursor: CursorState,
    /// The number of rows that can be used for the editor, excluding the status bar and the
    /// message bar.
    screen_rows: usize,
    /// The number of columns that can be used for the editor.
    screen_cols: usize,
    /// The collection of rows, including the content and the syntax highlighting information.
    rows: Vec<Row>,
    /// The number of unsaved mutations. Zero means the on-disk file matches the buffer.
    dirty: usize,
    /// The configuration for the editor.
    config: Config,
    /// The number of warnings remaining before we can quit without saving. Defaults to
    /// `config.quit_times`, then decreases to 0.
    quit_times: usize,
    /// The file name. If None, the user will be prompted for a file name the first time they try
    /// to save.
    file_name: Option<String>,
    /// The current status message being shown.
    status_msg: Option<StatusMessage>,
    /// The syntax configuration corresponding to the current file name, if any.
    syntax: Option<&'static SyntaxConf>,
    /// The original terminal mode. It will be restored when the `Editor` instance is dropped.
    orig_term_mode: Option<sys::TermMode>,
}

impl Editor {
    /// Initialize the text editor.
    ///
    /// # Errors
    ///
    /// Will return `Err` if an error occurs when enabling termios raw mode or when obtaining the
    /// terminal window size.
    #[allow(clippy::field_reassign_with_default)]
    pub fn new(config: Config) -> Result<Self, Error> {
        let mut editor = Self::default();
        editor.quit_times = config.quit_times;
        editor.config = config;

        // Enable raw mode and store the original (non-raw) terminal mode.
        editor.orig_term_mode = Some(sys::enable_raw_mode()?);
        editor.update_window_size()?;

        set_status!(editor, "{}", HELP_MESSAGE);

        Ok(editor)
    }

    /// Return the current row if the cursor points to an existing row, `None` otherwise.
    fn current_row(&self) -> Option<&Row> { self.rows.get(self.cursor.y) }

    /// Return the position of the cursor, in terms of rendered characters (as opposed to
    /// `self.cursor.x`, which is the position of the cursor in terms of bytes).
    fn rx(&self) -> usize {
        self.current_row().map_or(0, |row| row.cx_to_rx(self.cursor.x, self.config.tab_stop))
    }

    /// Move the cursor following an arrow key (← → ↑ ↓).
    fn move_cursor(&mut self, key: &AKey) {
        match (key, self.current_row()) {
            (AKey::Left, _) if self.cursor.x > 0 => self.cursor.x -= 1,
            (AKey::Left, _) if self.cursor.y > 0 => {
                // ← at the beginning of the line: move to the end of the previous line. The x
                // position will be clamped after this `match`, so we can set it to the maximum
                // possible value here.
                self.cursor.y -= 1;
                self.cursor.x = usize::MAX;
            }
            (AKey::Right, Some(row)) if self.cursor.x < row.chars.len() => self.cursor.x += 1,
            (AKey::Right, Some(_)) => self.cursor.move_to_next_line(),
            (AKey::Up, _) if self.cursor.y > 0 => self.cursor.y -= 1,
            // ↓ can move one past the last row, onto the virtual trailing line.
            (AKey::Down, Some(_)) => self.cursor.y += 1,
            _ => (),
        }
        self.update_cursor_x_position();
    }

    /// Update the cursor x position. If the cursor y position has changed, the current position
    /// might be illegal (x is further right than the last character of the row). If that is the
    /// case, clamp `self.cursor.x`.
    fn update_cursor_x_position(&mut self) {
        self.cursor.x = self.cursor.x.min(self.current_row().map_or(0, |row| row.chars.len()));
    }

    /// Update the `screen_rows` and `screen_cols` attributes, using the window size ioctl or,
    /// should it fail, the bottom-right cursor position probe.
    fn update_window_size(&mut self) -> Result<(), Error> {
        let wsize = sys::get_window_size().or_else(|_| terminal::get_window_size_using_cursor())?;
        // Make room for the status bar and the message bar
        self.screen_rows = wsize.0.saturating_sub(2);
        self.screen_cols = wsize.1;
        Ok(())
    }

    /// Update a row, given its index. If `ignore_following_rows` is `false` and the highlight
    /// state has changed during the update, keep updating the next rows until one ends in the
    /// state it was already in.
    fn update_row(&mut self, y: usize, ignore_following_rows: bool) {
        let mut hl_state = if y > 0 { self.rows[y - 1].hl_state } else { HlState::Normal };
        for row in self.rows.iter_mut().skip(y) {
            let previous_hl_state = row.hl_state;
            hl_state = row.update(self.syntax, hl_state, self.config.tab_stop);
            if ignore_following_rows || hl_state == previous_hl_state {
                return;
            }
            // The state has changed (for instance, a multi-line comment started or ended in this
            // row), so continue updating the following rows
        }
    }

    /// Update all the rows.
    fn update_all_rows(&mut self) {
        let mut hl_state = HlState::Normal;
        for row in &mut self.rows {
            hl_state = row.update(self.syntax, hl_state, self.config.tab_stop);
        }
    }

    /// Insert a byte at the current cursor position. If the cursor is on the virtual line after
    /// the last row, add a new empty row first.
    fn insert_byte(&mut self, c: u8) {
        if self.cursor.y == self.rows.len() {
            self.rows.push(Row::new(Vec::new()));
        }
        self.rows[self.cursor.y].chars.insert(self.cursor.x, c);
        self.update_row(self.cursor.y, false);
        self.cursor.x += 1;
        self.dirty += 1;
    }

    /// Insert a new line at the current cursor position and move the cursor to the start of the
    /// new line. If the cursor is in the middle of a row, split off that row.
    fn insert_new_line(&mut self) {
        let (position, new_row_chars) = if self.cursor.x == 0 {
            (self.cursor.y, Vec::new())
        } else {
            // self.rows[self.cursor.y] must exist, since cursor.x = 0 for any cursor.y ≥ rows.len()
            let new_chars = self.rows[self.cursor.y].chars.split_off(self.cursor.x);
            self.update_row(self.cursor.y, true);
            (self.cursor.y + 1, new_chars)
        };
        self.rows.insert(position, Row::new(new_row_chars));
        self.update_row(position, false);
        self.cursor.move_to_next_line();
        self.dirty += 1;
    }

    /// Delete the character before the cursor. At the beginning of a row, merge the row into the
    /// previous one. At the top-left of the buffer, or on the virtual trailing line, do nothing.
    fn delete_char(&mut self) {
        if self.cursor.y == self.rows.len() || (self.cursor.x == 0 && self.cursor.y == 0) {
            return;
        }
        if self.cursor.x > 0 {
            self.rows[self.cursor.y].chars.remove(self.cursor.x - 1);
            self.update_row(self.cursor.y, false);
            self.cursor.x -= 1;
        } else {
            let row = self.rows.remove(self.cursor.y);
            let previous_row = &mut self.rows[self.cursor.y - 1];
            self.cursor.x = previous_row.chars.len();
            previous_row.chars.extend(row.chars);
            self.update_row(self.cursor.y - 1, false);
            self.cursor.y -= 1;
        }
        self.dirty += 1;
    }

    /// Load a file into the buffer. Line terminators (`\n`, `\r\n`) are stripped from the rows.
    fn load(&mut self, path: &Path) -> Result<(), Error> {
        for line in BufReader::new(File::open(path)?).split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            self.rows.push(Row::new(line));
        }
        self.update_all_rows();
        Ok(())
    }

    /// Save the text to a file, given its name. Every row is followed by a line feed, and the
    /// file is truncated to the exact length of the text.
    fn save(&self, file_name: &str) -> Result<usize, io::Error> {
        let mut file = File::create(file_name)?;
        let mut written = 0;
        for row in &self.rows {
            file.write_all(&row.chars)?;
            file.write_all(b"\n")?;
            written += row.chars.len() + 1;
        }
        file.sync_all()?;
        Ok(written)
    }

    /// Save the text to a file and handle all errors. Errors and success messages will be printed
    /// to the status bar. Return whether the file was successfully saved.
    fn save_and_handle_io_errors(&mut self, file_name: &str) -> bool {
        match self.save(file_name) {
            Ok(written) => {
                self.dirty = 0;
                set_status!(self, "{} bytes written to disk", written);
                true
            }
            Err(err) => {
                set_status!(self, "Can't save! I/O error: {}", err);
                false
            }
        }
    }

    /// Save to a file after obtaining the file path from the prompt. If successful, the
    /// `file_name` attribute of the editor will be set and syntax highlighting will be updated.
    fn save_as(&mut self, file_name: String) {
        if self.save_and_handle_io_errors(&file_name) {
            self.syntax = SyntaxConf::select(&file_name);
            self.file_name = Some(file_name);
            self.update_all_rows();
        }
    }

    /// Search the rows for `query`, starting after the last match (or from the last row when the
    /// search was reset) and wrapping around at both ends. On a hit, move the cursor to the match
    /// and overlay its highlighting, saving the previous highlighting so it can be restored.
    fn find(&mut self, query: &[u8], state: &mut FindState) {
        let num_rows = self.rows.len();
        if num_rows == 0 {
            return;
        }
        let tab_stop = self.config.tab_stop;
        // A reset search always walks forward.
        let forward = state.forward || state.last_match.is_none();
        let mut current = state.last_match.unwrap_or(num_rows - 1);
        for _ in 0..num_rows {
            current = (current + if forward { 1 } else { num_rows - 1 }) % num_rows;
            let row = &mut self.rows[current];
            if let Some(rx) = slice_find(&row.render, query) {
                state.last_match = Some(current);
                self.cursor.y = current;
                self.cursor.x = row.rx_to_cx(rx, tab_stop);
                // Any offset past the last row makes the next scroll bring the match to the top
                // of the screen.
                self.cursor.roff = num_rows;
                state.saved_hl = Some((current, row.hl.clone()));
                row.hl[rx..rx + query.len()].fill(HlType::Match);
                return;
            }
        }
    }

    /// Draw the rows of text, and the tildes of the empty rows below them, into the frame buffer.
    fn draw_rows(&self, buffer: &mut AppendBuffer) {
        for y in 0..self.screen_rows {
            let file_row = y + self.cursor.roff;
            if let Some(row) = self.rows.get(file_row) {
                row.draw(self.cursor.coff, self.screen_cols, buffer);
            } else if self.rows.is_empty() && y == self.screen_rows / 3 {
                self.draw_welcome_message(buffer);
            } else {
                buffer.push(b'~');
            }
            buffer.push_str(CLEAR_LINE_RIGHT_OF_CURSOR);
            buffer.push_str("\r\n");
        }
    }

    /// Draw the welcome line, centered, with a leading tilde like the other empty rows.
    fn draw_welcome_message(&self, buffer: &mut AppendBuffer) {
        let mut welcome = format!("Kilo Editor -- version {}", env!("CARGO_PKG_VERSION"));
        welcome.truncate(self.screen_cols);
        let mut padding = (self.screen_cols - welcome.len()) / 2;
        if padding > 0 {
            buffer.push(b'~');
            padding -= 1;
        }
        buffer.push_str(&" ".repeat(padding));
        buffer.push_str(&welcome);
    }

    /// Draw the status bar on the terminal, by adding characters to the buffer.
    fn draw_status_bar(&self, buffer: &mut AppendBuffer) {
        // Left part of the status bar
        let modified = if self.dirty > 0 { "(modified)" } else { "" };
        let mut left = format!(
            "{:.20} - {} lines {}",
            self.file_name.as_deref().unwrap_or("[No Name]"),
            self.rows.len(),
            modified
        );
        left.truncate(self.screen_cols);

        // Right part of the status bar
        let file_type = self.syntax.map_or("no ft", |syntax| syntax.name);
        let right = format!("{} | {}/{}", file_type, self.cursor.y + 1, self.rows.len());

        // Draw
        let rw = self.screen_cols.saturating_sub(left.len());
        buffer.push_str(&format!("{}{}{:>4$.4$}{}\r\n", REVERSE_VIDEO, left, right, RESET_FMT, rw));
    }

    /// Draw the message bar on the terminal, by adding characters to the buffer.
    fn draw_message_bar(&self, buffer: &mut AppendBuffer) {
        buffer.push_str(CLEAR_LINE_RIGHT_OF_CURSOR);
        let msg_dur = self.config.message_dur;
        if let Some(sm) = self.status_msg.as_ref().filter(|sm| sm.time.elapsed() < msg_dur) {
            buffer.push_bytes(&sm.msg.as_bytes()[..sm.msg.len().min(self.screen_cols)]);
        }
    }

    /// Refresh the screen: update the offsets, draw the rows, the status bar, the message bar,
    /// and move the cursor to the correct position. The frame is staged into an append buffer and
    /// reaches the terminal in a single write.
    fn refresh_screen(&mut self) -> Result<(), Error> {
        let rx = self.rx();
        self.cursor.scroll(rx, self.screen_rows, self.screen_cols);
        let mut buffer = AppendBuffer::default();
        buffer.push_str(HIDE_CURSOR);
        buffer.push_str(MOVE_CURSOR_TO_START);
        self.draw_rows(&mut buffer);
        self.draw_status_bar(&mut buffer);
        self.draw_message_bar(&mut buffer);
        // Move the cursor, converting to the 1-based terminal coordinates.
        let (cursor_y, cursor_x) = (self.cursor.y - self.cursor.roff + 1, rx - self.cursor.coff + 1);
        buffer.push_str(&format!("\x1b[{};{}H", cursor_y, cursor_x));
        buffer.push_str(SHOW_CURSOR);
        terminal::print_and_flush(buffer.as_bytes())
    }

    /// Process a key that has been pressed, when not in prompt mode. Returns whether the editor
    /// should quit, and optionally the prompt mode to switch to.
    fn process_keypress(&mut self, key: &Key) -> (bool, Option<PromptMode>) {
        // This won't be mutated, unless key is Key::Char(EXIT)
        let mut quit_times = self.config.quit_times;
        let mut prompt_mode = None;

        match key {
            Key::Arrow(arrow) => self.move_cursor(arrow),
            Key::Page(page_key) => {
                // Snap the cursor to the edge of the viewport, then move it a whole screen in the
                // requested direction.
                self.cursor.y = match page_key {
                    PageKey::Up => self.cursor.roff,
                    PageKey::Down => (self.cursor.roff + self.screen_rows.saturating_sub(1))
                        .min(self.rows.len()),
                };
                let arrow = match page_key {
                    PageKey::Up => AKey::Up,
                    PageKey::Down => AKey::Down,
                };
                for _ in 0..self.screen_rows {
                    self.move_cursor(&arrow);
                }
            }
            Key::Home => self.cursor.x = 0,
            Key::End => self.cursor.x = self.current_row().map_or(0, |row| row.chars.len()),
            Key::Char(b'\r') => self.insert_new_line(), // Enter
            Key::Char(BACKSPACE | DELETE_BIS) => self.delete_char(),
            Key::Delete => {
                self.move_cursor(&AKey::Right);
                self.delete_char();
            }
            Key::Escape | Key::Char(REFRESH_SCREEN) => (),
            Key::Char(EXIT) => {
                quit_times = self.quit_times - 1;
                if self.dirty == 0 || quit_times == 0 {
                    return (true, None);
                }
                set_status!(
                    self,
                    "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                    quit_times
                );
            }
            Key::Char(SAVE) => match self.file_name.take() {
                Some(file_name) => {
                    self.save_and_handle_io_errors(&file_name);
                    self.file_name = Some(file_name);
                }
                None => prompt_mode = Some(PromptMode::Save(String::new())),
            },
            Key::Char(FIND) => {
                prompt_mode =
                    Some(PromptMode::Find(String::new(), self.cursor.clone(), FindState::default()))
            }
            Key::Char(c) => self.insert_byte(*c),
        }
        self.quit_times = quit_times;
        (false, prompt_mode)
    }

    /// If `file_name` is not None, load the file. Then run the text editor.
    ///
    /// # Errors
    ///
    /// Will return `Err` if any error occurs.
    pub fn run(&mut self, file_name: Option<String>) -> Result<(), Error> {
        if let Some(file_name) = file_name.as_deref() {
            self.syntax = SyntaxConf::select(file_name);
            self.load(Path::new(file_name))?;
        }
        self.file_name = file_name;
        loop {
            if let Some(mode) = self.prompt_mode.as_ref() {
                set_status!(self, "{}", mode.status_msg());
            }
            self.refresh_screen()?;
            let key = loop_until_keypress()?;
            self.prompt_mode = match self.prompt_mode.take() {
                None => {
                    // process_keypress returns (should_quit, prompt_mode)
                    let (quit, prompt_mode) = self.process_keypress(&key);
                    if quit {
                        return Ok(());
                    }
                    prompt_mode
                }
                Some(prompt_mode) => prompt_mode.process_keypress(self, &key),
            }
        }
    }
}

impl Drop for Editor {
    /// When the editor is dropped, clear the screen, park the cursor top-left and restore the
    /// original terminal mode, so the cooked-mode shell comes back to a clean terminal. This runs
    /// on every exit path, including fatal errors.
    fn drop(&mut self) {
        if let Some(orig_term_mode) = self.orig_term_mode.as_ref() {
            let _ = terminal::print_and_flush(
                format!("{}{}", CLEAR_SCREEN, MOVE_CURSOR_TO_START).as_bytes(),
            );
            sys::set_term_mode(orig_term_mode).expect("Could not restore original terminal mode.");
        }
    }
}

/// State held between two search steps while the find prompt is open.
struct FindState {
    /// Row index of the last match, or `None` after a reset.
    last_match: Option<usize>,
    /// Whether to walk the rows forward or backward.
    forward: bool,
    /// The saved highlighting of the matched row, to be restored when the search moves on.
    saved_hl: Option<(usize, Vec<HlType>)>,
}

impl Default for FindState {
    fn default() -> Self { Self { last_match: None, forward: true, saved_hl: None } }
}

/// The prompt mode.
enum PromptMode {
    /// Save(prompt buffer)
    Save(String),
    /// Find(prompt buffer, saved cursor state, search state)
    Find(String, CursorState, FindState),
}

impl PromptMode {
    /// Return the status message to print for the selected `PromptMode`.
    fn status_msg(&self) -> String {
        match self {
            Self::Save(buffer) => format!("Save as: {} (ESC to cancel)", buffer),
            Self::Find(buffer, ..) => format!("Search: {} (Use ESC/Arrows/Enter)", buffer),
        }
    }

    /// Process a keypress event for the selected `PromptMode`.
    fn process_keypress(self, ed: &mut Editor, key: &Key) -> Option<Self> {
        ed.status_msg = None;
        match self {
            Self::Save(buffer) => match process_prompt_keypress(buffer, key) {
                PromptState::Active(buffer) => return Some(Self::Save(buffer)),
                PromptState::Cancelled => set_status!(ed, "Save aborted"),
                PromptState::Completed(file_name) => ed.save_as(file_name),
            },
            Self::Find(buffer, saved_cursor, mut find_state) => {
                // Remove the highlighting of the previous match before moving on.
                if let Some((row_index, hl)) = find_state.saved_hl.take() {
                    ed.rows[row_index].hl = hl;
                }
                match process_prompt_keypress(buffer, key) {
                    PromptState::Active(query) => {
                        // Enter on an empty buffer leaves the prompt untouched.
                        if !matches!(key, Key::Char(b'\r')) {
                            match key {
                                Key::Arrow(AKey::Right | AKey::Down) => find_state.forward = true,
                                Key::Arrow(AKey::Left | AKey::Up) => find_state.forward = false,
                                // The query changed; restart the search, forward.
                                _ => find_state = FindState::default(),
                            }
                            ed.find(query.as_bytes(), &mut find_state);
                        }
                        return Some(Self::Find(query, saved_cursor, find_state));
                    }
                    // The prompt was cancelled. Restore the previous position.
                    PromptState::Cancelled => ed.cursor = saved_cursor,
                    // The cursor stays on the match.
                    PromptState::Completed(_) => (),
                }
            }
        }
        None
    }
}

/// The state of the prompt after processing a keypress event.
enum PromptState {
    // Active contains the current buffer
    Active(String),
    // Completed contains the final string
    Completed(String),
    Cancelled,
}

/// Process a prompt keypress event and return the new state for the prompt.
fn process_prompt_keypress(mut buffer: String, key: &Key) -> PromptState {
    match key {
        Key::Char(b'\r') if !buffer.is_empty() => return PromptState::Completed(buffer),
        Key::Escape => return PromptState::Cancelled,
        Key::Char(BACKSPACE | DELETE_BIS) | Key::Delete => {
            buffer.pop();
        }
        Key::Char(c @ 0..=126) if !c.is_ascii_control() => buffer.push(*c as char),
        // No-op for the buffer; the key is still seen by the mode.
        _ => (),
    }
    PromptState::Active(buffer)
}
