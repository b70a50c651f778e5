use crate::model::Transcript;

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub auto_save: bool,

    // Input line
    pub input: String,
    pub cursor: usize, // char index into `input`
    pub input_history: Vec<String>,
    pub history_pos: Option<usize>, // index into input_history while browsing
    pub draft: String,              // stashed edit while browsing history

    // Results panel; 0 means follow the tail
    pub scroll_from_bottom: usize,

    // Transcripts tab
    pub transcripts: Vec<Transcript>,
    pub transcript_selected: usize,
    pub transcript_scroll_offset: usize,
    pub last_exported_path: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            info: String::new(),
            auto_save: true,
            input: String::new(),
            cursor: 0,
            input_history: Vec::new(),
            history_pos: None,
            draft: String::new(),
            scroll_from_bottom: 0,
            transcripts: Vec::new(),
            transcript_selected: 0,
            transcript_scroll_offset: 0,
            last_exported_path: None,
        }
    }
}

impl UiState {
    fn byte_at(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_at(self.cursor - 1);
        self.input.remove(at);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_at(self.cursor);
        self.input.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.history_pos = None;
    }

    /// Take the input line for submission, resetting the editing state.
    pub fn take_input(&mut self) -> String {
        let taken = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.history_pos = None;
        taken
    }

    /// Remember a submitted line, skipping consecutive duplicates.
    pub fn push_input_history(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if self.input_history.last().map(String::as_str) != Some(line) {
            self.input_history.push(line.to_string());
        }
    }

    pub fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }
        let next_pos = match self.history_pos {
            None => {
                self.draft = self.input.clone();
                self.input_history.len() - 1
            }
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(next_pos);
        self.input = self.input_history[next_pos].clone();
        self.cursor = self.char_len();
    }

    pub fn history_next(&mut self) {
        let Some(pos) = self.history_pos else {
            return;
        };
        if pos + 1 < self.input_history.len() {
            self.history_pos = Some(pos + 1);
            self.input = self.input_history[pos + 1].clone();
        } else {
            // Walked past the newest item: restore the stashed draft.
            self.history_pos = None;
            self.input = std::mem::take(&mut self.draft);
        }
        self.cursor = self.char_len();
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_respect_the_cursor() {
        let mut s = UiState::default();
        for c in "abc".chars() {
            s.insert_char(c);
        }
        s.move_left();
        s.insert_char('X');
        assert_eq!(s.input, "abXc");
        s.backspace();
        assert_eq!(s.input, "abc");
        assert_eq!(s.cursor, 2);
    }

    #[test]
    fn editing_is_char_based_not_byte_based() {
        let mut s = UiState::default();
        for c in "héllo".chars() {
            s.insert_char(c);
        }
        s.move_home();
        s.move_right();
        s.delete();
        assert_eq!(s.input, "hllo");
    }

    #[test]
    fn take_input_resets_editing_state() {
        let mut s = UiState::default();
        for c in "run me".chars() {
            s.insert_char(c);
        }
        let taken = s.take_input();
        assert_eq!(taken, "run me");
        assert!(s.input.is_empty());
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn history_recall_round_trips_the_draft() {
        let mut s = UiState::default();
        s.push_input_history("first");
        s.push_input_history("second");
        for c in "wip".chars() {
            s.insert_char(c);
        }

        s.history_prev();
        assert_eq!(s.input, "second");
        s.history_prev();
        assert_eq!(s.input, "first");
        s.history_next();
        assert_eq!(s.input, "second");
        s.history_next();
        assert_eq!(s.input, "wip");
        assert_eq!(s.history_pos, None);
    }

    #[test]
    fn consecutive_duplicate_history_entries_collapse() {
        let mut s = UiState::default();
        s.push_input_history("x");
        s.push_input_history("x");
        s.push_input_history("y");
        assert_eq!(s.input_history, vec!["x", "y"]);
    }

    #[test]
    fn scroll_never_goes_below_the_tail() {
        let mut s = UiState::default();
        s.scroll_down(5);
        assert_eq!(s.scroll_from_bottom, 0);
        s.scroll_up(3);
        s.scroll_down(1);
        assert_eq!(s.scroll_from_bottom, 2);
    }
}
