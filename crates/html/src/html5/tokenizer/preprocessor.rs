//! Streaming input preprocessor.
//!
//! Owns the growing UTF-16 buffer and the cursor the state machine reads
//! through. Responsibilities: CR -> LF normalization with CRLF collapsing,
//! surrogate-pair combining, line/column/offset bookkeeping, buffered
//! look-ahead, and waterline-gated compaction of already-parsed input.
//!
//! Invariants:
//! - After `advance` returns a non-EOF code point, the buffer still contains
//!   everything needed to re-derive `line`, `col` and `offset`.
//! - `retreat(n)` followed by `n` calls to `advance` yields the same code
//!   points and the same `(line, col, offset)` at every step.
//! - A "gap" is a buffer position the cursor steps over (the LF of a CRLF
//!   pair, or the trailing half of a surrogate pair); `gap_stack` records
//!   them so `retreat` can unwind across them.

use std::collections::VecDeque;

use crate::html5::shared::codepoints::{
    CodePoint, EOF, combine_surrogate_pair, cp, is_control, is_leading_surrogate, is_noncharacter,
    is_surrogate, is_trailing_surrogate,
};
use crate::html5::shared::{ParseErrorCode, ParserError};

/// Buffer compaction threshold in code units.
pub(crate) const DEFAULT_BUFFER_WATERLINE: usize = 1 << 16;

pub(crate) struct Preprocessor {
    units: Vec<u16>,
    /// Index of the current code unit; -1 before the first `advance`.
    pos: isize,
    line: u32,
    line_start_pos: isize,
    gap_stack: Vec<isize>,
    /// Initialized to -2 so the column of the first character is 0.
    last_gap_pos: isize,
    skip_next_new_line: bool,
    is_eol: bool,
    last_chunk_written: bool,
    /// Set when a read needed data past the buffered end of a non-final chunk.
    pub(crate) end_of_chunk_hit: bool,
    buffer_waterline: usize,
    dropped_buffer_size: usize,
    /// Offset of the last reported input-character error, for deduplication
    /// across advance/retreat cycles over the same position.
    last_err_offset: Option<usize>,
    pending_errors: VecDeque<ParserError>,
    check_character_ranges: bool,
}

impl Preprocessor {
    pub(crate) fn new(check_character_ranges: bool) -> Self {
        Self {
            units: Vec::new(),
            pos: -1,
            line: 1,
            line_start_pos: 0,
            gap_stack: Vec::new(),
            last_gap_pos: -2,
            skip_next_new_line: false,
            is_eol: false,
            last_chunk_written: false,
            end_of_chunk_hit: false,
            buffer_waterline: DEFAULT_BUFFER_WATERLINE,
            dropped_buffer_size: 0,
            last_err_offset: None,
            pending_errors: VecDeque::new(),
            check_character_ranges,
        }
    }

    /// Append a decoded chunk. `last_chunk` marks end-of-stream.
    pub(crate) fn write(&mut self, chunk: &str, last_chunk: bool) {
        self.units.extend(chunk.encode_utf16());
        self.end_of_chunk_hit = false;
        self.last_chunk_written = last_chunk;
    }

    /// Append raw UTF-16 code units. Unlike `write`, this can introduce
    /// isolated surrogate halves into the stream.
    pub(crate) fn write_code_units(&mut self, units: &[u16], last_chunk: bool) {
        self.units.extend_from_slice(units);
        self.end_of_chunk_hit = false;
        self.last_chunk_written = last_chunk;
    }

    /// Splice a chunk in immediately after the cursor, so it is the next
    /// input the tokenizer observes. Used for document.write-style injection.
    pub(crate) fn insert_html_at_current_pos(&mut self, chunk: &str) {
        let at = (self.pos + 1) as usize;
        let mut tail = self.units.split_off(at);
        self.units.extend(chunk.encode_utf16());
        self.units.append(&mut tail);
        self.end_of_chunk_hit = false;
    }

    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    /// 0-based column of the current cursor position. A cursor sitting on a
    /// recorded gap counts the gap as already consumed.
    pub(crate) fn col(&self) -> u32 {
        let mut col = self.pos - self.line_start_pos;
        if self.last_gap_pos == self.pos {
            col -= 1;
        }
        col.max(0) as u32
    }

    /// UTF-16 code-unit offset of the cursor from stream start, including
    /// any prefix already discarded by compaction.
    pub(crate) fn offset(&self) -> usize {
        self.dropped_buffer_size + self.pos.max(0) as usize
    }

    pub(crate) fn location(&self) -> (u32, u32, usize) {
        (self.line, self.col(), self.offset())
    }

    /// Advance the cursor one code point and return it.
    ///
    /// CR is returned as LF; an LF directly following a CR is stepped over as
    /// a gap. Well-formed surrogate pairs are combined into a single code
    /// point; isolated surrogates are reported and returned as-is. At the end
    /// of a non-final chunk this returns `EOF` with `end_of_chunk_hit` set.
    pub(crate) fn advance(&mut self) -> CodePoint {
        self.pos += 1;
        if self.is_eol {
            self.is_eol = false;
            self.line += 1;
            self.line_start_pos = self.pos;
        }
        if self.pos as usize >= self.units.len() {
            self.end_of_chunk_hit = !self.last_chunk_written;
            return EOF;
        }

        let mut c = self.units[self.pos as usize] as CodePoint;
        if c == cp::CARRIAGE_RETURN {
            self.is_eol = true;
            self.skip_next_new_line = true;
            return cp::LINE_FEED;
        }
        if c == cp::LINE_FEED {
            self.is_eol = true;
            if self.skip_next_new_line {
                // The recursive call bumps `line` again for this newline.
                self.line -= 1;
                self.skip_next_new_line = false;
                self.add_gap();
                return self.advance();
            }
        }
        self.skip_next_new_line = false;

        if is_surrogate(c) {
            c = self.process_surrogate(c);
            if c == EOF {
                return EOF;
            }
        }

        // Common valid ranges skip classification entirely; the full check
        // only runs for code points that might be control/noncharacter.
        let in_common_valid_range = (c > 0x1f && c < 0x7f)
            || c == cp::LINE_FEED
            || c == cp::CARRIAGE_RETURN
            || (c > 0x9f && c < 0xfdd0);
        if self.check_character_ranges && !in_common_valid_range {
            self.check_problematic_character(c);
        }
        c
    }

    /// Move the cursor back `count` code points, unwinding recorded gaps.
    ///
    /// Callers never retreat across a line boundary except the single-step
    /// end-of-chunk unwind, which `is_eol` reset keeps consistent.
    pub(crate) fn retreat(&mut self, count: usize) {
        self.pos -= count as isize;
        while self.pos < self.last_gap_pos {
            self.last_gap_pos = self.gap_stack.pop().unwrap_or(-2);
            self.pos -= 1;
        }
        self.is_eol = false;
        debug_assert!(self.pos >= -1, "retreat moved cursor before stream start");
    }

    /// Look ahead `offset` code units from the cursor without moving it.
    /// CR is normalized to LF; gaps are not skipped.
    pub(crate) fn peek(&mut self, offset: isize) -> CodePoint {
        let pos = self.pos + offset;
        if pos < 0 {
            return EOF;
        }
        if pos as usize >= self.units.len() {
            self.end_of_chunk_hit = !self.last_chunk_written;
            return EOF;
        }
        let c = self.units[pos as usize] as CodePoint;
        if c == cp::CARRIAGE_RETURN { cp::LINE_FEED } else { c }
    }

    /// Buffered look-ahead starting at the current cursor character.
    ///
    /// Case-insensitive patterns must be lowercase ASCII letters. When the
    /// remaining buffer is shorter than the pattern and the stream is not
    /// finished, this sets `end_of_chunk_hit` and returns false so the caller
    /// can hibernate.
    pub(crate) fn starts_with(&mut self, pattern: &str, case_sensitive: bool) -> bool {
        debug_assert!(pattern.is_ascii(), "look-ahead patterns are ASCII");
        debug_assert!(
            case_sensitive || pattern.bytes().all(|b| b.is_ascii_lowercase()),
            "case-insensitive look-ahead requires lowercase letter patterns"
        );
        debug_assert!(self.pos >= 0, "look-ahead before the first advance");
        let start = self.pos.max(0) as usize;
        if start + pattern.len() > self.units.len() {
            self.end_of_chunk_hit = !self.last_chunk_written;
            return false;
        }
        if case_sensitive {
            pattern
                .bytes()
                .enumerate()
                .all(|(i, b)| self.units[start + i] == u16::from(b))
        } else {
            pattern
                .bytes()
                .enumerate()
                .all(|(i, b)| (self.units[start + i] | 0x20) == u16::from(b))
        }
    }

    /// Discard the already-parsed buffer prefix once the cursor is past the
    /// waterline. Only called between tokenizer steps, when nothing
    /// in-progress references buffer positions.
    pub(crate) fn drop_parsed_chunk(&mut self) {
        if self.pos > self.buffer_waterline as isize {
            let parsed = self.pos as usize;
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(
                target: "html5.preprocessor",
                "dropping {parsed} parsed code units (offset {})",
                self.offset()
            );
            self.units.drain(..parsed);
            self.line_start_pos -= parsed as isize;
            self.dropped_buffer_size += parsed;
            self.pos = 0;
            self.last_gap_pos = -2;
            self.gap_stack.clear();
        }
    }

    pub(crate) fn set_buffer_waterline(&mut self, waterline: usize) {
        self.buffer_waterline = waterline;
    }

    /// Build a zero-width parse error at the current cursor position.
    pub(crate) fn error_at_cursor(&self, code: ParseErrorCode) -> ParserError {
        let (line, col, offset) = self.location();
        ParserError {
            code,
            start_line: line,
            end_line: line,
            start_col: col,
            end_col: col,
            start_offset: offset,
            end_offset: offset,
        }
    }

    pub(crate) fn pop_pending_error(&mut self) -> Option<ParserError> {
        self.pending_errors.pop_front()
    }

    fn add_gap(&mut self) {
        self.gap_stack.push(self.last_gap_pos);
        self.last_gap_pos = self.pos;
    }

    fn process_surrogate(&mut self, c: CodePoint) -> CodePoint {
        if self.pos as usize != self.units.len() - 1 {
            let next = self.units[self.pos as usize + 1] as CodePoint;
            if is_leading_surrogate(c) && is_trailing_surrogate(next) {
                self.pos += 1;
                self.add_gap();
                return combine_surrogate_pair(c, next);
            }
        } else if !self.last_chunk_written {
            // The other half may arrive with the next chunk.
            self.end_of_chunk_hit = true;
            return EOF;
        }
        self.err(ParseErrorCode::SurrogateInInputStream);
        c
    }

    fn check_problematic_character(&mut self, c: CodePoint) {
        if is_control(c) {
            self.err(ParseErrorCode::ControlCharacterInInputStream);
        } else if is_noncharacter(c) {
            self.err(ParseErrorCode::NoncharacterInInputStream);
        }
    }

    /// Report an input-character error, deduplicated by offset so repeated
    /// advance/retreat over the same position fires once.
    fn err(&mut self, code: ParseErrorCode) {
        if !self.check_character_ranges {
            return;
        }
        let offset = self.offset();
        if self.last_err_offset == Some(offset) {
            return;
        }
        self.last_err_offset = Some(offset);
        self.pending_errors.push_back(self.error_at_cursor(code));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(input: &str, last: bool) -> Preprocessor {
        let mut pre = Preprocessor::new(true);
        pre.write(input, last);
        pre
    }

    fn advance_all(pre: &mut Preprocessor) -> Vec<CodePoint> {
        let mut out = Vec::new();
        loop {
            let c = pre.advance();
            if c == EOF {
                break;
            }
            out.push(c);
        }
        out
    }

    #[test]
    fn plain_ascii_positions() {
        let mut pre = from_str("ab", true);
        assert_eq!(pre.advance(), 'a' as i32);
        assert_eq!(pre.location(), (1, 0, 0));
        assert_eq!(pre.advance(), 'b' as i32);
        assert_eq!(pre.location(), (1, 1, 1));
        assert_eq!(pre.advance(), EOF);
        assert!(!pre.end_of_chunk_hit);
        assert_eq!(pre.offset(), 2);
    }

    #[test]
    fn newline_normalization_and_lines() {
        let mut pre = from_str("a\r\nb\rc\nd", true);
        let chars = advance_all(&mut pre);
        let text: String = chars.iter().map(|&c| char::from_u32(c as u32).unwrap()).collect();
        assert_eq!(text, "a\nb\nc\nd");
    }

    #[test]
    fn positions_after_newline_variants() {
        let mut pre = from_str("a\r\nb\rc\nd", true);
        let mut positions = Vec::new();
        loop {
            let c = pre.advance();
            if c == EOF {
                break;
            }
            positions.push((c as u8 as char, pre.line(), pre.col(), pre.offset()));
        }
        assert_eq!(
            positions,
            vec![
                ('a', 1, 0, 0),
                ('\n', 1, 1, 1),
                ('b', 2, 0, 3),
                ('\n', 2, 1, 4),
                ('c', 3, 0, 5),
                ('\n', 3, 1, 6),
                ('d', 4, 0, 7),
            ]
        );
    }

    #[test]
    fn crlf_split_across_chunks() {
        let mut pre = Preprocessor::new(true);
        pre.write("a\r", false);
        assert_eq!(pre.advance(), 'a' as i32);
        assert_eq!(pre.advance(), cp::LINE_FEED);
        assert_eq!(pre.advance(), EOF);
        assert!(pre.end_of_chunk_hit);
        pre.retreat(1);

        pre.write("\nb", true);
        assert_eq!(pre.advance(), 'b' as i32);
        assert_eq!(pre.location(), (2, 0, 3));
    }

    #[test]
    fn surrogate_pair_is_combined() {
        let mut pre = from_str("x𝄞y", true);
        assert_eq!(pre.advance(), 'x' as i32);
        assert_eq!(pre.advance(), 0x1d11e);
        assert_eq!(pre.col(), 1);
        assert_eq!(pre.advance(), 'y' as i32);
        // The pair occupies two code units.
        assert_eq!(pre.location(), (1, 3, 3));
        assert!(pre.pop_pending_error().is_none());
    }

    #[test]
    fn surrogate_pair_split_across_chunks() {
        let mut pre = Preprocessor::new(true);
        pre.write_code_units(&[0xd834], false);
        assert_eq!(pre.advance(), EOF);
        assert!(pre.end_of_chunk_hit);
        pre.retreat(1);

        pre.write_code_units(&[0xdd1e], true);
        assert_eq!(pre.advance(), 0x1d11e);
        assert_eq!(pre.advance(), EOF);
        assert!(pre.pop_pending_error().is_none());
    }

    #[test]
    fn isolated_surrogate_is_reported_once() {
        let mut pre = Preprocessor::new(true);
        pre.write_code_units(&[0xd834, 'x' as u16], true);
        assert_eq!(pre.advance(), 0xd834);
        let err = pre.pop_pending_error().expect("surrogate error");
        assert_eq!(err.code, ParseErrorCode::SurrogateInInputStream);
        assert_eq!(err.start_offset, 0);

        // Re-walking the same offset must not fire again.
        pre.retreat(1);
        assert_eq!(pre.advance(), 0xd834);
        assert!(pre.pop_pending_error().is_none());
    }

    #[test]
    fn control_and_noncharacter_reporting() {
        let mut pre = from_str("\u{0001}\u{fdd0}ok", true);
        pre.advance();
        assert_eq!(
            pre.pop_pending_error().map(|e| e.code),
            Some(ParseErrorCode::ControlCharacterInInputStream)
        );
        pre.advance();
        assert_eq!(
            pre.pop_pending_error().map(|e| e.code),
            Some(ParseErrorCode::NoncharacterInInputStream)
        );
        pre.advance();
        assert!(pre.pop_pending_error().is_none());
    }

    #[test]
    fn silent_mode_skips_range_checks() {
        let mut pre = Preprocessor::new(false);
        pre.write("\u{0001}\u{fdd0}", true);
        advance_all(&mut pre);
        assert!(pre.pop_pending_error().is_none());
    }

    #[test]
    fn retreat_round_trip() {
        let input = "a\r\nb𝄞\nc";
        let mut pre = from_str(input, true);
        let mut trace = Vec::new();
        loop {
            let c = pre.advance();
            if c == EOF {
                break;
            }
            trace.push((c, pre.line(), pre.col(), pre.offset()));
        }
        // EOF advance is part of the walk; unwind it plus every character.
        pre.retreat(1 + trace.len());
        for expected in &trace {
            let c = pre.advance();
            assert_eq!((c, pre.line(), pre.col(), pre.offset()), *expected);
        }
    }

    #[test]
    fn starts_with_matching() {
        let mut pre = from_str("<!DOCTYPE html>", true);
        pre.advance();
        pre.advance();
        pre.advance();
        assert!(pre.starts_with("doctype", false));
        assert!(!pre.starts_with("DOCTYPE", true));
        assert!(pre.starts_with("D", true));
    }

    #[test]
    fn starts_with_short_buffer_sets_end_of_chunk() {
        let mut pre = Preprocessor::new(true);
        pre.write("<!DOC", false);
        pre.advance();
        pre.advance();
        pre.advance();
        assert!(!pre.starts_with("doctype", false));
        assert!(pre.end_of_chunk_hit);

        pre.write("TYPE x", true);
        assert!(pre.starts_with("doctype", false));
    }

    #[test]
    fn drop_parsed_chunk_preserves_offsets() {
        let mut pre = from_str("abcdefgh", true);
        pre.set_buffer_waterline(2);
        for _ in 0..4 {
            pre.advance();
        }
        assert_eq!(pre.offset(), 3);
        pre.drop_parsed_chunk();
        assert_eq!(pre.offset(), 3);
        assert_eq!(pre.advance(), 'e' as i32);
        assert_eq!(pre.offset(), 4);
    }

    #[test]
    fn drop_parsed_chunk_below_waterline_is_noop() {
        let mut pre = from_str("abc", true);
        pre.advance();
        pre.drop_parsed_chunk();
        assert_eq!(pre.advance(), 'b' as i32);
        assert_eq!(pre.offset(), 1);
    }

    #[test]
    fn insert_at_cursor_splices_next() {
        let mut pre = from_str("ab", true);
        assert_eq!(pre.advance(), 'a' as i32);
        pre.insert_html_at_current_pos("XY");
        let rest = advance_all(&mut pre);
        assert_eq!(rest, vec!['X' as i32, 'Y' as i32, 'b' as i32]);
    }

    #[test]
    fn end_of_chunk_vs_end_of_stream() {
        let mut pre = Preprocessor::new(true);
        pre.write("a", false);
        assert_eq!(pre.advance(), 'a' as i32);
        assert_eq!(pre.advance(), EOF);
        assert!(pre.end_of_chunk_hit);
        pre.retreat(1);

        pre.write("", true);
        assert_eq!(pre.advance(), EOF);
        assert!(!pre.end_of_chunk_hit);
    }
}
