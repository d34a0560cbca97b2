//! HTML5 tokenizer public API.
//!
//! This is a streaming tokenizer: it consumes decoded input through the
//! preprocessor and pushes tokens into a caller-supplied sink. The state
//! machine is explicit and resumable at arbitrary chunk boundaries.
//!
//! Invariants:
//! - Chunk-equivalence: feeding input in one chunk or many chunks yields the
//!   same token sequence and the same source locations.
//! - No partial emission: when a chunk ends mid-construct, everything
//!   consumed since the current step is unwound and the same state re-runs
//!   when more input arrives.
//! - Source order: tokens are emitted in strict source order; while paused
//!   for a script no token is emitted.

use crate::html5::shared::codepoints::{CodePoint, EOF, cp, is_whitespace, to_char_lossy};
use crate::html5::shared::{
    Attribute, CharKind, CharacterToken, CommentToken, DoctypeToken, EofToken, Location,
    ParseErrorCode, ParserError, TagToken,
};

mod char_ref;
pub(crate) mod preprocessor;
mod states;

use preprocessor::Preprocessor;
pub use states::TokenizerState;

/// Configuration for the tokenizer.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// Attach source locations to tokens and attributes.
    pub source_locations: bool,
    /// Deliver parse errors to the sink. When off, the per-character
    /// control/noncharacter range checks are skipped entirely.
    pub report_parse_errors: bool,
    /// Buffer-compaction threshold in UTF-16 code units.
    pub buffer_waterline: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            source_locations: false,
            report_parse_errors: true,
            buffer_waterline: preprocessor::DEFAULT_BUFFER_WATERLINE,
        }
    }
}

/// Outcome of one run of the parsing loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenizeResult {
    /// The buffered input is exhausted; more chunks are required.
    NeedMoreInput,
    /// A sink directive paused the loop around a script element.
    SuspendedForScript,
    /// The EOF token has been emitted; no further input will be consumed.
    EmittedEof,
    /// The tokenizer was stopped by the consumer.
    Stopped,
}

/// Minimal tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
    pub parse_errors: u64,
    pub hibernations: u64,
}

/// Instruction returned by tag callbacks, the channel through which a tree
/// builder steers the tokenizer without holding a reference to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkDirective {
    Continue,
    /// Switch into the given state before the next character is examined
    /// (RAWTEXT/RCDATA/script-data/PLAINTEXT element handling).
    SwitchState(TokenizerState),
    /// Pause the loop so the host can run a script element.
    SuspendForScript,
}

/// Consumer of the token stream. Tokens are borrowed for the duration of the
/// callback; implementations copy whatever they retain.
pub trait TokenSink {
    fn on_character(&mut self, _token: &CharacterToken) {}
    fn on_whitespace_character(&mut self, _token: &CharacterToken) {}
    fn on_null_character(&mut self, _token: &CharacterToken) {}
    fn on_comment(&mut self, _token: &CommentToken) {}
    fn on_doctype(&mut self, _token: &DoctypeToken) {}
    fn on_start_tag(&mut self, _token: &TagToken) -> SinkDirective {
        SinkDirective::Continue
    }
    fn on_end_tag(&mut self, _token: &TagToken) -> SinkDirective {
        SinkDirective::Continue
    }
    fn on_eof(&mut self, _token: &EofToken) {}
    fn on_parse_error(&mut self, _error: &ParserError) {}
}

/// HTML5 tokenizer.
pub struct Html5Tokenizer<S: TokenSink> {
    sink: S,
    config: TokenizerConfig,
    preprocessor: Preprocessor,
    state: TokenizerState,
    return_state: TokenizerState,
    /// Code points consumed since the last loop snapshot; unwound wholesale
    /// when a chunk boundary interrupts the current step.
    consumed_after_snapshot: usize,
    paused: bool,
    stopped: bool,
    in_loop: bool,
    eof_emitted: bool,
    current_char: Option<CharacterToken>,
    current_tag: Option<TagToken>,
    current_tag_is_end: bool,
    current_comment: Option<CommentToken>,
    current_doctype: Option<DoctypeToken>,
    /// Start position of the token being assembled, captured at its `<`.
    token_start_loc: Option<(u32, u32, usize)>,
    attr_name: String,
    attr_name_loc: Option<Location>,
    attr_value_start: Option<(u32, u32, usize)>,
    /// Whether the in-progress attribute was pushed onto the current tag.
    /// Duplicates are parsed but never pushed, so their value is discarded.
    attr_committed: bool,
    /// Scrap buffer receiving the value of a duplicate attribute.
    attr_scrap_value: String,
    temp_buff: Vec<CodePoint>,
    char_ref_code: u32,
    last_start_tag_name: String,
    in_foreign_node: bool,
    allow_cdata: bool,
    stats: TokenizerStats,
}

impl<S: TokenSink> Html5Tokenizer<S> {
    pub fn new(config: TokenizerConfig, sink: S) -> Self {
        let mut preprocessor = Preprocessor::new(config.report_parse_errors);
        preprocessor.set_buffer_waterline(config.buffer_waterline);
        Self {
            sink,
            config,
            preprocessor,
            state: TokenizerState::Data,
            return_state: TokenizerState::Data,
            consumed_after_snapshot: 0,
            paused: false,
            stopped: false,
            in_loop: false,
            eof_emitted: false,
            current_char: None,
            current_tag: None,
            current_tag_is_end: false,
            current_comment: None,
            current_doctype: None,
            token_start_loc: None,
            attr_name: String::new(),
            attr_name_loc: None,
            attr_value_start: None,
            attr_committed: false,
            attr_scrap_value: String::new(),
            temp_buff: Vec::new(),
            char_ref_code: 0,
            last_start_tag_name: String::new(),
            in_foreign_node: false,
            allow_cdata: false,
            stats: TokenizerStats::default(),
        }
    }

    /// Append a decoded chunk. Does not drive the loop; call `run`.
    pub fn write(&mut self, chunk: &str, last_chunk: bool) {
        if self.stopped {
            return;
        }
        self.preprocessor.write(chunk, last_chunk);
    }

    /// Append raw UTF-16 code units (JS-originated sources can carry
    /// isolated surrogate halves that `&str` cannot).
    pub fn write_code_units(&mut self, units: &[u16], last_chunk: bool) {
        if self.stopped {
            return;
        }
        self.preprocessor.write_code_units(units, last_chunk);
    }

    /// Splice injected markup in right after the current parse position.
    /// Legal only while the loop is suspended for a script.
    pub fn insert_html_at_current_pos(&mut self, chunk: &str) {
        debug_assert!(!self.in_loop, "injection while the parsing loop is on the stack");
        self.preprocessor.insert_html_at_current_pos(chunk);
    }

    /// Run state transitions until the chunk is exhausted, the tokenizer is
    /// stopped, EOF has been emitted, or a sink directive pauses the loop.
    pub fn run(&mut self) -> TokenizeResult {
        debug_assert!(!self.in_loop, "reentrant parsing loop");
        self.in_loop = true;
        let mut hibernated = false;
        while !self.paused && !self.stopped && !self.eof_emitted {
            self.consumed_after_snapshot = 0;
            // All in-progress token data is owned, so compaction between
            // steps can never invalidate it.
            self.preprocessor.drop_parsed_chunk();
            let c = self.consume();
            if self.ensure_hibernation() {
                hibernated = true;
                break;
            }
            self.dispatch(c);
            self.stats.steps = self.stats.steps.saturating_add(1);
        }
        self.in_loop = false;
        if hibernated {
            self.stats.hibernations = self.stats.hibernations.saturating_add(1);
        }
        if self.eof_emitted {
            TokenizeResult::EmittedEof
        } else if self.stopped {
            TokenizeResult::Stopped
        } else if self.paused {
            TokenizeResult::SuspendedForScript
        } else {
            TokenizeResult::NeedMoreInput
        }
    }

    /// Current cursor position, for tree-builder bookkeeping.
    pub fn current_location(&self) -> Location {
        let (line, col, offset) = self.preprocessor.location();
        Location {
            start_line: line,
            start_col: col,
            start_offset: offset,
            end_line: line,
            end_col: col,
            end_offset: offset,
        }
    }

    /// Switch the state machine externally (tree-builder hook).
    pub fn set_state(&mut self, state: TokenizerState) {
        self.transition(state);
    }

    pub fn state(&self) -> TokenizerState {
        self.state
    }

    /// Remember the open element name that end tags must match in
    /// RAWTEXT/RCDATA/script-data states (fragment parsing hook).
    pub fn set_last_start_tag_name(&mut self, name: &str) {
        self.last_start_tag_name.clear();
        self.last_start_tag_name.push_str(name);
    }

    /// Allow `<![CDATA[` sections (tree builder sets this from the current
    /// element namespace).
    pub fn set_allow_cdata(&mut self, allow: bool) {
        self.allow_cdata = allow;
    }

    /// Foreign-content hint; implies CDATA handling.
    pub fn set_in_foreign_node(&mut self, in_foreign_node: bool) {
        self.in_foreign_node = in_foreign_node;
        self.allow_cdata = in_foreign_node;
    }

    pub fn in_foreign_node(&self) -> bool {
        self.in_foreign_node
    }

    /// Ask the loop to exit at the next state boundary.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub(crate) fn unpause(&mut self) {
        self.paused = false;
    }

    /// Terminal stop: the loop exits at the next boundary and later writes
    /// are ignored.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn is_in_loop(&self) -> bool {
        self.in_loop
    }

    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    // ---- consumption -----------------------------------------------------

    pub(crate) fn consume(&mut self) -> CodePoint {
        self.consumed_after_snapshot += 1;
        let c = self.preprocessor.advance();
        self.forward_pending_errors();
        c
    }

    pub(crate) fn unconsume(&mut self, count: usize) {
        debug_assert!(count <= self.consumed_after_snapshot);
        self.consumed_after_snapshot -= count;
        self.preprocessor.retreat(count);
    }

    /// Re-examine the current code point in another state.
    pub(crate) fn reconsume_in(&mut self, state: TokenizerState) {
        self.unconsume(1);
        self.transition(state);
    }

    /// When the chunk ended mid-step, unwind everything consumed in this
    /// step so the state re-runs identically once more input arrives.
    pub(crate) fn ensure_hibernation(&mut self) -> bool {
        if self.preprocessor.end_of_chunk_hit {
            self.unconsume(self.consumed_after_snapshot);
            return true;
        }
        false
    }

    /// Match a keyword whose first character is the already-consumed `cp`;
    /// on success the cursor ends on the keyword's last character.
    pub(crate) fn consume_sequence_if_match(&mut self, pattern: &str, case_sensitive: bool) -> bool {
        if self.preprocessor.starts_with(pattern, case_sensitive) {
            self.advance_by(pattern.len() - 1);
            true
        } else {
            false
        }
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            let c = self.consume();
            debug_assert!(c != EOF, "sequence consumption ran past buffered input");
        }
    }

    pub(crate) fn peek_next(&mut self) -> CodePoint {
        self.preprocessor.peek(1)
    }

    pub(crate) fn transition(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html5.tokenizer",
            "state {:?} -> {next:?} @{}",
            self.state,
            self.preprocessor.offset()
        );
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    // ---- errors ----------------------------------------------------------

    pub(crate) fn err(&mut self, code: ParseErrorCode) {
        if !self.config.report_parse_errors {
            return;
        }
        let error = self.preprocessor.error_at_cursor(code);
        self.stats.parse_errors = self.stats.parse_errors.saturating_add(1);
        self.sink.on_parse_error(&error);
    }

    fn forward_pending_errors(&mut self) {
        while let Some(error) = self.preprocessor.pop_pending_error() {
            self.stats.parse_errors = self.stats.parse_errors.saturating_add(1);
            self.sink.on_parse_error(&error);
        }
    }

    // ---- locations -------------------------------------------------------

    /// Collapsed span at the cursor, when locations are enabled.
    fn cursor_span(&self) -> Option<Location> {
        if !self.config.source_locations {
            return None;
        }
        let (line, col, offset) = self.preprocessor.location();
        Some(Location {
            start_line: line,
            start_col: col,
            start_offset: offset,
            end_line: line,
            end_col: col,
            end_offset: offset,
        })
    }

    /// Record the position of the `<` (or first character) of the token
    /// about to be assembled.
    pub(crate) fn mark_token_start(&mut self) {
        if self.config.source_locations {
            self.token_start_loc = Some(self.preprocessor.location());
        }
    }

    fn token_start_span(&self) -> Option<Location> {
        let (line, col, offset) = self.token_start_loc?;
        self.config.source_locations.then_some(Location {
            start_line: line,
            start_col: col,
            start_offset: offset,
            end_line: line,
            end_col: col,
            end_offset: offset,
        })
    }

    /// Close `location` just past the current cursor character (used when a
    /// delimiter such as `>` was consumed as part of the token).
    fn close_span_after_cursor(&self, location: &mut Option<Location>) {
        if let Some(loc) = location.as_mut() {
            let (line, col, offset) = self.preprocessor.location();
            loc.end_line = line;
            loc.end_col = col + 1;
            loc.end_offset = offset + 1;
        }
    }

    /// Close `location` at the current cursor character (exclusive).
    fn close_span_at_cursor(&self, location: &mut Option<Location>) {
        if let Some(loc) = location.as_mut() {
            let (line, col, offset) = self.preprocessor.location();
            loc.end_line = line;
            loc.end_col = col;
            loc.end_offset = offset;
        }
    }

    // ---- character runs --------------------------------------------------

    fn append_char(&mut self, kind: CharKind, c: CodePoint) {
        if let Some(run) = &self.current_char
            && run.kind != kind
        {
            self.flush_char_run(None);
        }
        if self.current_char.is_none() {
            self.current_char = Some(CharacterToken {
                kind,
                chars: String::new(),
                location: self.cursor_span(),
            });
        }
        if let Some(run) = &mut self.current_char {
            run.chars.push(to_char_lossy(c));
        }
    }

    /// Emit a code point as character data, classified by kind.
    pub(crate) fn emit_cp(&mut self, c: CodePoint) {
        let kind = if is_whitespace(c) {
            CharKind::Whitespace
        } else if c == cp::NULL {
            CharKind::Null
        } else {
            CharKind::Normal
        };
        self.append_char(kind, c);
    }

    /// Emit literal markup characters that turned out to be text.
    pub(crate) fn emit_chars(&mut self, s: &str) {
        for ch in s.chars() {
            self.append_char(CharKind::Normal, ch as CodePoint);
        }
    }

    pub(crate) fn emit_temp_buff_as_chars(&mut self) {
        let buf = std::mem::take(&mut self.temp_buff);
        for c in &buf {
            self.emit_cp(*c);
        }
    }

    /// Flush the pending run, closing its span at `end` (or at the cursor).
    fn flush_char_run(&mut self, end: Option<(u32, u32, usize)>) {
        let Some(mut run) = self.current_char.take() else {
            return;
        };
        if let Some(loc) = run.location.as_mut() {
            let (line, col, offset) = end.unwrap_or_else(|| self.preprocessor.location());
            loc.end_line = line;
            loc.end_col = col;
            loc.end_offset = offset;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html5.tokenizer", "emit chars {:?} {:?}", run.kind, run.chars);
        match run.kind {
            CharKind::Normal => self.sink.on_character(&run),
            CharKind::Whitespace => self.sink.on_whitespace_character(&run),
            CharKind::Null => self.sink.on_null_character(&run),
        }
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
    }

    // ---- tag tokens ------------------------------------------------------

    pub(crate) fn create_start_tag(&mut self) {
        self.current_tag = Some(TagToken::new(self.token_start_span()));
        self.current_tag_is_end = false;
    }

    pub(crate) fn create_end_tag(&mut self) {
        self.current_tag = Some(TagToken::new(self.token_start_span()));
        self.current_tag_is_end = true;
    }

    pub(crate) fn drop_current_tag(&mut self) {
        self.current_tag = None;
    }

    pub(crate) fn tag_mut(&mut self) -> &mut TagToken {
        debug_assert!(self.current_tag.is_some(), "no tag token in progress");
        self.current_tag.get_or_insert_with(|| TagToken::new(None))
    }

    /// Whether the in-progress end tag matches the start tag that switched
    /// the tokenizer into the current raw-content state.
    pub(crate) fn is_appropriate_end_tag(&self) -> bool {
        match &self.current_tag {
            Some(tag) => {
                !self.last_start_tag_name.is_empty() && tag.name == self.last_start_tag_name
            }
            None => false,
        }
    }

    pub(crate) fn emit_current_tag(&mut self) {
        let Some(mut tag) = self.current_tag.take() else {
            debug_assert!(false, "tag emission without a tag token in progress");
            return;
        };
        self.close_span_after_cursor(&mut tag.location);
        let run_end = tag
            .location
            .map(|loc| (loc.start_line, loc.start_col, loc.start_offset));
        self.flush_char_run(run_end);
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html5.tokenizer",
            "emit {} tag {:?}",
            if self.current_tag_is_end { "end" } else { "start" },
            tag.name
        );
        let directive = if self.current_tag_is_end {
            self.sink.on_end_tag(&tag)
        } else {
            self.last_start_tag_name.clear();
            self.last_start_tag_name.push_str(&tag.name);
            self.sink.on_start_tag(&tag)
        };
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
        match directive {
            SinkDirective::Continue => {}
            SinkDirective::SwitchState(state) => self.transition(state),
            SinkDirective::SuspendForScript => self.paused = true,
        }
    }

    // ---- attributes ------------------------------------------------------

    pub(crate) fn start_new_attr(&mut self) {
        self.attr_name.clear();
        self.attr_scrap_value.clear();
        self.attr_committed = false;
        self.attr_name_loc = self.cursor_span();
        self.attr_value_start = None;
    }

    pub(crate) fn append_to_attr_name(&mut self, c: CodePoint) {
        self.attr_name.push(to_char_lossy(c));
    }

    /// Finish the attribute name: duplicate names are reported and the
    /// attribute is parsed but discarded; the first occurrence wins.
    pub(crate) fn leave_attr_name(&mut self) {
        let mut name_loc = self.attr_name_loc.take();
        self.close_span_at_cursor(&mut name_loc);
        let name = std::mem::take(&mut self.attr_name);
        if self.tag_mut().attr(&name).is_some() {
            self.attr_committed = false;
            self.err(ParseErrorCode::DuplicateAttribute);
        } else {
            let mut attr = Attribute::new(name);
            attr.name_location = name_loc;
            self.tag_mut().attrs.push(attr);
            self.attr_committed = true;
        }
    }

    pub(crate) fn mark_attr_value_start(&mut self) {
        if self.config.source_locations {
            self.attr_value_start = Some(self.preprocessor.location());
        }
    }

    pub(crate) fn append_to_attr_value(&mut self, c: CodePoint) {
        let ch = to_char_lossy(c);
        if self.attr_committed {
            if let Some(attr) = self.tag_mut().attrs.last_mut() {
                attr.value.push(ch);
            }
        } else {
            self.attr_scrap_value.push(ch);
        }
    }

    /// Finish the attribute value; `include_delimiter` covers the closing
    /// quote in the recorded span.
    pub(crate) fn leave_attr_value(&mut self, include_delimiter: bool) {
        let Some(start) = self.attr_value_start.take() else {
            return;
        };
        if !self.attr_committed {
            return;
        }
        let mut span = Some(Location {
            start_line: start.0,
            start_col: start.1,
            start_offset: start.2,
            end_line: start.0,
            end_col: start.1,
            end_offset: start.2,
        });
        if include_delimiter {
            self.close_span_after_cursor(&mut span);
        } else {
            self.close_span_at_cursor(&mut span);
        }
        if let Some(attr) = self.tag_mut().attrs.last_mut() {
            attr.value_location = span;
        }
    }

    // ---- comment tokens --------------------------------------------------

    pub(crate) fn create_comment(&mut self) {
        self.current_comment = Some(CommentToken {
            data: String::new(),
            location: self.token_start_span(),
        });
    }

    pub(crate) fn comment_mut(&mut self) -> &mut CommentToken {
        debug_assert!(self.current_comment.is_some(), "no comment in progress");
        self.current_comment.get_or_insert_with(|| CommentToken {
            data: String::new(),
            location: None,
        })
    }

    pub(crate) fn append_to_comment(&mut self, c: CodePoint) {
        let ch = to_char_lossy(c);
        self.comment_mut().data.push(ch);
    }

    pub(crate) fn append_str_to_comment(&mut self, s: &str) {
        self.comment_mut().data.push_str(s);
    }

    pub(crate) fn emit_current_comment(&mut self, consumed_closer: bool) {
        let Some(mut comment) = self.current_comment.take() else {
            debug_assert!(false, "comment emission without a comment in progress");
            return;
        };
        if consumed_closer {
            self.close_span_after_cursor(&mut comment.location);
        } else {
            self.close_span_at_cursor(&mut comment.location);
        }
        let run_end = comment
            .location
            .map(|loc| (loc.start_line, loc.start_col, loc.start_offset));
        self.flush_char_run(run_end);
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html5.tokenizer", "emit comment {:?}", comment.data);
        self.sink.on_comment(&comment);
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
    }

    // ---- doctype tokens --------------------------------------------------

    pub(crate) fn create_doctype(&mut self) {
        self.current_doctype = Some(DoctypeToken::new(self.token_start_span()));
    }

    pub(crate) fn doctype_mut(&mut self) -> &mut DoctypeToken {
        debug_assert!(self.current_doctype.is_some(), "no doctype in progress");
        self.current_doctype.get_or_insert_with(|| DoctypeToken::new(None))
    }

    pub(crate) fn emit_current_doctype(&mut self, consumed_closer: bool) {
        let Some(mut doctype) = self.current_doctype.take() else {
            debug_assert!(false, "doctype emission without a doctype in progress");
            return;
        };
        if consumed_closer {
            self.close_span_after_cursor(&mut doctype.location);
        } else {
            self.close_span_at_cursor(&mut doctype.location);
        }
        let run_end = doctype
            .location
            .map(|loc| (loc.start_line, loc.start_col, loc.start_offset));
        self.flush_char_run(run_end);
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html5.tokenizer", "emit doctype {:?}", doctype.name);
        self.sink.on_doctype(&doctype);
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
    }

    // ---- EOF -------------------------------------------------------------

    pub(crate) fn emit_eof(&mut self) {
        self.flush_char_run(None);
        let token = EofToken {
            location: self.cursor_span(),
        };
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html5.tokenizer", "emit EOF");
        self.sink.on_eof(&token);
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
        self.eof_emitted = true;
    }

    pub(crate) fn temp_buff_is(&self, expected: &str) -> bool {
        self.temp_buff.len() == expected.len()
            && self
                .temp_buff
                .iter()
                .zip(expected.bytes())
                .all(|(&c, b)| c == CodePoint::from(b))
    }

    pub(crate) fn set_buffer_waterline(&mut self, waterline: usize) {
        self.preprocessor.set_buffer_waterline(waterline);
    }
}

#[cfg(test)]
mod tests;
