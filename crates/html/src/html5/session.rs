//! Runtime-facing streaming parse session.
//!
//! Wraps the tokenizer as an incremental sink and coordinates cooperative
//! suspension around script elements: when the sink answers a tag callback
//! with `SuspendForScript`, the loop parks, the host may stage markup via
//! `document_write`, and `resume` splices the staged markup in at the parse
//! position before continuing.

use crate::html5::shared::UsageError;
use crate::html5::tokenizer::{Html5Tokenizer, TokenSink, TokenizeResult, TokenizerConfig};

/// Session configuration.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    /// Honor `SuspendForScript` directives. When off, the session clears the
    /// pause and keeps parsing, as when no script host is attached.
    pub scripting: bool,
}

/// Streaming driver over the tokenizer.
pub struct Html5StreamSession<S: TokenSink> {
    tokenizer: Html5Tokenizer<S>,
    config: SessionConfig,
    /// Markup staged by `document_write`, drained LIFO on resume. Each splice
    /// lands immediately after the cursor, so popping in reverse receipt
    /// order reproduces the call order in the stream.
    pending_insertions: Vec<String>,
    paused_by_script: bool,
    last_chunk_written: bool,
}

impl<S: TokenSink> Html5StreamSession<S> {
    pub fn new(tokenizer_config: TokenizerConfig, config: SessionConfig, sink: S) -> Self {
        Self {
            tokenizer: Html5Tokenizer::new(tokenizer_config, sink),
            config,
            pending_insertions: Vec::new(),
            paused_by_script: false,
            last_chunk_written: false,
        }
    }

    /// Feed one chunk and run the parsing loop.
    ///
    /// `NeedMoreInput` doubles as the write-completion signal: the producer
    /// may send the next chunk. While paused for a script the chunk is
    /// buffered and the loop stays parked until `resume`.
    pub fn write(&mut self, chunk: &str, last_chunk: bool) -> Result<TokenizeResult, UsageError> {
        if self.tokenizer.is_in_loop() {
            return Err(UsageError::ReentrantWrite);
        }
        if self.tokenizer.is_stopped() {
            return Ok(TokenizeResult::Stopped);
        }
        if self.last_chunk_written {
            return Err(UsageError::WriteAfterLastChunk);
        }
        self.last_chunk_written = last_chunk;
        self.tokenizer.write(chunk, last_chunk);
        if self.paused_by_script {
            return Ok(TokenizeResult::SuspendedForScript);
        }
        Ok(self.run_loop())
    }

    /// Signal end-of-stream without further content.
    pub fn finish(&mut self) -> Result<TokenizeResult, UsageError> {
        self.write("", true)
    }

    /// Stage markup to be inserted at the parse position on resume. Ignored
    /// once the tokenizer is stopped.
    pub fn document_write(&mut self, html: &str) {
        if self.tokenizer.is_stopped() {
            return;
        }
        self.pending_insertions.push(html.to_string());
    }

    /// Resume after a script pause, splicing staged markup in first.
    pub fn resume(&mut self) -> Result<TokenizeResult, UsageError> {
        if !self.paused_by_script {
            return Err(UsageError::AlreadyResumed);
        }
        self.paused_by_script = false;
        let staged = self.pending_insertions.len();
        while let Some(html) = self.pending_insertions.pop() {
            self.tokenizer.insert_html_at_current_pos(&html);
        }
        if staged > 0 {
            log::debug!(target: "html5.session", "resumed with {staged} staged insertions");
        }
        if self.tokenizer.is_stopped() {
            return Ok(TokenizeResult::Stopped);
        }
        self.tokenizer.unpause();
        Ok(self.run_loop())
    }

    /// Stop parsing; subsequent writes are no-ops.
    pub fn stop(&mut self) {
        self.tokenizer.stop();
    }

    pub fn is_paused_by_script(&self) -> bool {
        self.paused_by_script
    }

    pub fn tokenizer(&self) -> &Html5Tokenizer<S> {
        &self.tokenizer
    }

    pub fn tokenizer_mut(&mut self) -> &mut Html5Tokenizer<S> {
        &mut self.tokenizer
    }

    pub fn sink(&self) -> &S {
        self.tokenizer.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.tokenizer.sink_mut()
    }

    fn run_loop(&mut self) -> TokenizeResult {
        loop {
            let result = self.tokenizer.run();
            match result {
                TokenizeResult::SuspendedForScript if !self.config.scripting => {
                    // No script host attached; the pause is a no-op.
                    self.tokenizer.unpause();
                }
                TokenizeResult::SuspendedForScript => {
                    self.paused_by_script = true;
                    log::debug!(target: "html5.session", "paused for script execution");
                    return result;
                }
                _ => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Html5StreamSession, SessionConfig};
    use crate::html5::shared::{EofToken, TagToken, UsageError};
    use crate::html5::tokenizer::{
        SinkDirective, TokenSink, TokenizeResult, TokenizerConfig, TokenizerState,
    };

    /// Tag-level recorder standing in for a tree builder: switches `<script>`
    /// into script data and requests suspension when the element closes.
    #[derive(Default)]
    struct ScriptAwareSink {
        events: Vec<String>,
        suspend_on_script: bool,
    }

    impl TokenSink for ScriptAwareSink {
        fn on_start_tag(&mut self, token: &TagToken) -> SinkDirective {
            self.events.push(format!("<{}>", token.name));
            if token.name == "script" {
                return SinkDirective::SwitchState(TokenizerState::ScriptData);
            }
            SinkDirective::Continue
        }

        fn on_end_tag(&mut self, token: &TagToken) -> SinkDirective {
            self.events.push(format!("</{}>", token.name));
            if self.suspend_on_script && token.name == "script" {
                return SinkDirective::SuspendForScript;
            }
            SinkDirective::Continue
        }

        fn on_eof(&mut self, _token: &EofToken) {
            self.events.push("EOF".to_string());
        }
    }

    fn scripting_session() -> Html5StreamSession<ScriptAwareSink> {
        let sink = ScriptAwareSink {
            suspend_on_script: true,
            ..ScriptAwareSink::default()
        };
        Html5StreamSession::new(
            TokenizerConfig::default(),
            SessionConfig { scripting: true },
            sink,
        )
    }

    #[test]
    fn document_write_injects_before_remaining_stream() {
        let mut session = scripting_session();
        assert_eq!(
            session.write("<script></script><b>", true),
            Ok(TokenizeResult::SuspendedForScript)
        );
        assert!(session.is_paused_by_script());
        assert_eq!(session.sink().events, vec!["<script>", "</script>"]);

        session.document_write("<i>");
        assert_eq!(session.resume(), Ok(TokenizeResult::EmittedEof));
        assert_eq!(
            session.sink().events,
            vec!["<script>", "</script>", "<i>", "<b>", "EOF"]
        );
    }

    #[test]
    fn multiple_document_writes_keep_call_order() {
        let mut session = scripting_session();
        assert_eq!(
            session.write("<script></script><b>", true),
            Ok(TokenizeResult::SuspendedForScript)
        );
        session.document_write("<i>");
        session.document_write("<em>");
        assert_eq!(session.resume(), Ok(TokenizeResult::EmittedEof));
        assert_eq!(
            session.sink().events,
            vec!["<script>", "</script>", "<i>", "<em>", "<b>", "EOF"]
        );
    }

    #[test]
    fn resume_without_pause_is_a_usage_error() {
        let mut session = scripting_session();
        assert_eq!(session.resume(), Err(UsageError::AlreadyResumed));
        assert_eq!(session.write("<script></script>", false).unwrap(), TokenizeResult::SuspendedForScript);
        assert_eq!(session.resume().unwrap(), TokenizeResult::NeedMoreInput);
        assert_eq!(session.resume(), Err(UsageError::AlreadyResumed));
    }

    #[test]
    fn writes_while_paused_are_buffered() {
        let mut session = scripting_session();
        assert_eq!(
            session.write("<script></script>", false).unwrap(),
            TokenizeResult::SuspendedForScript
        );
        // The chunk parks in the buffer; no tokens yet.
        assert_eq!(
            session.write("<b>", true).unwrap(),
            TokenizeResult::SuspendedForScript
        );
        assert_eq!(session.sink().events, vec!["<script>", "</script>"]);
        session.document_write("<i>");
        assert_eq!(session.resume(), Ok(TokenizeResult::EmittedEof));
        assert_eq!(
            session.sink().events,
            vec!["<script>", "</script>", "<i>", "<b>", "EOF"]
        );
    }

    #[test]
    fn scripting_disabled_never_pauses() {
        let sink = ScriptAwareSink {
            suspend_on_script: true,
            ..ScriptAwareSink::default()
        };
        let mut session =
            Html5StreamSession::new(TokenizerConfig::default(), SessionConfig::default(), sink);
        assert_eq!(
            session.write("<script></script><b>", true),
            Ok(TokenizeResult::EmittedEof)
        );
        assert_eq!(
            session.sink().events,
            vec!["<script>", "</script>", "<b>", "EOF"]
        );
    }

    #[test]
    fn write_after_last_chunk_is_a_usage_error() {
        let mut session = scripting_session();
        assert_eq!(session.write("<p>", true).unwrap(), TokenizeResult::EmittedEof);
        assert_eq!(session.write("<q>", true), Err(UsageError::WriteAfterLastChunk));
    }

    #[test]
    fn stopped_session_ignores_writes() {
        let mut session = scripting_session();
        assert_eq!(
            session.write("<script></script>x", false).unwrap(),
            TokenizeResult::SuspendedForScript
        );
        session.stop();
        session.document_write("<i>");
        assert_eq!(session.resume(), Ok(TokenizeResult::Stopped));
        assert_eq!(session.write("more", false), Ok(TokenizeResult::Stopped));
        assert_eq!(session.sink().events, vec!["<script>", "</script>"]);
    }

    #[test]
    fn finish_emits_eof() {
        let mut session = scripting_session();
        assert_eq!(session.write("text", false).unwrap(), TokenizeResult::NeedMoreInput);
        assert_eq!(session.finish(), Ok(TokenizeResult::EmittedEof));
        assert_eq!(session.sink().events, vec!["EOF"]);
    }

    #[test]
    fn nested_script_suspension() {
        let mut session = scripting_session();
        assert_eq!(
            session.write("<script></script>", true),
            Ok(TokenizeResult::SuspendedForScript)
        );
        session.document_write("<script></script>x");
        // The injected markup itself contains a script element.
        assert_eq!(session.resume(), Ok(TokenizeResult::SuspendedForScript));
        assert_eq!(session.resume(), Ok(TokenizeResult::EmittedEof));
        assert_eq!(
            session.sink().events,
            vec!["<script>", "</script>", "<script>", "</script>", "EOF"]
        );
    }
}
