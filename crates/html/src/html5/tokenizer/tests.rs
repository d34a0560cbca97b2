use super::{
    Html5Tokenizer, SinkDirective, TokenSink, TokenizeResult, TokenizerConfig, TokenizerState,
};
use crate::html5::shared::{
    CharacterToken, CommentToken, DoctypeToken, EofToken, Location, ParserError, TagToken,
};

/// Records every sink callback as a deterministic snapshot string, in the
/// style of the golden-token harnesses.
#[derive(Default)]
struct RecordingSink {
    tokens: Vec<String>,
    locations: Vec<Option<Location>>,
    errors: Vec<String>,
    /// Start tags that switch the tokenizer, standing in for the tree
    /// builder's RAWTEXT/RCDATA/script handling.
    raw_elements: Vec<(String, TokenizerState)>,
    /// End tags that request script suspension.
    suspend_end_tags: Vec<String>,
}

impl RecordingSink {
    fn with_raw(pairs: &[(&str, TokenizerState)]) -> Self {
        Self {
            raw_elements: pairs
                .iter()
                .map(|(name, state)| (name.to_string(), *state))
                .collect(),
            ..Self::default()
        }
    }

    fn record(&mut self, token: String, location: Option<Location>) {
        self.tokens.push(token);
        self.locations.push(location);
    }
}

impl TokenSink for RecordingSink {
    fn on_character(&mut self, token: &CharacterToken) {
        self.record(format!("CHAR \"{}\"", escape_text(&token.chars)), token.location);
    }

    fn on_whitespace_character(&mut self, token: &CharacterToken) {
        self.record(format!("WS \"{}\"", escape_text(&token.chars)), token.location);
    }

    fn on_null_character(&mut self, token: &CharacterToken) {
        self.record(format!("NULL \"{}\"", escape_text(&token.chars)), token.location);
    }

    fn on_comment(&mut self, token: &CommentToken) {
        self.record(format!("COMMENT \"{}\"", escape_text(&token.data)), token.location);
    }

    fn on_doctype(&mut self, token: &DoctypeToken) {
        let name = token.name.as_deref().unwrap_or("null").to_string();
        let public_id = token
            .public_id
            .as_deref()
            .map_or_else(|| "null".to_string(), |s| format!("\"{}\"", escape_text(s)));
        let system_id = token
            .system_id
            .as_deref()
            .map_or_else(|| "null".to_string(), |s| format!("\"{}\"", escape_text(s)));
        self.record(
            format!(
                "DOCTYPE name={name} public={public_id} system={system_id} quirks={}",
                token.force_quirks
            ),
            token.location,
        );
    }

    fn on_start_tag(&mut self, token: &TagToken) -> SinkDirective {
        let mut out = format!("START name={} attrs=[", token.name);
        for (i, attr) in token.attrs.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{}=\"{}\"", attr.name, escape_text(&attr.value)));
        }
        out.push_str(&format!("] self_closing={}", token.self_closing));
        self.record(out, token.location);
        for (name, state) in &self.raw_elements {
            if *name == token.name {
                return SinkDirective::SwitchState(*state);
            }
        }
        SinkDirective::Continue
    }

    fn on_end_tag(&mut self, token: &TagToken) -> SinkDirective {
        self.record(format!("END name={}", token.name), token.location);
        if self.suspend_end_tags.iter().any(|n| *n == token.name) {
            return SinkDirective::SuspendForScript;
        }
        SinkDirective::Continue
    }

    fn on_eof(&mut self, token: &EofToken) {
        self.record("EOF".to_string(), token.location);
    }

    fn on_parse_error(&mut self, error: &ParserError) {
        self.errors
            .push(format!("{}@{}", error.code.as_str(), error.start_offset));
    }
}

fn escape_text(text: &str) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn loc_config() -> TokenizerConfig {
    TokenizerConfig {
        source_locations: true,
        ..TokenizerConfig::default()
    }
}

/// Feed the chunks, marking the final one as last, and return the sink.
fn run_sink_chunks(config: TokenizerConfig, sink: RecordingSink, chunks: &[&str]) -> RecordingSink {
    let mut tokenizer = Html5Tokenizer::new(config, sink);
    let count = chunks.len();
    for (i, chunk) in chunks.iter().enumerate() {
        tokenizer.write(chunk, i + 1 == count);
        let result = tokenizer.run();
        if i + 1 == count {
            assert_eq!(result, TokenizeResult::EmittedEof, "chunks: {chunks:?}");
        } else {
            assert!(
                matches!(result, TokenizeResult::NeedMoreInput),
                "mid-stream run must ask for more input, got {result:?} on {chunks:?}"
            );
        }
    }
    tokenizer.into_sink()
}

fn run_chunks(chunks: &[&str]) -> RecordingSink {
    run_sink_chunks(TokenizerConfig::default(), RecordingSink::default(), chunks)
}

fn run_html(input: &str) -> RecordingSink {
    run_chunks(&[input])
}

fn tokens(input: &str) -> Vec<String> {
    run_html(input).tokens
}

struct LcgRng(u64);

impl LcgRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }
}

/// Writing the chunks in order must match writing the whole input at once,
/// tokens, errors and locations alike.
fn assert_chunk_invariant(input: &str, raw: &[(&str, TokenizerState)]) {
    let whole = run_sink_chunks(loc_config(), RecordingSink::with_raw(raw), &[input]);
    for at in 1..input.len() {
        if !input.is_char_boundary(at) {
            continue;
        }
        let split = run_sink_chunks(
            loc_config(),
            RecordingSink::with_raw(raw),
            &[&input[..at], &input[at..]],
        );
        assert_eq!(whole.tokens, split.tokens, "tokens diverge at split {at} of {input:?}");
        assert_eq!(whole.errors, split.errors, "errors diverge at split {at} of {input:?}");
        assert_eq!(
            whole.locations, split.locations,
            "locations diverge at split {at} of {input:?}"
        );
    }
    // A few random three-way splits on top of the exhaustive two-way pass.
    let mut rng = LcgRng::new(0x5eed ^ input.len() as u64);
    for _ in 0..8 {
        let mut a = (rng.next() % input.len() as u64) as usize;
        let mut b = (rng.next() % input.len() as u64) as usize;
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        if !input.is_char_boundary(a) || !input.is_char_boundary(b) {
            continue;
        }
        let split = run_sink_chunks(
            loc_config(),
            RecordingSink::with_raw(raw),
            &[&input[..a], &input[a..b], &input[b..]],
        );
        assert_eq!(whole.tokens, split.tokens, "tokens diverge at {a}/{b} of {input:?}");
        assert_eq!(whole.errors, split.errors, "errors diverge at {a}/{b} of {input:?}");
    }
}

// ---- end-to-end token sequences ---------------------------------------

#[test]
fn start_and_end_tags_around_text() {
    assert_eq!(
        tokens("<p>Hi</p>"),
        vec![
            "START name=p attrs=[] self_closing=false",
            "CHAR \"Hi\"",
            "END name=p",
            "EOF",
        ]
    );
}

#[test]
fn tag_locations_cover_source_ranges() {
    let sink = run_sink_chunks(loc_config(), RecordingSink::default(), &["<p>Hi</p>"]);
    let spans: Vec<(usize, usize)> = sink
        .locations
        .iter()
        .map(|loc| loc.map(|l| (l.start_offset, l.end_offset)).unwrap())
        .collect();
    assert_eq!(spans, vec![(0, 3), (3, 5), (5, 9), (9, 9)]);
    let first = sink.locations[0].unwrap();
    assert_eq!((first.start_line, first.start_col), (1, 0));
    assert_eq!((first.end_line, first.end_col), (1, 3));
}

#[test]
fn comment_token() {
    assert_eq!(tokens("<!-- a -->"), vec!["COMMENT \" a \"", "EOF"]);
}

#[test]
fn character_references_in_text() {
    let sink = run_html("&amp;&lt;&#65;");
    assert_eq!(sink.tokens, vec!["CHAR \"&<A\"", "EOF"]);
    assert_eq!(sink.errors, Vec::<String>::new());
}

#[test]
fn newline_normalization_splits_runs_by_kind() {
    // CR, CRLF and LF all normalize to LF; runs alternate between text and
    // whitespace kinds.
    assert_eq!(
        tokens("a\r\nb\rc\nd"),
        vec![
            "CHAR \"a\"",
            "WS \"\\n\"",
            "CHAR \"b\"",
            "WS \"\\n\"",
            "CHAR \"c\"",
            "WS \"\\n\"",
            "CHAR \"d\"",
            "EOF",
        ]
    );
}

#[test]
fn newline_positions_advance_lines() {
    let sink = run_sink_chunks(loc_config(), RecordingSink::default(), &["a\r\nb\rc\nd"]);
    let starts: Vec<(u32, u32)> = sink
        .locations
        .iter()
        .map(|loc| loc.map(|l| (l.start_line, l.start_col)).unwrap())
        .collect();
    // a, \n, b, \n, c, \n, d, EOF
    assert_eq!(
        starts,
        vec![(1, 0), (1, 1), (2, 0), (2, 1), (3, 0), (3, 1), (4, 0), (4, 1)]
    );
}

#[test]
fn script_data_via_sink_directive() {
    let sink = run_sink_chunks(
        TokenizerConfig::default(),
        RecordingSink::with_raw(&[("script", TokenizerState::ScriptData)]),
        &["<script>x<</script>y"],
    );
    assert_eq!(
        sink.tokens,
        vec![
            "START name=script attrs=[] self_closing=false",
            "CHAR \"x<\"",
            "END name=script",
            "CHAR \"y\"",
            "EOF",
        ]
    );
}

// ---- chunking invariance ----------------------------------------------

#[test]
fn chunking_is_invariant() {
    let cases: &[&str] = &[
        "<p>Hi</p>",
        "<!-- a -->",
        "&amp;&lt;&#65;",
        "a\r\nb\rc\nd",
        "<div a='x&amp;y' b=\"2\" c>",
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">",
        "&notit;x",
        "&#x80;&#65 y",
        "x𝄞<b>𝄞</b>",
        "<!--a<!-- -->b-->",
        "<!--x<!-->y-->",
        "a&b;c",
    ];
    for input in cases {
        assert_chunk_invariant(input, &[]);
    }
    assert_chunk_invariant(
        "<script>s<!--<script>x</script>--></script>t",
        &[("script", TokenizerState::ScriptData)],
    );
    assert_chunk_invariant(
        "<textarea>&amp;<b></textarea>",
        &[("textarea", TokenizerState::Rcdata)],
    );
}

// ---- tags and attributes ----------------------------------------------

#[test]
fn attribute_quote_forms() {
    assert_eq!(
        tokens("<a one=\"1\" two='2' three=3 four>"),
        vec![
            "START name=a attrs=[one=\"1\" two=\"2\" three=\"3\" four=\"\"] self_closing=false",
            "EOF",
        ]
    );
}

#[test]
fn attribute_names_fold_to_lowercase() {
    assert_eq!(
        tokens("<DIV CLASS=Menu>"),
        vec!["START name=div attrs=[class=\"Menu\"] self_closing=false", "EOF"]
    );
}

#[test]
fn duplicate_attribute_is_discarded() {
    let sink = run_html("<div a=\"1\" a='2' b=c>");
    assert_eq!(
        sink.tokens,
        vec![
            "START name=div attrs=[a=\"1\" b=\"c\"] self_closing=false",
            "EOF",
        ]
    );
    assert_eq!(sink.errors, vec!["duplicate-attribute@12"]);
}

#[test]
fn self_closing_flag() {
    assert_eq!(
        tokens("<br/>"),
        vec!["START name=br attrs=[] self_closing=true", "EOF"]
    );
}

#[test]
fn end_tag_keeps_attributes_for_consumer() {
    // The tokenizer records them; reporting is the tree builder's business.
    let sink = run_html("</div a=1>");
    assert_eq!(sink.tokens, vec!["END name=div", "EOF"]);
    assert_eq!(sink.errors, Vec::<String>::new());
}

#[test]
fn missing_attribute_value_error() {
    let sink = run_html("<div a=>");
    assert_eq!(
        sink.tokens,
        vec!["START name=div attrs=[a=\"\"] self_closing=false", "EOF"]
    );
    assert_eq!(sink.errors, vec!["missing-attribute-value@7"]);
}

#[test]
fn unexpected_characters_in_attributes() {
    let sink = run_html("<div a\"b=c>");
    assert!(sink.errors.iter().any(|e| e.starts_with("unexpected-character-in-attribute-name@")));
    let sink = run_html("<div a=b=c>");
    assert!(
        sink.errors
            .iter()
            .any(|e| e.starts_with("unexpected-character-in-unquoted-attribute-value@"))
    );
    let sink = run_html("<div a='1'b='2'>");
    assert!(
        sink.errors
            .iter()
            .any(|e| e.starts_with("missing-whitespace-between-attributes@"))
    );
}

#[test]
fn solidus_inside_tag() {
    let sink = run_html("<div / id=x>");
    assert_eq!(
        sink.tokens,
        vec!["START name=div attrs=[id=\"x\"] self_closing=false", "EOF"]
    );
    assert_eq!(sink.errors, vec!["unexpected-solidus-in-tag@6"]);
}

#[test]
fn attribute_locations() {
    let sink = run_sink_chunks(loc_config(), RecordingSink::default(), &["<a href=\"x\">"]);
    assert_eq!(sink.tokens[0], "START name=a attrs=[href=\"x\"] self_closing=false");
    // Re-run through the raw tokenizer to inspect the attribute itself.
    struct Keep(Option<TagToken>);
    impl TokenSink for Keep {
        fn on_start_tag(&mut self, token: &TagToken) -> SinkDirective {
            self.0 = Some(token.clone());
            SinkDirective::Continue
        }
    }
    let mut tokenizer = Html5Tokenizer::new(loc_config(), Keep(None));
    tokenizer.write("<a href=\"x\">", true);
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    let tag = tokenizer.into_sink().0.expect("start tag");
    let attr = &tag.attrs[0];
    let name_loc = attr.name_location.expect("name location");
    assert_eq!((name_loc.start_offset, name_loc.end_offset), (3, 7));
    let value_loc = attr.value_location.expect("value location");
    assert_eq!((value_loc.start_offset, value_loc.end_offset), (8, 11));
}

// ---- malformed tag opens ----------------------------------------------

#[test]
fn lone_less_than_is_text() {
    let sink = run_html("a < b");
    assert_eq!(
        sink.tokens,
        vec!["CHAR \"a\"", "WS \" \"", "CHAR \"<\"", "WS \" \"", "CHAR \"b\"", "EOF"]
    );
    assert_eq!(sink.errors, vec!["invalid-first-character-of-tag-name@3"]);
}

#[test]
fn question_mark_opens_bogus_comment() {
    let sink = run_html("<?xml version=\"1.0\"?>");
    assert_eq!(sink.tokens, vec!["COMMENT \"?xml version=\\\"1.0\\\"?\"", "EOF"]);
    assert_eq!(sink.errors, vec!["unexpected-question-mark-instead-of-tag-name@1"]);
}

#[test]
fn empty_end_tag_is_skipped() {
    let sink = run_html("a</>b");
    assert_eq!(sink.tokens, vec!["CHAR \"ab\"", "EOF"]);
    assert_eq!(sink.errors, vec!["missing-end-tag-name@3"]);
}

#[test]
fn invalid_end_tag_becomes_bogus_comment() {
    let sink = run_html("</%d>x");
    assert_eq!(sink.tokens, vec!["COMMENT \"%d\"", "CHAR \"x\"", "EOF"]);
    assert_eq!(sink.errors, vec!["invalid-first-character-of-tag-name@2"]);
}

// ---- comments ----------------------------------------------------------

#[test]
fn comment_edge_cases() {
    let sink = run_html("<!-->");
    assert_eq!(sink.tokens, vec!["COMMENT \"\"", "EOF"]);
    assert_eq!(sink.errors, vec!["abrupt-closing-of-empty-comment@4"]);

    let sink = run_html("<!--->");
    assert_eq!(sink.tokens, vec!["COMMENT \"\"", "EOF"]);
    assert_eq!(sink.errors, vec!["abrupt-closing-of-empty-comment@5"]);

    assert_eq!(tokens("<!-- -- -->"), vec!["COMMENT \" -- \"", "EOF"]);
    assert_eq!(tokens("<!----->"), vec!["COMMENT \"-\"", "EOF"]);
}

#[test]
fn nested_comment_is_reported() {
    let sink = run_html("<!--a<!-- -->b");
    assert_eq!(sink.tokens, vec!["COMMENT \"a<!-- \"", "CHAR \"b\"", "EOF"]);
    assert_eq!(sink.errors, vec!["nested-comment@9"]);
}

#[test]
fn nested_opener_directly_before_closer_is_data() {
    // `<!--` followed immediately by `>` consumes the `>` into the comment-end
    // state without a nested-comment error; the comment keeps running.
    let sink = run_html("<!--x<!-->y-->");
    assert_eq!(sink.tokens, vec!["COMMENT \"x<!--y\"", "EOF"]);
    assert_eq!(sink.errors, Vec::<String>::new());
}

#[test]
fn incorrectly_closed_comment() {
    let sink = run_html("<!--x--!>y");
    assert_eq!(sink.tokens, vec!["COMMENT \"x\"", "CHAR \"y\"", "EOF"]);
    assert_eq!(sink.errors, vec!["incorrectly-closed-comment@8"]);
}

#[test]
fn bang_in_comment_body_is_data() {
    assert_eq!(tokens("<!--x--!-y-->"), vec!["COMMENT \"x--!-y\"", "EOF"]);
}

#[test]
fn bogus_markup_declaration() {
    let sink = run_html("<!x>");
    assert_eq!(sink.tokens, vec!["COMMENT \"x\"", "EOF"]);
    assert_eq!(sink.errors, vec!["incorrectly-opened-comment@2"]);
}

// ---- DOCTYPE -----------------------------------------------------------

#[test]
fn doctype_simple() {
    assert_eq!(
        tokens("<!DOCTYPE html>"),
        vec!["DOCTYPE name=html public=null system=null quirks=false", "EOF"]
    );
    assert_eq!(
        tokens("<!doctype HTML>"),
        vec!["DOCTYPE name=html public=null system=null quirks=false", "EOF"]
    );
}

#[test]
fn doctype_public_and_system() {
    assert_eq!(
        tokens("<!DOCTYPE html PUBLIC \"pub\" 'sys'>"),
        vec!["DOCTYPE name=html public=\"pub\" system=\"sys\" quirks=false", "EOF"]
    );
    assert_eq!(
        tokens("<!DOCTYPE html SYSTEM \"sys\">"),
        vec!["DOCTYPE name=html public=null system=\"sys\" quirks=false", "EOF"]
    );
}

#[test]
fn doctype_without_name_is_quirks() {
    let sink = run_html("<!DOCTYPE>");
    assert_eq!(
        sink.tokens,
        vec!["DOCTYPE name=null public=null system=null quirks=true", "EOF"]
    );
    assert_eq!(sink.errors, vec!["missing-doctype-name@9"]);
}

#[test]
fn doctype_bogus_keyword() {
    let sink = run_html("<!DOCTYPE html wat>");
    assert_eq!(
        sink.tokens,
        vec!["DOCTYPE name=html public=null system=null quirks=true", "EOF"]
    );
    assert_eq!(
        sink.errors,
        vec!["invalid-character-sequence-after-doctype-name@15"]
    );
}

#[test]
fn doctype_abrupt_public_identifier() {
    let sink = run_html("<!DOCTYPE html PUBLIC \"pub>");
    assert_eq!(
        sink.tokens,
        vec!["DOCTYPE name=html public=\"pub\" system=null quirks=true", "EOF"]
    );
    assert_eq!(sink.errors, vec!["abrupt-doctype-public-identifier@26"]);
}

// ---- RCDATA / RAWTEXT / script data ------------------------------------

#[test]
fn rcdata_decodes_references_but_not_tags() {
    let sink = run_sink_chunks(
        TokenizerConfig::default(),
        RecordingSink::with_raw(&[("textarea", TokenizerState::Rcdata)]),
        &["<textarea>&amp;<b></textarea>"],
    );
    assert_eq!(
        sink.tokens,
        vec![
            "START name=textarea attrs=[] self_closing=false",
            "CHAR \"&<b>\"",
            "END name=textarea",
            "EOF",
        ]
    );
}

#[test]
fn rawtext_ignores_markup() {
    let sink = run_sink_chunks(
        TokenizerConfig::default(),
        RecordingSink::with_raw(&[("style", TokenizerState::Rawtext)]),
        &["<style>a{content:'<b>'}</style>"],
    );
    assert_eq!(
        sink.tokens,
        vec![
            "START name=style attrs=[] self_closing=false",
            "CHAR \"a{content:'<b>'}\"",
            "END name=style",
            "EOF",
        ]
    );
}

#[test]
fn inappropriate_end_tag_stays_text() {
    let sink = run_sink_chunks(
        TokenizerConfig::default(),
        RecordingSink::with_raw(&[("style", TokenizerState::Rawtext)]),
        &["<style></div></style>"],
    );
    assert_eq!(
        sink.tokens,
        vec![
            "START name=style attrs=[] self_closing=false",
            "CHAR \"</div>\"",
            "END name=style",
            "EOF",
        ]
    );
}

#[test]
fn script_escaped_and_double_escaped() {
    let sink = run_sink_chunks(
        TokenizerConfig::default(),
        RecordingSink::with_raw(&[("script", TokenizerState::ScriptData)]),
        &["<script><!--<script>y</script>--></script>"],
    );
    assert_eq!(
        sink.tokens,
        vec![
            "START name=script attrs=[] self_closing=false",
            "CHAR \"<!--<script>y</script>-->\"",
            "END name=script",
            "EOF",
        ]
    );
}

#[test]
fn plaintext_swallows_everything() {
    let mut tokenizer = Html5Tokenizer::new(TokenizerConfig::default(), RecordingSink::default());
    tokenizer.set_state(TokenizerState::Plaintext);
    tokenizer.write("a</plaintext><b>", true);
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    assert_eq!(
        tokenizer.into_sink().tokens,
        vec!["CHAR \"a</plaintext><b>\"", "EOF"]
    );
}

// ---- CDATA -------------------------------------------------------------

#[test]
fn cdata_in_foreign_content() {
    let mut tokenizer = Html5Tokenizer::new(TokenizerConfig::default(), RecordingSink::default());
    tokenizer.set_in_foreign_node(true);
    tokenizer.write("<![CDATA[a]]b]]>", true);
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    let sink = tokenizer.into_sink();
    assert_eq!(sink.tokens, vec!["CHAR \"a]]b\"", "EOF"]);
    assert_eq!(sink.errors, Vec::<String>::new());
}

#[test]
fn cdata_in_html_content_is_bogus_comment() {
    let sink = run_html("<![CDATA[x]]>");
    assert_eq!(sink.tokens, vec!["COMMENT \"[CDATA[x]]\"", "EOF"]);
    assert_eq!(sink.errors, vec!["cdata-in-html-content@8"]);
}

#[test]
fn eof_in_cdata() {
    let mut tokenizer = Html5Tokenizer::new(TokenizerConfig::default(), RecordingSink::default());
    tokenizer.set_in_foreign_node(true);
    tokenizer.write("<![CDATA[x", true);
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    let sink = tokenizer.into_sink();
    assert_eq!(sink.tokens, vec!["CHAR \"x\"", "EOF"]);
    assert_eq!(sink.errors, vec!["eof-in-cdata@10"]);
}

// ---- EOF handling -------------------------------------------------------

#[test]
fn eof_in_tag_drops_partial_token() {
    let sink = run_html("<div a=\"x");
    assert_eq!(sink.tokens, vec!["EOF"]);
    assert_eq!(sink.errors, vec!["eof-in-tag@9"]);
}

#[test]
fn eof_in_comment_salvages_data() {
    let sink = run_html("<!--x");
    assert_eq!(sink.tokens, vec!["COMMENT \"x\"", "EOF"]);
    assert_eq!(sink.errors, vec!["eof-in-comment@5"]);
}

#[test]
fn eof_in_doctype_forces_quirks() {
    let sink = run_html("<!DOCTYPE html");
    assert_eq!(
        sink.tokens,
        vec!["DOCTYPE name=html public=null system=null quirks=true", "EOF"]
    );
    assert_eq!(sink.errors, vec!["eof-in-doctype@14"]);
}

#[test]
fn eof_before_tag_name_emits_text() {
    let sink = run_html("a</");
    assert_eq!(sink.tokens, vec!["CHAR \"a</\"", "EOF"]);
    assert_eq!(sink.errors, vec!["eof-before-tag-name@3"]);
}

#[test]
fn eof_in_script_comment_like_text() {
    let sink = run_sink_chunks(
        TokenizerConfig::default(),
        RecordingSink::with_raw(&[("script", TokenizerState::ScriptData)]),
        &["<script><!--x"],
    );
    assert_eq!(
        sink.tokens,
        vec![
            "START name=script attrs=[] self_closing=false",
            "CHAR \"<!--x\"",
            "EOF",
        ]
    );
    assert_eq!(sink.errors, vec!["eof-in-script-html-comment-like-text@13"]);
}

// ---- character references ----------------------------------------------

#[test]
fn named_reference_without_semicolon() {
    let sink = run_html("&amp x");
    assert_eq!(sink.tokens, vec!["CHAR \"&\"", "WS \" \"", "CHAR \"x\"", "EOF"]);
    assert_eq!(
        sink.errors,
        vec!["missing-semicolon-after-character-reference@3"]
    );
}

#[test]
fn named_reference_longest_match_wins() {
    // "notin;" is a complete name; "noti" followed by 't' rolls back to "not".
    let sink = run_html("&notin;x&notit;");
    assert_eq!(
        sink.tokens,
        vec!["CHAR \"\u{2209}x\u{00ac}it;\"", "EOF"]
    );
    assert_eq!(
        sink.errors,
        vec!["missing-semicolon-after-character-reference@11"]
    );
}

#[test]
fn legacy_reference_in_attribute_stays_verbatim() {
    let sink = run_html("<a href=\"?x=1&not=2\">");
    assert_eq!(
        sink.tokens,
        vec!["START name=a attrs=[href=\"?x=1&not=2\"] self_closing=false", "EOF"]
    );
    assert_eq!(sink.errors, Vec::<String>::new());
}

#[test]
fn reference_in_attribute_decodes() {
    assert_eq!(
        tokens("<a title=\"&amp;\">"),
        vec!["START name=a attrs=[title=\"&\"] self_closing=false", "EOF"]
    );
    assert_eq!(
        tokens("<a title='&not;in'>"),
        vec!["START name=a attrs=[title=\"\u{00ac}in\"] self_closing=false", "EOF"]
    );
}

#[test]
fn unknown_named_reference() {
    let sink = run_html("&abc;");
    assert_eq!(sink.tokens, vec!["CHAR \"&abc;\"", "EOF"]);
    assert_eq!(sink.errors, vec!["unknown-named-character-reference@4"]);
}

#[test]
fn bare_ampersand_is_text() {
    let sink = run_html("a & b");
    assert_eq!(
        sink.tokens,
        vec!["CHAR \"a\"", "WS \" \"", "CHAR \"&\"", "WS \" \"", "CHAR \"b\"", "EOF"]
    );
    assert_eq!(sink.errors, Vec::<String>::new());
}

#[test]
fn numeric_references() {
    let sink = run_html("&#65;&#x41;&#X6a;");
    assert_eq!(sink.tokens, vec!["CHAR \"AAj\"", "EOF"]);
    assert_eq!(sink.errors, Vec::<String>::new());
}

#[test]
fn numeric_reference_without_digits() {
    let sink = run_html("&#;");
    assert_eq!(sink.tokens, vec!["CHAR \"&#;\"", "EOF"]);
    assert_eq!(
        sink.errors,
        vec!["absence-of-digits-in-numeric-character-reference@2"]
    );

    let sink = run_html("&#x;");
    assert_eq!(sink.tokens, vec!["CHAR \"&#x;\"", "EOF"]);
    assert_eq!(
        sink.errors,
        vec!["absence-of-digits-in-numeric-character-reference@3"]
    );
}

#[test]
fn numeric_reference_substitutions() {
    let sink = run_html("&#0;");
    assert_eq!(sink.tokens, vec!["CHAR \"\u{fffd}\"", "EOF"]);
    assert_eq!(sink.errors, vec!["null-character-reference@4"]);

    let sink = run_html("&#xD800;");
    assert_eq!(sink.tokens, vec!["CHAR \"\u{fffd}\"", "EOF"]);
    assert_eq!(sink.errors, vec!["surrogate-character-reference@8"]);

    let sink = run_html("&#x110000;");
    assert_eq!(sink.tokens, vec!["CHAR \"\u{fffd}\"", "EOF"]);
    assert_eq!(sink.errors, vec!["character-reference-outside-unicode-range@10"]);

    let sink = run_html("&#x80;");
    assert_eq!(sink.tokens, vec!["CHAR \"\u{20ac}\"", "EOF"]);
    assert_eq!(sink.errors, vec!["control-character-reference@6"]);

    let sink = run_html("&#xFDD0;");
    assert_eq!(sink.tokens, vec!["CHAR \"\u{fdd0}\"", "EOF"]);
    assert_eq!(sink.errors, vec!["noncharacter-character-reference@8"]);
}

#[test]
fn numeric_reference_missing_semicolon() {
    let sink = run_html("&#65 ");
    assert_eq!(sink.tokens, vec!["CHAR \"A\"", "WS \" \"", "EOF"]);
    assert_eq!(
        sink.errors,
        vec!["missing-semicolon-after-character-reference@4"]
    );
}

// ---- NULL handling ------------------------------------------------------

#[test]
fn null_in_data_is_passed_through() {
    let sink = run_html("a\u{0000}b");
    assert_eq!(sink.tokens, vec!["CHAR \"a\"", "NULL \"\\0\"", "CHAR \"b\"", "EOF"]);
    assert_eq!(sink.errors, vec!["unexpected-null-character@1"]);
}

#[test]
fn null_in_rcdata_is_replaced() {
    let sink = run_sink_chunks(
        TokenizerConfig::default(),
        RecordingSink::with_raw(&[("textarea", TokenizerState::Rcdata)]),
        &["<textarea>\u{0000}</textarea>"],
    );
    assert_eq!(
        sink.tokens,
        vec![
            "START name=textarea attrs=[] self_closing=false",
            "CHAR \"\u{fffd}\"",
            "END name=textarea",
            "EOF",
        ]
    );
    assert_eq!(sink.errors, vec!["unexpected-null-character@10"]);
}

#[test]
fn null_in_tag_name_is_replaced() {
    let sink = run_html("<di\u{0000}v>");
    assert_eq!(
        sink.tokens,
        vec!["START name=di\u{fffd}v attrs=[] self_closing=false", "EOF"]
    );
    assert_eq!(sink.errors, vec!["unexpected-null-character@3"]);
}

// ---- control flow -------------------------------------------------------

#[test]
fn pause_on_script_end_tag_directive() {
    let mut sink = RecordingSink::default();
    sink.suspend_end_tags.push("script".to_string());
    let mut tokenizer = Html5Tokenizer::new(TokenizerConfig::default(), sink);
    tokenizer.write("<script></script><b>", true);
    assert_eq!(tokenizer.run(), TokenizeResult::SuspendedForScript);
    assert_eq!(
        tokenizer.sink().tokens,
        vec![
            "START name=script attrs=[] self_closing=false",
            "END name=script",
        ]
    );
    tokenizer.unpause();
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    assert_eq!(
        tokenizer.sink().tokens,
        vec![
            "START name=script attrs=[] self_closing=false",
            "END name=script",
            "START name=b attrs=[] self_closing=false",
            "EOF",
        ]
    );
}

#[test]
fn stop_halts_the_loop() {
    let mut tokenizer = Html5Tokenizer::new(TokenizerConfig::default(), RecordingSink::default());
    tokenizer.stop();
    tokenizer.write("<p>x</p>", true);
    assert_eq!(tokenizer.run(), TokenizeResult::Stopped);
    assert!(tokenizer.sink().tokens.is_empty());
}

#[test]
fn need_more_input_between_chunks() {
    let mut tokenizer = Html5Tokenizer::new(TokenizerConfig::default(), RecordingSink::default());
    tokenizer.write("<di", false);
    assert_eq!(tokenizer.run(), TokenizeResult::NeedMoreInput);
    assert!(tokenizer.sink().tokens.is_empty(), "no partial tag may escape");
    tokenizer.write("v>", true);
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    assert_eq!(
        tokenizer.sink().tokens,
        vec!["START name=div attrs=[] self_closing=false", "EOF"]
    );
}

#[test]
fn isolated_surrogate_from_code_units() {
    let mut tokenizer = Html5Tokenizer::new(TokenizerConfig::default(), RecordingSink::default());
    tokenizer.write_code_units(&[0xd834, 'x' as u16], true);
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    let sink = tokenizer.into_sink();
    assert_eq!(sink.tokens, vec!["CHAR \"\u{fffd}x\"", "EOF"]);
    assert_eq!(sink.errors, vec!["surrogate-in-input-stream@0"]);
}

#[test]
fn buffer_compaction_keeps_offsets() {
    let mut tokenizer = Html5Tokenizer::new(loc_config(), RecordingSink::default());
    tokenizer.set_buffer_waterline(16);
    let body = "x".repeat(64);
    tokenizer.write(&format!("<p>{body}</p>"), true);
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    let sink = tokenizer.into_sink();
    let eof_loc = sink.locations.last().unwrap().unwrap();
    assert_eq!(eof_loc.start_offset, 64 + 7);
}

#[test]
fn silent_mode_suppresses_errors() {
    let config = TokenizerConfig {
        report_parse_errors: false,
        ..TokenizerConfig::default()
    };
    let sink = run_sink_chunks(config, RecordingSink::default(), &["<div a=\u{0001}x a=y>"]);
    assert_eq!(sink.errors, Vec::<String>::new());
}

#[test]
fn stats_count_tokens_and_steps() {
    let mut tokenizer = Html5Tokenizer::new(TokenizerConfig::default(), RecordingSink::default());
    tokenizer.write("<p>Hi</p>", true);
    assert_eq!(tokenizer.run(), TokenizeResult::EmittedEof);
    let stats = tokenizer.stats();
    assert_eq!(stats.tokens_emitted, 4);
    assert!(stats.steps > 0);
    assert!(stats.state_transitions > 0);
}

#[test]
fn location_offsets_are_monotonic() {
    let sink = run_sink_chunks(
        loc_config(),
        RecordingSink::default(),
        &["<!DOCTYPE html>\n<p class=\"a\">Hi &amp; bye</p><!--done-->"],
    );
    let mut prev_end = 0;
    for loc in sink.locations.iter().map(|l| l.unwrap()) {
        assert!(loc.start_offset <= loc.end_offset);
        assert!(loc.start_offset >= prev_end, "token overlaps its predecessor");
        prev_end = loc.end_offset;
    }
}
