//! Tokenizer state machine.
//!
//! One handler per state; every handler examines exactly one code point and
//! either transitions, reconsumes, or consumes more through the keyword
//! helpers. Handlers never emit partial tokens: anything accumulated lives in
//! tokenizer fields so the state can resume after a chunk boundary.

use crate::html5::shared::ParseErrorCode as Err;
use crate::html5::shared::codepoints::{
    CodePoint, EOF, cp, is_ascii_alpha, is_whitespace, to_ascii_lower, to_char_lossy,
};

use super::{Html5Tokenizer, TokenSink};

/// The HTML5 tokenization states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenizerState {
    Data,
    Rcdata,
    Rawtext,
    ScriptData,
    Plaintext,
    TagOpen,
    EndTagOpen,
    TagName,
    RcdataLessThanSign,
    RcdataEndTagOpen,
    RcdataEndTagName,
    RawtextLessThanSign,
    RawtextEndTagOpen,
    RawtextEndTagName,
    ScriptDataLessThanSign,
    ScriptDataEndTagOpen,
    ScriptDataEndTagName,
    ScriptDataEscapeStart,
    ScriptDataEscapeStartDash,
    ScriptDataEscaped,
    ScriptDataEscapedDash,
    ScriptDataEscapedDashDash,
    ScriptDataEscapedLessThanSign,
    ScriptDataEscapedEndTagOpen,
    ScriptDataEscapedEndTagName,
    ScriptDataDoubleEscapeStart,
    ScriptDataDoubleEscaped,
    ScriptDataDoubleEscapedDash,
    ScriptDataDoubleEscapedDashDash,
    ScriptDataDoubleEscapedLessThanSign,
    ScriptDataDoubleEscapeEnd,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    BogusComment,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentLessThanSign,
    CommentLessThanSignBang,
    CommentLessThanSignBangDash,
    CommentLessThanSignBangDashDash,
    CommentEndDash,
    CommentEnd,
    CommentEndBang,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
    AfterDoctypePublicKeyword,
    BeforeDoctypePublicIdentifier,
    DoctypePublicIdentifierDoubleQuoted,
    DoctypePublicIdentifierSingleQuoted,
    AfterDoctypePublicIdentifier,
    BetweenDoctypePublicAndSystemIdentifiers,
    AfterDoctypeSystemKeyword,
    BeforeDoctypeSystemIdentifier,
    DoctypeSystemIdentifierDoubleQuoted,
    DoctypeSystemIdentifierSingleQuoted,
    AfterDoctypeSystemIdentifier,
    BogusDoctype,
    CdataSection,
    CdataSectionBracket,
    CdataSectionEnd,
    CharacterReference,
    NamedCharacterReference,
    AmbiguousAmpersand,
    NumericCharacterReference,
    HexadecimalCharacterReferenceStart,
    DecimalCharacterReferenceStart,
    HexadecimalCharacterReference,
    DecimalCharacterReference,
    NumericCharacterReferenceEnd,
}

impl<S: TokenSink> Html5Tokenizer<S> {
    pub(super) fn dispatch(&mut self, c: CodePoint) {
        use TokenizerState::*;
        match self.state {
            Data => self.state_data(c),
            Rcdata => self.state_rcdata(c),
            Rawtext => self.state_rawtext(c),
            ScriptData => self.state_script_data(c),
            Plaintext => self.state_plaintext(c),
            TagOpen => self.state_tag_open(c),
            EndTagOpen => self.state_end_tag_open(c),
            TagName => self.state_tag_name(c),
            RcdataLessThanSign => self.state_rcdata_less_than_sign(c),
            RcdataEndTagOpen => self.state_rcdata_end_tag_open(c),
            RcdataEndTagName => self.state_rcdata_end_tag_name(c),
            RawtextLessThanSign => self.state_rawtext_less_than_sign(c),
            RawtextEndTagOpen => self.state_rawtext_end_tag_open(c),
            RawtextEndTagName => self.state_rawtext_end_tag_name(c),
            ScriptDataLessThanSign => self.state_script_data_less_than_sign(c),
            ScriptDataEndTagOpen => self.state_script_data_end_tag_open(c),
            ScriptDataEndTagName => self.state_script_data_end_tag_name(c),
            ScriptDataEscapeStart => self.state_script_data_escape_start(c),
            ScriptDataEscapeStartDash => self.state_script_data_escape_start_dash(c),
            ScriptDataEscaped => self.state_script_data_escaped(c),
            ScriptDataEscapedDash => self.state_script_data_escaped_dash(c),
            ScriptDataEscapedDashDash => self.state_script_data_escaped_dash_dash(c),
            ScriptDataEscapedLessThanSign => self.state_script_data_escaped_less_than_sign(c),
            ScriptDataEscapedEndTagOpen => self.state_script_data_escaped_end_tag_open(c),
            ScriptDataEscapedEndTagName => self.state_script_data_escaped_end_tag_name(c),
            ScriptDataDoubleEscapeStart => self.state_script_data_double_escape_start(c),
            ScriptDataDoubleEscaped => self.state_script_data_double_escaped(c),
            ScriptDataDoubleEscapedDash => self.state_script_data_double_escaped_dash(c),
            ScriptDataDoubleEscapedDashDash => self.state_script_data_double_escaped_dash_dash(c),
            ScriptDataDoubleEscapedLessThanSign => {
                self.state_script_data_double_escaped_less_than_sign(c)
            }
            ScriptDataDoubleEscapeEnd => self.state_script_data_double_escape_end(c),
            BeforeAttributeName => self.state_before_attribute_name(c),
            AttributeName => self.state_attribute_name(c),
            AfterAttributeName => self.state_after_attribute_name(c),
            BeforeAttributeValue => self.state_before_attribute_value(c),
            AttributeValueDoubleQuoted => self.state_attribute_value_double_quoted(c),
            AttributeValueSingleQuoted => self.state_attribute_value_single_quoted(c),
            AttributeValueUnquoted => self.state_attribute_value_unquoted(c),
            AfterAttributeValueQuoted => self.state_after_attribute_value_quoted(c),
            SelfClosingStartTag => self.state_self_closing_start_tag(c),
            BogusComment => self.state_bogus_comment(c),
            MarkupDeclarationOpen => self.state_markup_declaration_open(c),
            CommentStart => self.state_comment_start(c),
            CommentStartDash => self.state_comment_start_dash(c),
            Comment => self.state_comment(c),
            CommentLessThanSign => self.state_comment_less_than_sign(c),
            CommentLessThanSignBang => self.state_comment_less_than_sign_bang(c),
            CommentLessThanSignBangDash => self.state_comment_less_than_sign_bang_dash(c),
            CommentLessThanSignBangDashDash => {
                self.state_comment_less_than_sign_bang_dash_dash(c)
            }
            CommentEndDash => self.state_comment_end_dash(c),
            CommentEnd => self.state_comment_end(c),
            CommentEndBang => self.state_comment_end_bang(c),
            Doctype => self.state_doctype(c),
            BeforeDoctypeName => self.state_before_doctype_name(c),
            DoctypeName => self.state_doctype_name(c),
            AfterDoctypeName => self.state_after_doctype_name(c),
            AfterDoctypePublicKeyword => self.state_after_doctype_public_keyword(c),
            BeforeDoctypePublicIdentifier => self.state_before_doctype_public_identifier(c),
            DoctypePublicIdentifierDoubleQuoted => {
                self.state_doctype_public_identifier_quoted(c, cp::QUOTATION_MARK)
            }
            DoctypePublicIdentifierSingleQuoted => {
                self.state_doctype_public_identifier_quoted(c, cp::APOSTROPHE)
            }
            AfterDoctypePublicIdentifier => self.state_after_doctype_public_identifier(c),
            BetweenDoctypePublicAndSystemIdentifiers => {
                self.state_between_doctype_public_and_system_identifiers(c)
            }
            AfterDoctypeSystemKeyword => self.state_after_doctype_system_keyword(c),
            BeforeDoctypeSystemIdentifier => self.state_before_doctype_system_identifier(c),
            DoctypeSystemIdentifierDoubleQuoted => {
                self.state_doctype_system_identifier_quoted(c, cp::QUOTATION_MARK)
            }
            DoctypeSystemIdentifierSingleQuoted => {
                self.state_doctype_system_identifier_quoted(c, cp::APOSTROPHE)
            }
            AfterDoctypeSystemIdentifier => self.state_after_doctype_system_identifier(c),
            BogusDoctype => self.state_bogus_doctype(c),
            CdataSection => self.state_cdata_section(c),
            CdataSectionBracket => self.state_cdata_section_bracket(c),
            CdataSectionEnd => self.state_cdata_section_end(c),
            CharacterReference => self.state_character_reference(c),
            NamedCharacterReference => self.state_named_character_reference(c),
            AmbiguousAmpersand => self.state_ambiguous_ampersand(c),
            NumericCharacterReference => self.state_numeric_character_reference(c),
            HexadecimalCharacterReferenceStart => {
                self.state_hexadecimal_character_reference_start(c)
            }
            DecimalCharacterReferenceStart => self.state_decimal_character_reference_start(c),
            HexadecimalCharacterReference => self.state_hexadecimal_character_reference(c),
            DecimalCharacterReference => self.state_decimal_character_reference(c),
            NumericCharacterReferenceEnd => self.state_numeric_character_reference_end(c),
        }
    }

    // ---- text states -------------------------------------------------

    fn state_data(&mut self, c: CodePoint) {
        match c {
            cp::AMPERSAND => {
                self.return_state = TokenizerState::Data;
                self.transition(TokenizerState::CharacterReference);
            }
            cp::LESS_THAN_SIGN => {
                self.mark_token_start();
                self.transition(TokenizerState::TagOpen);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.emit_cp(c);
            }
            EOF => self.emit_eof(),
            _ => self.emit_cp(c),
        }
    }

    fn state_rcdata(&mut self, c: CodePoint) {
        match c {
            cp::AMPERSAND => {
                self.return_state = TokenizerState::Rcdata;
                self.transition(TokenizerState::CharacterReference);
            }
            cp::LESS_THAN_SIGN => {
                self.mark_token_start();
                self.transition(TokenizerState::RcdataLessThanSign);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => self.emit_eof(),
            _ => self.emit_cp(c),
        }
    }

    fn state_rawtext(&mut self, c: CodePoint) {
        match c {
            cp::LESS_THAN_SIGN => {
                self.mark_token_start();
                self.transition(TokenizerState::RawtextLessThanSign);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => self.emit_eof(),
            _ => self.emit_cp(c),
        }
    }

    fn state_script_data(&mut self, c: CodePoint) {
        match c {
            cp::LESS_THAN_SIGN => {
                self.mark_token_start();
                self.transition(TokenizerState::ScriptDataLessThanSign);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => self.emit_eof(),
            _ => self.emit_cp(c),
        }
    }

    fn state_plaintext(&mut self, c: CodePoint) {
        match c {
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => self.emit_eof(),
            _ => self.emit_cp(c),
        }
    }

    // ---- tag states ----------------------------------------------------

    fn state_tag_open(&mut self, c: CodePoint) {
        match c {
            cp::EXCLAMATION_MARK => self.transition(TokenizerState::MarkupDeclarationOpen),
            cp::SOLIDUS => self.transition(TokenizerState::EndTagOpen),
            cp::QUESTION_MARK => {
                self.err(Err::UnexpectedQuestionMarkInsteadOfTagName);
                self.create_comment();
                self.reconsume_in(TokenizerState::BogusComment);
            }
            EOF => {
                self.err(Err::EofBeforeTagName);
                self.emit_chars("<");
                self.emit_eof();
            }
            _ if is_ascii_alpha(c) => {
                self.create_start_tag();
                self.reconsume_in(TokenizerState::TagName);
            }
            _ => {
                self.err(Err::InvalidFirstCharacterOfTagName);
                self.emit_chars("<");
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    fn state_end_tag_open(&mut self, c: CodePoint) {
        match c {
            cp::GREATER_THAN_SIGN => {
                self.err(Err::MissingEndTagName);
                self.transition(TokenizerState::Data);
            }
            EOF => {
                self.err(Err::EofBeforeTagName);
                self.emit_chars("</");
                self.emit_eof();
            }
            _ if is_ascii_alpha(c) => {
                self.create_end_tag();
                self.reconsume_in(TokenizerState::TagName);
            }
            _ => {
                self.err(Err::InvalidFirstCharacterOfTagName);
                self.create_comment();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    fn state_tag_name(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => self.transition(TokenizerState::BeforeAttributeName),
            cp::SOLIDUS => self.transition(TokenizerState::SelfClosingStartTag),
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_tag();
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_tag_name(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInTag);
                self.emit_eof();
            }
            _ => self.append_to_tag_name(to_ascii_lower(c)),
        }
    }

    // ---- RCDATA / RAWTEXT / script-data end tags -------------------------

    fn state_rcdata_less_than_sign(&mut self, c: CodePoint) {
        if c == cp::SOLIDUS {
            self.clear_temp_buff();
            self.transition(TokenizerState::RcdataEndTagOpen);
        } else {
            self.emit_chars("<");
            self.reconsume_in(TokenizerState::Rcdata);
        }
    }

    fn state_rcdata_end_tag_open(&mut self, c: CodePoint) {
        if is_ascii_alpha(c) {
            self.create_end_tag();
            self.reconsume_in(TokenizerState::RcdataEndTagName);
        } else {
            self.emit_chars("</");
            self.reconsume_in(TokenizerState::Rcdata);
        }
    }

    fn state_rcdata_end_tag_name(&mut self, c: CodePoint) {
        self.raw_text_end_tag_name(c, TokenizerState::Rcdata);
    }

    fn state_rawtext_less_than_sign(&mut self, c: CodePoint) {
        if c == cp::SOLIDUS {
            self.clear_temp_buff();
            self.transition(TokenizerState::RawtextEndTagOpen);
        } else {
            self.emit_chars("<");
            self.reconsume_in(TokenizerState::Rawtext);
        }
    }

    fn state_rawtext_end_tag_open(&mut self, c: CodePoint) {
        if is_ascii_alpha(c) {
            self.create_end_tag();
            self.reconsume_in(TokenizerState::RawtextEndTagName);
        } else {
            self.emit_chars("</");
            self.reconsume_in(TokenizerState::Rawtext);
        }
    }

    fn state_rawtext_end_tag_name(&mut self, c: CodePoint) {
        self.raw_text_end_tag_name(c, TokenizerState::Rawtext);
    }

    fn state_script_data_less_than_sign(&mut self, c: CodePoint) {
        match c {
            cp::SOLIDUS => {
                self.clear_temp_buff();
                self.transition(TokenizerState::ScriptDataEndTagOpen);
            }
            cp::EXCLAMATION_MARK => {
                self.transition(TokenizerState::ScriptDataEscapeStart);
                self.emit_chars("<!");
            }
            _ => {
                self.emit_chars("<");
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    fn state_script_data_end_tag_open(&mut self, c: CodePoint) {
        if is_ascii_alpha(c) {
            self.create_end_tag();
            self.reconsume_in(TokenizerState::ScriptDataEndTagName);
        } else {
            self.emit_chars("</");
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    fn state_script_data_end_tag_name(&mut self, c: CodePoint) {
        self.raw_text_end_tag_name(c, TokenizerState::ScriptData);
    }

    /// Shared end-tag-name handling for RCDATA, RAWTEXT, script data, and
    /// escaped script data. A non-appropriate end tag dissolves back into
    /// text in `fallback`.
    fn raw_text_end_tag_name(&mut self, c: CodePoint, fallback: TokenizerState) {
        match c {
            _ if is_whitespace(c) && self.is_appropriate_end_tag() => {
                self.transition(TokenizerState::BeforeAttributeName);
            }
            cp::SOLIDUS if self.is_appropriate_end_tag() => {
                self.transition(TokenizerState::SelfClosingStartTag);
            }
            cp::GREATER_THAN_SIGN if self.is_appropriate_end_tag() => {
                self.transition(TokenizerState::Data);
                self.emit_current_tag();
            }
            _ if is_ascii_alpha(c) => {
                self.append_to_tag_name(to_ascii_lower(c));
                self.push_temp_buff(c);
            }
            _ => {
                self.drop_current_tag();
                self.emit_chars("</");
                self.emit_temp_buff_as_chars();
                self.reconsume_in(fallback);
            }
        }
    }

    // ---- escaped script data ---------------------------------------------

    fn state_script_data_escape_start(&mut self, c: CodePoint) {
        if c == cp::HYPHEN_MINUS {
            self.transition(TokenizerState::ScriptDataEscapeStartDash);
            self.emit_chars("-");
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    fn state_script_data_escape_start_dash(&mut self, c: CodePoint) {
        if c == cp::HYPHEN_MINUS {
            self.transition(TokenizerState::ScriptDataEscapedDashDash);
            self.emit_chars("-");
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    fn state_script_data_escaped(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => {
                self.transition(TokenizerState::ScriptDataEscapedDash);
                self.emit_chars("-");
            }
            cp::LESS_THAN_SIGN => {
                self.mark_token_start();
                self.transition(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            _ => self.emit_cp(c),
        }
    }

    fn state_script_data_escaped_dash(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => {
                self.transition(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_chars("-");
            }
            cp::LESS_THAN_SIGN => {
                self.mark_token_start();
                self.transition(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.transition(TokenizerState::ScriptDataEscaped);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            _ => {
                self.transition(TokenizerState::ScriptDataEscaped);
                self.emit_cp(c);
            }
        }
    }

    fn state_script_data_escaped_dash_dash(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => self.emit_chars("-"),
            cp::LESS_THAN_SIGN => {
                self.mark_token_start();
                self.transition(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::ScriptData);
                self.emit_chars(">");
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.transition(TokenizerState::ScriptDataEscaped);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            _ => {
                self.transition(TokenizerState::ScriptDataEscaped);
                self.emit_cp(c);
            }
        }
    }

    fn state_script_data_escaped_less_than_sign(&mut self, c: CodePoint) {
        match c {
            cp::SOLIDUS => {
                self.clear_temp_buff();
                self.transition(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            _ if is_ascii_alpha(c) => {
                self.clear_temp_buff();
                self.emit_chars("<");
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            _ => {
                self.emit_chars("<");
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    fn state_script_data_escaped_end_tag_open(&mut self, c: CodePoint) {
        if is_ascii_alpha(c) {
            self.create_end_tag();
            self.reconsume_in(TokenizerState::ScriptDataEscapedEndTagName);
        } else {
            self.emit_chars("</");
            self.reconsume_in(TokenizerState::ScriptDataEscaped);
        }
    }

    fn state_script_data_escaped_end_tag_name(&mut self, c: CodePoint) {
        self.raw_text_end_tag_name(c, TokenizerState::ScriptDataEscaped);
    }

    fn state_script_data_double_escape_start(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) || c == cp::SOLIDUS || c == cp::GREATER_THAN_SIGN => {
                let next = if self.temp_buff_is("script") {
                    TokenizerState::ScriptDataDoubleEscaped
                } else {
                    TokenizerState::ScriptDataEscaped
                };
                self.transition(next);
                self.emit_cp(c);
            }
            _ if is_ascii_alpha(c) => {
                self.push_temp_buff(to_ascii_lower(c));
                self.emit_cp(c);
            }
            _ => self.reconsume_in(TokenizerState::ScriptDataEscaped),
        }
    }

    fn state_script_data_double_escaped(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => {
                self.transition(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_chars("-");
            }
            cp::LESS_THAN_SIGN => {
                self.transition(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_chars("<");
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            _ => self.emit_cp(c),
        }
    }

    fn state_script_data_double_escaped_dash(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => {
                self.transition(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_chars("-");
            }
            cp::LESS_THAN_SIGN => {
                self.transition(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_chars("<");
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.transition(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            _ => {
                self.transition(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_cp(c);
            }
        }
    }

    fn state_script_data_double_escaped_dash_dash(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => self.emit_chars("-"),
            cp::LESS_THAN_SIGN => {
                self.transition(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_chars("<");
            }
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::ScriptData);
                self.emit_chars(">");
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.transition(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_cp(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            _ => {
                self.transition(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_cp(c);
            }
        }
    }

    fn state_script_data_double_escaped_less_than_sign(&mut self, c: CodePoint) {
        if c == cp::SOLIDUS {
            self.clear_temp_buff();
            self.transition(TokenizerState::ScriptDataDoubleEscapeEnd);
            self.emit_chars("/");
        } else {
            self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped);
        }
    }

    fn state_script_data_double_escape_end(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) || c == cp::SOLIDUS || c == cp::GREATER_THAN_SIGN => {
                let next = if self.temp_buff_is("script") {
                    TokenizerState::ScriptDataEscaped
                } else {
                    TokenizerState::ScriptDataDoubleEscaped
                };
                self.transition(next);
                self.emit_cp(c);
            }
            _ if is_ascii_alpha(c) => {
                self.push_temp_buff(to_ascii_lower(c));
                self.emit_cp(c);
            }
            _ => self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    // ---- attributes --------------------------------------------------

    fn state_before_attribute_name(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::SOLIDUS | cp::GREATER_THAN_SIGN | EOF => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            cp::EQUALS_SIGN => {
                self.err(Err::UnexpectedEqualsSignBeforeAttributeName);
                self.start_new_attr();
                self.append_to_attr_name(c);
                self.transition(TokenizerState::AttributeName);
            }
            _ => {
                self.start_new_attr();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    fn state_attribute_name(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) || matches!(c, cp::SOLIDUS | cp::GREATER_THAN_SIGN | EOF) => {
                self.leave_attr_name();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            cp::EQUALS_SIGN => {
                self.leave_attr_name();
                self.transition(TokenizerState::BeforeAttributeValue);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_attr_name(cp::REPLACEMENT_CHARACTER);
            }
            cp::QUOTATION_MARK | cp::APOSTROPHE | cp::LESS_THAN_SIGN => {
                self.err(Err::UnexpectedCharacterInAttributeName);
                self.append_to_attr_name(c);
            }
            _ => self.append_to_attr_name(to_ascii_lower(c)),
        }
    }

    fn state_after_attribute_name(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::SOLIDUS => self.transition(TokenizerState::SelfClosingStartTag),
            cp::EQUALS_SIGN => self.transition(TokenizerState::BeforeAttributeValue),
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_tag();
            }
            EOF => {
                self.err(Err::EofInTag);
                self.emit_eof();
            }
            _ => {
                self.start_new_attr();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    fn state_before_attribute_value(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::QUOTATION_MARK => {
                self.mark_attr_value_start();
                self.transition(TokenizerState::AttributeValueDoubleQuoted);
            }
            cp::APOSTROPHE => {
                self.mark_attr_value_start();
                self.transition(TokenizerState::AttributeValueSingleQuoted);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::MissingAttributeValue);
                self.transition(TokenizerState::Data);
                self.emit_current_tag();
            }
            _ => {
                self.mark_attr_value_start();
                self.reconsume_in(TokenizerState::AttributeValueUnquoted);
            }
        }
    }

    fn state_attribute_value_double_quoted(&mut self, c: CodePoint) {
        match c {
            cp::QUOTATION_MARK => {
                self.leave_attr_value(true);
                self.transition(TokenizerState::AfterAttributeValueQuoted);
            }
            cp::AMPERSAND => {
                self.return_state = TokenizerState::AttributeValueDoubleQuoted;
                self.transition(TokenizerState::CharacterReference);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_attr_value(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInTag);
                self.emit_eof();
            }
            _ => self.append_to_attr_value(c),
        }
    }

    fn state_attribute_value_single_quoted(&mut self, c: CodePoint) {
        match c {
            cp::APOSTROPHE => {
                self.leave_attr_value(true);
                self.transition(TokenizerState::AfterAttributeValueQuoted);
            }
            cp::AMPERSAND => {
                self.return_state = TokenizerState::AttributeValueSingleQuoted;
                self.transition(TokenizerState::CharacterReference);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_attr_value(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInTag);
                self.emit_eof();
            }
            _ => self.append_to_attr_value(c),
        }
    }

    fn state_attribute_value_unquoted(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {
                self.leave_attr_value(false);
                self.transition(TokenizerState::BeforeAttributeName);
            }
            cp::AMPERSAND => {
                self.return_state = TokenizerState::AttributeValueUnquoted;
                self.transition(TokenizerState::CharacterReference);
            }
            cp::GREATER_THAN_SIGN => {
                self.leave_attr_value(false);
                self.transition(TokenizerState::Data);
                self.emit_current_tag();
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_attr_value(cp::REPLACEMENT_CHARACTER);
            }
            cp::QUOTATION_MARK
            | cp::APOSTROPHE
            | cp::LESS_THAN_SIGN
            | cp::EQUALS_SIGN
            | cp::GRAVE_ACCENT => {
                self.err(Err::UnexpectedCharacterInUnquotedAttributeValue);
                self.append_to_attr_value(c);
            }
            EOF => {
                self.err(Err::EofInTag);
                self.emit_eof();
            }
            _ => self.append_to_attr_value(c),
        }
    }

    fn state_after_attribute_value_quoted(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => self.transition(TokenizerState::BeforeAttributeName),
            cp::SOLIDUS => self.transition(TokenizerState::SelfClosingStartTag),
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_tag();
            }
            EOF => {
                self.err(Err::EofInTag);
                self.emit_eof();
            }
            _ => {
                self.err(Err::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    fn state_self_closing_start_tag(&mut self, c: CodePoint) {
        match c {
            cp::GREATER_THAN_SIGN => {
                self.tag_mut().self_closing = true;
                self.transition(TokenizerState::Data);
                self.emit_current_tag();
            }
            EOF => {
                self.err(Err::EofInTag);
                self.emit_eof();
            }
            _ => {
                self.err(Err::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    // ---- comments ------------------------------------------------------

    fn state_bogus_comment(&mut self, c: CodePoint) {
        match c {
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_comment(true);
            }
            EOF => {
                self.emit_current_comment(false);
                self.emit_eof();
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_comment(cp::REPLACEMENT_CHARACTER);
            }
            _ => self.append_to_comment(c),
        }
    }

    fn state_markup_declaration_open(&mut self, c: CodePoint) {
        if c == cp::HYPHEN_MINUS && self.consume_sequence_if_match("--", true) {
            self.create_comment();
            self.transition(TokenizerState::CommentStart);
            return;
        }
        if (c == b'd' as CodePoint || c == b'D' as CodePoint)
            && self.consume_sequence_if_match("doctype", false)
        {
            self.transition(TokenizerState::Doctype);
            return;
        }
        if c == cp::LEFT_SQUARE_BRACKET && self.consume_sequence_if_match("[CDATA[", true) {
            if self.allow_cdata {
                self.transition(TokenizerState::CdataSection);
            } else {
                self.err(Err::CdataInHtmlContent);
                self.create_comment();
                self.append_str_to_comment("[CDATA[");
                self.transition(TokenizerState::BogusComment);
            }
            return;
        }
        // The keyword probes above may have failed only because the chunk is
        // short; wait for more input before declaring a bogus comment.
        if self.ensure_hibernation() {
            return;
        }
        self.err(Err::IncorrectlyOpenedComment);
        self.create_comment();
        self.reconsume_in(TokenizerState::BogusComment);
    }

    fn state_comment_start(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => self.transition(TokenizerState::CommentStartDash),
            cp::GREATER_THAN_SIGN => {
                self.err(Err::AbruptClosingOfEmptyComment);
                self.transition(TokenizerState::Data);
                self.emit_current_comment(true);
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    fn state_comment_start_dash(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => self.transition(TokenizerState::CommentEnd),
            cp::GREATER_THAN_SIGN => {
                self.err(Err::AbruptClosingOfEmptyComment);
                self.transition(TokenizerState::Data);
                self.emit_current_comment(true);
            }
            EOF => {
                self.err(Err::EofInComment);
                self.emit_current_comment(false);
                self.emit_eof();
            }
            _ => {
                self.append_str_to_comment("-");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    fn state_comment(&mut self, c: CodePoint) {
        match c {
            cp::LESS_THAN_SIGN => {
                self.append_to_comment(c);
                self.transition(TokenizerState::CommentLessThanSign);
            }
            cp::HYPHEN_MINUS => self.transition(TokenizerState::CommentEndDash),
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_comment(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInComment);
                self.emit_current_comment(false);
                self.emit_eof();
            }
            _ => self.append_to_comment(c),
        }
    }

    fn state_comment_less_than_sign(&mut self, c: CodePoint) {
        match c {
            cp::EXCLAMATION_MARK => {
                self.append_to_comment(c);
                self.transition(TokenizerState::CommentLessThanSignBang);
            }
            cp::LESS_THAN_SIGN => self.append_to_comment(c),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    fn state_comment_less_than_sign_bang(&mut self, c: CodePoint) {
        if c == cp::HYPHEN_MINUS {
            self.transition(TokenizerState::CommentLessThanSignBangDash);
        } else {
            self.reconsume_in(TokenizerState::Comment);
        }
    }

    fn state_comment_less_than_sign_bang_dash(&mut self, c: CodePoint) {
        if c == cp::HYPHEN_MINUS {
            self.transition(TokenizerState::CommentLessThanSignBangDashDash);
        } else {
            self.reconsume_in(TokenizerState::CommentEndDash);
        }
    }

    fn state_comment_less_than_sign_bang_dash_dash(&mut self, c: CodePoint) {
        match c {
            cp::GREATER_THAN_SIGN => self.transition(TokenizerState::CommentEnd),
            EOF => self.reconsume_in(TokenizerState::CommentEnd),
            _ => {
                self.err(Err::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    fn state_comment_end_dash(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => self.transition(TokenizerState::CommentEnd),
            EOF => {
                self.err(Err::EofInComment);
                self.emit_current_comment(false);
                self.emit_eof();
            }
            _ => {
                self.append_str_to_comment("-");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    fn state_comment_end(&mut self, c: CodePoint) {
        match c {
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_comment(true);
            }
            cp::EXCLAMATION_MARK => self.transition(TokenizerState::CommentEndBang),
            cp::HYPHEN_MINUS => self.append_str_to_comment("-"),
            EOF => {
                self.err(Err::EofInComment);
                self.emit_current_comment(false);
                self.emit_eof();
            }
            _ => {
                self.append_str_to_comment("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    fn state_comment_end_bang(&mut self, c: CodePoint) {
        match c {
            cp::HYPHEN_MINUS => {
                self.append_str_to_comment("--!");
                self.transition(TokenizerState::CommentEndDash);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::IncorrectlyClosedComment);
                self.transition(TokenizerState::Data);
                self.emit_current_comment(true);
            }
            EOF => {
                self.err(Err::EofInComment);
                self.emit_current_comment(false);
                self.emit_eof();
            }
            _ => {
                self.append_str_to_comment("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    // ---- DOCTYPE -------------------------------------------------------

    fn state_doctype(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => self.transition(TokenizerState::BeforeDoctypeName),
            cp::GREATER_THAN_SIGN => self.reconsume_in(TokenizerState::BeforeDoctypeName),
            EOF => {
                self.err(Err::EofInDoctype);
                self.create_doctype();
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.err(Err::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDoctypeName);
            }
        }
    }

    fn state_before_doctype_name(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.create_doctype();
                self.append_to_doctype_name(cp::REPLACEMENT_CHARACTER);
                self.transition(TokenizerState::DoctypeName);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::MissingDoctypeName);
                self.create_doctype();
                self.doctype_mut().force_quirks = true;
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.create_doctype();
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.create_doctype();
                self.append_to_doctype_name(to_ascii_lower(c));
                self.transition(TokenizerState::DoctypeName);
            }
        }
    }

    fn state_doctype_name(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => self.transition(TokenizerState::AfterDoctypeName),
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_doctype_name(cp::REPLACEMENT_CHARACTER);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => self.append_to_doctype_name(to_ascii_lower(c)),
        }
    }

    fn state_after_doctype_name(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                if (c == b'p' as CodePoint || c == b'P' as CodePoint)
                    && self.consume_sequence_if_match("public", false)
                {
                    self.transition(TokenizerState::AfterDoctypePublicKeyword);
                    return;
                }
                if (c == b's' as CodePoint || c == b'S' as CodePoint)
                    && self.consume_sequence_if_match("system", false)
                {
                    self.transition(TokenizerState::AfterDoctypeSystemKeyword);
                    return;
                }
                if self.ensure_hibernation() {
                    return;
                }
                self.err(Err::InvalidCharacterSequenceAfterDoctypeName);
                self.doctype_mut().force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn state_after_doctype_public_keyword(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {
                self.transition(TokenizerState::BeforeDoctypePublicIdentifier)
            }
            cp::QUOTATION_MARK => {
                self.err(Err::MissingWhitespaceAfterDoctypePublicKeyword);
                self.doctype_mut().public_id = Some(String::new());
                self.transition(TokenizerState::DoctypePublicIdentifierDoubleQuoted);
            }
            cp::APOSTROPHE => {
                self.err(Err::MissingWhitespaceAfterDoctypePublicKeyword);
                self.doctype_mut().public_id = Some(String::new());
                self.transition(TokenizerState::DoctypePublicIdentifierSingleQuoted);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::MissingDoctypePublicIdentifier);
                self.doctype_mut().force_quirks = true;
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.err(Err::MissingQuoteBeforeDoctypePublicIdentifier);
                self.doctype_mut().force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn state_before_doctype_public_identifier(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::QUOTATION_MARK => {
                self.doctype_mut().public_id = Some(String::new());
                self.transition(TokenizerState::DoctypePublicIdentifierDoubleQuoted);
            }
            cp::APOSTROPHE => {
                self.doctype_mut().public_id = Some(String::new());
                self.transition(TokenizerState::DoctypePublicIdentifierSingleQuoted);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::MissingDoctypePublicIdentifier);
                self.doctype_mut().force_quirks = true;
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.err(Err::MissingQuoteBeforeDoctypePublicIdentifier);
                self.doctype_mut().force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn state_doctype_public_identifier_quoted(&mut self, c: CodePoint, quote: CodePoint) {
        match c {
            _ if c == quote => self.transition(TokenizerState::AfterDoctypePublicIdentifier),
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_doctype_public_id(cp::REPLACEMENT_CHARACTER);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::AbruptDoctypePublicIdentifier);
                self.doctype_mut().force_quirks = true;
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => self.append_to_doctype_public_id(c),
        }
    }

    fn state_after_doctype_public_identifier(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {
                self.transition(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers)
            }
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            cp::QUOTATION_MARK => {
                self.err(Err::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers);
                self.doctype_mut().system_id = Some(String::new());
                self.transition(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            cp::APOSTROPHE => {
                self.err(Err::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers);
                self.doctype_mut().system_id = Some(String::new());
                self.transition(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.err(Err::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.doctype_mut().force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn state_between_doctype_public_and_system_identifiers(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            cp::QUOTATION_MARK => {
                self.doctype_mut().system_id = Some(String::new());
                self.transition(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            cp::APOSTROPHE => {
                self.doctype_mut().system_id = Some(String::new());
                self.transition(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.err(Err::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.doctype_mut().force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn state_after_doctype_system_keyword(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {
                self.transition(TokenizerState::BeforeDoctypeSystemIdentifier)
            }
            cp::QUOTATION_MARK => {
                self.err(Err::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.doctype_mut().system_id = Some(String::new());
                self.transition(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            cp::APOSTROPHE => {
                self.err(Err::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.doctype_mut().system_id = Some(String::new());
                self.transition(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::MissingDoctypeSystemIdentifier);
                self.doctype_mut().force_quirks = true;
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.err(Err::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.doctype_mut().force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn state_before_doctype_system_identifier(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::QUOTATION_MARK => {
                self.doctype_mut().system_id = Some(String::new());
                self.transition(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            cp::APOSTROPHE => {
                self.doctype_mut().system_id = Some(String::new());
                self.transition(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::MissingDoctypeSystemIdentifier);
                self.doctype_mut().force_quirks = true;
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.err(Err::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.doctype_mut().force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn state_doctype_system_identifier_quoted(&mut self, c: CodePoint, quote: CodePoint) {
        match c {
            _ if c == quote => self.transition(TokenizerState::AfterDoctypeSystemIdentifier),
            cp::NULL => {
                self.err(Err::UnexpectedNullCharacter);
                self.append_to_doctype_system_id(cp::REPLACEMENT_CHARACTER);
            }
            cp::GREATER_THAN_SIGN => {
                self.err(Err::AbruptDoctypeSystemIdentifier);
                self.doctype_mut().force_quirks = true;
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => self.append_to_doctype_system_id(c),
        }
    }

    fn state_after_doctype_system_identifier(&mut self, c: CodePoint) {
        match c {
            _ if is_whitespace(c) => {}
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            EOF => {
                self.err(Err::EofInDoctype);
                self.doctype_mut().force_quirks = true;
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {
                self.err(Err::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn state_bogus_doctype(&mut self, c: CodePoint) {
        match c {
            cp::GREATER_THAN_SIGN => {
                self.transition(TokenizerState::Data);
                self.emit_current_doctype(true);
            }
            cp::NULL => self.err(Err::UnexpectedNullCharacter),
            EOF => {
                self.emit_current_doctype(false);
                self.emit_eof();
            }
            _ => {}
        }
    }

    // ---- CDATA sections --------------------------------------------------

    fn state_cdata_section(&mut self, c: CodePoint) {
        match c {
            cp::RIGHT_SQUARE_BRACKET => self.transition(TokenizerState::CdataSectionBracket),
            EOF => {
                self.err(Err::EofInCdata);
                self.emit_eof();
            }
            _ => self.emit_cp(c),
        }
    }

    fn state_cdata_section_bracket(&mut self, c: CodePoint) {
        if c == cp::RIGHT_SQUARE_BRACKET {
            self.transition(TokenizerState::CdataSectionEnd);
        } else {
            self.emit_chars("]");
            self.reconsume_in(TokenizerState::CdataSection);
        }
    }

    fn state_cdata_section_end(&mut self, c: CodePoint) {
        match c {
            cp::RIGHT_SQUARE_BRACKET => self.emit_chars("]"),
            cp::GREATER_THAN_SIGN => self.transition(TokenizerState::Data),
            _ => {
                self.emit_chars("]]");
                self.reconsume_in(TokenizerState::CdataSection);
            }
        }
    }

    // ---- small field helpers ----------------------------------------------

    fn append_to_tag_name(&mut self, c: CodePoint) {
        let ch = to_char_lossy(c);
        self.tag_mut().name.push(ch);
    }

    fn append_to_doctype_name(&mut self, c: CodePoint) {
        let ch = to_char_lossy(c);
        self.doctype_mut().name.get_or_insert_with(String::new).push(ch);
    }

    fn append_to_doctype_public_id(&mut self, c: CodePoint) {
        let ch = to_char_lossy(c);
        self.doctype_mut()
            .public_id
            .get_or_insert_with(String::new)
            .push(ch);
    }

    fn append_to_doctype_system_id(&mut self, c: CodePoint) {
        let ch = to_char_lossy(c);
        self.doctype_mut()
            .system_id
            .get_or_insert_with(String::new)
            .push(ch);
    }

    fn clear_temp_buff(&mut self) {
        self.temp_buff.clear();
    }

    fn push_temp_buff(&mut self, c: CodePoint) {
        self.temp_buff.push(c);
    }
}
