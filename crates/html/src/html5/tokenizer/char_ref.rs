//! Character reference sub-machine.
//!
//! Entered from the text and attribute-value states on `&`; `return_state`
//! remembers where to deliver the result. The temporary buffer accumulates
//! the consumed code points so a failed match can replay them verbatim with
//! the exact same offsets.

use crate::html5::entities;
use crate::html5::shared::ParseErrorCode as Err;
use crate::html5::shared::codepoints::{
    CodePoint, cp, is_ascii_alphanumeric, is_ascii_digit, is_ascii_hex_digit,
    is_ascii_lower_hex_digit, is_ascii_upper_hex_digit, is_control, is_noncharacter, is_surrogate,
    is_whitespace,
};

use super::states::TokenizerState;
use super::{Html5Tokenizer, TokenSink};

/// Character-reference code clamp; anything at or above is out of range.
const CODE_LIMIT: u32 = 0x11_0000;

impl<S: TokenSink> Html5Tokenizer<S> {
    fn char_ref_in_attr(&self) -> bool {
        matches!(
            self.return_state,
            TokenizerState::AttributeValueDoubleQuoted
                | TokenizerState::AttributeValueSingleQuoted
                | TokenizerState::AttributeValueUnquoted
        )
    }

    /// Deliver the temporary buffer either into the attribute value being
    /// built or as character tokens.
    fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buf = std::mem::take(&mut self.temp_buff);
        if self.char_ref_in_attr() {
            for c in &buf {
                self.append_to_attr_value(*c);
            }
        } else {
            for c in &buf {
                self.emit_cp(*c);
            }
        }
    }

    pub(super) fn state_character_reference(&mut self, c: CodePoint) {
        self.temp_buff.clear();
        self.temp_buff.push(cp::AMPERSAND);
        match c {
            cp::NUMBER_SIGN => {
                self.temp_buff.push(c);
                self.transition(TokenizerState::NumericCharacterReference);
            }
            _ if is_ascii_alphanumeric(c) => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in(self.return_state);
            }
        }
    }

    /// Longest-match against the named reference table.
    ///
    /// The candidate window narrows per consumed code point; the loop may
    /// run ahead of the last complete name while longer names are still
    /// possible, and rewinds the overshoot through the preprocessor so
    /// rolled-back characters keep their original offsets.
    pub(super) fn state_named_character_reference(&mut self, c: CodePoint) {
        debug_assert!(self.temp_buff_is("&"), "named reference entered mid-buffer");
        let mut window = entities::full_range();
        let mut depth = 0usize;
        let mut matched: Option<(usize, &'static str, bool)> = None;
        let mut cur = c;
        loop {
            let Some(byte) = name_byte(cur) else {
                // EOF or a code point that can never appear in a name.
                self.unconsume(1);
                break;
            };
            let narrowed = entities::narrow(&window, depth, byte);
            if narrowed.is_empty() {
                self.unconsume(1);
                break;
            }
            window = narrowed;
            depth += 1;
            self.temp_buff.push(cur);
            if let Some(expansion) = entities::exact_match(&window, depth) {
                matched = Some((depth, expansion, byte == b';'));
                if byte == b';' {
                    break;
                }
            }
            cur = self.consume();
            if self.ensure_hibernation() {
                self.temp_buff.truncate(1);
                return;
            }
        }

        let Some((len, expansion, has_semicolon)) = matched else {
            self.flush_code_points_consumed_as_character_reference();
            self.transition(TokenizerState::AmbiguousAmpersand);
            return;
        };

        let overshoot = depth - len;
        if overshoot > 0 {
            self.unconsume(overshoot);
            self.temp_buff.truncate(1 + len);
        }
        if !has_semicolon && self.char_ref_in_attr() {
            let next = self.peek_next();
            if next == cp::EQUALS_SIGN || is_ascii_alphanumeric(next) {
                // Historical carve-out: inside an attribute value a legacy
                // reference followed by `=`/alphanumeric stays verbatim.
                self.flush_code_points_consumed_as_character_reference();
                self.transition(self.return_state);
                return;
            }
        }
        if !has_semicolon {
            self.err(Err::MissingSemicolonAfterCharacterReference);
        }
        self.temp_buff.clear();
        for ch in expansion.chars() {
            self.temp_buff.push(ch as CodePoint);
        }
        self.flush_code_points_consumed_as_character_reference();
        self.transition(self.return_state);
    }

    pub(super) fn state_ambiguous_ampersand(&mut self, c: CodePoint) {
        match c {
            _ if is_ascii_alphanumeric(c) => {
                if self.char_ref_in_attr() {
                    self.append_to_attr_value(c);
                } else {
                    self.emit_cp(c);
                }
            }
            cp::SEMICOLON => {
                self.err(Err::UnknownNamedCharacterReference);
                self.reconsume_in(self.return_state);
            }
            _ => self.reconsume_in(self.return_state),
        }
    }

    pub(super) fn state_numeric_character_reference(&mut self, c: CodePoint) {
        self.char_ref_code = 0;
        if c == cp::LATIN_SMALL_X || c == cp::LATIN_CAPITAL_X {
            self.temp_buff.push(c);
            self.transition(TokenizerState::HexadecimalCharacterReferenceStart);
        } else {
            self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart);
        }
    }

    pub(super) fn state_hexadecimal_character_reference_start(&mut self, c: CodePoint) {
        if is_ascii_hex_digit(c) {
            self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
        } else {
            self.err(Err::AbsenceOfDigitsInNumericCharacterReference);
            self.flush_code_points_consumed_as_character_reference();
            self.reconsume_in(self.return_state);
        }
    }

    pub(super) fn state_decimal_character_reference_start(&mut self, c: CodePoint) {
        if is_ascii_digit(c) {
            self.reconsume_in(TokenizerState::DecimalCharacterReference);
        } else {
            self.err(Err::AbsenceOfDigitsInNumericCharacterReference);
            self.flush_code_points_consumed_as_character_reference();
            self.reconsume_in(self.return_state);
        }
    }

    pub(super) fn state_hexadecimal_character_reference(&mut self, c: CodePoint) {
        match c {
            _ if is_ascii_digit(c) => self.accumulate_char_ref_code(16, (c - 0x30) as u32),
            _ if is_ascii_upper_hex_digit(c) => self.accumulate_char_ref_code(16, (c - 0x37) as u32),
            _ if is_ascii_lower_hex_digit(c) => self.accumulate_char_ref_code(16, (c - 0x57) as u32),
            cp::SEMICOLON => self.transition(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.err(Err::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    pub(super) fn state_decimal_character_reference(&mut self, c: CodePoint) {
        match c {
            _ if is_ascii_digit(c) => self.accumulate_char_ref_code(10, (c - 0x30) as u32),
            cp::SEMICOLON => self.transition(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.err(Err::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// This state consumes nothing; the dispatched code point is handed back
    /// to the return state once the accumulated code has been resolved.
    pub(super) fn state_numeric_character_reference_end(&mut self, _c: CodePoint) {
        let mut code = self.char_ref_code;
        if code == 0 {
            self.err(Err::NullCharacterReference);
            code = 0xfffd;
        } else if code > 0x10ffff {
            self.err(Err::CharacterReferenceOutsideUnicodeRange);
            code = 0xfffd;
        } else if is_surrogate(code as CodePoint) {
            self.err(Err::SurrogateCharacterReference);
            code = 0xfffd;
        } else if is_noncharacter(code as CodePoint) {
            self.err(Err::NoncharacterCharacterReference);
        } else if code == 0x0d
            || (is_control(code as CodePoint) && !is_whitespace(code as CodePoint))
        {
            self.err(Err::ControlCharacterReference);
            if let Some(remapped) = c1_remap(code) {
                code = remapped;
            }
        }
        self.temp_buff.clear();
        self.temp_buff.push(code as CodePoint);
        self.flush_code_points_consumed_as_character_reference();
        self.reconsume_in(self.return_state);
    }

    fn accumulate_char_ref_code(&mut self, base: u32, digit: u32) {
        self.char_ref_code = self
            .char_ref_code
            .saturating_mul(base)
            .saturating_add(digit)
            .min(CODE_LIMIT);
    }
}

fn name_byte(c: CodePoint) -> Option<u8> {
    (0x21..=0x7e).contains(&c).then_some(c as u8)
}

/// Windows-1252 remapping for numeric references in the C1 range.
fn c1_remap(code: u32) -> Option<u32> {
    Some(match code {
        0x80 => 0x20ac,
        0x82 => 0x201a,
        0x83 => 0x0192,
        0x84 => 0x201e,
        0x85 => 0x2026,
        0x86 => 0x2020,
        0x87 => 0x2021,
        0x88 => 0x02c6,
        0x89 => 0x2030,
        0x8a => 0x0160,
        0x8b => 0x2039,
        0x8c => 0x0152,
        0x8e => 0x017d,
        0x91 => 0x2018,
        0x92 => 0x2019,
        0x93 => 0x201c,
        0x94 => 0x201d,
        0x95 => 0x2022,
        0x96 => 0x2013,
        0x97 => 0x2014,
        0x98 => 0x02dc,
        0x99 => 0x2122,
        0x9a => 0x0161,
        0x9b => 0x203a,
        0x9c => 0x0153,
        0x9e => 0x017e,
        0x9f => 0x0178,
        _ => return None,
    })
}
