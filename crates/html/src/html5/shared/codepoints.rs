//! Code point model for the HTML5 parsing path.
//!
//! The tokenizer works on 32-bit code points with an `EOF` sentinel rather
//! than `char`: the preprocessor can surface isolated surrogate halves from
//! UTF-16 input, and those are not representable as `char`.

pub(crate) type CodePoint = i32;

/// Sentinel for end-of-input and end-of-current-chunk. The two cases are
/// distinguished by `Preprocessor::end_of_chunk_hit`.
pub(crate) const EOF: CodePoint = -1;

#[allow(dead_code)]
pub(crate) mod cp {
    pub const NULL: i32 = 0x00;
    pub const TABULATION: i32 = 0x09;
    pub const LINE_FEED: i32 = 0x0a;
    pub const FORM_FEED: i32 = 0x0c;
    pub const CARRIAGE_RETURN: i32 = 0x0d;
    pub const SPACE: i32 = 0x20;
    pub const EXCLAMATION_MARK: i32 = 0x21;
    pub const QUOTATION_MARK: i32 = 0x22;
    pub const NUMBER_SIGN: i32 = 0x23;
    pub const AMPERSAND: i32 = 0x26;
    pub const APOSTROPHE: i32 = 0x27;
    pub const HYPHEN_MINUS: i32 = 0x2d;
    pub const SOLIDUS: i32 = 0x2f;
    pub const SEMICOLON: i32 = 0x3b;
    pub const LEFT_SQUARE_BRACKET: i32 = 0x5b;
    pub const LESS_THAN_SIGN: i32 = 0x3c;
    pub const EQUALS_SIGN: i32 = 0x3d;
    pub const GREATER_THAN_SIGN: i32 = 0x3e;
    pub const QUESTION_MARK: i32 = 0x3f;
    pub const LATIN_CAPITAL_X: i32 = 0x58;
    pub const RIGHT_SQUARE_BRACKET: i32 = 0x5d;
    pub const GRAVE_ACCENT: i32 = 0x60;
    pub const LATIN_SMALL_X: i32 = 0x78;
    pub const DELETE: i32 = 0x7f;
    pub const REPLACEMENT_CHARACTER: i32 = 0xfffd;
}

pub(crate) fn is_ascii_upper_alpha(c: CodePoint) -> bool {
    (0x41..=0x5a).contains(&c)
}

pub(crate) fn is_ascii_lower_alpha(c: CodePoint) -> bool {
    (0x61..=0x7a).contains(&c)
}

pub(crate) fn is_ascii_alpha(c: CodePoint) -> bool {
    is_ascii_upper_alpha(c) || is_ascii_lower_alpha(c)
}

pub(crate) fn is_ascii_digit(c: CodePoint) -> bool {
    (0x30..=0x39).contains(&c)
}

pub(crate) fn is_ascii_alphanumeric(c: CodePoint) -> bool {
    is_ascii_alpha(c) || is_ascii_digit(c)
}

pub(crate) fn is_ascii_upper_hex_digit(c: CodePoint) -> bool {
    is_ascii_digit(c) || (0x41..=0x46).contains(&c)
}

pub(crate) fn is_ascii_lower_hex_digit(c: CodePoint) -> bool {
    is_ascii_digit(c) || (0x61..=0x66).contains(&c)
}

pub(crate) fn is_ascii_hex_digit(c: CodePoint) -> bool {
    is_ascii_upper_hex_digit(c) || is_ascii_lower_hex_digit(c)
}

/// ASCII uppercase letters fold to lowercase; everything else passes through.
pub(crate) fn to_ascii_lower(c: CodePoint) -> CodePoint {
    if is_ascii_upper_alpha(c) { c + 0x20 } else { c }
}

/// Tokenizer whitespace: TAB, LF, FF, SPACE. CR never reaches the state
/// machine (the preprocessor normalizes it to LF).
pub(crate) fn is_whitespace(c: CodePoint) -> bool {
    matches!(c, cp::TABULATION | cp::LINE_FEED | cp::FORM_FEED | cp::SPACE)
}

pub(crate) fn is_surrogate(c: CodePoint) -> bool {
    (0xd800..=0xdfff).contains(&c)
}

pub(crate) fn is_leading_surrogate(c: CodePoint) -> bool {
    (0xd800..=0xdbff).contains(&c)
}

pub(crate) fn is_trailing_surrogate(c: CodePoint) -> bool {
    (0xdc00..=0xdfff).contains(&c)
}

pub(crate) fn combine_surrogate_pair(lead: CodePoint, trail: CodePoint) -> CodePoint {
    debug_assert!(is_leading_surrogate(lead) && is_trailing_surrogate(trail));
    0x10000 + ((lead - 0xd800) << 10) + (trail - 0xdc00)
}

/// C0 controls, DELETE, and C1 controls.
pub(crate) fn is_control(c: CodePoint) -> bool {
    (0x00..=0x1f).contains(&c) || (0x7f..=0x9f).contains(&c)
}

/// Permanently unassigned code points: U+FDD0..U+FDEF plus every code point
/// whose low 16 bits are FFFE or FFFF.
pub(crate) fn is_noncharacter(c: CodePoint) -> bool {
    (0xfdd0..=0xfdef).contains(&c) || matches!(c & 0xffff, 0xfffe | 0xffff)
}

/// Convert a code point to `char` for accumulation into token text. Isolated
/// surrogates cannot live in a Rust `String` and degrade to U+FFFD.
pub(crate) fn to_char_lossy(c: CodePoint) -> char {
    if c < 0 {
        return '\u{fffd}';
    }
    char::from_u32(c as u32).unwrap_or('\u{fffd}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogate_pair_combination() {
        // U+1D11E MUSICAL SYMBOL G CLEF
        assert_eq!(combine_surrogate_pair(0xd834, 0xdd1e), 0x1d11e);
        assert_eq!(combine_surrogate_pair(0xd800, 0xdc00), 0x10000);
        assert_eq!(combine_surrogate_pair(0xdbff, 0xdfff), 0x10ffff);
    }

    #[test]
    fn noncharacter_classification() {
        assert!(is_noncharacter(0xfdd0));
        assert!(is_noncharacter(0xfdef));
        assert!(is_noncharacter(0xfffe));
        assert!(is_noncharacter(0x1ffff));
        assert!(is_noncharacter(0x10ffff));
        assert!(!is_noncharacter(0xfdf0));
        assert!(!is_noncharacter(0xfffd));
    }

    #[test]
    fn lossy_char_conversion() {
        assert_eq!(to_char_lossy(0x41), 'A');
        assert_eq!(to_char_lossy(0x1d11e), '𝄞');
        assert_eq!(to_char_lossy(0xd800), '\u{fffd}');
        assert_eq!(to_char_lossy(EOF), '\u{fffd}');
    }
}
