//! Name ordering for settlement lists.
//!
//! Approximates a locale-aware comparison (`localeCompare`) for Latin-script
//! names without pulling in collation tables:
//!
//! 1. primary: letters compared case- and accent-insensitively, with spaces
//!    and punctuation before digits before letters; `ñ` is its own letter
//!    after `n`;
//! 2. secondary: unaccented before accented (`Angel` < `Ángel`);
//! 3. tertiary: lowercase before uppercase (`ana` < `Ana`);
//! 4. finally plain byte order, so distinct names never compare equal.

use std::borrow::Cow;
use std::cmp::Ordering;

/// Precomputed sort key for one name. Keys compare in the order above.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<(CharClass, char, u8)>,
    secondary: Vec<char>,
    tertiary: Vec<bool>,
    raw: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Separator,
    Digit,
    Letter,
}

impl CollationKey {
    pub fn new(name: &str) -> Self {
        let mut primary = Vec::with_capacity(name.len());
        let mut secondary = Vec::with_capacity(name.len());
        let mut tertiary = Vec::with_capacity(name.len());

        for c in name.chars() {
            tertiary.push(c.is_uppercase());
            for lower in c.to_lowercase() {
                secondary.push(lower);
                push_primary(&mut primary, lower);
            }
        }

        Self {
            primary,
            secondary,
            tertiary,
            raw: name.to_string(),
        }
    }
}

pub fn compare_names(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

fn push_primary(out: &mut Vec<(CharClass, char, u8)>, c: char) {
    let class = if c.is_alphabetic() {
        CharClass::Letter
    } else if c.is_numeric() {
        CharClass::Digit
    } else {
        CharClass::Separator
    };

    if c == 'ñ' {
        out.push((class, 'n', 1));
        return;
    }
    for base in base_letters(c).chars() {
        out.push((class, base, 0));
    }
}

/// Base letter(s) of a lowercase Latin character; anything else maps to itself.
fn base_letters(c: char) -> Cow<'static, str> {
    let base = match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ń' | 'ņ' | 'ň' => "n",
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        other => return Cow::Owned(other.to_string()),
    };
    Cow::Borrowed(base)
}
