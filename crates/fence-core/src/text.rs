#![forbid(unsafe_code)]

//! Character-indexed string helpers.
//!
//! Documents address text by `char` index; these helpers translate to byte
//! offsets without ever splitting a code point.

/// Number of `char`s in `s`.
#[inline]
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `index`-th char, or `None` past the end.
///
/// `index == char_len(s)` maps to `s.len()`.
#[must_use]
pub fn byte_offset(s: &str, index: usize) -> Option<usize> {
    if index == 0 {
        return Some(0);
    }
    match s.char_indices().nth(index) {
        Some((byte, _)) => Some(byte),
        None if char_len(s) == index => Some(s.len()),
        None => None,
    }
}

/// The first `max` chars of `s`.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_len_counts_code_points() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len("日本"), 2);
    }

    #[test]
    fn byte_offset_maps_boundaries() {
        let s = "aé日b";
        assert_eq!(byte_offset(s, 0), Some(0));
        assert_eq!(byte_offset(s, 1), Some(1));
        assert_eq!(byte_offset(s, 2), Some(3));
        assert_eq!(byte_offset(s, 3), Some(6));
        assert_eq!(byte_offset(s, 4), Some(7));
        assert_eq!(byte_offset(s, 5), None);
    }

    #[test]
    fn byte_offset_on_empty() {
        assert_eq!(byte_offset("", 0), Some(0));
        assert_eq!(byte_offset("", 1), None);
    }

    #[test]
    fn truncate_keeps_prefix() {
        assert_eq!(truncate_chars("abcdef", 5), "abcde");
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
        assert_eq!(truncate_chars("日本語", 2), "日本");
    }
}
