//! Entry key handling
//!
//! Enter submits, Shift+Enter inserts a newline, and Enter that commits an IME
//! composition does neither.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey {
    /// Submit and suppress the default newline
    Submit,
    /// Let the text area insert a newline
    Newline,
    /// Not ours to handle
    Other,
}

pub fn classify_key(key: &str, shift: bool, composing: bool) -> EntryKey {
    if key != "Enter" || composing {
        return EntryKey::Other;
    }
    if shift {
        EntryKey::Newline
    } else {
        EntryKey::Submit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_submits() {
        assert_eq!(classify_key("Enter", false, false), EntryKey::Submit);
    }

    #[test]
    fn test_shift_enter_is_newline() {
        assert_eq!(classify_key("Enter", true, false), EntryKey::Newline);
    }

    #[test]
    fn test_composition_enter_is_ignored() {
        assert_eq!(classify_key("Enter", false, true), EntryKey::Other);
    }

    #[test]
    fn test_other_keys() {
        assert_eq!(classify_key("a", false, false), EntryKey::Other);
        assert_eq!(classify_key("Tab", true, false), EntryKey::Other);
    }
}
