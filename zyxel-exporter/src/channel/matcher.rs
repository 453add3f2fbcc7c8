//! Incremental terminator matching.
//!
//! The shell never announces where a response ends, so the reader feeds every
//! byte it receives into a [`TerminatorMatcher`] and stops when the tail of
//! the stream equals the terminator (the prompt, or a command's echo).
//!
//! The matcher is a small KMP automaton: each byte costs amortized O(1)
//! regardless of how much output has accumulated, so large `ifconfig` dumps
//! are never rescanned.

/// Streaming suffix matcher for a fixed byte terminator.
#[derive(Debug, Clone)]
pub struct TerminatorMatcher {
    /// The terminator bytes.
    pattern: Vec<u8>,

    /// KMP failure table: `failure[i]` is the length of the longest proper
    /// prefix of `pattern[..=i]` that is also a suffix of it.
    failure: Vec<usize>,

    /// Number of terminator bytes currently matched at the stream tail.
    state: usize,
}

impl TerminatorMatcher {
    /// Create a matcher for `terminator`.
    pub fn new(terminator: impl AsRef<[u8]>) -> Self {
        let pattern = terminator.as_ref().to_vec();
        let failure = failure_table(&pattern);
        Self {
            pattern,
            failure,
            state: 0,
        }
    }

    /// Feed one byte. Returns `true` when the stream now ends with the
    /// terminator.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.pattern.is_empty() {
            return true;
        }

        // A full match from the previous byte restarts from its border so
        // overlapping terminators are still found.
        if self.state == self.pattern.len() {
            self.state = self.failure[self.state - 1];
        }

        while self.state > 0 && self.pattern[self.state] != byte {
            self.state = self.failure[self.state - 1];
        }
        if self.pattern[self.state] == byte {
            self.state += 1;
        }

        self.state == self.pattern.len()
    }

    /// The terminator being searched for.
    pub fn terminator(&self) -> &[u8] {
        &self.pattern
    }

    /// Length of the terminator in bytes.
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// Whether the terminator is empty (matches immediately).
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Forget any partial match.
    pub fn reset(&mut self) {
        self.state = 0;
    }
}

fn failure_table(pattern: &[u8]) -> Vec<usize> {
    let mut failure = vec![0; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = failure[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        failure[i] = k;
    }
    failure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(matcher: &mut TerminatorMatcher, data: &[u8]) -> Option<usize> {
        data.iter()
            .position(|&b| matcher.push(b))
            .map(|pos| pos + 1)
    }

    #[test]
    fn test_matches_prompt_at_end() {
        let mut matcher = TerminatorMatcher::new("ZySH> ");
        assert_eq!(feed(&mut matcher, b"banner\r\nZySH> "), Some(14));
    }

    #[test]
    fn test_no_match() {
        let mut matcher = TerminatorMatcher::new("ZySH> ");
        assert_eq!(feed(&mut matcher, b"ZySH>\r\nZySH"), None);
    }

    #[test]
    fn test_partial_match_recovery() {
        // "ZyZySH> " contains a false start that must not swallow the real one
        let mut matcher = TerminatorMatcher::new("ZySH> ");
        assert_eq!(feed(&mut matcher, b"ZyZySH> "), Some(8));
    }

    #[test]
    fn test_self_overlapping_terminator() {
        let mut matcher = TerminatorMatcher::new("aab");
        assert_eq!(feed(&mut matcher, b"aaab"), Some(4));
    }

    #[test]
    fn test_echo_terminator() {
        let mut matcher = TerminatorMatcher::new("ifconfig\r\n");
        assert_eq!(feed(&mut matcher, b"ifconfig\r\nbr0"), Some(10));
    }

    #[test]
    fn test_matches_again_after_full_match() {
        let mut matcher = TerminatorMatcher::new("aa");
        assert!(!matcher.push(b'a'));
        assert!(matcher.push(b'a'));
        assert!(matcher.push(b'a'));
    }

    #[test]
    fn test_empty_terminator() {
        let mut matcher = TerminatorMatcher::new("");
        assert!(matcher.is_empty());
        assert!(matcher.push(b'x'));
    }

    #[test]
    fn test_reset() {
        let mut matcher = TerminatorMatcher::new("ab");
        matcher.push(b'a');
        matcher.reset();
        assert!(!matcher.push(b'b'));
    }
}
