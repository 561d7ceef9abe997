//! Byte-size accounting for a single pass.

use core::fmt;

use serde::Serialize;

/// Document size before and after a pass, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeDelta {
    /// Size of the input document.
    pub before: usize,
    /// Size of the output document.
    pub after: usize,
}

impl SizeDelta {
    /// Measure the delta between two documents.
    #[must_use]
    pub const fn between(before: &str, after: &str) -> Self {
        Self {
            before: before.len(),
            after: after.len(),
        }
    }

    /// Signed change in bytes (negative when the pass shrank the document).
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn change(&self) -> isize {
        self.after as isize - self.before as isize
    }

    /// Relative reduction in percent. Zero for an empty input.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reduction_percent(&self) -> f64 {
        if self.before == 0 {
            return 0.0;
        }
        (1.0 - self.after as f64 / self.before as f64) * 100.0
    }
}

impl fmt::Display for SizeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} bytes ({:+})",
            group_thousands(self.before),
            group_thousands(self.after),
            self.change()
        )
    }
}

/// Format a byte count with `,` thousands separators.
#[must_use]
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_display_shows_signed_change() {
        let delta = SizeDelta::between("abcdef", "abc");
        assert_eq!(delta.change(), -3);
        assert_eq!(delta.to_string(), "6 -> 3 bytes (-3)");
        assert!((delta.reduction_percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_input_has_no_reduction() {
        let delta = SizeDelta::between("", "abc");
        assert!(delta.reduction_percent().abs() < f64::EPSILON);
        assert_eq!(delta.to_string(), "0 -> 3 bytes (+3)");
    }
}
