//! Leading/trailing whitespace bookkeeping for log messages
//!
//! Messages are stored trimmed, with the surrounding whitespace kept aside so
//! pretty output can put it back exactly where it was.

/// A message split into its leading whitespace, trimmed core and trailing whitespace.
///
/// `leading + core + trailing` always reproduces the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trimmed<'a> {
    pub leading: &'a str,
    pub core: &'a str,
    pub trailing: &'a str,
}

/// Split `raw` around its trimmed interior.
///
/// An empty or all-whitespace message yields an empty core, with the whole
/// input reported as leading whitespace.
pub fn split(raw: &str) -> Trimmed<'_> {
    let start = raw.len() - raw.trim_start().len();
    if start == raw.len() {
        return Trimmed {
            leading: raw,
            core: "",
            trailing: "",
        };
    }

    let end = raw.trim_end().len();
    Trimmed {
        leading: &raw[..start],
        core: &raw[start..end],
        trailing: &raw[end..],
    }
}

/// Leading run of whitespace in `s`.
#[inline]
pub fn leading(s: &str) -> &str {
    split(s).leading
}

/// Trailing run of whitespace in `s`.
#[inline]
pub fn trailing(s: &str) -> &str {
    split(s).trailing
}
