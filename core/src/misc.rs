use std::path::Path;

use fancy_regex::Regex;
use itertools::Itertools;

use crate::error::{Error, Result};

/// Joins `regex_str` into one alternation anchored at the start of the input.
pub fn compile_into_regex<Item, Iter>(regex_str: Iter) -> Result<Regex>
where
    Item: AsRef<str>,
    Iter: IntoIterator<Item = Item>,
{
    let pattern = format!(
        "^(?:{})",
        regex_str
            .into_iter()
            .map(|s| format!(r"(?:{})", s.as_ref()))
            .join("|")
    );
    Regex::new(&pattern).map_err(|err| Error::invalid_pattern(pattern, err))
}

/// Reads `path` as text, replacing invalid UTF-8 sequences instead of failing.
pub fn read_lossy(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| Error::io(path, err))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn alternation_is_anchored() {
        let r = compile_into_regex([r"\[\w+\]", r"elapsed"]).unwrap();
        assert!(r.is_match("[mapper] done").unwrap());
        assert!(r.is_match("elapsed 1.2s").unwrap());

        assert!(!r.is_match("the [x] 3").unwrap());
        assert!(!r.is_match("total elapsed 3").unwrap());
    }

    #[test]
    fn bad_pattern_is_reported() {
        let err = compile_into_regex([r"(unclosed"]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"caf\xff ok\n").unwrap();
        let text = read_lossy(file.path()).unwrap();
        assert_eq!(text, "caf\u{fffd} ok\n");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_lossy("/nonexistent/freqcheck/corpus.txt").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
