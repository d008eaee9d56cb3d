//! Bounded, section-by-section text reading
//!
//! Large content is never held in memory at once: [`TextReader`] hands out
//! sections of at most `max_read_size` characters, cutting at the last
//! paragraph break of the window when there is one, then the last sentence
//! end, then the last whitespace. The remainder is carried into the next
//! section.

use crate::error::{ImporterError, Result};
use regex::Regex;
use std::io::{self, Read, Write};
use std::ops::ControlFlow;
use std::sync::LazyLock;

/// Default number of characters per section.
pub const DEFAULT_MAX_READ_SIZE: usize = 10_000;

const READ_BUFFER_SIZE: usize = 8 * 1024;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[^\S\n]*\n\s*").expect("valid paragraph regex"));
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.?!]\s+").expect("valid sentence regex"));
static WORD_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid word regex"));

/// Reads UTF-8 text in bounded sections.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD.
pub struct TextReader<R> {
    inner: R,
    max_read_size: usize,
    pending: String,
    pending_chars: usize,
    undecoded: Vec<u8>,
    eof: bool,
}

impl<R: Read> TextReader<R> {
    pub fn new(inner: R, max_read_size: usize) -> Self {
        Self {
            inner,
            max_read_size: max_read_size.max(1),
            pending: String::new(),
            pending_chars: 0,
            undecoded: Vec::new(),
            eof: false,
        }
    }

    /// Next section, or `None` once the input is exhausted.
    pub fn read_section(&mut self) -> io::Result<Option<String>> {
        self.fill()?;
        if self.pending.is_empty() {
            return Ok(None);
        }

        let window_end = self
            .pending
            .char_indices()
            .nth(self.max_read_size)
            .map(|(i, _)| i)
            .unwrap_or(self.pending.len());

        let cut = if window_end == self.pending.len() {
            // fill() guarantees this only happens at end of input
            window_end
        } else {
            find_break(&self.pending[..window_end]).unwrap_or(window_end)
        };

        let rest = self.pending.split_off(cut);
        let section = std::mem::replace(&mut self.pending, rest);
        self.pending_chars -= section.chars().count();
        tracing::trace!("Read text section of {} bytes", section.len());
        Ok(Some(section))
    }

    /// Read until more than one window of characters is pending or input ends.
    fn fill(&mut self) -> io::Result<()> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        while !self.eof && self.pending_chars <= self.max_read_size {
            let n = match self.inner.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if n == 0 {
                self.eof = true;
                if !self.undecoded.is_empty() {
                    let tail = String::from_utf8_lossy(&self.undecoded).into_owned();
                    self.push_decoded(&tail);
                    self.undecoded.clear();
                }
                break;
            }
            self.undecoded.extend_from_slice(&buf[..n]);
            self.decode_available();
        }
        Ok(())
    }

    fn decode_available(&mut self) {
        loop {
            match std::str::from_utf8(&self.undecoded) {
                Ok(text) => {
                    let text = text.to_string();
                    self.push_decoded(&text);
                    self.undecoded.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    let decoded = String::from_utf8_lossy(&self.undecoded[..valid]).into_owned();
                    self.push_decoded(&decoded);
                    match e.error_len() {
                        Some(bad) => {
                            self.push_decoded("\u{FFFD}");
                            self.undecoded.drain(..valid + bad);
                        }
                        None => {
                            // Incomplete sequence at the end, wait for more bytes
                            self.undecoded.drain(..valid);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn push_decoded(&mut self, text: &str) {
        self.pending_chars += text.chars().count();
        self.pending.push_str(text);
    }
}

/// Byte offset right after the preferred break in `window`.
fn find_break(window: &str) -> Option<usize> {
    [&*PARAGRAPH_BREAK, &*SENTENCE_BREAK, &*WORD_BREAK]
        .into_iter()
        .find_map(|re| re.find_iter(window).last().map(|m| m.end()))
}

/// Visit every section of `input`.
///
/// The visitor is called exactly once with an empty string when the input is
/// empty. Returning `ControlFlow::Break` stops reading.
pub fn for_each_text_section<F>(
    handler: &'static str,
    reference: &str,
    input: &mut dyn Read,
    max_read_size: usize,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(&str, usize) -> Result<ControlFlow<()>>,
{
    let mut reader = TextReader::new(input, max_read_size);
    let mut index = 0;
    while let Some(section) = reader
        .read_section()
        .map_err(|e| ImporterError::io(handler, reference, e))?
    {
        if visit(&section, index)?.is_break() {
            return Ok(());
        }
        index += 1;
    }
    if index == 0 {
        visit("", 0)?;
    }
    Ok(())
}

/// Rewrite `input` into `output` one section at a time.
///
/// Each section is handed to `transform` as a mutable buffer together with
/// its index, then written out before the next section is read. An empty
/// input still produces one call with an empty buffer.
pub fn transform_text_sections<F>(
    handler: &'static str,
    reference: &str,
    input: &mut dyn Read,
    output: &mut dyn Write,
    max_read_size: usize,
    mut transform: F,
) -> Result<()>
where
    F: FnMut(&mut String, usize) -> Result<()>,
{
    let mut reader = TextReader::new(input, max_read_size);
    let mut index = 0;
    loop {
        let section = reader
            .read_section()
            .map_err(|e| ImporterError::io(handler, reference, e))?;
        let mut buffer = match section {
            Some(section) => section,
            None if index == 0 => String::new(),
            None => break,
        };
        // Sections read from input are never empty.
        let empty_input = buffer.is_empty();
        transform(&mut buffer, index)?;
        output
            .write_all(buffer.as_bytes())
            .map_err(|e| ImporterError::io(handler, reference, e))?;
        index += 1;
        if empty_input {
            break;
        }
    }
    output.flush().map_err(|e| ImporterError::io(handler, reference, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fails with `Interrupted` once, then hands out `data`, then fails for
    /// good when `fail` is set.
    struct FlakyReader {
        interrupted: bool,
        data: &'static [u8],
        fail: bool,
    }

    impl FlakyReader {
        fn new(data: &'static [u8], fail: bool) -> Self {
            Self {
                interrupted: false,
                data,
                fail,
            }
        }
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::ErrorKind::Interrupted.into());
            }
            if !self.data.is_empty() {
                let n = self.data.len().min(buf.len());
                buf[..n].copy_from_slice(&self.data[..n]);
                self.data = &self.data[n..];
                return Ok(n);
            }
            if self.fail { Err(io::Error::other("device gone")) } else { Ok(0) }
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn assert_io_error(result: Result<()>, kind: io::ErrorKind) {
        match result {
            Err(ImporterError::Io {
                handler,
                reference,
                source,
            }) => {
                assert_eq!(handler, "SomeHandler");
                assert_eq!(reference, "doc-1");
                assert_eq!(source.kind(), kind);
            }
            other => panic!("expected an Io error, got {other:?}"),
        }
    }

    fn sections(text: &str, max: usize) -> Vec<String> {
        let mut reader = TextReader::new(text.as_bytes(), max);
        let mut out = Vec::new();
        while let Some(section) = reader.read_section().unwrap() {
            out.push(section);
        }
        out
    }

    #[test]
    fn test_short_text_is_one_section() {
        assert_eq!(sections("hello world", 100), vec!["hello world"]);
    }

    #[test]
    fn test_exact_fit_is_one_section() {
        assert_eq!(sections("abcde", 5), vec!["abcde"]);
    }

    #[test]
    fn test_prefers_paragraph_break() {
        let text = "First para. Still first.\n\nSecond para goes on and on";
        let parts = sections(text, 40);
        assert_eq!(parts[0], "First para. Still first.\n\n");
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn test_falls_back_to_sentence_then_word() {
        let parts = sections("One two. Three four five six", 20);
        assert_eq!(parts[0], "One two. ");

        let parts = sections("alpha beta gamma delta epsilon", 12);
        assert_eq!(parts[0], "alpha beta ");
        assert_eq!(parts.concat(), "alpha beta gamma delta epsilon");
    }

    #[test]
    fn test_cuts_mid_word_without_any_break() {
        let parts = sections("abcdefghij", 4);
        assert_eq!(parts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_sections_never_exceed_limit() {
        let text = "Lorem ipsum dolor sit amet. ".repeat(200);
        for part in sections(&text, 97) {
            assert!(part.chars().count() <= 97);
        }
        assert_eq!(sections(&text, 97).concat(), text);
    }

    #[test]
    fn test_multibyte_characters_count_as_one() {
        let text = "ééééé ééééé";
        let parts = sections(text, 6);
        assert_eq!(parts, vec!["ééééé ", "ééééé"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let bytes: &[u8] = b"ok \xff done";
        let mut reader = TextReader::new(bytes, 100);
        assert_eq!(reader.read_section().unwrap().unwrap(), "ok \u{FFFD} done");
    }

    #[test]
    fn test_empty_input_calls_visitor_once() {
        let mut calls = Vec::new();
        for_each_text_section("test", "ref", &mut io::empty(), 10, |s, i| {
            calls.push((s.to_string(), i));
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
        assert_eq!(calls, vec![(String::new(), 0)]);

        let mut out = Vec::new();
        let mut calls = 0;
        transform_text_sections("test", "ref", &mut io::empty(), &mut out, 10, |buf, _| {
            calls += 1;
            buf.push_str("constant");
            Ok(())
        })
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(out, b"constant");
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let mut seen = String::new();
        for_each_text_section("SomeHandler", "doc-1", &mut FlakyReader::new(b"hello", false), 100, |s, _| {
            seen.push_str(s);
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
        assert_eq!(seen, "hello");
    }

    #[test]
    fn test_read_failures_name_handler_and_reference() {
        let result = for_each_text_section("SomeHandler", "doc-1", &mut FlakyReader::new(b"hello", true), 100, |_, _| {
            Ok(ControlFlow::Continue(()))
        });
        assert_io_error(result, io::ErrorKind::Other);

        let mut out = Vec::new();
        let result = transform_text_sections(
            "SomeHandler",
            "doc-1",
            &mut FlakyReader::new(b"hello", true),
            &mut out,
            100,
            |_, _| Ok(()),
        );
        assert_io_error(result, io::ErrorKind::Other);
    }

    #[test]
    fn test_write_failures_are_wrapped() {
        let result = transform_text_sections(
            "SomeHandler",
            "doc-1",
            &mut "some text".as_bytes(),
            &mut BrokenWriter,
            100,
            |_, _| Ok(()),
        );
        assert_io_error(result, io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_visitor_can_stop_early() {
        let text = "a b c d e f g h";
        let mut seen = 0;
        for_each_text_section("test", "ref", &mut text.as_bytes(), 2, |_, _| {
            seen += 1;
            Ok(ControlFlow::Break(()))
        })
        .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_chunked_case_change_matches_single_pass() {
        let text = "The quick brown fox. Jumps over\n\nthe lazy dog! ".repeat(50);
        let upper = |max: usize| {
            let mut out = Vec::new();
            transform_text_sections("test", "ref", &mut text.as_bytes(), &mut out, max, |buf, _| {
                *buf = buf.to_uppercase();
                Ok(())
            })
            .unwrap();
            out
        };
        assert_eq!(upper(13), upper(text.len() + 1));
        assert_eq!(upper(13), text.to_uppercase().into_bytes());
    }
}
