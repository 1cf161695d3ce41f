//! Streaming entry point: read failures and fragmented input.

use issueq::config::ParserConfig;
use issueq::{parse, parse_bytes, parse_str, Error, IdentityNormalizer, IssueStatus, Parser};
use std::io::{self, Read};

const ERR_TEXT: &str = "Bad err";

struct ErrReader;

impl Read for ErrReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, ERR_TEXT))
    }
}

/// Yields `data` once, then fails.
struct FailAfter<'a> {
    data: &'a [u8],
}

impl Read for FailAfter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, ERR_TEXT));
        }
        let n = self.data.read(buf)?;
        Ok(n)
    }
}

/// Hands out one byte per read, with an interruption before every byte.
struct Trickle<'a> {
    data: &'a [u8],
    interrupt: bool,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::ErrorKind::Interrupted.into());
        }
        let Some((first, rest)) = self.data.split_first() else {
            return Ok(0);
        };
        if buf.is_empty() {
            return Ok(0);
        }
        buf[0] = *first;
        self.data = rest;
        Ok(1)
    }
}

#[test]
fn test_bad_read_propagates_error() {
    let err = parse(ErrReader).unwrap_err();
    assert_eq!(err.to_string(), ERR_TEXT);
    match err {
        Error::Io(io_err) => assert_eq!(io_err.kind(), io::ErrorKind::Other),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
fn test_failure_mid_stream_has_no_result() {
    let result = parse(FailAfter {
        data: b"status:open label:a",
    });
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_trickled_input_matches_in_memory() {
    let input = "status:open\u{3000}-a t-est- of -time assignee:ME label:x\u{2003}label:y";
    let streamed = parse(Trickle {
        data: input.as_bytes(),
        interrupt: false,
    })
    .unwrap();
    assert_eq!(streamed, parse_str(input));
    assert_eq!(streamed.search_expression, "!a&t-est-&of&!time");
    assert_eq!(streamed.assignee, "me");
    assert_eq!(streamed.labels, vec!["x", "y"]);
}

#[test]
fn test_small_buffer_config() {
    let config = ParserConfig {
        max_token_size: Some(32),
        read_buffer_size: 1,
    };
    let parser = Parser::new(IdentityNormalizer).with_config(&config);
    let parsed = parser.parse("assignee:Bob  limit:40 abc".as_bytes()).unwrap();
    assert_eq!(parsed.assignee, "Bob");
    assert_eq!(parsed.limit, 40);
    assert_eq!(parsed.search_expression, "abc");
}

#[test]
fn test_long_token_accepted_by_every_entry_point() {
    let input = format!("status:open {} tail", "a".repeat(70 * 1024));

    let from_str = parse_str(&input);
    assert_eq!(from_str.status, IssueStatus::Open);
    assert_eq!(from_str.search_expression.len(), 70 * 1024 + "&tail".len());

    assert_eq!(parse_bytes(input.as_bytes()), from_str);
    assert_eq!(parse(input.as_bytes()).unwrap(), from_str);
    assert_eq!(
        parse(Trickle {
            data: input.as_bytes(),
            interrupt: false,
        })
        .unwrap(),
        from_str
    );
}

#[test]
fn test_token_longer_than_limit_fails() {
    let config = ParserConfig {
        max_token_size: Some(8),
        read_buffer_size: 4,
    };
    let parser = Parser::default().with_config(&config);
    let result = parser.parse("short averyveryverylongtoken".as_bytes());
    assert!(matches!(result, Err(Error::TokenTooLong { limit: 8 })));
}
