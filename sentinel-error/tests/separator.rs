//! The wrap separator is process-wide, so this lives in its own test binary

use sentinel_error::config::{self, DEFAULT_WRAP_SEPARATOR};
use sentinel_error::{Kind, NamedError};
use std::io;

const ERR: Kind = Kind::new("err");
const ISSUE: Kind = Kind::new("issue");

#[test]
fn test_separator_applies_to_later_renders() {
    let err = ISSUE.wrap(ERR.wrap(io::Error::other("root")));
    assert_eq!(config::wrap_separator().as_str(), DEFAULT_WRAP_SEPARATOR);
    assert_eq!(err.to_string(), "issue: err: root");

    config::set_wrap_separator(" <- ");
    assert_eq!(err.to_string(), "issue <- err <- root");
    assert_eq!(ERR.wrap_none().to_string(), "err");

    config::set_wrap_separator(DEFAULT_WRAP_SEPARATOR);
    assert_eq!(err.to_string(), "issue: err: root");
}
