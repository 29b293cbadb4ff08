//! # Host Specification Grammar
//!
//! Parses the compact host expressions stored in a source's host list.
//!
//! Accepted forms:
//! * **IPv4 literal**: `10.10.181.9`
//! * **IPv4 CIDR**: `10.10.181.9/16` (the whole block, network to broadcast)
//! * **IPv4 ranged**: `10.10.[1:20].[1:25]` (any octet may be a bracket range)
//! * **Hostname literal**: `mycentos.com`, `localhost`
//! * **Hostname ranged**: `my-rhel[a:d].company.com`, `web[01:12].lab`
//!
//! Dash-joined address ranges (`10.1.1.1-10.1.1.254`) are never accepted,
//! only CIDR or bracket notation denote ranges.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::network::range::{self, Expansion, RangeSpec, Segment};

pub const MAX_HOSTNAME_LEN: usize = 253;
pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_PREFIX_LEN: u8 = 32;
/// Lowest start accepted for a bracket range in the final octet.
pub const MIN_HOST_OCTET: u8 = 1;

/// Why a host token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostSpecError {
    #[error("host is empty")]
    Empty,
    #[error("unexpected character {0:?}")]
    InvalidCharacter(char),
    #[error("unbalanced brackets")]
    UnbalancedBrackets,
    #[error("range '{0}' uses '-', write ranges as [start:end]")]
    DashRange(String),
    #[error("address ranges like '{0}' are not supported, use CIDR or bracket notation")]
    AddressRange(String),
    #[error("expected 4 octets, found {0}")]
    OctetCount(usize),
    #[error("empty octet")]
    EmptyOctet,
    #[error("octet '{0}' is not a decimal number")]
    InvalidOctet(String),
    #[error("octet '{0}' has a leading zero")]
    LeadingZero(String),
    #[error("octet '{0}' is out of range 0-255")]
    OctetOutOfRange(String),
    #[error("missing prefix length after '/'")]
    MissingPrefix,
    #[error("prefix length '{0}' is not in 0-{max}", max = MAX_PREFIX_LEN)]
    InvalidPrefix(String),
    #[error("a CIDR prefix cannot be combined with a bracket range")]
    CidrWithRange,
    #[error("malformed range [{0}]")]
    MalformedRange(String),
    #[error("range [{start}:{end}] is reversed")]
    ReversedRange { start: String, end: String },
    #[error("range [{0}] cannot start at 0 in the host octet")]
    ZeroHostOctet(String),
    #[error("range [{0}] mixes numeric and alphabetic bounds")]
    MixedRangeDomains(String),
    #[error("zero-padded range [{0}] needs bounds of equal width")]
    PaddingMismatch(String),
    #[error("only one bracket range is allowed in a hostname")]
    MultipleRanges,
    #[error("invalid hostname label '{0}'")]
    InvalidLabel(String),
    #[error("hostname is longer than {max} characters", max = MAX_HOSTNAME_LEN)]
    TooLong,
}

/// Top-level form a token matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Ipv4Literal,
    Ipv4Cidr,
    Ipv4Ranged,
    HostnameLiteral,
    HostnameRanged,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternKind::Ipv4Literal => "ipv4",
            PatternKind::Ipv4Cidr => "ipv4 cidr",
            PatternKind::Ipv4Ranged => "ipv4 range",
            PatternKind::HostnameLiteral => "hostname",
            PatternKind::HostnameRanged => "hostname range",
        };
        f.write_str(name)
    }
}

/// A validated host token.
///
/// Immutable once parsed. Serializes back to the original token so host
/// lists can be persisted as plain strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostPattern {
    token: String,
    kind: PatternKind,
    segments: Vec<Segment>,
}

impl HostPattern {
    /// Parses one host token.
    pub fn parse(token: &str) -> Result<Self, HostSpecError> {
        if token.is_empty() {
            return Err(HostSpecError::Empty);
        }
        if let Some(c) = token.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(HostSpecError::InvalidCharacter(c));
        }
        check_brackets(token)?;

        let (kind, segments) = if looks_like_ipv4(token) {
            parse_ipv4(token)?
        } else {
            parse_hostname(token)?
        };

        Ok(Self {
            token: token.to_owned(),
            kind,
            segments,
        })
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Number of concrete hosts this pattern denotes, computed from the
    /// segments alone.
    pub fn cardinality(&self) -> u64 {
        range::cardinality(&self.segments)
    }

    /// Concrete hosts in deterministic order. May be called any number of
    /// times with identical results.
    pub fn expand(&self) -> Expansion<'_> {
        Expansion::new(&self.segments)
    }
}

impl FromStr for HostPattern {
    type Err = HostSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl Serialize for HostPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token)
    }
}

impl<'de> Deserialize<'de> for HostPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        HostPattern::parse(&token).map_err(serde::de::Error::custom)
    }
}

/// Accumulates literal text between ranges so adjacent literals merge.
#[derive(Default)]
struct SegmentBuilder {
    segments: Vec<Segment>,
    literal: String,
}

impl SegmentBuilder {
    fn push_str(&mut self, text: &str) {
        self.literal.push_str(text);
    }

    fn push_range(&mut self, range: RangeSpec) {
        self.flush();
        self.segments.push(Segment::Range(range));
    }

    fn flush(&mut self) {
        if !self.literal.is_empty() {
            self.segments.push(Segment::Literal(std::mem::take(&mut self.literal)));
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        self.flush();
        self.segments
    }
}

fn check_brackets(token: &str) -> Result<(), HostSpecError> {
    let mut open = false;
    for c in token.chars() {
        match (c, open) {
            ('[', false) => open = true,
            (']', true) => open = false,
            ('[', true) | (']', false) => return Err(HostSpecError::UnbalancedBrackets),
            _ => {}
        }
    }
    if open {
        return Err(HostSpecError::UnbalancedBrackets);
    }
    Ok(())
}

/// Routes a token to the IPv4 grammar when it cannot be a hostname: a
/// prefix suffix, a numeric last label, or nothing but numbers and brackets.
fn looks_like_ipv4(token: &str) -> bool {
    if token.contains('/') {
        return true;
    }

    let last = token.rsplit('.').next().unwrap_or(token);
    if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return true;
    }

    token
        .split('.')
        .all(|label| is_decimal(label) || is_bracketed(label))
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_bracketed(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('[') && s.ends_with(']')
}

fn has_dash_outside_brackets(s: &str) -> bool {
    let mut open = false;
    s.chars().any(|c| {
        match c {
            '[' => open = true,
            ']' => open = false,
            _ => {}
        }
        c == '-' && !open
    })
}

fn parse_ipv4(token: &str) -> Result<(PatternKind, Vec<Segment>), HostSpecError> {
    let (address, prefix) = match token.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (token, None),
    };

    if has_dash_outside_brackets(address) {
        return Err(HostSpecError::AddressRange(token.to_owned()));
    }

    let octets: Vec<&str> = address.split('.').collect();
    if octets.len() != 4 {
        return Err(HostSpecError::OctetCount(octets.len()));
    }

    let mut builder = SegmentBuilder::default();
    let mut literal = [0u8; 4];
    let mut ranged = false;

    for (idx, octet) in octets.iter().enumerate() {
        if idx > 0 {
            builder.push_str(".");
        }
        if let Some(inner) = octet.strip_prefix('[').and_then(|o| o.strip_suffix(']')) {
            builder.push_range(parse_octet_range(inner, idx == 3)?);
            ranged = true;
        } else {
            literal[idx] = parse_octet(octet)?;
            builder.push_str(octet);
        }
    }

    match prefix {
        Some(_) if ranged => Err(HostSpecError::CidrWithRange),
        Some(prefix) => {
            let prefix_len = parse_prefix(prefix)?;
            let network = Ipv4Network::new(Ipv4Addr::from(literal), prefix_len)
                .map_err(|_| HostSpecError::InvalidPrefix(prefix.to_owned()))?;
            Ok((PatternKind::Ipv4Cidr, vec![Segment::Block(network)]))
        }
        None if ranged => Ok((PatternKind::Ipv4Ranged, builder.finish())),
        None => Ok((PatternKind::Ipv4Literal, builder.finish())),
    }
}

fn parse_octet(s: &str) -> Result<u8, HostSpecError> {
    if s.is_empty() {
        return Err(HostSpecError::EmptyOctet);
    }
    if !is_decimal(s) {
        return Err(HostSpecError::InvalidOctet(s.to_owned()));
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(HostSpecError::LeadingZero(s.to_owned()));
    }
    s.parse::<u8>()
        .map_err(|_| HostSpecError::OctetOutOfRange(s.to_owned()))
}

fn parse_octet_range(inner: &str, host_octet: bool) -> Result<RangeSpec, HostSpecError> {
    let (start, end) = split_range(inner)?;
    let (low, high) = (parse_octet(start)?, parse_octet(end)?);

    let range = RangeSpec::numeric(u64::from(low), u64::from(high), 0).ok_or_else(|| {
        HostSpecError::ReversedRange {
            start: start.to_owned(),
            end: end.to_owned(),
        }
    })?;

    if host_octet && low < MIN_HOST_OCTET {
        return Err(HostSpecError::ZeroHostOctet(inner.to_owned()));
    }
    Ok(range)
}

fn parse_prefix(s: &str) -> Result<u8, HostSpecError> {
    if s.is_empty() {
        return Err(HostSpecError::MissingPrefix);
    }
    if !is_decimal(s) || (s.len() > 1 && s.starts_with('0')) {
        return Err(HostSpecError::InvalidPrefix(s.to_owned()));
    }
    match s.parse::<u8>() {
        Ok(prefix) if prefix <= MAX_PREFIX_LEN => Ok(prefix),
        _ => Err(HostSpecError::InvalidPrefix(s.to_owned())),
    }
}

/// Splits the inside of a bracket on its single `:`.
fn split_range(inner: &str) -> Result<(&str, &str), HostSpecError> {
    match inner.split_once(':') {
        Some((start, end)) if !start.is_empty() && !end.is_empty() && !end.contains(':') => {
            Ok((start, end))
        }
        None if inner.contains('-') => Err(HostSpecError::DashRange(inner.to_owned())),
        _ => Err(HostSpecError::MalformedRange(inner.to_owned())),
    }
}

fn parse_hostname(token: &str) -> Result<(PatternKind, Vec<Segment>), HostSpecError> {
    if token.matches('[').count() > 1 {
        return Err(HostSpecError::MultipleRanges);
    }

    let mut builder = SegmentBuilder::default();
    let mut rendered_len = 0usize;
    let mut ranged = false;

    for (idx, label) in token.split('.').enumerate() {
        if idx > 0 {
            builder.push_str(".");
            rendered_len += 1;
        }

        match label.split_once('[') {
            Some((prefix, rest)) => {
                let (inner, suffix) = rest
                    .split_once(']')
                    .ok_or(HostSpecError::UnbalancedBrackets)?;
                check_label_parts(label, prefix, suffix)?;

                let range = parse_label_range(inner)?;
                let width = prefix.len() + range.max_width() + suffix.len();
                if width > MAX_LABEL_LEN {
                    return Err(HostSpecError::InvalidLabel(label.to_owned()));
                }

                builder.push_str(prefix);
                builder.push_range(range);
                builder.push_str(suffix);
                rendered_len += width;
                ranged = true;
            }
            None => {
                check_label(label)?;
                builder.push_str(label);
                rendered_len += label.len();
            }
        }
    }

    if rendered_len > MAX_HOSTNAME_LEN {
        return Err(HostSpecError::TooLong);
    }

    let kind = if ranged {
        PatternKind::HostnameRanged
    } else {
        PatternKind::HostnameLiteral
    };
    Ok((kind, builder.finish()))
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn check_label(label: &str) -> Result<(), HostSpecError> {
    let valid = !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && label.chars().all(is_label_char)
        && !label.starts_with('-')
        && !label.ends_with('-');

    if !valid {
        return Err(HostSpecError::InvalidLabel(label.to_owned()));
    }
    Ok(())
}

/// Text around a bracket still has to form a valid label once expanded.
fn check_label_parts(label: &str, prefix: &str, suffix: &str) -> Result<(), HostSpecError> {
    let valid = prefix.chars().chain(suffix.chars()).all(is_label_char)
        && !prefix.starts_with('-')
        && !suffix.ends_with('-');

    if !valid {
        return Err(HostSpecError::InvalidLabel(label.to_owned()));
    }
    Ok(())
}

enum Bound {
    Numeric,
    Alpha,
    Other,
}

fn classify_bound(s: &str) -> Bound {
    if is_decimal(s) {
        Bound::Numeric
    } else if s.len() == 1 && s.as_bytes()[0].is_ascii_lowercase() {
        Bound::Alpha
    } else {
        Bound::Other
    }
}

fn parse_label_range(inner: &str) -> Result<RangeSpec, HostSpecError> {
    let (start, end) = split_range(inner)?;
    let reversed = || HostSpecError::ReversedRange {
        start: start.to_owned(),
        end: end.to_owned(),
    };

    match (classify_bound(start), classify_bound(end)) {
        (Bound::Numeric, Bound::Numeric) => {
            let padded = start.len() > 1 && start.starts_with('0');
            if padded && start.len() != end.len() {
                return Err(HostSpecError::PaddingMismatch(inner.to_owned()));
            }
            let width = if padded { start.len() } else { 0 };
            let parse = |s: &str| {
                s.parse::<u64>()
                    .map_err(|_| HostSpecError::MalformedRange(inner.to_owned()))
            };
            RangeSpec::numeric(parse(start)?, parse(end)?, width).ok_or_else(reversed)
        }
        (Bound::Alpha, Bound::Alpha) => {
            RangeSpec::alpha(start.as_bytes()[0], end.as_bytes()[0]).ok_or_else(reversed)
        }
        (Bound::Numeric, Bound::Alpha) | (Bound::Alpha, Bound::Numeric) => {
            Err(HostSpecError::MixedRangeDomains(inner.to_owned()))
        }
        _ => Err(HostSpecError::MalformedRange(inner.to_owned())),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const VALID: &[&str] = &[
        "10.10.181.9",
        "10.10.181.9/16",
        "10.10.128.[1:25]",
        "10.10.[1:20].25",
        "10.10.[1:20].[1:25]",
        "localhost",
        "mycentos.com",
        "my-rhel[a:d].company.com",
        "my-rhel[120:400].company.com",
    ];

    const INVALID: &[&str] = &[
        "192.1..2",
        "192.01.5.10",
        "192.1.5.1/",
        "192.01.5.[1:10]/10",
        "192.3.4.455",
        "192.3.4.455/16",
        "10.10.[181.9",
        "10.10.128.[a:25]",
        "10.10.[1-20].25",
        "1.1.1.1/33",
        "my_rhel[a:d].company.com",
        "my-rhel[a:400].company.com",
        "10.1.1.1-10.1.1.254",
    ];

    #[test]
    fn test_accepts_valid_corpus() {
        for token in VALID {
            let pattern = HostPattern::parse(token);
            assert!(pattern.is_ok(), "{token} rejected: {:?}", pattern.err());
        }
    }

    #[test]
    fn test_rejects_invalid_corpus() {
        for token in INVALID {
            let pattern = HostPattern::parse(token);
            assert!(pattern.is_err(), "{token} accepted as {:?}", pattern.ok());
        }
    }

    #[test]
    fn test_kinds() {
        let kind = |t: &str| HostPattern::parse(t).unwrap().kind();
        assert_eq!(kind("10.10.181.9"), PatternKind::Ipv4Literal);
        assert_eq!(kind("10.10.181.9/16"), PatternKind::Ipv4Cidr);
        assert_eq!(kind("10.10.[1:20].25"), PatternKind::Ipv4Ranged);
        assert_eq!(kind("mycentos.com"), PatternKind::HostnameLiteral);
        assert_eq!(kind("my-rhel[a:d].company.com"), PatternKind::HostnameRanged);
    }

    #[test]
    fn test_specific_errors() {
        let err = |t: &str| HostPattern::parse(t).unwrap_err();
        assert_eq!(err(""), HostSpecError::Empty);
        assert_eq!(err("192.1..2"), HostSpecError::EmptyOctet);
        assert_eq!(err("192.01.5.10"), HostSpecError::LeadingZero("01".into()));
        assert_eq!(err("192.1.5.1/"), HostSpecError::MissingPrefix);
        assert_eq!(err("192.3.4.455"), HostSpecError::OctetOutOfRange("455".into()));
        assert_eq!(err("10.10.[181.9"), HostSpecError::UnbalancedBrackets);
        assert_eq!(err("10.10.128.[a:25]"), HostSpecError::InvalidOctet("a".into()));
        assert_eq!(err("10.10.[1-20].25"), HostSpecError::DashRange("1-20".into()));
        assert_eq!(err("web[1-3].lab"), HostSpecError::DashRange("1-3".into()));
        assert_eq!(err("10.[[1:2]].0.1"), HostSpecError::UnbalancedBrackets);
        assert_eq!(err("web]1:3[.lab"), HostSpecError::UnbalancedBrackets);
        assert_eq!(err("1.1.1.1/33"), HostSpecError::InvalidPrefix("33".into()));
        assert_eq!(err("1.1.1.1/08"), HostSpecError::InvalidPrefix("08".into()));
        assert_eq!(err("10.1.[1:5].1/24"), HostSpecError::CidrWithRange);
        assert_eq!(
            err("my_rhel[a:d].company.com"),
            HostSpecError::InvalidLabel("my_rhel[a:d]".into())
        );
        assert_eq!(
            err("my-rhel[a:400].company.com"),
            HostSpecError::MixedRangeDomains("a:400".into())
        );
        assert_eq!(
            err("10.1.1.1-10.1.1.254"),
            HostSpecError::AddressRange("10.1.1.1-10.1.1.254".into())
        );
        assert_eq!(err("1.2.3"), HostSpecError::OctetCount(3));
        assert_eq!(err("host 1"), HostSpecError::InvalidCharacter(' '));
    }

    #[test]
    fn test_zero_is_rejected_only_as_host_octet_bracket() {
        assert!(HostPattern::parse("10.0.0.0").is_ok());
        assert!(HostPattern::parse("10.[0:3].0.1").is_ok());
        assert_eq!(
            HostPattern::parse("10.0.0.[0:10]").unwrap_err(),
            HostSpecError::ZeroHostOctet("0:10".into())
        );
    }

    #[test]
    fn test_reversed_ranges() {
        assert!(matches!(
            HostPattern::parse("10.0.0.[20:10]"),
            Err(HostSpecError::ReversedRange { .. })
        ));
        assert!(matches!(
            HostPattern::parse("node[d:a].lab"),
            Err(HostSpecError::ReversedRange { .. })
        ));
    }

    #[test]
    fn test_hostname_label_rules() {
        assert!(HostPattern::parse("-bad.com").is_err());
        assert!(HostPattern::parse("bad-.com").is_err());
        assert!(HostPattern::parse("a..b").is_err());
        assert!(HostPattern::parse("example.com.").is_err());
        assert!(HostPattern::parse("-web[1:3].lab").is_err());
        assert!(HostPattern::parse("web[1:3]-.lab").is_err());
        assert!(HostPattern::parse(&"a".repeat(64)).is_err());
        assert!(HostPattern::parse(&"a".repeat(63)).is_ok());
        assert_eq!(
            HostPattern::parse("web[1:2].rack[1:2].lab").unwrap_err(),
            HostSpecError::MultipleRanges
        );
        assert_eq!(
            HostPattern::parse("web[A:D].lab").unwrap_err(),
            HostSpecError::MalformedRange("A:D".into())
        );
    }

    #[test]
    fn test_hostname_too_long() {
        let token = vec!["a".repeat(60); 5].join(".");
        assert_eq!(HostPattern::parse(&token).unwrap_err(), HostSpecError::TooLong);
    }

    #[test]
    fn test_zero_padded_hostname_range() {
        let pattern = HostPattern::parse("web[08:11].lab").unwrap();
        let hosts: Vec<String> = pattern.expand().collect();
        assert_eq!(hosts, ["web08.lab", "web09.lab", "web10.lab", "web11.lab"]);

        assert_eq!(
            HostPattern::parse("web[01:100].lab").unwrap_err(),
            HostSpecError::PaddingMismatch("01:100".into())
        );
    }

    #[test]
    fn test_cartesian_expansion() {
        let pattern = HostPattern::parse("10.10.[1:20].[1:25]").unwrap();
        assert_eq!(pattern.cardinality(), 500);

        let hosts: Vec<String> = pattern.expand().collect();
        assert_eq!(hosts.len(), 500);
        assert_eq!(hosts[0], "10.10.1.1");
        assert_eq!(hosts[1], "10.10.1.2");
        assert_eq!(hosts[25], "10.10.2.1");
        assert_eq!(hosts[499], "10.10.20.25");

        let unique: HashSet<&String> = hosts.iter().collect();
        assert_eq!(unique.len(), 500);
    }

    #[test]
    fn test_cardinality_matches_expansion() {
        for token in VALID.iter().filter(|t| !t.contains('/')) {
            let pattern = HostPattern::parse(token).unwrap();
            let hosts: Vec<String> = pattern.expand().collect();
            let unique: HashSet<&String> = hosts.iter().collect();
            assert!(!hosts.is_empty(), "{token}");
            assert_eq!(hosts.len() as u64, pattern.cardinality(), "{token}");
            assert_eq!(unique.len(), hosts.len(), "{token}");
        }
    }

    #[test]
    fn test_cidr_cardinality_without_expansion() {
        let pattern = HostPattern::parse("10.10.181.9/16").unwrap();
        assert_eq!(pattern.cardinality(), 65_536);
        assert_eq!(pattern.expand().next().as_deref(), Some("10.10.0.0"));
        assert_eq!(pattern.expand().last().as_deref(), Some("10.10.255.255"));
    }

    #[test]
    fn test_expansion_is_restartable() {
        let pattern = HostPattern::parse("my-rhel[a:d].company.com").unwrap();
        let first: Vec<String> = pattern.expand().collect();
        let second: Vec<String> = pattern.expand().collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "my-rhela.company.com");
        assert_eq!(first[3], "my-rheld.company.com");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let pattern = HostPattern::parse("10.10.128.[1:25]").unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, "\"10.10.128.[1:25]\"");

        let back: HostPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pattern);
        assert!(serde_json::from_str::<HostPattern>("\"1.1.1.1/33\"").is_err());
    }
}
