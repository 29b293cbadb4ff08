//! # Host Range Segments
//!
//! Building blocks of a parsed [`HostPattern`](crate::network::host_spec::HostPattern)
//! and the lazy expansion over them.
//!
//! A pattern is an ordered list of [`Segment`]s:
//! * literal text contributes exactly one value,
//! * a bracket [`RangeSpec`] contributes every value between its bounds,
//! * a CIDR block contributes every address from network to broadcast.
//!
//! The concrete hosts are the cartesian product of those contributions, walked
//! like an odometer: the leftmost segment varies slowest.

use std::fmt::{self, Write};
use std::iter::FusedIterator;
use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

/// Ordering domain of a bracket range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeDomain {
    Numeric,
    Alpha,
}

/// Inclusive bracket range, e.g. the `1:25` in `10.10.128.[1:25]`.
///
/// Both bounds always share one domain and `start <= end`; the constructors
/// refuse anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeSpec {
    /// Unsigned decimal bounds. A non-zero `width` pads every value with
    /// leading zeros (`web[01:10]`).
    Numeric { start: u64, end: u64, width: usize },
    /// Single lowercase ASCII letters.
    Alpha { start: u8, end: u8 },
}

impl RangeSpec {
    pub fn numeric(start: u64, end: u64, width: usize) -> Option<Self> {
        (start <= end).then_some(Self::Numeric { start, end, width })
    }

    pub fn alpha(start: u8, end: u8) -> Option<Self> {
        let valid = start.is_ascii_lowercase() && end.is_ascii_lowercase() && start <= end;
        valid.then_some(Self::Alpha { start, end })
    }

    pub fn domain(&self) -> RangeDomain {
        match self {
            Self::Numeric { .. } => RangeDomain::Numeric,
            Self::Alpha { .. } => RangeDomain::Alpha,
        }
    }

    /// Number of values in the range. Saturates for absurd numeric spans.
    pub fn len(&self) -> u64 {
        match *self {
            Self::Numeric { start, end, .. } => (end - start).saturating_add(1),
            Self::Alpha { start, end } => u64::from(end - start) + 1,
        }
    }

    /// A range is never empty; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Widest rendering of any value in the range, in characters.
    pub fn max_width(&self) -> usize {
        match *self {
            Self::Numeric { end, width, .. } => {
                let digits = end.checked_ilog10().map_or(1, |d| d as usize + 1);
                digits.max(width)
            }
            Self::Alpha { .. } => 1,
        }
    }

    fn write_nth(&self, index: u64, out: &mut String) {
        match *self {
            Self::Numeric { start, width, .. } => {
                let _ = write!(out, "{:0width$}", start + index);
            }
            Self::Alpha { start, .. } => out.push(char::from(start + index as u8)),
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Numeric { start, end, width } => write!(f, "[{start:0width$}:{end:0width$}]"),
            Self::Alpha { start, end } => write!(f, "[{}:{}]", char::from(start), char::from(end)),
        }
    }
}

/// One piece of a host pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Range(RangeSpec),
    /// A CIDR block; never coexists with a bracket range.
    Block(Ipv4Network),
}

impl Segment {
    pub fn len(&self) -> u64 {
        match self {
            Segment::Literal(_) => 1,
            Segment::Range(range) => range.len(),
            Segment::Block(network) => 1u64 << (32 - u32::from(network.prefix())),
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn write_nth(&self, index: u64, out: &mut String) {
        match self {
            Segment::Literal(text) => out.push_str(text),
            Segment::Range(range) => range.write_nth(index, out),
            Segment::Block(network) => {
                let base = u32::from(network.network());
                let addr = Ipv4Addr::from(base.wrapping_add(index as u32));
                let _ = write!(out, "{addr}");
            }
        }
    }
}

/// Number of concrete hosts denoted by `segments`, without expanding them.
pub fn cardinality(segments: &[Segment]) -> u64 {
    segments
        .iter()
        .map(Segment::len)
        .fold(1u64, |acc, len| acc.saturating_mul(len))
}

/// Lazy, restartable walk over the cartesian product of a pattern's segments.
#[derive(Clone, Debug)]
pub struct Expansion<'a> {
    segments: &'a [Segment],
    cursor: Vec<u64>,
    remaining: u64,
}

impl<'a> Expansion<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        Self {
            segments,
            cursor: vec![0; segments.len()],
            remaining: cardinality(segments),
        }
    }

    fn advance(&mut self) {
        for (segment, index) in self.segments.iter().zip(self.cursor.iter_mut()).rev() {
            *index += 1;
            if *index < segment.len() {
                return;
            }
            *index = 0;
        }
    }
}

impl Iterator for Expansion<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }

        let mut host = String::new();
        for (segment, &index) in self.segments.iter().zip(&self.cursor) {
            segment.write_nth(index, &mut host);
        }

        self.remaining -= 1;
        self.advance();
        Some(host)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Expansion<'_> {}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
