//! Resumption markers
//!
//! A marker tells the dispatch engine where the next invocation of a
//! coroutine picks up. Point identifiers are handed out once per routine
//! definition, in textual order, and never reused.

use std::fmt;

/// Most suspension points one routine may declare
pub const MAX_POINTS: usize = u16::MAX as usize + 1;

/// Identifier of one suspension point inside a routine body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(u16);

impl PointId {
    pub(crate) fn new(index: usize) -> Self {
        let index = u16::try_from(index)
            .unwrap_or_else(|_| panic!("point index {index} survived validation"));
        PointId(index)
    }

    /// Position of this point in the routine's resumption table
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the next invocation resumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Top of the routine body
    Start,
    /// Immediately after the given suspension point
    At(PointId),
    /// The FINISH label; only cleanup code remains
    Finish,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Start => f.write_str("start"),
            Marker::At(point) => write!(f, "point {point}"),
            Marker::Finish => f.write_str("finish"),
        }
    }
}
