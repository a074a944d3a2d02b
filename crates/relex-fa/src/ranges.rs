use std::fmt::Debug;

// inclusive on both ends
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CharRange {
    pub start: u8,
    pub end: u8,
}

impl Debug for CharRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let render = |f: &mut std::fmt::Formatter<'_>, v: u8| {
            if v.is_ascii_graphic() || v == b' ' {
                write!(f, "'{}'", v as char)
            } else {
                write!(f, "{:#04x}", v)
            }
        };

        render(f, self.start)?;
        if self.start != self.end {
            write!(f, "-")?;
            render(f, self.end)?;
        }
        Ok(())
    }
}

impl CharRange {
    pub fn contains(&self, c: u8) -> bool {
        self.start <= c && c <= self.end
    }

    fn overlaps(&self, other: &CharRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Set of input bytes held as ordered disjoint ranges. A transition's valid
/// input is one of these; `distinguish` keeps the pieces split rather than
/// re-merged so range boundaries can line up across transitions.
#[derive(Clone, PartialEq, Eq)]
pub struct InputSet {
    ranges: Vec<CharRange>,
}

impl Debug for InputSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ranges.iter()).finish()
    }
}

impl InputSet {
    pub fn single(c: u8) -> InputSet {
        InputSet {
            ranges: vec![CharRange { start: c, end: c }],
        }
    }

    // an inverted range contains nothing; the NFA mutation API rejects it
    // before it can reach an automaton
    pub fn range(start: u8, end: u8) -> InputSet {
        InputSet {
            ranges: vec![CharRange { start, end }],
        }
    }

    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    pub fn contains(&self, c: u8) -> bool {
        self.ranges.iter().any(|r| r.contains(c))
    }

    // insert a single byte, merging with an adjacent or overlapping range.
    // only used while sets are being built up; after `distinguish` has run
    // nothing may merge pieces back together
    pub fn insert(&mut self, c: u8) {
        if self.contains(c) {
            return;
        }

        // ranges stay sorted by start, so a widened range can only touch its
        // immediate neighbor; scanning left to right, a byte bridging two
        // ranges always extends the left one first
        for i in 0..self.ranges.len() {
            if c < 255 && self.ranges[i].start == c + 1 {
                self.ranges[i].start = c;
                return;
            }
            if c > 0 && self.ranges[i].end == c - 1 {
                self.ranges[i].end = c;
                if c < 255 && i + 1 < self.ranges.len() && self.ranges[i + 1].start == c + 1 {
                    self.ranges[i].end = self.ranges[i + 1].end;
                    self.ranges.remove(i + 1);
                }
                return;
            }
        }

        self.ranges.push(CharRange { start: c, end: c });
        self.ranges.sort_by_key(|r| r.start);
    }

    /// Splits the ranges of `self` and `other` against each other so that
    /// afterward any range of one is either disjoint from or identical to
    /// any range of the other. Returns whether anything was split.
    pub fn distinguish(&mut self, other: &mut InputSet) -> bool {
        let a = self.split_on(other);
        let b = other.split_on(self);
        a || b
    }

    // cut every range of self at the boundaries of other's ranges that fall
    // strictly inside it. u16 cut points so end + 1 cannot wrap
    fn split_on(&mut self, other: &InputSet) -> bool {
        let mut cuts: Vec<u16> = Vec::new();
        for r in &other.ranges {
            cuts.push(r.start as u16);
            cuts.push(r.end as u16 + 1);
        }
        cuts.sort_unstable();
        cuts.dedup();

        let mut changed = false;
        let mut out: Vec<CharRange> = Vec::with_capacity(self.ranges.len());
        for r in &self.ranges {
            if !other.ranges.iter().any(|s| r.overlaps(s)) {
                out.push(*r);
                continue;
            }

            let mut lo = r.start;
            for &cut in &cuts {
                if (lo as u16) < cut && cut <= r.end as u16 {
                    out.push(CharRange {
                        start: lo,
                        end: (cut - 1) as u8,
                    });
                    lo = cut as u8;
                    changed = true;
                }
            }
            out.push(CharRange {
                start: lo,
                end: r.end,
            });
        }

        self.ranges = out;
        changed
    }
}
