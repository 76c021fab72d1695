use std::collections::BTreeMap;
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Interval<V> {
    end: usize,
    value: V,
}

/// Disjoint half-open intervals keyed by their start offset.
///
/// Touching intervals that carry equal values are merged on insertion and
/// after deletions, so two maps holding the same coverage compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalMap<V> {
    intervals: BTreeMap<usize, Interval<V>>,
}

impl<V> Default for IntervalMap<V> {
    fn default() -> Self {
        Self {
            intervals: BTreeMap::new(),
        }
    }
}

impl<V: Clone + PartialEq> IntervalMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    pub fn get(&self, pos: usize) -> Option<&V> {
        let (_, interval) = self.intervals.range(..=pos).next_back()?;
        (interval.end > pos).then_some(&interval.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Range<usize>, &V)> + '_ {
        self.intervals
            .iter()
            .map(|(start, interval)| (*start..interval.end, &interval.value))
    }

    /// Intervals intersecting `range`, unclipped, in ascending order.
    pub fn overlapping(&self, range: Range<usize>) -> impl Iterator<Item = (Range<usize>, &V)> + '_ {
        let first = self
            .intervals
            .range(..range.start)
            .next_back()
            .filter(|(_, interval)| interval.end > range.start)
            .map(|(start, _)| *start)
            .unwrap_or(range.start);
        let last = range.end.max(first);
        self.intervals
            .range(first..last)
            .map(|(start, interval)| (*start..interval.end, &interval.value))
            .filter(move |(span, _)| span.start < range.end && span.end > range.start)
    }

    /// Intervals intersecting `range`, clipped to it.
    pub fn clipped(&self, range: Range<usize>) -> Vec<(Range<usize>, V)> {
        self.overlapping(range.clone())
            .map(|(span, value)| {
                (
                    span.start.max(range.start)..span.end.min(range.end),
                    value.clone(),
                )
            })
            .collect()
    }

    /// Pushes every interval edge that falls inside `range` onto `out`.
    pub fn collect_boundaries(&self, range: Range<usize>, out: &mut Vec<usize>) {
        for (span, _) in self.overlapping(range.clone()) {
            if span.start > range.start {
                out.push(span.start);
            }
            if span.end < range.end {
                out.push(span.end);
            }
        }
    }

    /// Removes coverage of `range`, splitting intervals that straddle its
    /// edges. Returns the removed pieces clipped to `range`.
    pub fn remove(&mut self, range: Range<usize>) -> Vec<(Range<usize>, V)> {
        if range.is_empty() {
            return Vec::new();
        }
        let starts: Vec<usize> = self
            .overlapping(range.clone())
            .map(|(span, _)| span.start)
            .collect();
        let mut removed = Vec::with_capacity(starts.len());
        for start in starts {
            let Some(interval) = self.intervals.remove(&start) else {
                continue;
            };
            if start < range.start {
                self.intervals.insert(
                    start,
                    Interval {
                        end: range.start,
                        value: interval.value.clone(),
                    },
                );
            }
            if interval.end > range.end {
                self.intervals.insert(
                    range.end,
                    Interval {
                        end: interval.end,
                        value: interval.value.clone(),
                    },
                );
            }
            removed.push((
                start.max(range.start)..interval.end.min(range.end),
                interval.value,
            ));
        }
        removed
    }

    /// Covers `range` with `value`, replacing whatever was there.
    pub fn insert(&mut self, range: Range<usize>, value: V) {
        if range.is_empty() {
            return;
        }
        self.remove(range.clone());

        let mut start = range.start;
        let mut end = range.end;

        let left = self
            .intervals
            .range(..start)
            .next_back()
            .filter(|(_, interval)| interval.end == start && interval.value == value)
            .map(|(left_start, _)| *left_start);
        if let Some(left_start) = left {
            self.intervals.remove(&left_start);
            start = left_start;
        }

        let right_end = self
            .intervals
            .get(&end)
            .filter(|interval| interval.value == value)
            .map(|interval| interval.end);
        if let Some(right_end) = right_end {
            self.intervals.remove(&end);
            end = right_end;
        }

        self.intervals.insert(start, Interval { end, value });
    }

    /// Replaces the coverage of `range` with `pieces`.
    pub fn restore(&mut self, range: Range<usize>, pieces: &[(Range<usize>, V)]) {
        self.remove(range);
        for (span, value) in pieces {
            self.insert(span.clone(), value.clone());
        }
    }

    /// Adjusts for `len` chars inserted at `at`. An interval strictly
    /// containing `at` grows; intervals starting at or after `at` move.
    pub fn shift_for_insert(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        let tail = self.intervals.split_off(&at);
        if let Some((_, interval)) = self.intervals.range_mut(..at).next_back() {
            if interval.end > at {
                interval.end += len;
            }
        }
        for (start, mut interval) in tail {
            interval.end += len;
            self.intervals.insert(start + len, interval);
        }
    }

    /// Adjusts for the chars in `range` having been deleted.
    pub fn shift_for_delete(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let len = range.len();
        self.remove(range.clone());
        let tail = self.intervals.split_off(&range.end);
        for (start, mut interval) in tail {
            interval.end -= len;
            self.intervals.insert(start - len, interval);
        }
        self.merge_at(range.start);
    }

    fn merge_at(&mut self, pos: usize) {
        let Some(right) = self.intervals.get(&pos).cloned() else {
            return;
        };
        let Some((_, left)) = self.intervals.range_mut(..pos).next_back() else {
            return;
        };
        if left.end == pos && left.value == right.value {
            left.end = right.end;
            self.intervals.remove(&pos);
        }
    }
}
