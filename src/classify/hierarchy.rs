//! Font-size ranking into heading levels.

use std::collections::BTreeMap;

use crate::model::{from_tenths, to_tenths, HeadingLevel, Line};

/// How size ranks map to levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelScheme {
    /// Rank 0 is H1, rank 1 is H2, ...
    HeadingsOnly,
    /// Rank 0 is TITLE, rank 1 is H1, ...
    TitleFirst,
}

impl LevelScheme {
    /// Level for a zero-based size rank.
    pub fn level_for_rank(self, rank: usize) -> HeadingLevel {
        let heading = |n: usize| HeadingLevel::Heading(n.min(u8::MAX as usize) as u8);
        match self {
            LevelScheme::HeadingsOnly => heading(rank + 1),
            LevelScheme::TitleFirst if rank == 0 => HeadingLevel::Title,
            LevelScheme::TitleFirst => heading(rank),
        }
    }
}

/// Distinct font sizes ranked largest first.
///
/// Sizes are compared after rounding to one decimal, so 11.96 and 12.04
/// share a rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHierarchy {
    sizes: Vec<i64>,
    scheme: LevelScheme,
}

impl FontHierarchy {
    /// Rank the distinct sizes in `sizes`.
    pub fn from_sizes(sizes: impl IntoIterator<Item = f32>, scheme: LevelScheme) -> Self {
        let mut keys: Vec<i64> = sizes.into_iter().map(to_tenths).collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.dedup();
        Self {
            sizes: keys,
            scheme,
        }
    }

    /// Rank the sizes of a set of lines.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a Line>, scheme: LevelScheme) -> Self {
        Self::from_sizes(lines.into_iter().map(|l| l.font_size), scheme)
    }

    /// Number of distinct sizes.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether no sizes were seen.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// More than one distinct size.
    pub fn is_differentiated(&self) -> bool {
        self.sizes.len() > 1
    }

    /// Distinct sizes, largest first.
    pub fn distinct_sizes(&self) -> Vec<f32> {
        self.sizes.iter().copied().map(from_tenths).collect()
    }

    /// Zero-based rank of a size, if it was seen.
    pub fn rank_of(&self, size: f32) -> Option<usize> {
        let key = to_tenths(size);
        self.sizes.iter().position(|&k| k == key)
    }

    /// Level assigned to a size.
    pub fn level_for(&self, size: f32) -> Option<HeadingLevel> {
        self.rank_of(size).map(|rank| self.scheme.level_for_rank(rank))
    }
}

/// Most common line font size.
///
/// Ties go to the smaller size; empty input has no body size.
pub fn body_font_size<'a>(lines: impl IntoIterator<Item = &'a Line>) -> Option<f32> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for line in lines {
        *counts.entry(line.size_key()).or_default() += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (key, count) in counts {
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, _)| from_tenths(key))
}
