use serde::Serialize;

use super::model::Bounds;

/// One equal-width bucket: `[start, end)`, the last one closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram over the range of the supplied values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Bin `values` into `bins` buckets spanning their min..max.
    ///
    /// No values gives no bins; identical values give one bin of width 1
    /// centred on the value.
    pub fn build(values: &[f64], bins: usize) -> Self {
        let Some(range) = Bounds::of(values.iter().copied()) else {
            return Histogram::default();
        };
        if range.max <= range.min || bins <= 1 {
            let (start, end) = if range.max <= range.min {
                (range.min - 0.5, range.min + 0.5)
            } else {
                (range.min, range.max)
            };
            return Histogram {
                bins: vec![Bin {
                    start,
                    end,
                    count: values.len(),
                }],
            };
        }

        let width = (range.max - range.min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let slot = ((v - range.min) / width).floor() as usize;
            counts[slot.min(bins - 1)] += 1;
        }

        Histogram {
            bins: counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| Bin {
                    start: range.min + i as f64 * width,
                    end: range.min + (i + 1) as f64 * width,
                    count,
                })
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
