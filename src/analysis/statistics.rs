use serde::{Deserialize, Serialize};

use crate::leadtime::LeadTimeRecord;

/// Summary of lead-time minutes over a record set.
///
/// Every field is zero for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub sum: i64,
    pub mean: f64,
    pub median: f64,
}

impl Statistics {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_minutes(values: &[i64]) -> Self {
        let Some((&first, rest)) = values.split_first() else {
            return Self::default();
        };

        let (min, max) = rest.iter().fold((first, first), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
        let sum: i64 = values.iter().sum();

        Self {
            count: values.len(),
            min,
            max,
            sum,
            mean: sum as f64 / values.len() as f64,
            median: median(values),
        }
    }
}

/// Recomputes statistics from the full record set.
///
/// Correlation only keeps closed pull requests that have a lead time, so
/// after the open-state filter `count` equals the number of records.
/// Records without a lead time contribute nothing.
pub fn aggregate(records: &[LeadTimeRecord]) -> Statistics {
    let minutes: Vec<i64> = records
        .iter()
        .filter_map(|record| record.lead_time_minutes)
        .collect();

    Statistics::from_minutes(&minutes)
}

#[allow(clippy::cast_precision_loss)]
fn median(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}
