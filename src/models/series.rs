use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PricePoint / PriceSeries — daily closing prices, ascending by date
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closing prices ordered by date with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered points.
    ///
    /// Points are sorted by date; when a date appears more than once the
    /// last occurrence wins.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        sort_keep_last(&mut points, |p| p.date);
        Self { points }
    }

    /// Convenience constructor from `(date, close)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::from_points(
            pairs
                .into_iter()
                .map(|(date, close)| PricePoint { date, close })
                .collect(),
        )
    }

    /// Drop points whose close is NaN or infinite.
    pub fn cleaned(&self) -> Self {
        Self {
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| p.close.is_finite())
                .collect(),
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ReturnPoint / ReturnSeries — fractional returns keyed by date
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Fractional values keyed by date: daily returns, cumulative returns or
/// drawdowns, depending on how it was derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    /// Wrap points that are already ordered by date.
    pub(crate) fn from_sorted(points: Vec<ReturnPoint>) -> Self {
        Self { points }
    }

    /// Build from `(date, value)` pairs, sorting by date. As with
    /// [`PriceSeries::from_points`], the last of several values for one
    /// date wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut points: Vec<ReturnPoint> = pairs
            .into_iter()
            .map(|(date, value)| ReturnPoint { date, value })
            .collect();
        sort_keep_last(&mut points, |p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn last(&self) -> Option<&ReturnPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sort ascending by date and drop all but the last occurrence of each date.
fn sort_keep_last<T>(points: &mut Vec<T>, date: impl Fn(&T) -> NaiveDate) {
    // Stable sort keeps input order among equal dates, so the later
    // duplicate ends up last and survives the reverse dedup below.
    points.sort_by_key(|p| date(p));
    points.reverse();
    points.dedup_by_key(|p| date(p));
    points.reverse();
}

// ---------------------------------------------------------------------------
// AlignedReturn — one row of the stock/market inner join
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedReturn {
    pub date: NaiveDate,
    pub stock: f64,
    pub market: f64,
}
