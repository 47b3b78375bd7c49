use crate::config::TimeWindow;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TraceListError {
    #[error("trace list is empty")]
    Empty,
    #[error("trace index {0:?} is not a non-negative integer")]
    BadIndex(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeWindowError {
    #[error("time window is missing the start:end separator")]
    MissingSeparator,
    #[error("time window bound {0:?} is not a number")]
    BadBound(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DepthListError {
    #[error("depth list is empty")]
    Empty,
    #[error("layer depth {0:?} is not a number")]
    BadDepth(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Comma separated trace indices to highlight, e.g. `0,1,2,3,4,5,6`.
/// Order is kept, since the seventh entry picks the spectrogram trace.
pub struct TraceSelection(pub Vec<usize>);

impl FromStr for TraceSelection {
    type Err = TraceListError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(TraceListError::Empty);
        }
        s.split(',')
            .map(|item| {
                item.trim()
                    .parse::<usize>()
                    .map_err(|_| TraceListError::BadIndex(item.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(TraceSelection)
    }
}

/// Parses `start:end` in seconds, e.g. `10:80`.
impl FromStr for TimeWindow {
    type Err = TimeWindowError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or(TimeWindowError::MissingSeparator)?;
        let bound = |v: &str| {
            v.trim()
                .parse::<f32>()
                .map_err(|_| TimeWindowError::BadBound(v.to_owned()))
        };
        Ok(TimeWindow {
            start: bound(start)?,
            end: bound(end)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Comma separated layer depths for the geometry diagram, e.g.
/// `-100,-200,-300`.
pub struct DepthList(pub Vec<f32>);

impl FromStr for DepthList {
    type Err = DepthListError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DepthListError::Empty);
        }
        s.split(',')
            .map(|item| {
                item.trim()
                    .parse::<f32>()
                    .map_err(|_| DepthListError::BadDepth(item.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DepthList)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_one() {
        let sel = TraceSelection::from_str("0, 1,2,9").expect("works");
        assert_eq!(sel.0, vec![0, 1, 2, 9]);
    }

    #[test]
    fn bad_trace_lists() {
        assert_eq!(TraceSelection::from_str(""), Err(TraceListError::Empty));
        assert_eq!(
            TraceSelection::from_str("1,-2"),
            Err(TraceListError::BadIndex("-2".into()))
        );
    }

    #[test]
    fn time_windows() {
        let w = TimeWindow::from_str("10:80").expect("works");
        assert_eq!((w.start, w.end), (10.0, 80.0));
        assert_eq!(
            TimeWindow::from_str("10-80"),
            Err(TimeWindowError::MissingSeparator)
        );
        assert_eq!(
            TimeWindow::from_str("a:80"),
            Err(TimeWindowError::BadBound("a".into()))
        );
    }

    #[test]
    fn depth_lists() {
        assert_eq!(
            DepthList::from_str("-100,-250.5").expect("works").0,
            vec![-100.0, -250.5]
        );
        assert!(DepthList::from_str("-100,,").is_err());
    }
}
