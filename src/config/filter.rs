/// A display range on the time axis, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f32,
    pub end: f32,
}

/// Band-pass corners and the time window shown for the filtered trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    /// Lower corner frequency, in hertz.
    pub freqmin: f32,

    /// Upper corner frequency, in hertz.
    pub freqmax: f32,

    pub time_window: TimeWindow,
}

impl FilterParameters {
    /// Values used for fields left blank.
    pub const DEFAULT: FilterParameters = FilterParameters {
        freqmin: 10.0,
        freqmax: 30.0,
        time_window: TimeWindow {
            start: 10.0,
            end: 80.0,
        },
    };

    /// Values the whole group reverts to when any field is malformed.
    /// Note the wider display window compared to `DEFAULT`.
    pub const FALLBACK: FilterParameters = FilterParameters {
        freqmin: 10.0,
        freqmax: 30.0,
        time_window: TimeWindow {
            start: 10.0,
            end: 90.0,
        },
    };
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}
