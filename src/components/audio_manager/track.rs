/// A playable unit: display metadata, a source and optional segment bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub source: String,
    /// Offset in seconds to seek to when playback begins.
    pub segment_start: Option<f64>,
    /// Offset in seconds at which the segment boundary triggers.
    pub segment_end: Option<f64>,
    pub looping: bool,
}

/// Half-open `[start, end)` range with a strictly positive length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Track {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            source: source.into(),
            segment_start: None,
            segment_end: None,
            looping: false,
        }
    }

    pub fn with_segment(mut self, start: f64, end: f64) -> Self {
        self.segment_start = Some(start);
        self.segment_end = Some(end);
        self
    }

    pub fn looped(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Where playback should begin, if the track asks for a non-zero offset.
    pub fn start_offset(&self) -> Option<f64> {
        self.segment_start
            .filter(|start| start.is_finite() && *start > 0.0)
    }

    /// The effective segment. A missing end, a non-finite bound or an end
    /// that does not lie after the start all mean "no segment".
    pub fn segment(&self) -> Option<Segment> {
        let start = self.start_offset().unwrap_or(0.0);
        let end = self.segment_end.filter(|end| end.is_finite())?;
        (end > start).then_some(Segment { start, end })
    }
}

/// Looping welcome track shown when the shell starts.
pub fn welcome_track() -> Track {
    Track::new("MILA TOH MAREGA", "Welcome Track", "/MILA TOH MAREGA.mp3")
        .with_segment(20.0, 30.0)
        .looped()
}

/// Reward jingle played when a fielding slot is confirmed.
pub fn reward_track() -> Track {
    Track::new("Dus Don", "Dada Sadhu HR × Gadi Number", "/dus-don.mp3")
        .with_segment(7.0, 17.0)
        .looped()
}
