use crate::error::PresentationError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideTiming {
    pub index: usize,
    pub start_secs: f64,
    pub duration_secs: f64,
}

/// Words in a script, counted as space-separated pieces. Never less than one.
pub fn word_count(script: &str) -> usize {
    script.split(' ').count().max(1)
}

/// Splits narration time across slides in proportion to their word counts.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideTimeline {
    timings: Vec<SlideTiming>,
    total_secs: f64,
}

impl SlideTimeline {
    pub fn new<S: AsRef<str>>(scripts: &[S], total_secs: f64) -> Result<Self, PresentationError> {
        if !total_secs.is_finite() || total_secs < 0.0 {
            return Err(PresentationError::InvalidDuration(total_secs));
        }
        let words: Vec<usize> = scripts.iter().map(|s| word_count(s.as_ref())).collect();
        let total_words: usize = words.iter().sum();

        let mut start = 0.0;
        let timings = words
            .iter()
            .enumerate()
            .map(|(index, w)| {
                let duration = *w as f64 / total_words as f64 * total_secs;
                let timing = SlideTiming {
                    index,
                    start_secs: start,
                    duration_secs: duration,
                };
                start += duration;
                timing
            })
            .collect();

        Ok(Self {
            timings,
            total_secs,
        })
    }

    pub fn timings(&self) -> &[SlideTiming] {
        &self.timings
    }

    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Index of the slide showing at `secs`: the last one that has started.
    pub fn slide_at(&self, secs: f64) -> Option<usize> {
        let first = self.timings.first()?;
        Some(
            self.timings
                .iter()
                .rev()
                .find(|t| secs >= t.start_secs)
                .unwrap_or(first)
                .index,
        )
    }
}
