use crate::mood::{Mood, MoodCounts, MOOD_COUNT};
use serde::Serialize;

pub const CHART_LABEL: &str = "Moods";

/// Doughnut chart state. The dataset is replaced in place by `update`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodChart {
    data: [u32; MOOD_COUNT],
}

impl MoodChart {
    pub fn update(&mut self, counts: &MoodCounts) {
        self.data.copy_from_slice(counts.as_slice());
    }

    pub fn reset(&mut self) {
        self.data = [0; MOOD_COUNT];
    }

    pub fn data(&self) -> &[u32; MOOD_COUNT] {
        &self.data
    }

    pub fn total(&self) -> u32 {
        self.data.iter().sum()
    }

    pub fn dataset(&self) -> ChartData {
        ChartData {
            label: CHART_LABEL,
            labels: Mood::ALL.iter().map(|mood| mood.name()).collect(),
            data: self.data.to_vec(),
            background_colors: Mood::ALL.iter().map(|mood| mood.chart_fill()).collect(),
            border_colors: Mood::ALL.iter().map(|mood| mood.chart_border()).collect(),
            total: self.total(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub label: &'static str,
    pub labels: Vec<&'static str>,
    pub data: Vec<u32>,
    pub background_colors: Vec<String>,
    pub border_colors: Vec<String>,
    pub total: u32,
}

/// One non-empty ring segment. `start` and `len` are fractions of the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub index: usize,
    pub count: u32,
    pub start: f64,
    pub len: f64,
}

impl ChartData {
    pub fn slices(&self) -> Vec<Slice> {
        if self.total == 0 {
            return Vec::new();
        }
        let mut start = 0.0;
        let mut slices = Vec::new();
        for (index, &count) in self.data.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let len = f64::from(count) / f64::from(self.total);
            slices.push(Slice { index, count, start, len });
            start += len;
        }
        slices
    }
}
