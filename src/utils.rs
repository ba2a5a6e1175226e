use std::collections::VecDeque;

use crate::frame_placement::FramePlacement;

/// Moving average over the last `max_length` placements of a video feed.
#[derive(Debug, Clone)]
pub struct PlacementSmoother {
    data: VecDeque<FramePlacement>,
    max_length: usize,
}

impl PlacementSmoother {
    // a window of 0 behaves like 1 (no smoothing)
    pub fn new(max_length: usize) -> Self {
        let max_length = max_length.max(1);
        Self {
            data: VecDeque::with_capacity(max_length),
            max_length,
        }
    }

    pub fn push(&mut self, placement: FramePlacement) -> FramePlacement {
        self.data.push_back(placement);

        if self.data.len() > self.max_length {
            self.data.pop_front();
        }

        self.get_mean()
    }

    pub fn current(&self) -> Option<FramePlacement> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.get_mean())
        }
    }

    pub fn window(&self) -> usize {
        self.max_length
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn reset(&mut self) {
        self.data.clear();
    }

    fn get_mean(&self) -> FramePlacement {
        let n = self.data.len() as f64;
        let sum = self.data.iter().fold(
            FramePlacement { x: 0.0, y: 0.0, width: 0.0, height: 0.0 },
            |acc, p| FramePlacement {
                x: acc.x + p.x,
                y: acc.y + p.y,
                width: acc.width + p.width,
                height: acc.height + p.height,
            },
        );

        FramePlacement {
            x: sum.x / n,
            y: sum.y / n,
            width: sum.width / n,
            height: sum.height / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, width: f64) -> FramePlacement {
        FramePlacement { x, y: 10.0, width, height: width / 2.0 }
    }

    #[test]
    fn empty_smoother_has_no_value() {
        let smoother = PlacementSmoother::new(3);
        assert!(smoother.is_empty());
        assert_eq!(smoother.current(), None);
    }

    #[test]
    fn averages_within_window() {
        let mut smoother = PlacementSmoother::new(2);
        smoother.push(rect(0.0, 100.0));
        let mean = smoother.push(rect(10.0, 200.0));

        assert_eq!(mean, rect(5.0, 150.0));
    }

    #[test]
    fn evicts_oldest() {
        let mut smoother = PlacementSmoother::new(2);
        smoother.push(rect(0.0, 100.0));
        smoother.push(rect(10.0, 200.0));
        let mean = smoother.push(rect(20.0, 300.0));

        assert_eq!(smoother.len(), 2);
        assert_eq!(mean, rect(15.0, 250.0));
    }

    #[test]
    fn zero_window_disables_smoothing() {
        let mut smoother = PlacementSmoother::new(0);
        smoother.push(rect(0.0, 100.0));
        assert_eq!(smoother.push(rect(40.0, 80.0)), rect(40.0, 80.0));
        assert_eq!(smoother.window(), 1);
    }

    #[test]
    fn reset_clears_history() {
        let mut smoother = PlacementSmoother::new(4);
        smoother.push(rect(0.0, 100.0));
        smoother.reset();
        assert!(smoother.is_empty());
    }
}
