//! Windowed accumulators for rolling statistics.
//!
//! Rolling max/min use a monotonic deque and the mean a running sum, so a
//! full indicator pass stays linear in the number of bars. Each accumulator
//! reports `None` until its window has accumulated `period` consecutive
//! values; pushing a non-finite value clears the window, so contaminated
//! history can never leak into a reported statistic.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct RollingMax {
    period: usize,
    seq: usize,
    count: usize,
    deque: VecDeque<(usize, f64)>,
}

impl RollingMax {
    pub fn new(period: usize) -> Self {
        debug_assert!(period > 0);
        RollingMax {
            period,
            seq: 0,
            count: 0,
            deque: VecDeque::new(),
        }
    }

    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            self.clear();
            return;
        }
        while matches!(self.deque.back(), Some(&(_, back)) if back <= value) {
            self.deque.pop_back();
        }
        self.deque.push_back((self.seq, value));
        while matches!(self.deque.front(), Some(&(s, _)) if s + self.period <= self.seq) {
            self.deque.pop_front();
        }
        self.seq += 1;
        self.count += 1;
    }

    /// Max over the last `period` pushes, or `None` while warming up.
    pub fn value(&self) -> Option<f64> {
        if self.count >= self.period {
            self.deque.front().map(|&(_, v)| v)
        } else {
            None
        }
    }

    fn clear(&mut self) {
        self.deque.clear();
        self.count = 0;
    }
}

#[derive(Debug)]
pub struct RollingMin {
    period: usize,
    seq: usize,
    count: usize,
    deque: VecDeque<(usize, f64)>,
}

impl RollingMin {
    pub fn new(period: usize) -> Self {
        debug_assert!(period > 0);
        RollingMin {
            period,
            seq: 0,
            count: 0,
            deque: VecDeque::new(),
        }
    }

    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            self.clear();
            return;
        }
        while matches!(self.deque.back(), Some(&(_, back)) if back >= value) {
            self.deque.pop_back();
        }
        self.deque.push_back((self.seq, value));
        while matches!(self.deque.front(), Some(&(s, _)) if s + self.period <= self.seq) {
            self.deque.pop_front();
        }
        self.seq += 1;
        self.count += 1;
    }

    pub fn value(&self) -> Option<f64> {
        if self.count >= self.period {
            self.deque.front().map(|&(_, v)| v)
        } else {
            None
        }
    }

    fn clear(&mut self) {
        self.deque.clear();
        self.count = 0;
    }
}

#[derive(Debug)]
pub struct RollingMean {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    pub fn new(period: usize) -> Self {
        debug_assert!(period > 0);
        RollingMean {
            period,
            window: VecDeque::new(),
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            self.window.clear();
            self.sum = 0.0;
            return;
        }
        self.window.push_back(value);
        self.sum += value;
        if self.window.len() > self.period {
            if let Some(old) = self.window.pop_front() {
                self.sum -= old;
            }
        }
    }

    /// Simple moving average over the last `period` pushes.
    pub fn value(&self) -> Option<f64> {
        if self.window.len() == self.period {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_max_warms_up() {
        let mut max = RollingMax::new(3);
        max.push(5.0);
        assert_eq!(max.value(), None);
        max.push(3.0);
        assert_eq!(max.value(), None);
        max.push(4.0);
        assert_eq!(max.value(), Some(5.0));
    }

    #[test]
    fn rolling_max_slides_window() {
        let mut max = RollingMax::new(2);
        for v in [10.0, 11.0, 9.0, 15.0, 8.0] {
            max.push(v);
        }
        // window is [15, 8]
        assert_eq!(max.value(), Some(15.0));

        let mut max = RollingMax::new(2);
        for v in [10.0, 11.0, 9.0] {
            max.push(v);
        }
        // window is [11, 9]
        assert_eq!(max.value(), Some(11.0));
    }

    #[test]
    fn rolling_max_drops_expired_peak() {
        let mut max = RollingMax::new(2);
        max.push(100.0);
        max.push(1.0);
        max.push(2.0);
        assert_eq!(max.value(), Some(2.0));
    }

    #[test]
    fn rolling_max_resets_on_non_finite() {
        let mut max = RollingMax::new(2);
        max.push(10.0);
        max.push(f64::NAN);
        assert_eq!(max.value(), None);
        max.push(3.0);
        assert_eq!(max.value(), None);
        max.push(4.0);
        assert_eq!(max.value(), Some(4.0));
    }

    #[test]
    fn rolling_min_basic() {
        let mut min = RollingMin::new(3);
        for v in [5.0, 2.0, 7.0] {
            min.push(v);
        }
        assert_eq!(min.value(), Some(2.0));
        min.push(6.0);
        min.push(8.0);
        min.push(9.0);
        // window is [6, 8, 9]
        assert_eq!(min.value(), Some(6.0));
    }

    #[test]
    fn rolling_min_ties_expire_correctly() {
        let mut min = RollingMin::new(2);
        min.push(3.0);
        min.push(3.0);
        min.push(5.0);
        // window is [3, 5]
        assert_eq!(min.value(), Some(3.0));
        min.push(6.0);
        // window is [5, 6]
        assert_eq!(min.value(), Some(5.0));
    }

    #[test]
    fn rolling_mean_matches_slice_average() {
        let mut mean = RollingMean::new(3);
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut got = Vec::new();
        for v in data {
            mean.push(v);
            got.push(mean.value());
        }
        assert_eq!(got[0], None);
        assert_eq!(got[1], None);
        assert!((got[2].unwrap() - 2.0).abs() < 1e-12);
        assert!((got[3].unwrap() - 3.0).abs() < 1e-12);
        assert!((got[4].unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn rolling_mean_resets_on_non_finite() {
        let mut mean = RollingMean::new(2);
        mean.push(1.0);
        mean.push(2.0);
        assert!(mean.value().is_some());
        mean.push(f64::INFINITY);
        assert_eq!(mean.value(), None);
        mean.push(4.0);
        mean.push(6.0);
        assert!((mean.value().unwrap() - 5.0).abs() < 1e-12);
    }
}
