/// Fixed-capacity circular buffer with running sum / sum-of-squares,
/// so mean and stdev updates stay O(1) per sample.
pub struct RollingStats {
    buf: Vec<f32>,
    capacity: usize,
    head: usize,
    len: usize,
    sum: f64,
    sum_sq: f64,
}

impl RollingStats {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity.max(1)],
            capacity: capacity.max(1),
            head: 0,
            len: 0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    pub fn push(&mut self, value: f32) {
        let v = value as f64;
        if self.len == self.capacity {
            let evicted = self.buf[self.head] as f64;
            self.sum -= evicted;
            self.sum_sq -= evicted * evicted;
            self.buf[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        } else {
            let tail = (self.head + self.len) % self.capacity;
            self.buf[tail] = value;
            self.len += 1;
        }
        self.sum += v;
        self.sum_sq += v * v;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn mean(&self) -> f32 {
        if self.len == 0 {
            return 0.0;
        }
        (self.sum / self.len as f64) as f32
    }

    /// Population standard deviation over the current window.
    pub fn stdev(&self) -> f32 {
        if self.len == 0 {
            return 0.0;
        }
        let mean = self.sum / self.len as f64;
        let variance = (self.sum_sq / self.len as f64 - mean * mean).max(0.0);
        variance.sqrt() as f32
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
        self.sum = 0.0;
        self.sum_sq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_stdev() {
        let mut stats = RollingStats::with_capacity(8);
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.push(v);
        }
        assert!((stats.mean() - 5.0).abs() < 1e-6);
        assert!((stats.stdev() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_eviction_keeps_window_bounded() {
        let mut stats = RollingStats::with_capacity(3);
        for v in [100.0, 1.0, 2.0, 3.0] {
            stats.push(v);
        }
        // 100.0 evicted, window = [1, 2, 3]
        assert_eq!(stats.len(), 3);
        assert!(stats.is_full());
        assert!((stats.mean() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_long_rotation_stays_consistent() {
        let mut stats = RollingStats::with_capacity(5);
        for i in 0..1000 {
            stats.push((i % 10) as f32);
        }
        // window = [5, 6, 7, 8, 9]
        assert!((stats.mean() - 7.0).abs() < 1e-4);
        assert!((stats.stdev() - 2.0f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_empty_window() {
        let stats = RollingStats::with_capacity(4);
        assert!(stats.is_empty());
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.stdev(), 0.0);
    }

    #[test]
    fn test_clear() {
        let mut stats = RollingStats::with_capacity(4);
        stats.push(10.0);
        stats.push(20.0);
        stats.clear();
        assert!(stats.is_empty());
        assert_eq!(stats.mean(), 0.0);
    }
}
