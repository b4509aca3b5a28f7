use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

/// 有界阻塞队列 - 解码线程与检测线程之间的背压通道
///
/// `push` blocks while the queue is full, `pop` blocks while it is
/// empty. `close` wakes every waiter on both sides, which is how a
/// cancelled run unblocks deterministically.
pub struct BoundedQueue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> BoundedQueue<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    items: VecDeque::with_capacity(capacity.max(1)),
                    closed: false,
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Blocks until there is room. Returns false (dropping `item`) if the
    /// queue was closed.
    pub fn push(&self, item: T) -> bool {
        let mut state = self.inner.state.lock().unwrap();
        while state.items.len() >= self.inner.capacity && !state.closed {
            state = self.inner.not_full.wait(state).unwrap();
        }
        if state.closed {
            return false;
        }
        state.items.push_back(item);
        self.inner.not_empty.notify_one();
        true
    }

    /// Blocks until an item arrives. Returns None once the queue is
    /// closed and drained.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.inner.state.lock().unwrap();
        while state.items.is_empty() && !state.closed {
            state = self.inner.not_empty.wait(state).unwrap();
        }
        let item = state.items.pop_front();
        self.inner.not_full.notify_one();
        item
    }

    pub fn close(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.closed = true;
        self.inner.not_full.notify_all();
        self.inner.not_empty.notify_all();
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
