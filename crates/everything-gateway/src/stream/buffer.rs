//! Bounded FIFO frame buffer.

use std::collections::VecDeque;

use everything_core::Frame;

/// Per-session bounded queue of frames awaiting a live sink.
///
/// Delivery is best-effort: at capacity, the oldest frame is evicted to
/// make room for the newest. FIFO order is preserved across any number of
/// push/drain cycles.
#[derive(Debug)]
pub struct FrameBuffer {
    frames: VecDeque<Frame>,
    capacity: usize,
}

impl FrameBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be positive");
        Self {
            frames: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Append a frame, evicting and returning the oldest one when full.
    pub fn push(&mut self, frame: Frame) -> Option<Frame> {
        let evicted = if self.frames.len() == self.capacity {
            self.frames.pop_front()
        } else {
            None
        };
        self.frames.push_back(frame);
        evicted
    }

    /// Remove and return every buffered frame in FIFO order.
    ///
    /// Called exactly once per attach, under the session lock, so no frame
    /// can slip between the drain and the switch to live forwarding.
    pub fn drain_all(&mut self) -> Vec<Frame> {
        self.frames.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
