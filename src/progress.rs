//! Progress reporting seam
//!
//! The pipeline reports through [`ProgressSink`]; the CLI plugs in terminal
//! spinners and tests use [`NoProgress`].

pub trait ProgressSink {
    /// A new phase begins. `total` is known for countable phases only.
    fn on_start(&self, message: &str, total: Option<u64>);
    fn on_advance(&self, delta: u64);
    fn on_complete(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_start(&self, _message: &str, _total: Option<u64>) {}
    fn on_advance(&self, _delta: u64) {}
    fn on_complete(&self, _message: &str) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ProgressSink;
    use std::cell::RefCell;

    /// Records every event for assertions.
    #[derive(Default)]
    pub struct RecordingProgress {
        pub events: RefCell<Vec<String>>,
    }

    impl ProgressSink for RecordingProgress {
        fn on_start(&self, message: &str, total: Option<u64>) {
            self.events.borrow_mut().push(format!("start:{message}:{total:?}"));
        }

        fn on_advance(&self, delta: u64) {
            self.events.borrow_mut().push(format!("advance:{delta}"));
        }

        fn on_complete(&self, message: &str) {
            self.events.borrow_mut().push(format!("complete:{message}"));
        }
    }
}
