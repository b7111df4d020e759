use std::fmt::Debug;

/// Receives progress updates from long-running operations (ranking, pairwise
/// comparison, parameter sweeps).
pub trait ProgressNotifier: Debug + Send + Sync {
    fn set_iter_num(&self, num_iter: u64);

    fn inc_iter(&self);
}

impl<T: ProgressNotifier> ProgressNotifier for &T {
    fn set_iter_num(&self, num_iter: u64) {
        T::set_iter_num(self, num_iter)
    }

    fn inc_iter(&self) {
        T::inc_iter(self)
    }
}

#[derive(Clone, Debug)]
pub struct DummyProgressNotifier;

impl ProgressNotifier for DummyProgressNotifier {
    fn set_iter_num(&self, _num_iter: u64) {
        // do nothing
    }

    fn inc_iter(&self) {
        // do nothing
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use crate::progress::{DummyProgressNotifier, ProgressNotifier};

    #[derive(Debug, Default)]
    struct CountingNotifier {
        total: AtomicU64,
        done: AtomicU64,
    }

    impl ProgressNotifier for CountingNotifier {
        fn set_iter_num(&self, num_iter: u64) {
            self.total.store(num_iter, Ordering::Relaxed);
        }

        fn inc_iter(&self) {
            self.done.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_dummy_progress_notifier() {
        let notifier = DummyProgressNotifier;
        notifier.set_iter_num(1337);
        let notifier_2 = notifier;
        notifier_2.inc_iter();
    }

    #[test]
    fn test_notifier_by_reference() {
        let notifier = CountingNotifier::default();
        let by_ref = &notifier;

        by_ref.set_iter_num(3);
        by_ref.inc_iter();
        by_ref.inc_iter();

        assert_eq!(notifier.total.load(Ordering::Relaxed), 3);
        assert_eq!(notifier.done.load(Ordering::Relaxed), 2);
    }
}
