//! Bonus change notification.

use std::fmt;
use std::sync::Arc;

use crate::env::BonusDefinition;

/// Receives the active bonus list after an operation changed it.
///
/// Called synchronously, at most once per `place` or `remove`, with the
/// bonuses of all live groups in ascending group id order.
pub trait BonusObserver: Send {
    fn on_bonus_changed(&mut self, bonuses: &[Arc<BonusDefinition>]);
}

impl<F> BonusObserver for F
where
    F: FnMut(&[Arc<BonusDefinition>]) + Send,
{
    fn on_bonus_changed(&mut self, bonuses: &[Arc<BonusDefinition>]) {
        self(bonuses)
    }
}

/// Fan-out to every subscribed observer, in subscription order.
#[derive(Default)]
pub struct BonusNotifier {
    observers: Vec<Box<dyn BonusObserver>>,
}

impl BonusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl BonusObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&mut self, bonuses: &[Arc<BonusDefinition>]) {
        for observer in &mut self.observers {
            observer.on_bonus_changed(bonuses);
        }
    }
}

impl fmt::Debug for BonusNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BonusNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn closures_receive_every_notification() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = BonusNotifier::new();
        let sink = Arc::clone(&seen);
        notifier.subscribe(move |bonuses: &[Arc<BonusDefinition>]| {
            sink.lock().unwrap().push(bonuses.len());
        });

        let pair = Arc::new(BonusDefinition::new("B1", "Pair", ["002", "002"]));
        notifier.notify(&[Arc::clone(&pair)]);
        notifier.notify(&[]);

        assert_eq!(notifier.len(), 1);
        assert_eq!(*seen.lock().unwrap(), [1, 0]);
    }
}
