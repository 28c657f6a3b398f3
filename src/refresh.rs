//! Refresh notifications for views showing settings content

use crate::settings::Settings;

/// Which part of the settings changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    Variables,
    Commands,
}

type Subscriber = Box<dyn FnMut(RefreshKind, &Settings)>;

/// Fan-out of refresh events to registered views
#[derive(Default)]
pub struct RefreshHub {
    subscribers: Vec<Subscriber>,
}

impl RefreshHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(RefreshKind, &Settings) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Notify every subscriber, in subscription order, with freshly read settings
    pub fn emit(&mut self, kind: RefreshKind, settings: &Settings) {
        for subscriber in &mut self.subscribers {
            subscriber(kind, settings);
        }
    }
}

impl std::fmt::Debug for RefreshHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshHub")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_emit_reaches_all_subscribers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hub = RefreshHub::new();
        for id in 0..2 {
            let seen = Rc::clone(&seen);
            hub.subscribe(move |kind, _| seen.borrow_mut().push((id, kind)));
        }
        hub.emit(RefreshKind::Commands, &Settings::default());
        assert_eq!(
            *seen.borrow(),
            vec![(0, RefreshKind::Commands), (1, RefreshKind::Commands)]
        );
    }
}
