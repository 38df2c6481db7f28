use crate::region::RegionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    SelectionChanged { count: usize },
    ModeChanged { kind: RegionKind },
    ImageChanged { loaded: bool },
    RegionsChanged { count: usize },
}

impl EngineEvent {
    /// Events of the same variant supersede each other when coalesced.
    fn same_topic(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type EventObserver = Box<dyn FnMut(&EngineEvent)>;

#[derive(Default)]
pub struct EventBus {
    observers: Vec<(SubscriptionId, EventObserver)>,
    next_id: u64,
    pending: Vec<EngineEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(&mut self, observer: impl FnMut(&EngineEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn queue(&mut self, event: EngineEvent) {
        if let Some(queued) = self
            .pending
            .iter_mut()
            .find(|queued| queued.same_topic(&event))
        {
            *queued = event;
        } else {
            self.pending.push(event);
        }
    }

    pub fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for event in &pending {
            tracing::trace!(?event, observers = self.observers.len(), "emit engine event");
            for (_, observer) in &mut self.observers {
                observer(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_bus() -> (EventBus, Rc<RefCell<Vec<EngineEvent>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::default();
        let sink = Rc::clone(&seen);
        bus.subscribe(move |event| sink.borrow_mut().push(*event));
        (bus, seen)
    }

    #[test]
    fn queued_events_of_same_variant_coalesce_to_latest() {
        let (mut bus, seen) = recording_bus();
        bus.queue(EngineEvent::SelectionChanged { count: 1 });
        bus.queue(EngineEvent::RegionsChanged { count: 1 });
        bus.queue(EngineEvent::SelectionChanged { count: 3 });
        assert!(seen.borrow().is_empty());

        bus.flush();
        assert_eq!(
            *seen.borrow(),
            vec![
                EngineEvent::SelectionChanged { count: 3 },
                EngineEvent::RegionsChanged { count: 1 },
            ]
        );
    }

    #[test]
    fn unsubscribed_observers_stop_receiving() {
        let (mut bus, seen) = recording_bus();
        let extra = Rc::new(RefCell::new(0_usize));
        let counter = Rc::clone(&extra);
        let id = bus.subscribe(move |_| *counter.borrow_mut() += 1);

        bus.queue(EngineEvent::ImageChanged { loaded: true });
        bus.flush();
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.queue(EngineEvent::ImageChanged { loaded: false });
        bus.flush();

        assert_eq!(*extra.borrow(), 1);
        assert_eq!(seen.borrow().len(), 2);
    }
}
