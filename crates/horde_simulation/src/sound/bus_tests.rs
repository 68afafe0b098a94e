//! Tests for SoundEventBus.

#[cfg(test)]
mod tests {
    use super::super::bus::{ListenerId, SoundEvent, SoundEventBus, SoundListener};
    use bevy::prelude::*;
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    #[derive(Default)]
    struct Recorder {
        heard: RefCell<Vec<SoundEvent>>,
    }

    impl SoundListener for Recorder {
        fn on_sound(&self, event: &SoundEvent) {
            self.heard.borrow_mut().push(*event);
        }
    }

    fn subscribe(bus: &SoundEventBus, recorder: &Rc<Recorder>) -> ListenerId {
        let weak: Weak<dyn SoundListener> = Rc::downgrade(recorder) as Weak<dyn SoundListener>;
        bus.subscribe(weak)
    }

    #[test]
    fn test_emit_reaches_every_subscriber_once() {
        let bus = SoundEventBus::new();
        let a = Rc::new(Recorder::default());
        let b = Rc::new(Recorder::default());
        subscribe(&bus, &a);
        subscribe(&bus, &b);

        bus.emit(Vec3::new(1.0, 0.0, 2.0), 15.0);

        for recorder in [&a, &b] {
            let heard = recorder.heard.borrow();
            assert_eq!(heard.len(), 1);
            assert_eq!(heard[0].position, Vec3::new(1.0, 0.0, 2.0));
            assert_eq!(heard[0].radius, 15.0);
            assert_eq!(heard[0].source, None);
        }
    }

    #[test]
    fn test_unsubscribed_listener_not_notified() {
        let bus = SoundEventBus::new();
        let a = Rc::new(Recorder::default());
        let id = subscribe(&bus, &a);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(Vec3::ZERO, 5.0);

        assert!(a.heard.borrow().is_empty());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_emit_from_skips_source() {
        let bus = SoundEventBus::new();
        let emitter = Rc::new(Recorder::default());
        let other = Rc::new(Recorder::default());
        let emitter_id = subscribe(&bus, &emitter);
        subscribe(&bus, &other);

        bus.emit_from(emitter_id, Vec3::ZERO, 15.0);

        assert!(emitter.heard.borrow().is_empty());
        assert_eq!(other.heard.borrow().len(), 1);
        assert_eq!(other.heard.borrow()[0].source, Some(emitter_id));
    }

    #[test]
    fn test_dropped_listener_is_skipped_and_pruned() {
        let bus = SoundEventBus::new();
        let kept = Rc::new(Recorder::default());
        subscribe(&bus, &kept);
        {
            let dropped = Rc::new(Recorder::default());
            subscribe(&bus, &dropped);
        }
        assert_eq!(bus.listener_count(), 2);

        bus.emit(Vec3::ZERO, 1.0);

        assert_eq!(kept.heard.borrow().len(), 1);
        assert_eq!(bus.listener_count(), 1);
    }

    /// Отписывает другого подписчика прямо во время dispatch
    struct Unsubscriber {
        bus: Rc<SoundEventBus>,
        victim: Cell<Option<ListenerId>>,
    }

    impl SoundListener for Unsubscriber {
        fn on_sound(&self, _event: &SoundEvent) {
            if let Some(victim) = self.victim.take() {
                self.bus.unsubscribe(victim);
            }
        }
    }

    #[test]
    fn test_unsubscribe_during_dispatch_stops_delivery() {
        let bus = Rc::new(SoundEventBus::new());
        let unsubscriber = Rc::new(Unsubscriber {
            bus: bus.clone(),
            victim: Cell::new(None),
        });
        let victim = Rc::new(Recorder::default());

        bus.subscribe(Rc::downgrade(&unsubscriber) as Weak<dyn SoundListener>);
        let victim_id = subscribe(&bus, &victim);
        unsubscriber.victim.set(Some(victim_id));

        bus.emit(Vec3::ZERO, 3.0);

        assert!(victim.heard.borrow().is_empty());
        assert!(!bus.is_subscribed(victim_id));
    }

    /// Снимает сразу пачку подписок на первом звуке
    struct BulkUnsubscriber {
        bus: Rc<SoundEventBus>,
        victims: RefCell<Vec<ListenerId>>,
    }

    impl SoundListener for BulkUnsubscriber {
        fn on_sound(&self, _event: &SoundEvent) {
            for victim in self.victims.borrow_mut().drain(..) {
                self.bus.unsubscribe(victim);
            }
        }
    }

    #[test]
    fn test_bulk_unsubscribe_during_dispatch_in_crowded_bus() {
        let bus = Rc::new(SoundEventBus::new());
        let bulk = Rc::new(BulkUnsubscriber {
            bus: bus.clone(),
            victims: RefCell::new(Vec::new()),
        });
        bus.subscribe(Rc::downgrade(&bulk) as Weak<dyn SoundListener>);

        let recorders: Vec<Rc<Recorder>> = (0..200).map(|_| Rc::new(Recorder::default())).collect();
        let ids: Vec<ListenerId> = recorders.iter().map(|r| subscribe(&bus, r)).collect();
        *bulk.victims.borrow_mut() = ids.iter().copied().step_by(2).collect();

        bus.emit(Vec3::ZERO, 3.0);

        for (index, recorder) in recorders.iter().enumerate() {
            let expected = if index % 2 == 0 { 0 } else { 1 };
            assert_eq!(recorder.heard.borrow().len(), expected, "recorder {}", index);
        }
        assert_eq!(bus.listener_count(), 101);
        assert!(!bus.unsubscribe(ids[0]));
        assert!(bus.unsubscribe(ids[1]));
    }

    /// Подписывает нового listener во время dispatch
    struct Spawner {
        bus: Rc<SoundEventBus>,
        spawned: RefCell<Option<Rc<Recorder>>>,
    }

    impl SoundListener for Spawner {
        fn on_sound(&self, _event: &SoundEvent) {
            if self.spawned.borrow().is_some() {
                return;
            }
            let recorder = Rc::new(Recorder::default());
            self.bus.subscribe(Rc::downgrade(&recorder) as Weak<dyn SoundListener>);
            *self.spawned.borrow_mut() = Some(recorder);
        }
    }

    #[test]
    fn test_subscribe_during_dispatch_misses_in_flight_event() {
        let bus = Rc::new(SoundEventBus::new());
        let spawner = Rc::new(Spawner {
            bus: bus.clone(),
            spawned: RefCell::new(None),
        });
        bus.subscribe(Rc::downgrade(&spawner) as Weak<dyn SoundListener>);

        bus.emit(Vec3::ZERO, 3.0);
        let spawned = spawner.spawned.borrow().clone().unwrap();
        assert!(spawned.heard.borrow().is_empty());

        bus.emit(Vec3::ONE, 3.0);
        assert_eq!(spawned.heard.borrow().len(), 1);
    }

    /// Эмитит вложенный звук из callback'а
    struct Echo {
        bus: Rc<SoundEventBus>,
        echoed: Cell<bool>,
    }

    impl SoundListener for Echo {
        fn on_sound(&self, event: &SoundEvent) {
            if !self.echoed.replace(true) {
                self.bus.emit(event.position, event.radius * 0.5);
            }
        }
    }

    #[test]
    fn test_nested_emit_is_delivered() {
        let bus = Rc::new(SoundEventBus::new());
        let echo = Rc::new(Echo {
            bus: bus.clone(),
            echoed: Cell::new(false),
        });
        let recorder = Rc::new(Recorder::default());
        bus.subscribe(Rc::downgrade(&echo) as Weak<dyn SoundListener>);
        subscribe(&bus, &recorder);

        bus.emit(Vec3::ZERO, 10.0);

        let radii: Vec<f32> = recorder.heard.borrow().iter().map(|e| e.radius).collect();
        assert_eq!(radii.len(), 2);
        assert!(radii.contains(&10.0));
        assert!(radii.contains(&5.0));
    }
}
