//! SoundEventBus: синхронный broadcast `(position, radius)` всем подписчикам.
//!
//! Архитектура:
//! - Явный объект (не глобальный static), передаётся агентам при создании
//! - Подписчики хранятся как `Weak`: уничтоженный агент никогда не получит событие
//! - `emit` делает snapshot списка перед dispatch → subscribe/unsubscribe
//!   внутри callback безопасны
//! - Single-threaded (`Rc`/`RefCell`), как и весь per-frame tick

use bevy::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Stable id подписки (выдаётся при subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Звуковое событие. Живёт только в течение одного `emit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEvent {
    pub position: Vec3,
    /// Радиус слышимости (caller отвечает за radius >= 0)
    pub radius: f32,
    /// Кто издал звук (если это подписчик): ему событие не доставляется
    pub source: Option<ListenerId>,
}

impl SoundEvent {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            source: None,
        }
    }
}

/// Подписчик шины.
///
/// `&self`: listener сам решает, как получить mutable доступ к своему состоянию
/// (например `RefCell`), и что делать если он уже занят.
pub trait SoundListener {
    fn on_sound(&self, event: &SoundEvent);
}

#[derive(Clone)]
struct Subscription {
    id: ListenerId,
    listener: Weak<dyn SoundListener>,
    /// Общий с snapshot'ами: unsubscribe гасит его посреди dispatch
    active: Rc<Cell<bool>>,
}

#[derive(Default)]
pub struct SoundEventBus {
    subscribers: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

impl SoundEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Weak<dyn SoundListener>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push(Subscription {
            id,
            listener,
            active: Rc::new(Cell::new(true)),
        });
        id
    }

    /// Returns false если такой подписки уже нет.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let Some(index) = subscribers.iter().position(|s| s.id == id) else {
            return false;
        };
        let removed = subscribers.remove(index);
        removed.active.set(false);
        true
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.subscribers.borrow().iter().any(|s| s.id == id)
    }

    pub fn listener_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Звук без источника-подписчика (игрок, мир).
    pub fn emit(&self, position: Vec3, radius: f32) {
        self.emit_event(SoundEvent::new(position, radius));
    }

    /// Звук от подписчика: самому `source` событие не доставляется.
    pub fn emit_from(&self, source: ListenerId, position: Vec3, radius: f32) {
        self.emit_event(SoundEvent {
            position,
            radius,
            source: Some(source),
        });
    }

    pub fn emit_event(&self, event: SoundEvent) {
        // Snapshot: borrow не держим во время callback'ов
        let snapshot: Vec<Subscription> = self.subscribers.borrow().clone();

        for subscription in snapshot {
            if event.source == Some(subscription.id) {
                continue;
            }

            // Отписался во время этого же dispatch → больше не уведомляем
            if !subscription.active.get() {
                continue;
            }

            let Some(listener) = subscription.listener.upgrade() else {
                continue;
            };

            listener.on_sound(&event);
        }

        self.prune_dropped();
    }

    /// Удаляем подписки, чей listener уже уничтожен (забыли unsubscribe).
    fn prune_dropped(&self) {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.listener.strong_count() > 0);

        let pruned = before - subscribers.len();
        if pruned > 0 {
            crate::log_warning(&format!(
                "SoundEventBus: pruned {} subscription(s) whose listener was dropped without unsubscribe",
                pruned
            ));
        }
    }
}
