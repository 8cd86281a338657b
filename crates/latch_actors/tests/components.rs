use latch_actors::actors::{ActorManager, ComponentRemoved, ComponentSet, COMPONENT_PAGE_SIZE};
use latch_actors::define_component;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
struct Flags {
    b: bool,
    i: i32,
}

impl Default for Flags {
    fn default() -> Self {
        Self { b: false, i: -1 }
    }
}

#[derive(Debug, Default)]
struct Shared {
    value: Option<Rc<i32>>,
}

define_component!(Flags, Shared);

#[test]
fn components_keep_the_value_they_were_added_with() {
    let mut manager = ActorManager::new();
    let full = manager.create_actor();
    let partial = manager.create_actor();
    let empty = manager.create_actor();
    manager.add_component(full, Flags { b: true, i: 10 });
    manager.add_component(partial, Flags { b: true, ..Flags::default() });
    manager.add_component(empty, Flags::default());

    assert_eq!(manager.get_component::<Flags>(full), &Flags { b: true, i: 10 });
    assert_eq!(manager.get_component::<Flags>(partial), &Flags { b: true, i: -1 });
    assert_eq!(manager.get_component::<Flags>(empty), &Flags { b: false, i: -1 });
    assert!(manager.has_component::<Flags>(full));
}

#[test]
fn removal_clears_presence_and_mask() {
    let mut manager = ActorManager::new();
    let actor = manager.create_actor();
    manager.add_component(actor, Flags::default());
    assert_eq!(manager.get_component_mask(actor), Flags::mask());

    manager.remove_component::<Flags>(actor);
    assert!(!manager.has_component::<Flags>(actor));
    assert!(manager.get_component_mask(actor).is_empty());
}

#[test]
fn same_type_on_different_actors_is_independent() {
    let mut manager = ActorManager::new();
    let first = manager.create_actor();
    let second = manager.create_actor();
    manager.add_component(first, Flags::default());
    manager.add_component(second, Flags::default());

    assert!(!std::ptr::eq(
        manager.get_component::<Flags>(first),
        manager.get_component::<Flags>(second)
    ));
    manager.get_component_mut::<Flags>(first).b = true;
    assert!(manager.get_component::<Flags>(first).b);
    assert!(!manager.get_component::<Flags>(second).b);
}

#[test]
fn removed_components_are_dropped() {
    let mut manager = ActorManager::new();
    let actor = manager.create_actor();
    manager.add_component(actor, Shared::default());
    let pointer = Rc::new(10);
    manager.get_component_mut::<Shared>(actor).value = Some(pointer.clone());
    assert_eq!(Rc::strong_count(&pointer), 2);

    manager.remove_component::<Shared>(actor);
    assert_eq!(Rc::strong_count(&pointer), 1);
}

#[test]
fn removal_does_not_move_other_components() {
    let mut manager = ActorManager::new();
    let first = manager.create_actor();
    let second = manager.create_actor();
    manager.add_component(first, Flags::default());
    manager.add_component(second, Flags::default());

    let before: *const Flags = manager.get_component::<Flags>(second);
    manager.remove_component::<Flags>(first);
    assert!(std::ptr::eq(before, manager.get_component::<Flags>(second)));
}

#[test]
fn addresses_survive_page_growth_and_churn() {
    let mut manager = ActorManager::new();
    let anchor = manager.create_actor();
    manager.add_component(anchor, Flags { b: true, i: 0 });
    let before: *const Flags = manager.get_component::<Flags>(anchor);

    let mut others = Vec::new();
    for i in 0..(COMPONENT_PAGE_SIZE * 2) as i32 {
        let actor = manager.create_actor();
        manager.add_component(actor, Flags { b: false, i });
        others.push(actor);
    }
    for actor in others.iter().step_by(3) {
        manager.destroy_actor(*actor);
    }

    assert!(std::ptr::eq(before, manager.get_component::<Flags>(anchor)));
    assert_eq!(manager.get_component::<Flags>(anchor), &Flags { b: true, i: 0 });
}

#[test]
fn listeners_see_the_final_value_before_reset() {
    let mut manager = ActorManager::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    manager.on_component_removed(move |event: &ComponentRemoved<Flags>, flags: &Flags| {
        sink.borrow_mut().push(format!("{} i={}", event.actor, flags.i));
    });

    let removed = manager.create_actor();
    let destroyed = manager.create_actor();
    let untouched = manager.create_actor();
    manager.add_component(removed, Flags { b: true, i: 1 });
    manager.add_component(destroyed, Flags { b: true, i: 2 });
    manager.add_component(untouched, Flags { b: true, i: 3 });

    manager.remove_component::<Flags>(removed);
    manager.destroy_actor(destroyed);

    assert_eq!(
        *log.borrow(),
        vec![format!("{removed} i=1"), format!("{destroyed} i=2")]
    );
}

#[test]
fn destroy_all_notifies_every_component() {
    let mut manager = ActorManager::new();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    manager.on_component_removed(move |_: &ComponentRemoved<Shared>, _: &Shared| {
        *sink.borrow_mut() += 1;
    });
    for _ in 0..4 {
        let actor = manager.create_actor();
        manager.add_component(actor, Shared::default());
    }
    manager.create_actor();

    manager.destroy_all_actors();
    assert_eq!(*count.borrow(), 4);
}

#[test]
fn removal_event_names_its_component() {
    assert!(ComponentRemoved::<Flags>::name().starts_with("evt_component_removed_"));
    assert_ne!(
        ComponentRemoved::<Flags>::name(),
        ComponentRemoved::<Shared>::name()
    );
}
