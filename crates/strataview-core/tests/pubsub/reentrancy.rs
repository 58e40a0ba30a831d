use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strataview_core::pubsub::{PublishSubscribe, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Topic {
    Changed,
    Other,
}

#[test]
fn test_notify_inside_listener_does_not_deadlock() {
    let publisher = PublishSubscribe::<Topic>::new();
    let depth = Rc::new(Cell::new(0));
    let calls = Rc::new(Cell::new(0));

    let inner = publisher.clone();
    let d = depth.clone();
    let c = calls.clone();
    let _sub = publisher.subscribe(Topic::Changed, move || {
        c.set(c.get() + 1);
        // Re-notify once from inside the listener
        if d.get() == 0 {
            d.set(1);
            inner.notify(Topic::Changed);
        }
    });

    publisher.notify(Topic::Changed);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_listener_added_during_notify_waits_for_next_pass() {
    let publisher = PublishSubscribe::<Topic>::new();
    let late_calls = Rc::new(Cell::new(0));
    let held: Rc<RefCell<Vec<Subscription<Topic>>>> = Rc::new(RefCell::new(Vec::new()));

    let inner = publisher.clone();
    let late = late_calls.clone();
    let store = held.clone();
    let _sub = publisher.subscribe(Topic::Changed, move || {
        if store.borrow().is_empty() {
            let late = late.clone();
            let sub = inner.subscribe(Topic::Changed, move || late.set(late.get() + 1));
            store.borrow_mut().push(sub);
        }
    });

    publisher.notify(Topic::Changed);
    assert_eq!(late_calls.get(), 0);
    assert_eq!(publisher.subscriber_count(Topic::Changed), 2);

    publisher.notify(Topic::Changed);
    assert_eq!(late_calls.get(), 1);
}

#[test]
fn test_listener_removed_during_notify_still_runs_this_pass() {
    let publisher = PublishSubscribe::<Topic>::new();
    let second_calls = Rc::new(Cell::new(0));
    let second: Rc<RefCell<Option<Subscription<Topic>>>> = Rc::new(RefCell::new(None));

    let handle = second.clone();
    let _first = publisher.subscribe(Topic::Changed, move || {
        if let Some(sub) = handle.borrow().as_ref() {
            sub.unsubscribe();
        }
    });
    let c = second_calls.clone();
    *second.borrow_mut() = Some(publisher.subscribe(Topic::Changed, move || c.set(c.get() + 1)));

    publisher.notify(Topic::Changed);
    assert_eq!(second_calls.get(), 1);
    assert_eq!(publisher.subscriber_count(Topic::Changed), 1);

    publisher.notify(Topic::Changed);
    assert_eq!(second_calls.get(), 1);
}

#[test]
fn test_self_unsubscribe_during_notify() {
    let publisher = PublishSubscribe::<Topic>::new();
    let slot: Rc<RefCell<Option<Subscription<Topic>>>> = Rc::new(RefCell::new(None));
    let calls = Rc::new(Cell::new(0));

    let handle = slot.clone();
    let c = calls.clone();
    let sub = publisher.subscribe(Topic::Other, move || {
        c.set(c.get() + 1);
        if let Some(sub) = handle.borrow().as_ref() {
            sub.unsubscribe();
        }
    });
    *slot.borrow_mut() = Some(sub);

    publisher.notify(Topic::Other);
    publisher.notify(Topic::Other);
    assert_eq!(calls.get(), 1);
    assert_eq!(publisher.subscriber_count(Topic::Other), 0);
}

proptest! {
    #[test]
    fn prop_subscriber_count_matches_live_subscriptions(ops in prop::collection::vec(any::<bool>(), 0..40)) {
        let publisher = PublishSubscribe::<Topic>::new();
        let mut live: Vec<Subscription<Topic>> = Vec::new();

        for subscribe in ops {
            if subscribe || live.is_empty() {
                live.push(publisher.subscribe(Topic::Changed, || {}));
            } else {
                let sub = live.remove(0);
                prop_assert!(sub.unsubscribe());
            }
        }

        prop_assert_eq!(publisher.subscriber_count(Topic::Changed), live.len());
    }
}
