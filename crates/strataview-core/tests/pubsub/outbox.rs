use std::cell::RefCell;
use std::rc::Rc;
use strataview_core::pubsub::{Outbox, PublishSubscribe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Topic {
    First,
    Second,
}

#[test]
fn test_outbox_delivers_in_post_order() {
    let publisher = PublishSubscribe::<Topic>::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = log.clone();
    let _a = publisher.subscribe(Topic::First, move || l.borrow_mut().push("first"));
    let l = log.clone();
    let _b = publisher.subscribe(Topic::Second, move || l.borrow_mut().push("second"));

    let mut outbox = Outbox::new();
    outbox.post(&publisher, Topic::Second);
    outbox.post(&publisher, Topic::First);
    assert_eq!(outbox.len(), 2);
    assert!(log.borrow().is_empty());

    outbox.flush();
    assert_eq!(*log.borrow(), vec!["second", "first"]);
}

#[test]
fn test_outbox_lets_listeners_borrow_state() {
    let state = Rc::new(RefCell::new(0));
    let publisher = PublishSubscribe::<Topic>::new();
    let observed = Rc::new(RefCell::new(None));

    let s = state.clone();
    let o = observed.clone();
    let _sub = publisher.subscribe(Topic::First, move || {
        *o.borrow_mut() = Some(*s.borrow());
    });

    let mut outbox = Outbox::new();
    {
        let mut guard = state.borrow_mut();
        *guard = 7;
        outbox.post(&publisher, Topic::First);
    }
    outbox.flush();

    assert_eq!(*observed.borrow(), Some(7));
}

#[test]
fn test_outbox_append() {
    let publisher = PublishSubscribe::<Topic>::new();
    let mut a = Outbox::new();
    let mut b = Outbox::new();
    b.post(&publisher, Topic::First);
    a.append(&mut b);
    assert_eq!(a.len(), 1);
    assert!(b.is_empty());
}
