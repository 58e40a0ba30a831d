use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strataview_core::pubsub::{PublishSubscribe, SnapshotExt, SnapshotSource, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ThermometerTopic {
    Reading,
    Label,
}

struct Reading;
impl Topic for Reading {
    type Key = ThermometerTopic;
    type Payload = i32;
    const KEY: ThermometerTopic = ThermometerTopic::Reading;
}

struct Label;
impl Topic for Label {
    type Key = ThermometerTopic;
    type Payload = String;
    const KEY: ThermometerTopic = ThermometerTopic::Label;
}

#[derive(Default)]
struct Thermometer {
    reading: Cell<i32>,
    label: RefCell<String>,
    publisher: PublishSubscribe<ThermometerTopic>,
}

impl Thermometer {
    fn set_reading(&self, value: i32) {
        self.reading.set(value);
        self.publisher.notify(ThermometerTopic::Reading);
    }
}

impl SnapshotSource<Reading> for Thermometer {
    fn snapshot(&self) -> i32 {
        self.reading.get()
    }
}

impl SnapshotSource<Label> for Thermometer {
    fn snapshot(&self) -> String {
        self.label.borrow().clone()
    }
}

#[test]
fn test_typed_snapshot_per_topic() {
    let thermometer = Thermometer::default();
    *thermometer.label.borrow_mut() = "Outside".to_string();
    thermometer.set_reading(21);

    assert_eq!(thermometer.get_snapshot::<Reading>(), 21);
    assert_eq!(thermometer.get_snapshot::<Label>(), "Outside");
}

#[test]
fn test_snapshot_read_from_listener() {
    let thermometer = Rc::new(Thermometer::default());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let weak = Rc::downgrade(&thermometer);
    let log = seen.clone();
    let _sub = thermometer.publisher.subscribe_to::<Reading, _>(move || {
        if let Some(t) = weak.upgrade() {
            log.borrow_mut().push((*t).get_snapshot::<Reading>());
        }
    });

    thermometer.set_reading(3);
    thermometer.set_reading(5);
    assert_eq!(*seen.borrow(), vec![3, 5]);
}

#[test]
fn test_snapshot_has_no_side_effects() {
    let thermometer = Thermometer::default();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let _sub = thermometer
        .publisher
        .subscribe(ThermometerTopic::Reading, move || c.set(c.get() + 1));

    let _ = thermometer.get_snapshot::<Reading>();
    let _ = thermometer.get_snapshot::<Reading>();
    assert_eq!(calls.get(), 0);
}
