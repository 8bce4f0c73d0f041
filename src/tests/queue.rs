use crate::queue::{BlockingQueue, QueueFull};
use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

const ANY_ELEMENT: &str = "irrelevant";
const LARGE_CAPACITY: usize = 99999;
const FIRST_ELEMENT: &str = "first";
const SECOND_ELEMENT: &str = "second";

#[test]
fn fails_to_add_when_queue_is_full() {
    let queue = BlockingQueue::new(0);

    assert_eq!(
        queue.add(ANY_ELEMENT),
        Err(QueueFull {
            capacity: 0,
            element: ANY_ELEMENT
        })
    );
}

#[test]
fn adding_to_a_full_queue_leaves_it_untouched() {
    let queue = BlockingQueue::new(2);
    queue.add(FIRST_ELEMENT).expect("room for first");
    queue.add(SECOND_ELEMENT).expect("room for second");

    let rejected = queue.add(ANY_ELEMENT).expect_err("queue is full");

    assert_eq!(rejected.into_inner(), ANY_ELEMENT);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.remaining_capacity(), 0);
    assert_eq!(queue.poll(), Some(FIRST_ELEMENT));
    assert_eq!(queue.poll(), Some(SECOND_ELEMENT));
    assert_eq!(queue.poll(), None);
}

#[test]
fn adds_while_queue_is_not_full() {
    let queue = BlockingQueue::new(2);

    assert!(queue.add(ANY_ELEMENT).is_ok());
    assert!(queue.add(ANY_ELEMENT).is_ok());
}

#[test]
fn keeps_track_of_size_and_remaining_capacity() {
    let queue = BlockingQueue::new(LARGE_CAPACITY);
    assert!(queue.is_empty());

    queue.add(ANY_ELEMENT).expect("room");
    queue.add(ANY_ELEMENT).expect("room");

    assert_eq!(queue.len(), 2);
    assert_eq!(queue.remaining_capacity(), LARGE_CAPACITY - 2);
    assert_eq!(queue.len() + queue.remaining_capacity(), queue.capacity());
}

#[test]
fn clears_all_elements_but_not_capacity() {
    let queue = BlockingQueue::new(LARGE_CAPACITY);
    queue.add(ANY_ELEMENT).expect("room");
    queue.add(ANY_ELEMENT).expect("room");

    queue.clear();

    assert_eq!(queue.len(), 0);
    assert_eq!(queue.capacity(), LARGE_CAPACITY);
    assert_eq!(queue.remaining_capacity(), LARGE_CAPACITY);
}

#[test]
fn polls_in_fifo_order() {
    let queue = BlockingQueue::new(LARGE_CAPACITY);
    queue.add(FIRST_ELEMENT).expect("room");
    queue.add(SECOND_ELEMENT).expect("room");

    assert_eq!(queue.poll(), Some(FIRST_ELEMENT));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.poll(), Some(SECOND_ELEMENT));
}

#[test]
fn polling_an_empty_queue_returns_nothing() {
    let queue = BlockingQueue::<&str>::new(LARGE_CAPACITY);

    assert_eq!(queue.poll(), None);
    assert_eq!(queue.poll_timeout(Duration::ZERO), None);
}

#[test]
fn returns_an_available_element_without_waiting() {
    let queue = BlockingQueue::new(LARGE_CAPACITY);
    queue.add(FIRST_ELEMENT).expect("room");

    let start = Instant::now();
    assert_eq!(queue.poll_timeout(Duration::from_secs(20)), Some(FIRST_ELEMENT));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn waits_up_to_given_time_for_an_element_to_become_available() {
    let queue = Arc::new(BlockingQueue::new(LARGE_CAPACITY));

    let producer = thread::spawn({
        let queue = queue.clone();
        move || {
            thread::sleep(Duration::from_millis(100));
            queue.add(FIRST_ELEMENT).expect("room");
        }
    });

    assert_eq!(queue.poll_timeout(Duration::from_millis(2000)), Some(FIRST_ELEMENT));
    producer.join().expect("producer to finish");
}

#[test]
fn gives_up_when_nothing_arrives_in_time() {
    let queue = Arc::new(BlockingQueue::new(LARGE_CAPACITY));

    let producer = thread::spawn({
        let queue = queue.clone();
        move || {
            thread::sleep(Duration::from_millis(300));
            queue.add(FIRST_ELEMENT).expect("room");
        }
    });

    let start = Instant::now();
    assert_eq!(queue.poll_timeout(Duration::from_millis(100)), None);
    assert!(start.elapsed() >= Duration::from_millis(100));

    producer.join().expect("producer to finish");
    // a timed out poll doesn't get in the way of later adds
    assert_eq!(queue.poll(), Some(FIRST_ELEMENT));
}

#[test]
fn returns_as_soon_as_an_element_becomes_available() {
    let queue = Arc::new(BlockingQueue::new(LARGE_CAPACITY));

    let producer = thread::spawn({
        let queue = queue.clone();
        move || {
            thread::sleep(Duration::from_millis(100));
            queue.add(FIRST_ELEMENT).expect("room");
        }
    });

    let start = Instant::now();
    assert_eq!(queue.poll_timeout(Duration::from_secs(20)), Some(FIRST_ELEMENT));
    assert!(start.elapsed() < Duration::from_secs(5));
    producer.join().expect("producer to finish");
}

#[test]
fn keeps_fifo_order_across_threads() {
    let queue = Arc::new(BlockingQueue::new(LARGE_CAPACITY));

    let producer = thread::spawn({
        let queue = queue.clone();
        move || {
            for i in 0..1000 {
                queue.add(i).expect("room");
            }
        }
    });

    let received: Vec<_> = (0..1000)
        .map(|_| queue.poll_timeout(Duration::from_secs(5)))
        .collect();
    producer.join().expect("producer to finish");

    assert_eq!(received, (0..1000).map(Some).collect::<Vec<_>>());
}

#[test]
fn waiting_forever_is_not_an_overflow() {
    let queue = BlockingQueue::new(LARGE_CAPACITY);
    queue.add(FIRST_ELEMENT).expect("room");

    assert_eq!(queue.poll_timeout(Duration::MAX), Some(FIRST_ELEMENT));
}
