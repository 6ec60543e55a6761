mod common;
use common::*;
use statecheck::{config::Config, quickcheck};

/// A ring-buffer queue whose `size` uses the exact "unsigned-style modulus"
/// bug spec.md §8 scenario S3 describes: `(tail - head) % capacity` reports
/// `0`, not `capacity`, once the buffer is completely full.
struct BuggyQueue {
    capacity: usize,
    buffer: Vec<i64>,
    head: usize,
    tail: usize,
}

impl BuggyQueue {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: vec![0; capacity],
            head: 0,
            tail: 0,
        }
    }

    fn put(&mut self, value: i64) {
        self.buffer[self.tail % self.capacity] = value;
        self.tail += 1;
    }

    fn get(&mut self) -> i64 {
        let value = self.buffer[self.head % self.capacity];
        self.head += 1;
        value
    }

    fn size(&self) -> usize {
        (self.tail - self.head) % self.capacity
    }
}

/// S3 of spec.md §8: a mirror-list oracle catches the buggy `size`
/// computation above; the minimal counter-example is a queue driven to
/// exactly its capacity with no intervening `get`.
#[test]
fn catches_a_ring_buffer_that_miscounts_a_full_queue() {
    let config = Config {
        number_of_runs: 500,
        seed: Some(42),
        ..Config::default()
    };
    let outcome = quickcheck::run(&config, |test: &mut Test| -> bool {
        let capacity = test.pick(&Int::new(1, 10)) as usize;
        let mut queue = BuggyQueue::new(capacity);
        let mut mirror: Vec<i64> = Vec::new();
        let mut ok = true;
        while test.has_more() {
            let put = test.pick(&bool_generator());
            if put {
                let value = test.pick(&Int::new(0, 100));
                if mirror.len() < capacity {
                    queue.put(value);
                    mirror.push(value);
                }
            } else if !mirror.is_empty() {
                mirror.remove(0);
                queue.get();
            }
            if queue.size() != mirror.len() {
                ok = false;
            }
        }
        test.logf(format!("capacity={capacity} mirror_len={}", mirror.len()));
        ok
    });
    assert!(!outcome.passed);
    let last_line = outcome.log.lines().last().unwrap();
    let mut capacity = None;
    let mut mirror_len = None;
    for word in last_line.split_whitespace() {
        if let Some(value) = word.strip_prefix("capacity=") {
            capacity = value.parse::<usize>().ok();
        }
        if let Some(value) = word.strip_prefix("mirror_len=") {
            mirror_len = value.parse::<usize>().ok();
        }
    }
    let (capacity, mirror_len) = (capacity.unwrap(), mirror_len.unwrap());
    assert!(
        mirror_len >= capacity,
        "the witness must drive the queue to at least its own capacity, got capacity={capacity} mirror_len={mirror_len}"
    );
}
