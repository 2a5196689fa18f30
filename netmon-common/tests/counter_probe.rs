//! 计数探针测试
//!
//! 用主机上的原子变量代替 BPF Array map。

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread,
};

use netmon_common::{
    register::{count_packet, CounterRegister},
    REGISTER_KEY,
};

/// 只有 key 0 一个条目的计数寄存器
#[derive(Default)]
struct Slot(AtomicU64);

impl CounterRegister for Slot {
    fn slot(&self, key: u32) -> Option<&AtomicU64> {
        (key == REGISTER_KEY).then_some(&self.0)
    }
}

/// 查找总是失败的寄存器，背后的计数槽永远不会交给探针
#[derive(Default)]
struct Missing(AtomicU64);

impl CounterRegister for Missing {
    fn slot(&self, _key: u32) -> Option<&AtomicU64> {
        None
    }
}

fn run(reg: &Slot, invocations: u64) -> u64 {
    for _ in 0..invocations {
        count_packet(reg);
    }
    reg.0.load(Ordering::Relaxed)
}

#[test]
fn zero_invocations_leave_fresh_register_at_zero() {
    let reg = Slot::default();
    assert_eq!(run(&reg, 0), 0);
}

#[test]
fn final_value_is_initial_plus_invocations() {
    for (initial, n) in [(0, 0), (0, 1), (7, 0), (7, 25), (u64::MAX - 3, 3)] {
        let reg = Slot(AtomicU64::new(initial));
        assert_eq!(run(&reg, n), initial + n);
    }
}

#[test]
fn each_invocation_adds_one() {
    let reg = Slot::default();
    for _ in 0..10 {
        count_packet(&reg);
    }
    assert_eq!(reg.0.load(Ordering::Relaxed), 10);
}

#[test]
fn counts_on_top_of_initial_value() {
    let reg = Slot(AtomicU64::new(41));
    count_packet(&reg);
    assert_eq!(reg.0.load(Ordering::Relaxed), 42);
}

#[test]
fn missing_entry_is_a_silent_noop() {
    let reg = Missing::default();
    for _ in 0..3 {
        count_packet(&reg);
    }
    assert_eq!(reg.0.load(Ordering::Relaxed), 0);
}

#[test]
fn concurrent_invocations_are_not_lost() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 10_000;

    let reg = Arc::new(Slot::default());
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    count_packet(reg.as_ref());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(reg.0.load(Ordering::Relaxed), THREADS * PER_THREAD);
}
