#![cfg_attr(not(test), no_std)]

//! 内核探针与用户态读取端共享的定义
//!
//! - 两个单条目寄存器 (BPF Array map) 的名称与固定 key
//! - 对报文缓冲区做边界检查的只读视图
//! - 两个探针的核心逻辑，内核与主机测试共用同一份代码

pub mod packet;
pub mod register;

/// 包计数寄存器 (`Array<u64>`, 1 个条目)
pub const PKT_COUNT_MAP: &str = "PKT_COUNT";

/// 最近出站目的地址寄存器 (`Array<u32>`, 1 个条目)
pub const OUTGOING_ADDR_MAP: &str = "OUTGOING_ADDR";

/// 两个寄存器唯一的 key
pub const REGISTER_KEY: u32 = 0;

/// XDP 计数探针的程序名
pub const COUNTER_PROBE: &str = "count_packets";

/// TC 出站检查探针的程序名
pub const EGRESS_PROBE: &str = "monitor_egress";
