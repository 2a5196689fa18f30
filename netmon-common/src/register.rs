//! 寄存器句柄与两个探针的逻辑
//!
//! 寄存器由加载器在加载时分配，探针只查找并更新已有条目。

use core::sync::atomic::{AtomicU64, Ordering};

use crate::{packet::{egress_destination, PacketBuf}, REGISTER_KEY};

/// 包计数寄存器
pub trait CounterRegister {
    /// 查找 key 对应的计数槽，条目不存在时返回 `None`
    fn slot(&self, key: u32) -> Option<&AtomicU64>;
}

/// 最近出站目的地址寄存器
///
/// 写入是普通的覆盖写，多核并发时最后落地的一次生效。
pub trait AddressRegister {
    fn set(&self, key: u32, addr: u32);
}

/// 计数探针：计数加 1
///
/// 多个 CPU 同时处理报文，必须用原子加而不是读后写。
/// 条目缺失时静默跳过。
#[inline(always)]
pub fn count_packet<R: CounterRegister + ?Sized>(reg: &R) {
    if let Some(count) = reg.slot(REGISTER_KEY) {
        count.fetch_add(1, Ordering::Relaxed);
    }
}

/// 出站检查探针：记录非零的 IPv4 目的地址
///
/// 返回写入的地址；未写入时返回 `None`。
#[inline(always)]
pub fn record_egress<P, R>(pkt: &P, reg: &R) -> Option<u32>
where
    P: PacketBuf + ?Sized,
    R: AddressRegister + ?Sized,
{
    let dst = egress_destination(pkt)?;
    reg.set(REGISTER_KEY, dst);
    Some(dst)
}
