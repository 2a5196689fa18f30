#![no_std]
#![no_main]

use core::sync::atomic::AtomicU64;

use aya_ebpf::{
    bindings::{xdp_action, TC_ACT_OK},
    macros::{classifier, map, xdp},
    maps::Array,
    programs::{TcContext, XdpContext},
};
use aya_log_ebpf::debug;
use netmon_common::{
    packet::PacketBuf,
    register::{count_packet, record_egress, AddressRegister, CounterRegister},
};

/// 包计数寄存器，只有 key 0 一个条目
#[map]
static PKT_COUNT: Array<u64> = Array::with_max_entries(1, 0);

/// 最近一次出站 IPv4 目的地址 (主机字节序)
#[map]
static OUTGOING_ADDR: Array<u32> = Array::with_max_entries(1, 0);

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 13] = *b"Dual MIT/GPL\0";

struct PktCount;

impl CounterRegister for PktCount {
    #[inline(always)]
    fn slot(&self, key: u32) -> Option<&AtomicU64> {
        let ptr = PKT_COUNT.get_ptr_mut(key)?;
        // Array 的值按 8 字节对齐
        Some(unsafe { AtomicU64::from_ptr(ptr) })
    }
}

struct OutgoingAddr;

impl AddressRegister for OutgoingAddr {
    #[inline(always)]
    fn set(&self, key: u32, addr: u32) {
        // Array 条目在加载时已分配，直接覆盖写即等同于 BPF_ANY 更新
        if let Some(slot) = OUTGOING_ADDR.get_ptr_mut(key) {
            unsafe { core::ptr::write_volatile(slot, addr) };
        }
    }
}

/// TC 上下文中的报文数据
struct Skb<'a>(&'a TcContext);

impl PacketBuf for Skb<'_> {
    #[inline(always)]
    fn data(&self) -> usize {
        self.0.data()
    }

    #[inline(always)]
    fn data_end(&self) -> usize {
        self.0.data_end()
    }
}

/// XDP 程序入口点，统计经过网卡入口的每一个包
#[xdp]
pub fn count_packets(_ctx: XdpContext) -> u32 {
    count_packet(&PktCount);
    xdp_action::XDP_PASS
}

/// TC egress 程序入口点
#[classifier]
pub fn monitor_egress(ctx: TcContext) -> i32 {
    match try_monitor_egress(&ctx) {
        Ok(action) => action,
        Err(_) => TC_ACT_OK,
    }
}

fn try_monitor_egress(ctx: &TcContext) -> Result<i32, ()> {
    if let Some(dst) = record_egress(&Skb(ctx), &OutgoingAddr) {
        debug!(ctx, "egress dst {:i}", dst);
    }

    Ok(TC_ACT_OK)
}

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    unsafe { core::hint::unreachable_unchecked() }
}
