//! 报文缓冲区视图
//!
//! 每次按偏移读取之前都要和缓冲区末尾比较，校验器只接受这种写法。

use core::mem;

use network_types::{eth::EthHdr, ip::Ipv4Hdr};

/// IPv4 的以太类型 (主机字节序)
pub const ETH_P_IP: u16 = 0x0800;

/// 以太网头部中以太类型字段的偏移
pub const ETH_TYPE_OFFSET: usize = 12;

/// IPv4 头部中目的地址字段的偏移
pub const IPV4_DST_OFFSET: usize = 16;

/// `[data, data_end)` 区间上的报文数据
pub trait PacketBuf {
    fn data(&self) -> usize;

    fn data_end(&self) -> usize;

    /// 安全地获取指定偏移量的数据指针，越界返回 `None`
    #[inline(always)]
    fn ptr_at<T>(&self, offset: usize) -> Option<*const T> {
        let start = self.data();
        let end = self.data_end();
        let len = mem::size_of::<T>();

        if start + offset + len > end {
            return None;
        }
        Some((start + offset) as *const T)
    }

    /// 在偏移处按非对齐方式读取一个值
    #[inline(always)]
    fn load<T: Copy>(&self, offset: usize) -> Option<T> {
        let ptr = self.ptr_at::<T>(offset)?;
        Some(unsafe { ptr.read_unaligned() })
    }
}

impl PacketBuf for [u8] {
    #[inline(always)]
    fn data(&self) -> usize {
        self.as_ptr() as usize
    }

    #[inline(always)]
    fn data_end(&self) -> usize {
        self.as_ptr() as usize + self.len()
    }
}

/// 解析出站报文的 IPv4 目的地址 (主机字节序)
///
/// 报文过短、不是 IPv4 或目的地址为 0 时返回 `None`。
#[inline(always)]
pub fn egress_destination<P: PacketBuf + ?Sized>(pkt: &P) -> Option<u32> {
    // 以太网头部必须完整
    pkt.ptr_at::<EthHdr>(0)?;
    let ether_type: u16 = pkt.load(ETH_TYPE_OFFSET)?;
    if u16::from_be(ether_type) != ETH_P_IP {
        return None;
    }

    pkt.ptr_at::<Ipv4Hdr>(EthHdr::LEN)?;
    let daddr: u32 = pkt.load(EthHdr::LEN + IPV4_DST_OFFSET)?;
    let dst = u32::from_be(daddr);

    if dst == 0 {
        return None;
    }
    Some(dst)
}
