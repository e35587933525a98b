use tracing::trace;

/// Values a channel reports out-of-band and status reports refer back to.
///
/// Each field stays `None` until the matching report is seen, then holds the
/// most recent value. Only the decoder writes a latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelLatch {
    product_id: Option<u32>,
    checksum: Option<u16>,
    max_index: Option<u16>,
}

impl ChannelLatch {
    pub fn product_id(&self) -> Option<u32> {
        self.product_id
    }

    pub fn checksum(&self) -> Option<u16> {
        self.checksum
    }

    pub fn max_index(&self) -> Option<u16> {
        self.max_index
    }

    /// True until the first product-id or checksum report.
    pub fn is_empty(&self) -> bool {
        self.product_id.is_none() && self.checksum.is_none() && self.max_index.is_none()
    }

    pub(crate) fn record_product_id(&mut self, product_id: u32) {
        trace!(product_id = format_args!("{product_id:08X}"), "latched product id");
        self.product_id = Some(product_id);
    }

    pub(crate) fn record_checksum_index(&mut self, checksum: u16, max_index: u16) {
        trace!(
            checksum = format_args!("{checksum:04X}"),
            max_index,
            "latched checksum and max index"
        );
        self.checksum = Some(checksum);
        self.max_index = Some(max_index);
    }
}
