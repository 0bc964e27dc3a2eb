//! RawPacket - generator output, demodulator input
//!
//! Four-phase quadrature capture plus its little-endian wire form.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::{Channel, ContractError};

/// Wire header: frame_counter, width, height (u32 LE each)
pub const RAW_PACKET_HEADER_LEN: usize = 12;

/// Four-phase raw ToF packet
///
/// All four channels hold `width * height` samples in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPacket {
    pub frame_counter: u32,
    pub width: u32,
    pub height: u32,
    pub i0: Vec<u16>,
    pub i90: Vec<u16>,
    pub i180: Vec<u16>,
    pub i270: Vec<u16>,
}

impl RawPacket {
    /// Create a zero-filled packet of the given resolution
    pub fn new(frame_counter: u32, width: u32, height: u32) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            frame_counter,
            width,
            height,
            i0: vec![0; pixels],
            i90: vec![0; pixels],
            i180: vec![0; pixels],
            i270: vec![0; pixels],
        }
    }

    /// Number of pixels declared by the header
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Samples of one channel
    pub fn channel(&self, channel: Channel) -> &[u16] {
        match channel {
            Channel::I0 => &self.i0,
            Channel::I90 => &self.i90,
            Channel::I180 => &self.i180,
            Channel::I270 => &self.i270,
        }
    }

    /// The four samples of pixel `idx`, in capture order
    ///
    /// # Panics
    /// If `idx` is out of range for any channel.
    pub fn pixel(&self, idx: usize) -> [u16; 4] {
        [self.i0[idx], self.i90[idx], self.i180[idx], self.i270[idx]]
    }

    /// Check the shape invariant
    ///
    /// # Errors
    /// `ShapeMismatch` naming the first channel whose length differs from
    /// `width * height`.
    pub fn validate(&self) -> Result<(), ContractError> {
        let expected = self.pixel_count();
        for channel in Channel::ALL {
            let actual = self.channel(channel).len();
            if actual != expected {
                return Err(ContractError::shape_mismatch(channel, expected, actual));
            }
        }
        Ok(())
    }

    /// Size of the wire form in bytes
    pub fn encoded_len(&self) -> usize {
        let samples: usize = Channel::ALL.iter().map(|c| self.channel(*c).len()).sum();
        RAW_PACKET_HEADER_LEN + samples * 2
    }

    /// Serialize to the wire form
    ///
    /// Channels are written as-is; call [`RawPacket::validate`] first if the
    /// packet did not come from a trusted producer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_u32_le(self.frame_counter);
        buf.put_u32_le(self.width);
        buf.put_u32_le(self.height);
        for channel in Channel::ALL {
            for &sample in self.channel(channel) {
                buf.put_u16_le(sample);
            }
        }
        buf.freeze()
    }

    /// Parse the wire form
    ///
    /// # Errors
    /// `PacketDecode` if the header is truncated or the payload length does
    /// not match `4 * width * height` samples exactly.
    pub fn decode(mut buf: &[u8]) -> Result<Self, ContractError> {
        if buf.remaining() < RAW_PACKET_HEADER_LEN {
            return Err(ContractError::packet_decode(format!(
                "header needs {RAW_PACKET_HEADER_LEN} bytes, got {}",
                buf.remaining()
            )));
        }

        let frame_counter = buf.get_u32_le();
        let width = buf.get_u32_le();
        let height = buf.get_u32_le();

        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| ContractError::packet_decode("width * height overflows"))?;
        let payload_len = pixels
            .checked_mul(Channel::ALL.len() * 2)
            .ok_or_else(|| ContractError::packet_decode("payload length overflows"))?;

        if buf.remaining() != payload_len {
            return Err(ContractError::packet_decode(format!(
                "{width}x{height} packet needs {payload_len} payload bytes, got {}",
                buf.remaining()
            )));
        }

        let read_channel = |buf: &mut &[u8]| -> Vec<u16> {
            (0..pixels).map(|_| buf.get_u16_le()).collect()
        };
        let i0 = read_channel(&mut buf);
        let i90 = read_channel(&mut buf);
        let i180 = read_channel(&mut buf);
        let i270 = read_channel(&mut buf);

        Ok(Self {
            frame_counter,
            width,
            height,
            i0,
            i90,
            i180,
            i270,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_packet() -> RawPacket {
        let mut packet = RawPacket::new(7, 2, 2);
        packet.i0 = vec![1, 2, 3, 4];
        packet.i90 = vec![10, 20, 30, 40];
        packet.i180 = vec![100, 200, 300, 400];
        packet.i270 = vec![1000, 2000, 3000, 65535];
        packet
    }

    #[test]
    fn test_new_packet_is_well_formed() {
        let packet = RawPacket::new(0, 4, 3);
        assert_eq!(packet.pixel_count(), 12);
        assert!(packet.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_bad_channel() {
        let mut packet = sample_packet();
        packet.i180.pop();
        match packet.validate() {
            Err(ContractError::ShapeMismatch {
                channel,
                expected,
                actual,
            }) => {
                assert_eq!(channel, Channel::I180);
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_wire_layout_is_little_endian() {
        let bytes = sample_packet().encode();
        assert_eq!(bytes.len(), RAW_PACKET_HEADER_LEN + 4 * 4 * 2);
        assert_eq!(&bytes[0..4], &7u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2u32.to_le_bytes());
        assert_eq!(&bytes[12..14], &1u16.to_le_bytes());
        // last sample of I270
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFFu8, 0xFF]);
    }

    #[test]
    fn test_decode_restores_packet() {
        let packet = sample_packet();
        let decoded = RawPacket::decode(&packet.encode()).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.pixel(3), [4, 40, 400, 65535]);
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let bytes = sample_packet().encode();
        let err = RawPacket::decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, ContractError::PacketDecode { .. }));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = sample_packet().encode().to_vec();
        bytes.push(0);
        assert!(RawPacket::decode(&bytes).is_err());
    }

    #[test]
    fn test_decode_rejects_short_header() {
        let err = RawPacket::decode(&[0u8; 5]).unwrap_err();
        assert!(err.to_string().contains("header"));
    }
}
