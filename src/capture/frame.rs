use crate::config::Resolution;
use crate::error::{PulseError, Result};

/// One decoded video frame, 8-bit RGBA, row-major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    resolution: Resolution,
    data: Vec<u8>,
}

impl RgbaFrame {
    /// Wrap a pixel buffer, checking it holds exactly `width * height` RGBA pixels
    pub fn new(resolution: Resolution, data: Vec<u8>) -> Result<Self> {
        let expected = resolution.frame_bytes();
        if data.len() != expected || expected == 0 {
            return Err(PulseError::FrameSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { resolution, data })
    }

    /// Wrap a buffer already known to match the resolution
    pub(crate) fn from_pixels(resolution: Resolution, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), resolution.frame_bytes());
        Self { resolution, data }
    }

    /// Frame with every pixel set to the same RGBA value
    pub fn filled(resolution: Resolution, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(resolution.frame_bytes())
            .collect();
        Self { resolution, data }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Red channel of every pixel, in row-major order
    pub fn red_channel(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.chunks_exact(4).map(|px| px[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_checked() {
        let res = Resolution::new(4, 2);
        assert!(RgbaFrame::new(res, vec![0; 32]).is_ok());

        let err = RgbaFrame::new(res, vec![0; 31]).unwrap_err();
        assert!(matches!(
            err,
            PulseError::FrameSize {
                expected: 32,
                actual: 31
            }
        ));
    }

    #[test]
    fn test_filled_frame() {
        let frame = RgbaFrame::filled(Resolution::new(3, 3), [200, 10, 20, 255]);
        assert_eq!(frame.as_bytes().len(), 36);
        assert!(frame.red_channel().all(|r| r == 200));
        assert_eq!(frame.red_channel().count(), 9);
    }
}
