//! Rolling sequence codes for burst transfers.

use crate::channel::pack;
use crate::error::Result;

/// Produces the 3-bit sequence code for each packet of a burst.
///
/// Codes cycle 0, 1, 2, 3, 0, ... until [`finish`](Self::finish) is called,
/// after which every call yields the terminal code. One counter belongs to
/// one channel; callers serialize burst transmissions per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BurstSequence {
    current: u8,
}

impl BurstSequence {
    pub const INIT: u8 = 0b000;
    pub const MAX: u8 = 0b011;
    pub const FINISH: u8 = 0b110;

    pub fn new() -> Self {
        Self {
            current: Self::INIT,
        }
    }

    /// Return the current code and advance.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u8 {
        let code = self.current;
        self.current = match self.current {
            Self::MAX => Self::INIT,
            Self::FINISH => Self::FINISH,
            other => other + 1,
        };
        code
    }

    /// The code the next call to [`next`](Self::next) returns.
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Mark the next packet as the last one of the burst.
    pub fn finish(&mut self) {
        self.current = Self::FINISH;
    }

    pub fn is_finished(&self) -> bool {
        self.current == Self::FINISH
    }

    pub fn reset(&mut self) {
        self.current = Self::INIT;
    }

    /// Build byte 0 of the next burst packet for `channel`.
    ///
    /// The channel is checked before the counter advances, so a rejected
    /// channel does not consume a code.
    pub fn combine(&mut self, channel: u8) -> Result<u8> {
        pack(channel, self.current)?;
        let code = self.next();
        pack(channel, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MessageError;

    #[test]
    fn cycles_until_finished() {
        let mut seq = BurstSequence::new();
        let codes: Vec<u8> = (0..9).map(|_| seq.next()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);

        seq.finish();
        assert!(seq.is_finished());
        assert_eq!(seq.next(), BurstSequence::FINISH);
        assert_eq!(seq.next(), BurstSequence::FINISH);
        assert_eq!(seq.current(), BurstSequence::FINISH);
    }

    #[test]
    fn reset_restarts_cycle() {
        let mut seq = BurstSequence::new();
        seq.next();
        seq.next();
        seq.finish();
        seq.reset();

        assert!(!seq.is_finished());
        assert_eq!(seq.next(), 0);
        assert_eq!(seq.next(), 1);
    }

    #[test]
    fn combine_packs_channel_and_code() {
        let mut seq = BurstSequence::new();
        assert_eq!(seq.combine(31).unwrap(), 31);
        assert_eq!(seq.combine(31).unwrap(), 31 | (1 << 5));
        assert_eq!(seq.combine(2).unwrap(), 2 | (2 << 5));

        seq.finish();
        assert_eq!(seq.combine(0).unwrap(), 6 << 5);
    }

    #[test]
    fn combine_rejects_wide_channel_without_advancing() {
        let mut seq = BurstSequence::new();
        assert!(matches!(
            seq.combine(32),
            Err(MessageError::OutOfRange { value: 32, .. })
        ));
        assert_eq!(seq.current(), 0);
    }
}
