//! Fixed-width, space-padded text fields

use core::fmt;

/// A fixed-width ASCII field as stored in a tape label
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextField<const N: usize>([u8; N]);

impl<const N: usize> TextField<N> {
    /// An all-space field
    pub const fn blank() -> Self {
        Self([b' '; N])
    }

    /// Wrap raw bytes without any padding or validation
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Build a field from text, keeping the leftmost `N` bytes and padding
    /// the rest with spaces
    pub fn new(text: &str) -> Self {
        Self::padded(text.as_bytes())
    }

    /// Same as [`TextField::new`] for raw bytes
    pub fn padded(bytes: &[u8]) -> Self {
        let mut field = [b' '; N];
        let len = bytes.len().min(N);
        field[..len].copy_from_slice(&bytes[..len]);
        Self(field)
    }

    /// Copy the field out of a label block at `offset`
    pub fn read(block: &[u8], offset: usize) -> Self {
        let mut field = [0u8; N];
        field.copy_from_slice(&block[offset..offset + N]);
        Self(field)
    }

    /// Copy the field into a label block at `offset`
    pub fn write(&self, block: &mut [u8], offset: usize) {
        block[offset..offset + N].copy_from_slice(&self.0);
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// The field with trailing spaces and NULs removed
    pub fn trimmed(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .rposition(|&b| b != b' ' && b != 0)
            .map_or(0, |i| i + 1);
        &self.0[..end]
    }

    /// The trimmed field as text; non-UTF-8 bytes are replaced
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.trimmed()).into_owned()
    }

    /// Leading ASCII decimal digits as a number, after skipping leading
    /// spaces. A field without digits reads as 0.
    pub fn number(&self) -> u32 {
        self.0
            .iter()
            .skip_while(|&&b| b == b' ')
            .take_while(|b| b.is_ascii_digit())
            .fold(0u32, |acc, &b| {
                acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
            })
    }

    /// A zero-padded decimal field holding `value`; the value is reduced
    /// modulo `10^N` so it always fits
    pub fn from_number(value: u32) -> Self {
        let mut field = [b'0'; N];
        let mut rest = value;
        for slot in field.iter_mut().rev() {
            *slot = b'0' + (rest % 10) as u8;
            rest /= 10;
        }
        Self(field)
    }
}

impl<const N: usize> Default for TextField<N> {
    fn default() -> Self {
        Self::blank()
    }
}

impl<const N: usize> fmt::Debug for TextField<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl<const N: usize> fmt::Display for TextField<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&String::from_utf8_lossy(&self.0))
    }
}
