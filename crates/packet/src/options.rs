use crate::scratch::DEFAULT_SCRATCH_CAPACITY;

/// Configuration options for a [`Writer`](crate::Writer).
///
/// Both options only affect allocation behaviour; the bytes produced by a
/// writer are the same for any configuration.
///
/// # Examples
///
/// ```rust
/// use packet::{Writer, WriterOptions};
///
/// let mut writer = Writer::with_options(WriterOptions {
///     initial_capacity: 64,
///     ..Default::default()
/// });
/// writer.write_uint32(1);
/// assert_eq!(writer.finish(), [1, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriterOptions {
    /// Number of bytes the output buffer can hold before its first growth.
    ///
    /// Sizing this to the expected encoded length avoids every growth event.
    ///
    /// # Default
    ///
    /// `0`
    pub initial_capacity: usize,

    /// Initial size of the scratch buffer used to encode strings.
    ///
    /// The scratch buffer grows on demand, so this is only a hint for the
    /// common string size.
    ///
    /// # Default
    ///
    /// `1024`
    pub scratch_capacity: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
        }
    }
}
