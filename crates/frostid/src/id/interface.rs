use crate::id::BitLayout;

/// The logical fields of an identifier.
///
/// `timestamp` is the elapsed time since the configured epoch, not an
/// absolute time.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Components {
    /// Elapsed time units since the epoch.
    pub timestamp: i64,
    /// Cluster (data-center) id.
    pub cluster: u32,
    /// Worker (node) id.
    pub worker: u32,
    /// Position within the time bucket.
    pub sequence: i64,
}

/// Packs [`Components`] into a signed 64-bit identifier.
///
/// `group` is passed through from the caller untouched; the default
/// [`SnowflakeEncoder`] ignores it, while custom encoders may use it to pick
/// a layout or a namespace.
///
/// Closures with the same shape implement this trait:
///
/// ```
/// use frostid::{BitLayout, Components, IdentifierEncoder};
///
/// let sequence_only = |_: &BitLayout, parts: Components, _: Option<&str>| parts.sequence;
/// let parts = Components { sequence: 5, ..Components::default() };
/// assert_eq!(sequence_only.identifier(&BitLayout::DEFAULT, parts, None), 5);
/// ```
pub trait IdentifierEncoder {
    /// Encodes one identifier.
    fn identifier(&self, layout: &BitLayout, parts: Components, group: Option<&str>) -> i64;
}

impl<F> IdentifierEncoder for F
where
    F: Fn(&BitLayout, Components, Option<&str>) -> i64,
{
    fn identifier(&self, layout: &BitLayout, parts: Components, group: Option<&str>) -> i64 {
        self(layout, parts, group)
    }
}

/// The default encoder: a straight [`BitLayout::pack`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SnowflakeEncoder;

impl IdentifierEncoder for SnowflakeEncoder {
    fn identifier(&self, layout: &BitLayout, parts: Components, _group: Option<&str>) -> i64 {
        layout.pack(parts)
    }
}
