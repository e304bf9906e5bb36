/// What the time values for a system are derived from.
///
/// For most use cases the default [`InternalOscillator`](Self::InternalOscillator)
/// is correct. See *IEEE1588-2019 section 7.6.2.8*.
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    AtomicClock,
    Gnss,
    TerrestrialRadio,
    SerialTimeCode,
    Ptp,
    Ntp,
    HandSet,
    Other,
    #[default]
    InternalOscillator,
    ProfileSpecific(u8),
    Reserved,
    /// Not an official value; used when a received value matches nothing
    /// else above.
    Unknown(u8),
}

impl TimeSource {
    /// Converts enum variants back to their primitive values as specified
    /// in *IEEE1588-2019 section 7.6.2.8*.
    pub fn to_primitive(self) -> u8 {
        match self {
            Self::AtomicClock => 0x10,
            Self::Gnss => 0x20,
            Self::TerrestrialRadio => 0x30,
            Self::SerialTimeCode => 0x39,
            Self::Ptp => 0x40,
            Self::Ntp => 0x50,
            Self::HandSet => 0x60,
            Self::Other => 0x90,
            Self::InternalOscillator => 0xa0,
            Self::ProfileSpecific(p) => 0xf0 + p,
            Self::Reserved => 0xff,
            Self::Unknown(v) => v,
        }
    }

    pub(crate) fn from_primitive(value: u8) -> Self {
        match value {
            0x10 => Self::AtomicClock,
            0x20 => Self::Gnss,
            0x30 => Self::TerrestrialRadio,
            0x39 => Self::SerialTimeCode,
            0x40 => Self::Ptp,
            0x50 => Self::Ntp,
            0x60 => Self::HandSet,
            0x90 => Self::Other,
            0xa0 => Self::InternalOscillator,
            0xf0..=0xfe => Self::ProfileSpecific(value - 0xf0),
            0xff => Self::Reserved,
            v => Self::Unknown(v),
        }
    }
}
