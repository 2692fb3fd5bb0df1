use super::ConstPackedSizeBytes;

/// 32-bit fixed point (16.16) used for root delay and root dispersion.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ShortFormat {
    /// Whole seconds.
    pub seconds: u16,
    /// Fraction of a second in units of 2^-16.
    pub fraction: u16,
}

/// 64-bit fixed point (32.32) timestamp counted from 1900-01-01 00:00 UTC.
///
/// The seconds field wraps every 136 years; see [`crate::unix_time`] for era handling.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimestampFormat {
    /// Seconds within the current era.
    pub seconds: u32,
    /// Fraction of a second in units of 2^-32.
    pub fraction: u32,
}

/// Leap second warning carried in the top two bits of the header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No leap second pending.
    #[default]
    NoWarning = 0,
    /// A second will be inserted at the end of the month.
    AddOne = 1,
    /// A second will be removed at the end of the month.
    SubOne = 2,
    /// The server clock is not synchronized.
    Unknown = 3,
}

impl TryFrom<u8> for LeapIndicator {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LeapIndicator::NoWarning),
            1 => Ok(LeapIndicator::AddOne),
            2 => Ok(LeapIndicator::SubOne),
            3 => Ok(LeapIndicator::Unknown),
            _ => Err(()),
        }
    }
}

/// Protocol version field. Decoding accepts 1 through 5 only.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Version(pub(super) u8);

/// Association mode field.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// 0
    Reserved = 0,
    /// 1
    SymmetricActive = 1,
    /// 2
    SymmetricPassive = 2,
    /// 3, used by every request this crate builds.
    #[default]
    Client = 3,
    /// 4, the only mode a query accepts in a reply.
    Server = 4,
    /// 5
    Broadcast = 5,
    /// 6, the `ntpq` control channel.
    NtpControlMessage = 6,
    /// 7
    ReservedForPrivateUse = 7,
}

impl TryFrom<u8> for Mode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Reserved),
            1 => Ok(Mode::SymmetricActive),
            2 => Ok(Mode::SymmetricPassive),
            3 => Ok(Mode::Client),
            4 => Ok(Mode::Server),
            5 => Ok(Mode::Broadcast),
            6 => Ok(Mode::NtpControlMessage),
            7 => Ok(Mode::ReservedForPrivateUse),
            _ => Err(()),
        }
    }
}

/// Distance from a reference clock: 0 unspecified (or kiss-o'-death), 1 primary,
/// 2 and above synchronized over the network. Any octet value decodes.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stratum(pub u8);

/// The raw 32-bit reference identifier, left as the four octets seen on the wire.
///
/// Its meaning depends on the stratum of the packet carrying it: a kiss code at stratum 0, a
/// reference clock label at stratum 1, and an upstream address at stratum 2 and above. Rendering
/// is done by [`crate::refid::decode`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ReferenceId(pub [u8; 4]);

/// The fixed 48-byte header, which is all a one-shot query sends or reads.
///
/// Extension fields and MACs following the header are ignored on decode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Packet {
    /// Leap second warning.
    pub leap_indicator: LeapIndicator,
    /// Protocol version.
    pub version: Version,
    /// Association mode.
    pub mode: Mode,
    /// Server stratum.
    pub stratum: Stratum,
    /// Poll interval exponent (log2 seconds).
    pub poll: i8,
    /// Clock precision exponent (log2 seconds).
    pub precision: i8,
    /// Round-trip delay from the server to its reference clock.
    pub root_delay: ShortFormat,
    /// Dispersion from the server to its reference clock.
    pub root_dispersion: ShortFormat,
    /// Raw reference identifier.
    pub reference_id: ReferenceId,
    /// When the server clock was last set.
    pub reference_timestamp: TimestampFormat,
    /// T1 echoed back by the server.
    pub origin_timestamp: TimestampFormat,
    /// T2, request arrival at the server.
    pub receive_timestamp: TimestampFormat,
    /// T3, reply departure from the server.
    pub transmit_timestamp: TimestampFormat,
}

impl ShortFormat {
    /// Seconds as a float.
    pub fn as_seconds(&self) -> f64 {
        self.seconds as f64 + self.fraction as f64 / 65_536.0
    }
}

impl TimestampFormat {
    /// True for the all-zero (unset) timestamp.
    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.fraction == 0
    }
}

impl Version {
    /// NTPv3.
    pub const V3: Self = Version(3);
    /// NTPv4, sent in every request.
    pub const V4: Self = Version(4);

    /// `None` outside 1..=5.
    pub fn new(v: u8) -> Option<Self> {
        if (1..=5).contains(&v) {
            Some(Version(v))
        } else {
            None
        }
    }

    /// The raw version number.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Stratum {
    /// Unspecified; also carried by kiss-o'-death replies.
    pub const UNSPECIFIED: Self = Stratum(0);
    /// Directly attached to a reference clock.
    pub const PRIMARY: Self = Stratum(1);
    /// Reserved; the reference identifier has no defined rendering.
    pub const RESERVED: Self = Stratum(255);
}

impl ReferenceId {
    /// The identifier as a big-endian `u32`.
    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// The identifier of an upstream IPv4 server.
    pub fn from_ipv4(addr: std::net::Ipv4Addr) -> Self {
        ReferenceId(addr.octets())
    }

    /// A clock label, NUL padded or truncated to four octets.
    pub fn from_label(label: &str) -> Self {
        let mut octets = [0u8; 4];
        for (dst, src) in octets.iter_mut().zip(label.bytes()) {
            *dst = src;
        }
        ReferenceId(octets)
    }
}

impl ConstPackedSizeBytes for ShortFormat {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for TimestampFormat {
    const PACKED_SIZE_BYTES: usize = 8;
}

impl ConstPackedSizeBytes for ReferenceId {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for Packet {
    const PACKED_SIZE_BYTES: usize = 4
        + ShortFormat::PACKED_SIZE_BYTES * 2
        + ReferenceId::PACKED_SIZE_BYTES
        + TimestampFormat::PACKED_SIZE_BYTES * 4;
}

impl Default for Version {
    fn default() -> Self {
        Version::V4
    }
}

impl Default for Packet {
    /// An NTPv4 client request with every timestamp zeroed.
    fn default() -> Self {
        Packet {
            leap_indicator: LeapIndicator::default(),
            version: Version::default(),
            mode: Mode::default(),
            stratum: Stratum::UNSPECIFIED,
            poll: 0,
            precision: 0,
            root_delay: ShortFormat::default(),
            root_dispersion: ShortFormat::default(),
            reference_id: ReferenceId::default(),
            reference_timestamp: TimestampFormat::default(),
            origin_timestamp: TimestampFormat::default(),
            receive_timestamp: TimestampFormat::default(),
            transmit_timestamp: TimestampFormat::default(),
        }
    }
}
