use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

/// A packed 64-bit identifier.
///
/// ```text
///  Bit Index:  63           63 62            22 21            17 16             12 11             0
///              +--------------+----------------+----------------+----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | machine ID (5) | service ID (5) | sequence (12) |
///              +--------------+----------------+----------------+----------------+---------------+
/// ```
///
/// The timestamp field counts 10 ms ticks since the generator's epoch. The
/// reserved top bit is always zero for generated IDs, so the raw value is
/// also non-negative as an `i64`.
///
/// Ordering, equality, and hashing all defer to the raw integer, which makes
/// IDs sortable by issue time.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlakeId {
    id: u64,
}

impl FlakeId {
    /// Bit width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;
    /// Bit width of the machine ID field.
    pub const MACHINE_ID_BITS: u32 = 5;
    /// Bit width of the service ID field.
    pub const SERVICE_ID_BITS: u32 = 5;
    /// Bit width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for the 41-bit timestamp field (before shifting).
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    /// Bitmask for the 5-bit machine ID field (before shifting).
    pub const MACHINE_ID_MASK: u64 = (1 << Self::MACHINE_ID_BITS) - 1;
    /// Bitmask for the 5-bit service ID field (before shifting).
    pub const SERVICE_ID_MASK: u64 = (1 << Self::SERVICE_ID_BITS) - 1;
    /// Bitmask for the 12-bit sequence field (before shifting).
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the sequence into position (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;
    /// Number of bits to shift the service ID into position (bit 12).
    pub const SERVICE_ID_SHIFT: u32 = Self::SEQUENCE_BITS;
    /// Number of bits to shift the machine ID into position (bit 17).
    pub const MACHINE_ID_SHIFT: u32 = Self::SERVICE_ID_SHIFT + Self::SERVICE_ID_BITS;
    /// Number of bits to shift the timestamp into position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = Self::MACHINE_ID_SHIFT + Self::MACHINE_ID_BITS;

    /// Width of the zero-padded decimal rendering. 2^63 - 1 has 19 digits.
    pub const PADDED_LEN: usize = 19;

    /// Packs the four fields into an ID.
    ///
    /// Each component is masked to its field width, so out-of-range values
    /// are truncated rather than rejected.
    #[must_use]
    pub const fn from_parts(timestamp: u64, machine_id: u64, service_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let service_id = (service_id & Self::SERVICE_ID_MASK) << Self::SERVICE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | service_id | sequence,
        }
    }

    /// Extracts the tick count since the epoch.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID.
    #[must_use]
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the service ID.
    #[must_use]
    pub const fn service_id(&self) -> u64 {
        (self.id >> Self::SERVICE_ID_SHIFT) & Self::SERVICE_ID_MASK
    }

    /// Extracts the sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the reserved top bit. Zero for every generated ID.
    #[must_use]
    pub const fn msb(&self) -> u64 {
        self.id >> 63
    }

    /// Maximum encodable tick count.
    #[must_use]
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Maximum encodable machine ID.
    #[must_use]
    pub const fn max_machine_id() -> u64 {
        Self::MACHINE_ID_MASK
    }

    /// Maximum encodable service ID.
    #[must_use]
    pub const fn max_service_id() -> u64 {
        Self::SERVICE_ID_MASK
    }

    /// Maximum encodable sequence number.
    #[must_use]
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this ID into its raw integer representation.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw integer into an ID.
    ///
    /// The layout is a fixed, unconditional transform: any `u64` decomposes,
    /// including values this crate never issued.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Splits the ID into its logical fields.
    ///
    /// Pure and infallible; the exact algebraic inverse of [`from_parts`]
    /// for every in-range field combination.
    ///
    /// [`from_parts`]: Self::from_parts
    #[must_use]
    pub const fn decompose(&self) -> IdParts {
        IdParts {
            id: self.id,
            msb: self.msb(),
            time: self.timestamp(),
            machine_id: self.machine_id(),
            service_id: self.service_id(),
            sequence: self.sequence(),
        }
    }

    /// Renders the ID as a fixed-width, zero-padded 19-digit decimal string.
    ///
    /// The padded form is lexicographically ordered for all IDs with a zero
    /// reserved bit and round-trips through [`FromStr`].
    #[must_use]
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("service_id", &self.service_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for FlakeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::from_raw)
    }
}

impl From<FlakeId> for u64 {
    fn from(id: FlakeId) -> Self {
        id.to_raw()
    }
}

impl From<u64> for FlakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

/// The logical fields of a [`FlakeId`].
///
/// Serialized field names keep the dashed wire keys (`machine-id`,
/// `service-id`) used by existing consumers of the decomposed form.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdParts {
    /// The raw 64-bit value.
    pub id: u64,
    /// The reserved top bit (bit 63). Zero for generated IDs.
    pub msb: u64,
    /// Tick count (10 ms units) since the epoch.
    pub time: u64,
    /// Machine ID, 0-31.
    #[cfg_attr(feature = "serde", serde(rename = "machine-id"))]
    pub machine_id: u64,
    /// Service ID, 0-31.
    #[cfg_attr(feature = "serde", serde(rename = "service-id"))]
    pub service_id: u64,
    /// Sequence within the tick, 0-4095.
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fields_encode_to_zero() {
        let id = FlakeId::from_parts(0, 0, 0, 0);
        assert_eq!(id.to_raw(), 0);
        assert_eq!(
            id.decompose(),
            IdParts {
                id: 0,
                msb: 0,
                time: 0,
                machine_id: 0,
                service_id: 0,
                sequence: 0,
            }
        );
    }

    #[test]
    fn max_positive_value_decomposes_to_field_maxima() {
        // 2^63 - 1: every field saturated, reserved bit still clear.
        let id = FlakeId::from_raw(9_223_372_036_854_775_807);
        let parts = id.decompose();
        assert_eq!(parts.msb, 0);
        assert_eq!(parts.time, 2_199_023_255_551); // 2^41 - 1
        assert_eq!(parts.machine_id, 31);
        assert_eq!(parts.service_id, 31);
        assert_eq!(parts.sequence, 4095);
    }

    #[test]
    fn round_trip_over_boundary_combinations() {
        let timestamps = [0, 1, 42, FlakeId::max_timestamp()];
        let small_ids = [0, 1, 17, 31];
        let sequences = [0, 1, 2047, 4095];

        for &ts in &timestamps {
            for &machine in &small_ids {
                for &service in &small_ids {
                    for &seq in &sequences {
                        let id = FlakeId::from_parts(ts, machine, service, seq);
                        assert_eq!(id.timestamp(), ts);
                        assert_eq!(id.machine_id(), machine);
                        assert_eq!(id.service_id(), service);
                        assert_eq!(id.sequence(), seq);
                        assert_eq!(FlakeId::from_raw(id.to_raw()), id);
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_range_components_are_masked() {
        let id = FlakeId::from_parts(0, 100, 33, 5000);
        assert_eq!(id.machine_id(), 100 & 31);
        assert_eq!(id.service_id(), 33 & 31);
        assert_eq!(id.sequence(), 5000 & 4095);
    }

    #[test]
    fn ordering_follows_timestamp_then_sequence() {
        let a = FlakeId::from_parts(41, 3, 3, 4095);
        let b = FlakeId::from_parts(42, 3, 3, 0);
        let c = FlakeId::from_parts(42, 3, 3, 1);
        assert!(a < b && b < c);
    }

    #[test]
    fn padded_string_round_trips() {
        let id = FlakeId::from_parts(113_337_158, 0, 0, 0);
        let padded = id.to_padded_string();
        assert_eq!(padded.len(), FlakeId::PADDED_LEN);
        assert_eq!(padded, format!("{:019}", id.to_raw()));
        assert_eq!(padded.parse::<FlakeId>().unwrap(), id);

        assert_eq!(FlakeId::from_raw(0).to_padded_string(), "0".repeat(19));
    }

    #[test]
    fn display_and_debug() {
        let id = FlakeId::from_parts(42, 1, 2, 3);
        assert_eq!(id.to_string(), id.to_raw().to_string());
        let debug = format!("{id:?}");
        assert!(debug.contains("timestamp: 42"));
        assert!(debug.contains("sequence: 3"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parts_serialize_with_dashed_keys() {
        let parts = FlakeId::from_parts(42, 1, 2, 3).decompose();
        let value = serde_json::to_value(parts).unwrap();
        assert_eq!(value["time"], 42);
        assert_eq!(value["machine-id"], 1);
        assert_eq!(value["service-id"], 2);
        assert_eq!(value["sequence"], 3);
        assert_eq!(value["msb"], 0);

        let back: IdParts = serde_json::from_value(value).unwrap();
        assert_eq!(back, parts);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn id_serializes_transparently() {
        let id = FlakeId::from_parts(42, 1, 2, 3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: FlakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
