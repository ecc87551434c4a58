use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of a compressed IFC GlobalId.
const GLOBAL_ID_LEN: usize = 22;

/// How GlobalIds are produced for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidMode {
	/// Fresh random v4 UUID per entity.
	#[default]
	Random,
	/// Counter-based UUIDs, stable across runs of the same scene.
	Sequential,
}

/// Run-scoped GlobalId source.
#[derive(Debug, Clone)]
pub struct GuidGenerator {
	mode: GuidMode,
	counter: u128,
}

impl GuidGenerator {
	/// Create a generator for `mode`.
	pub fn new(mode: GuidMode) -> Self {
		Self { mode, counter: 0 }
	}

	/// Produce the next compressed GlobalId.
	pub fn next_global_id(&mut self) -> String {
		let uuid = match self.mode {
			GuidMode::Random => Uuid::new_v4(),
			GuidMode::Sequential => {
				self.counter += 1;
				Uuid::from_u128(self.counter)
			}
		};
		compress_guid(uuid)
	}
}

/// Encode a UUID as the 22-character IFC base-64 GlobalId.
pub fn compress_guid(uuid: Uuid) -> String {
	let value = uuid.as_u128();
	let mut out = String::with_capacity(GLOBAL_ID_LEN);
	for digit in (0..GLOBAL_ID_LEN).rev() {
		let sextet = (value >> (digit * 6)) & 0x3f;
		out.push(char::from(ALPHABET[sextet as usize]));
	}
	out
}

/// Decode a 22-character IFC GlobalId back into a UUID.
pub fn expand_guid(global_id: &str) -> Option<Uuid> {
	if global_id.len() != GLOBAL_ID_LEN {
		return None;
	}

	let mut value = 0_u128;
	for (position, byte) in global_id.bytes().enumerate() {
		let sextet = ALPHABET.iter().position(|item| *item == byte)? as u128;
		// leading digit only carries the top two bits
		if position == 0 && sextet > 3 {
			return None;
		}
		value = (value << 6) | sextet;
	}
	Some(Uuid::from_u128(value))
}

/// Whether `value` is a well-formed compressed GlobalId.
pub fn is_global_id(value: &str) -> bool {
	expand_guid(value).is_some()
}
