//! QR capacity limits, checked before any encoding work is done.

use crate::ErrorCorrection;

/// Modules of blank margin required on every side of the symbol.
pub const QUIET_ZONE: u32 = 4;

pub const MAX_VERSION: u32 = 40;

/// Byte-mode capacity (in bytes) for versions 1..=40, per EC level.
const BYTE_CAPACITY_L: [u16; 40] = [
    17, 32, 53, 78, 106, 134, 154, 192, 230, 271, 321, 367, 425, 458, 520, 586, 644, 718, 792,
    858, 929, 1003, 1091, 1171, 1273, 1367, 1465, 1528, 1628, 1732, 1840, 1952, 2068, 2188, 2303,
    2431, 2563, 2699, 2809, 2953,
];
const BYTE_CAPACITY_M: [u16; 40] = [
    14, 26, 42, 62, 84, 106, 122, 152, 180, 213, 251, 287, 331, 362, 412, 450, 504, 560, 624, 666,
    711, 779, 857, 911, 997, 1059, 1125, 1190, 1264, 1370, 1452, 1538, 1628, 1722, 1809, 1911,
    1989, 2099, 2213, 2331,
];
const BYTE_CAPACITY_Q: [u16; 40] = [
    11, 20, 32, 46, 60, 74, 86, 108, 130, 151, 177, 203, 241, 258, 292, 322, 364, 394, 442, 482,
    509, 565, 611, 661, 715, 751, 805, 868, 908, 982, 1030, 1112, 1168, 1228, 1283, 1351, 1423,
    1499, 1579, 1663,
];
const BYTE_CAPACITY_H: [u16; 40] = [
    7, 14, 24, 34, 44, 58, 64, 84, 98, 119, 137, 155, 177, 194, 220, 250, 280, 310, 338, 382, 403,
    439, 461, 511, 535, 593, 625, 658, 698, 742, 790, 842, 898, 958, 983, 1051, 1093, 1139, 1219,
    1273,
];

/// Module count along one edge of a symbol of the given version.
pub fn modules_for_version(version: u32) -> u32 {
    17 + 4 * version
}

/// Largest version whose symbol plus quiet zone fits into `size` pixels at
/// one pixel per module. `None` if not even version 1 fits.
pub fn max_version_for_size(size: u32) -> Option<u32> {
    let usable = size.checked_sub(17 + 2 * QUIET_ZONE)?;
    let version = (usable / 4).min(MAX_VERSION);
    (version >= 1).then_some(version)
}

/// Byte-mode capacity of `version` at `ec`.
pub fn byte_capacity(version: u32, ec: ErrorCorrection) -> usize {
    let table = match ec {
        ErrorCorrection::L => &BYTE_CAPACITY_L,
        ErrorCorrection::M => &BYTE_CAPACITY_M,
        ErrorCorrection::Q => &BYTE_CAPACITY_Q,
        ErrorCorrection::H => &BYTE_CAPACITY_H,
    };
    let idx = version.clamp(1, MAX_VERSION) as usize - 1;
    usize::from(table[idx])
}

/// Longest payload (in bytes) that always fits into `size` pixels at `ec`.
///
/// Byte mode is the least dense segment mode, so any payload within this
/// bound fits regardless of how the encoder segments it.
pub fn max_payload_len(size: u32, ec: ErrorCorrection) -> Option<usize> {
    max_version_for_size(size).map(|v| byte_capacity(v, ec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_size_fits_version_one() {
        assert_eq!(max_version_for_size(28), None);
        assert_eq!(max_version_for_size(29), Some(1));
        assert_eq!(max_version_for_size(33), Some(2));
    }

    #[test]
    fn version_is_capped_at_forty() {
        assert_eq!(max_version_for_size(4096), Some(40));
        assert_eq!(modules_for_version(40), 177);
    }

    #[test]
    fn capacity_shrinks_with_stronger_correction() {
        let l = byte_capacity(10, ErrorCorrection::L);
        let m = byte_capacity(10, ErrorCorrection::M);
        let q = byte_capacity(10, ErrorCorrection::Q);
        let h = byte_capacity(10, ErrorCorrection::H);
        assert!(l > m && m > q && q > h);
        assert_eq!(byte_capacity(40, ErrorCorrection::M), 2331);
    }
}
