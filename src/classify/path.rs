//! Maps a source-device identifier to its physical zone.

use crate::model::{PathLabel, PidSegment};

/// Device prefixes routed to the east manual-check area.
const MAN_CHECK_EAST_PREFIXES: &[&str] = &["U161260", "U162250", "U163250", "U4083", "U4020"];

/// Device prefixes routed to the west manual-check area.
const MAN_CHECK_WEST_PREFIXES: &[&str] = &["U153280", "U152280", "U151280", "U4082", "U4021"];

const fn pid(line: u8, segment: PidSegment) -> PathLabel {
    PathLabel::Pid { line, segment }
}

/// Zone rules checked against the six-digit device code, in priority order.
/// First match wins.
const DIGIT_PREFIX_RULES: &[(&str, PathLabel)] = &[
    ("1632", pid(6, PidSegment::ManCheck)),
    ("1631", pid(6, PidSegment::Sort)),
    ("1630", pid(6, PidSegment::Main)),
    ("1622", pid(5, PidSegment::ManCheck)),
    ("1621", pid(5, PidSegment::Sort)),
    ("1620", pid(5, PidSegment::Main)),
    ("1612", pid(4, PidSegment::ManCheck)),
    ("1611", pid(4, PidSegment::Sort)),
    ("1610", pid(4, PidSegment::Main)),
    ("1532", pid(3, PidSegment::ManCheck)),
    ("1531", pid(3, PidSegment::Sort)),
    ("1530", pid(3, PidSegment::Main)),
    ("1522", pid(2, PidSegment::ManCheck)),
    ("1521", pid(2, PidSegment::Sort)),
    ("1520", pid(2, PidSegment::Main)),
    ("1512", pid(1, PidSegment::ManCheck)),
    ("1511", pid(1, PidSegment::Sort)),
    ("1510", pid(1, PidSegment::Main)),
    ("4050", PathLabel::NpcLine),
    ("4051", PathLabel::NpcStations),
    ("4081", PathLabel::NpcTrashLine),
];

/// Classifies a device identifier into a [`PathLabel`].
///
/// Total function: empty or unrecognized identifiers fall through to
/// [`PathLabel::Other`]. The literal prefix lists are checked before the
/// digit-code rules; some manual-check devices (e.g. `U4083`) also satisfy
/// the `U` + six-digit pattern and must not reach the digit rules.
pub fn classify_path(source: &str) -> PathLabel {
    if source.is_empty() {
        return PathLabel::Other;
    }

    if MAN_CHECK_EAST_PREFIXES.iter().any(|p| source.starts_with(p)) {
        return PathLabel::ManCheckEast;
    }

    if MAN_CHECK_WEST_PREFIXES.iter().any(|p| source.starts_with(p)) {
        return PathLabel::ManCheckWest;
    }

    let Some(digits) = device_digits(source) else {
        return PathLabel::Other;
    };

    for (prefix, label) in DIGIT_PREFIX_RULES {
        if digits.starts_with(prefix) {
            return *label;
        }
    }

    PathLabel::Other
}

/// Extracts the six-digit device code following a leading `U` (case
/// insensitive). Exactly six digits are required; trailing characters after
/// them are ignored.
fn device_digits(source: &str) -> Option<&str> {
    let rest = source
        .strip_prefix('U')
        .or_else(|| source.strip_prefix('u'))?;
    let digits = rest.get(..6)?;
    digits.bytes().all(|b| b.is_ascii_digit()).then_some(digits)
}
