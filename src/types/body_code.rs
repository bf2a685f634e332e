//! Celestial body codes
//!
//! Bodies are numbered by family: the star is 100, each planet takes the next multiple
//! of ten and its moons count up from there (Kerbin 130, Mun 131, Minmus 132).
//! Unknown names map to 0.

/// Code sent for a body outside the table.
pub const UNKNOWN_BODY: u8 = 0;

const BODY_CODES: [(&str, u8); 17] = [
    ("sun", 100),
    ("moho", 110),
    ("eve", 120),
    ("gilly", 121),
    ("kerbin", 130),
    ("mun", 131),
    ("minmus", 132),
    ("duna", 140),
    ("ike", 141),
    ("dres", 150),
    ("jool", 160),
    ("laythe", 161),
    ("vall", 162),
    ("tylo", 163),
    ("bop", 164),
    ("pol", 165),
    ("eeloo", 170),
];

/// Map a body name to its 1-byte code. Matching ignores ASCII case.
pub fn body_code(name: &str) -> u8 {
    BODY_CODES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map_or(UNKNOWN_BODY, |&(_, code)| code)
}

/// Reverse lookup used when rendering decoded packets.
pub fn body_name(code: u8) -> Option<&'static str> {
    BODY_CODES.iter().find(|&&(_, known)| known == code).map(|&(name, _)| name)
}
