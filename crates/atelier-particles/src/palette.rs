//! Gem palette crystals draw their base colour from

use atelier_core::{Color, SeededRng};

pub const PALETTE: [(&str, u32); 14] = [
    ("platinum", 0xf8f9fa),
    ("sapphire", 0x0066cc),
    ("emerald", 0x00b894),
    ("ruby", 0xe17055),
    ("amethyst", 0x6c5ce7),
    ("topaz", 0xfdcb6e),
    ("obsidian", 0x2d3436),
    ("opal", 0x74b9ff),
    ("pearl", 0xddd6fe),
    ("gold", 0xffeaa7),
    ("diamond", 0xffffff),
    ("titanium", 0x636e72),
    ("cosmic", 0x4a90e2),
    ("aurora", 0x9b59b6),
];

pub fn palette_color(index: usize) -> Color {
    Color::from_hex(PALETTE[index % PALETTE.len()].1)
}

pub fn palette_name(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()].0
}

pub fn pick(rng: &mut SeededRng) -> usize {
    rng.range_usize(0, PALETTE.len())
}

/// Pick an entry different from `previous`
pub fn pick_other(rng: &mut SeededRng, previous: usize) -> usize {
    let i = rng.range_usize(0, PALETTE.len() - 1);
    if i >= previous % PALETTE.len() {
        i + 1
    } else {
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_other_never_repeats() {
        let mut rng = SeededRng::new(9);
        for previous in 0..PALETTE.len() {
            for _ in 0..50 {
                let next = pick_other(&mut rng, previous);
                assert_ne!(next, previous);
                assert!(next < PALETTE.len());
            }
        }
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(palette_name(1), "sapphire");
        assert_eq!(palette_color(10), Color::WHITE);
    }
}
