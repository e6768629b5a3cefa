//! Built-in minion table and lookup tables for colors and glyphs.

use crate::model::{CombatStats, MinionDef, MinionType, Rarity, Specialization};
use crate::surface::Color;

type Row = (
    &'static str,
    &'static str,
    MinionType,
    Specialization,
    Rarity,
    u32,
    u32,
    u32,
    u32,
    u32,
    u32,
    f32,
);

// name, glyph, type, specialization, rarity,
// physical attack, physical defense, magic attack, magic defense, health, mana, attack speed
#[rustfmt::skip]
const ROWS: &[Row] = &[
    ("Fuzzy", "💂", MinionType::Implication, Specialization::Virus, Rarity::Common, 1918, 900, 1180, 800, 4028, 495, 1.49),
    ("Boole", "♈", MinionType::Implication, Specialization::Modeler, Rarity::Common, 1475, 1300, 1328, 900, 6713, 495, 1.07),
    ("Proof", "♉", MinionType::Implication, Specialization::Engineer, Rarity::Epic, 1711, 1160, 2994, 1595, 5191, 1121, 1.73),
    ("Truth", "♊", MinionType::Implication, Specialization::Dormant, Rarity::Common, 1623, 900, 1475, 1500, 6041, 743, 1.07),
    ("Regression", "♋", MinionType::Algorithm, Specialization::Virus, Rarity::Rare, 1931, 1337, 1188, 1188, 5967, 526, 1.64),
    ("Divide and Conquer", "♌", MinionType::Algorithm, Specialization::Modeler, Rarity::Rare, 1485, 1931, 1337, 1337, 9945, 526, 1.18),
    ("Greedy", "♍", MinionType::Algorithm, Specialization::Engineer, Rarity::Common, 990, 990, 1733, 1361, 4420, 684, 1.10),
    ("Brute Force", "♎", MinionType::Algorithm, Specialization::Dormant, Rarity::Common, 1361, 1114, 1238, 1856, 7459, 657, 0.99),
    ("Data", "♏", MinionType::Mathematician, Specialization::Virus, Rarity::Common, 1300, 1508, 800, 1340, 6525, 580, 1.14),
    ("Equation", "♐", MinionType::Mathematician, Specialization::Modeler, Rarity::Common, 1000, 2178, 900, 1508, 10875, 580, 0.82),
    ("Theory", "♑", MinionType::Mathematician, Specialization::Engineer, Rarity::Rare, 960, 1608, 1680, 2211, 6960, 1088, 1.09),
    ("Law", "♒", MinionType::Mathematician, Specialization::Dormant, Rarity::Epic, 1595, 2186, 1450, 3643, 14192, 1262, 1.19),
    ("Drug", "♓", MinionType::Abstraction, Specialization::Virus, Rarity::Common, 1625, 1125, 1000, 1000, 4950, 440, 1.38),
    ("Lambda", "🕎", MinionType::Abstraction, Specialization::Modeler, Rarity::Rare, 1500, 1950, 1350, 1350, 9900, 528, 1.19),
    ("Language", "☮", MinionType::Abstraction, Specialization::Engineer, Rarity::Common, 1180, 800, 2065, 1100, 3580, 773, 1.19),
    ("Transfer (knowledge)", "☪", MinionType::Abstraction, Specialization::Dormant, Rarity::Rare, 1650, 1350, 1500, 2250, 8910, 792, 1.19),
    ("Prophet", "☦", MinionType::Dream, Specialization::Virus, Rarity::Epic, 2828, 1305, 1740, 1160, 5873, 725, 2.18),
    ("Idea", "✝", MinionType::Dream, Specialization::Modeler, Rarity::Common, 1500, 1300, 1350, 900, 6750, 500, 1.08),
    ("Lucid", "☯", MinionType::Dream, Specialization::Engineer, Rarity::Rare, 1440, 960, 2520, 1320, 4320, 938, 1.44),
    ("Nightmare", "☸", MinionType::Dream, Specialization::Dormant, Rarity::Common, 1650, 900, 1500, 1500, 6075, 750, 1.08),
    ("Power", "✡", MinionType::Concept, Specialization::Virus, Rarity::Common, 1300, 1575, 800, 1400, 6750, 600, 1.13),
    ("Philosophy", "🕉", MinionType::Concept, Specialization::Modeler, Rarity::Epic, 1450, 3299, 1305, 2284, 16313, 870, 1.17),
    ("Knowledge", "⚛", MinionType::Concept, Specialization::Engineer, Rarity::Common, 800, 1400, 1400, 1925, 6000, 938, 0.90),
    ("Religion", "🛐", MinionType::Concept, Specialization::Dormant, Rarity::Common, 1100, 1575, 1000, 2625, 10125, 900, 0.81),
];

/// All built-in minion definitions in table order.
#[must_use]
pub fn builtin() -> Vec<MinionDef> {
    ROWS.iter()
        .map(
            |&(name, glyph, kind, specialization, rarity, pa, pd, ma, md, health, mana, speed)| {
                MinionDef {
                    name: name.to_string(),
                    glyph: glyph.to_string(),
                    kind,
                    specialization,
                    rarity,
                    stats: CombatStats {
                        physical_attack: pa,
                        physical_defense: pd,
                        magic_attack: ma,
                        magic_defense: md,
                        mana,
                        attack_speed: speed,
                    },
                    health,
                }
            },
        )
        .collect()
}

/// Look up a built-in definition by name.
#[must_use]
pub fn find(name: &str) -> Option<MinionDef> {
    builtin().into_iter().find(|d| d.name == name)
}

/// Display color for a rarity tier.
#[must_use]
pub fn rarity_color(rarity: Rarity) -> Color {
    Color::from(match rarity {
        Rarity::Common => "#8a8a8a",
        Rarity::Rare => "#2f80ed",
        Rarity::Epic => "#9b51e0",
    })
}

/// Icon for a minion family.
#[must_use]
pub const fn type_glyph(kind: MinionType) -> &'static str {
    match kind {
        MinionType::Implication => "⇒",
        MinionType::Algorithm => "⚙",
        MinionType::Mathematician => "∑",
        MinionType::Abstraction => "λ",
        MinionType::Dream => "☁",
        MinionType::Concept => "💡",
    }
}

/// Icon for a specialization.
#[must_use]
pub const fn specialization_glyph(specialization: Specialization) -> &'static str {
    match specialization {
        Specialization::Virus => "🦠",
        Specialization::Modeler => "📐",
        Specialization::Engineer => "🔧",
        Specialization::Dormant => "💤",
    }
}
