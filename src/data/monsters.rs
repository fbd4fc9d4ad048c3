use bracket_random::prelude::RandomNumberGenerator;

/// Base stats shared by every kind of actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorTemplate {
    pub name: &'static str,
    pub hp: i32,
    pub power: i32,
    pub defense: i32,
    /// Energy gained per turn; one action costs `ACTION_COST`.
    pub speed: i32,
    pub sight: i32,
}

#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub stats: ActorTemplate,
    /// Relative spawn weight.
    pub weight: i32,
}

impl MonsterTemplate {
    pub fn roster() -> Vec<Self> {
        vec![
            Self::new("Kobold", 6, 3, 0, 60, 6, 6),
            Self::new("Giant Rat", 4, 2, 0, 80, 4, 3),
            Self::new("Goblin", 9, 4, 1, 60, 7, 1),
        ]
    }

    /// Weighted pick from `roster`; `None` when the roster is empty.
    pub fn choose<'r>(roster: &'r [Self], rng: &mut RandomNumberGenerator) -> Option<&'r Self> {
        let total: i32 = roster.iter().map(|t| t.weight.max(0)).sum();
        if total <= 0 {
            return roster.first();
        }
        let mut roll = rng.range(0, total);
        for template in roster {
            let weight = template.weight.max(0);
            if roll < weight {
                return Some(template);
            }
            roll -= weight;
        }
        roster.last()
    }

    fn new(
        name: &'static str,
        hp: i32,
        power: i32,
        defense: i32,
        speed: i32,
        sight: i32,
        weight: i32,
    ) -> Self {
        Self {
            stats: ActorTemplate {
                name,
                hp,
                power,
                defense,
                speed,
                sight,
            },
            weight,
        }
    }
}
