// src/summarize/personas.rs
use rand::Rng;

/// A named voice for the persona summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: &'static str,
    /// Instructions with a `{topic}` slot.
    pub template: &'static str,
}

impl Persona {
    pub fn instructions(&self, topic: &str) -> String {
        self.template.replace("{topic}", topic)
    }
}

const KVOTHE: Persona = Persona {
    name: "Kvothe",
    template: "You are Kvothe, the legendary arcanist and adventurer. Summarize the following news about '{topic}' in your characteristic poetic, sometimes dramatic, and self-aware voice, as if you are recounting a story. Reflect on the implications of the news for the world and your own journey. Make it sound like a personal letter or journal entry. Please keep the response to a paragraph or two.",
};

const BAST: Persona = Persona {
    name: "Bast",
    template: "You are Bast, Kvothe's loyal fae assistant. Summarize the following news about '{topic}' in your charming, slightly mischievous, and sometimes exasperated voice. Express your excitement, concerns, and your need for this story to continue. Please keep the response to a paragraph or two.",
};

const CHRONICLER: Persona = Persona {
    name: "Chronicler",
    template: "You are the Chronicler, a man on a mission to get the full story of Kvothe. Summarize the following news about '{topic}' in a scholarly, longing manner. You have been waiting for the end of this story for a long time, and you are desperate for news. Please keep the response to a paragraph or two.",
};

/// Fixed persona table. Built once at startup and only ever borrowed.
#[derive(Debug, Clone)]
pub struct PersonaTable {
    personas: Vec<Persona>,
}

impl PersonaTable {
    /// Kvothe, Bast, Chronicler; Kvothe doubles as the fallback.
    pub fn standard() -> Self {
        Self {
            personas: vec![KVOTHE, BAST, CHRONICLER],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Unknown names resolve to the first entry.
    pub fn get_or_default(&self, name: &str) -> &Persona {
        self.get(name).unwrap_or(&self.personas[0])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.personas.iter().map(|p| p.name).collect()
    }

    /// Uniform pick; the caller owns the RNG so tests can seed it.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Persona {
        let idx = rng.random_range(0..self.personas.len());
        &self.personas[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn lookup_is_case_insensitive_with_fallback() {
        let t = PersonaTable::standard();
        assert_eq!(t.get("chronicler").unwrap().name, "Chronicler");
        assert!(t.get("Denna").is_none());
        assert_eq!(t.get_or_default("Denna").name, "Kvothe");
    }

    #[test]
    fn instructions_fill_the_topic() {
        let t = PersonaTable::standard();
        for name in t.names() {
            let text = t.get(name).unwrap().instructions("Winds of Winter");
            assert!(text.contains("news about 'Winds of Winter'"), "{name}");
            assert!(!text.contains("{topic}"));
        }
    }

    #[test]
    fn seeded_choice_is_repeatable_and_covers_table() {
        let t = PersonaTable::standard();
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..20).map(|_| t.choose(&mut rng).name).collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..20).map(|_| t.choose(&mut rng).name).collect()
        };
        assert_eq!(a, b);

        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(t.choose(&mut rng).name);
        }
        assert_eq!(seen.len(), t.names().len());
    }
}
