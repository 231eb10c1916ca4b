//! Run-scoped monotonic counters.
//!
//! One registry belongs to one conversion run. Runs that execute side by
//! side must each own their registry; sharing one between concurrent runs
//! is not supported.

pub const UNKNOWN_NAME: &str = "unknown";
pub const FALLBACK_PATHWAY_NUMBER_SEED: u32 = 100_000;

#[derive(Debug, Clone)]
pub struct CounterRegistry {
    entry_id: u32,
    reaction_id: u32,
    unknown_no: u32,
    pathway_number: u32,
}

impl Default for CounterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterRegistry {
    pub fn new() -> Self {
        Self {
            entry_id: 0,
            reaction_id: 0,
            unknown_no: 0,
            pathway_number: FALLBACK_PATHWAY_NUMBER_SEED,
        }
    }

    pub fn next_entry_id(&mut self) -> u32 {
        self.entry_id += 1;
        self.entry_id
    }

    /// `rn:unknown<N>`
    pub fn next_reaction_name(&mut self) -> String {
        self.reaction_id += 1;
        format!("rn:{UNKNOWN_NAME}{}", self.reaction_id)
    }

    /// `unknown<N>`
    pub fn next_unknown_name(&mut self) -> String {
        self.unknown_no += 1;
        format!("{UNKNOWN_NAME}{}", self.unknown_no)
    }

    /// Returns the current fallback number, then advances it; the first call
    /// on a fresh registry yields the seed.
    pub fn next_fallback_pathway_number(&mut self) -> u32 {
        let number = self.pathway_number;
        self.pathway_number += 1;
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_independent() {
        let mut counters = CounterRegistry::new();
        assert_eq!(counters.next_entry_id(), 1);
        assert_eq!(counters.next_unknown_name(), "unknown1");
        assert_eq!(counters.next_entry_id(), 2);
        assert_eq!(counters.next_reaction_name(), "rn:unknown1");
        assert_eq!(counters.next_fallback_pathway_number(), 100_000);
        assert_eq!(counters.next_unknown_name(), "unknown2");
    }
}
