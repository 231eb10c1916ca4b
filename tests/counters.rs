use kira_pathway_translator::counters::CounterRegistry;

#[test]
fn entry_ids_are_dense_and_monotonic() {
    let mut counters = CounterRegistry::new();
    let ids = (0..50)
        .map(|step| {
            if step % 3 == 0 {
                counters.next_unknown_name();
            }
            counters.next_entry_id()
        })
        .collect::<Vec<_>>();
    assert_eq!(ids, (1..=50).collect::<Vec<u32>>());
}

#[test]
fn fallback_numbers_start_at_seed() {
    let mut counters = CounterRegistry::new();
    assert_eq!(counters.next_fallback_pathway_number(), 100_000);
    assert_eq!(counters.next_fallback_pathway_number(), 100_001);
    assert_eq!(counters.next_reaction_name(), "rn:unknown1");
    assert_eq!(counters.next_reaction_name(), "rn:unknown2");
}

#[test]
fn registries_do_not_share_state() {
    let mut first = CounterRegistry::new();
    let mut second = CounterRegistry::new();
    first.next_unknown_name();
    assert_eq!(first.next_unknown_name(), "unknown2");
    assert_eq!(second.next_unknown_name(), "unknown1");
}
