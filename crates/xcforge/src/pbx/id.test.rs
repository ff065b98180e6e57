use super::*;

#[test]
fn allocated_ids_are_canonical() {
    let mut allocator = IdAllocator::new("MyApp");
    for _ in 0..32 {
        let id = allocator.allocate();
        assert!(id.is_canonical(), "non-canonical id: {id}");
    }
}

#[test]
fn allocation_is_deterministic_per_seed() {
    let mut a = IdAllocator::new("MyApp");
    let mut b = IdAllocator::new("MyApp");
    for _ in 0..8 {
        assert_eq!(a.allocate(), b.allocate());
    }
}

#[test]
fn different_seeds_diverge() {
    let mut a = IdAllocator::new("MyApp");
    let mut b = IdAllocator::new("OtherApp");
    assert_ne!(a.allocate(), b.allocate());
}

#[test]
fn allocation_never_repeats() {
    let mut allocator = IdAllocator::new("MyApp");
    let mut seen = std::collections::HashSet::new();
    for _ in 0..256 {
        assert!(seen.insert(allocator.allocate()));
    }
}

#[test]
fn registered_ids_are_skipped() {
    let mut scout = IdAllocator::new("MyApp");
    let first = scout.allocate();
    let second = scout.allocate();

    let mut allocator = IdAllocator::new("MyApp");
    assert!(allocator.register(&first));
    assert!(!allocator.register(&first), "double registration must report");
    assert_eq!(allocator.allocate(), second);
}

#[test]
fn register_reports_known_ids() {
    let mut allocator = IdAllocator::new("MyApp");
    let id = ObjectId::new("4B2A1C0D2C5E10A400F3D9E1");
    assert!(!allocator.is_registered(&id));
    allocator.register(&id);
    assert!(allocator.is_registered(&id));
    assert_eq!(allocator.registered_count(), 1);
}

#[test]
fn canonical_shape_is_enforced() {
    assert!(ObjectId::new("4B2A1C0D2C5E10A400F3D9E1").is_canonical());
    assert!(!ObjectId::new("4b2a1c0d2c5e10a400f3d9e1").is_canonical());
    assert!(!ObjectId::new("4B2A").is_canonical());
    assert!(!ObjectId::new("4B2A1C0D2C5E10A400F3D9EZ").is_canonical());
}
