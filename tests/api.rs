#[test]
fn is_usable_in_const_contexts() {
    const _ALLOCATOR1: tagalloc::Allocator<4112> = tagalloc::Allocator::new();
    static _ALLOCATOR2: tagalloc::Allocator<4112> = tagalloc::Allocator::new();
}

#[test]
fn supports_global_alloc() {
    fn assert<T: core::alloc::GlobalAlloc>(_: T) {}
    assert(tagalloc::Allocator::<8192>::new())
}

#[test]
fn placement_policy_is_const_selectable() {
    static _ALLOCATOR: tagalloc::Allocator<8192> =
        tagalloc::Allocator::with_policy(tagalloc::FitPolicy::FirstFit);
}

#[test]
#[should_panic(expected = "too small heap memory")]
fn min_heap_size_of_at_least_the_initial_arena() {
    let _allocator = tagalloc::Allocator::<1024>::new(); // panic here
}

#[test]
#[should_panic(expected = "divisible by 8")]
fn heap_size_must_be_a_multiple_of_8() {
    let _allocator = tagalloc::Allocator::<8193>::new(); // panic here
}

#[test]
fn zero_sized_and_overaligned_requests_yield_null() {
    use core::alloc::{GlobalAlloc, Layout};

    let allocator = tagalloc::Allocator::<8192>::new();
    let zero = Layout::from_size_align(0, 1).unwrap();
    let overaligned = Layout::from_size_align(64, 16).unwrap();
    unsafe {
        assert!(allocator.alloc(zero).is_null());
        assert!(allocator.alloc(overaligned).is_null());
    }
}
