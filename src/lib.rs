//! Boundary-tag heap allocator for embedded systems
//!
//! This crate provides a single type called [`Allocator`]. This type
//! implements the [`core::alloc::GlobalAlloc`]-trait, which is required to
//! use the [`alloc`-crate][alloc] on `#![no_std]`-targets. The allocator
//! manages a fixed reservation of `N` bytes like a classic sbrk-grown heap:
//! the arena starts small and claims more of the reservation only when the
//! live blocks no longer fit, so the touched memory stays proportional to
//! the actual peak usage.
//!
//! # Usage
//! The usage is simple: just copy and paste the following code snipped into
//! your binary crate and potentially adjust the number of bytes of the heap
//! (here 16K):
//! ```no_run
//! #[global_allocator]
//! static ALLOCATOR: tagalloc::Allocator<16384> = tagalloc::Allocator::new();
//!
//! extern crate alloc;
//! ```
//! Afterwards you don't need to interact with the crate or the variable
//! `ALLOCATOR` anymore and can use every collection which is normally
//! provided by the `std`, e.g. `alloc::vec::Vec` or
//! `alloc::collections::BTreeMap`.
//!
//! The minimal reservation is `4112` bytes: the arena bootstraps itself with
//! 16 bytes of sentinel blocks plus one 4096-byte chunk of usable heap.
//! Requests with an alignment above 8 are not supported and fail by
//! returning a null pointer; every payload this crate hands out is 8-byte
//! aligned.
//!
//! By default placement uses a best-fit search; construct the allocator
//! with [`Allocator::with_policy`] to select the faster but more
//! fragmentation-prone first-fit search instead (see [`FitPolicy`]).
//!
//! # Implementation
//! The heap is carved into blocks, each a multiple of 8 bytes long. A block
//! starts with a 4-byte header word holding its size and two flag bits; the
//! rest of the block is the caller's payload. The arena is fenced in by two
//! synthetic always-allocated blocks, the prologue and the epilogue, so no
//! operation has to special-case the heap edges.
//!
//! 1.  Directly after setup the arena holds a single free block:
//!     ```text
//!     pppp PPPP PPPP xxxx ........................ EEEE
//!          ^-------- ^--- ^----------------------
//!          prologue  FREE size = 4096             epilogue
//!     ```
//!     (`pppp` is one padding word which makes all payloads 8-byte
//!     aligned.)
//! 2.  An allocation of up to 12 bytes turns the front of that block into a
//!     16-byte allocated block and splits the remainder off as a smaller
//!     free block:
//!     ```text
//!     pppp PPPP PPPP yyyy 0000 0000 xxxx ......... EEEE
//!                    ^--- ^-------- ^--- ^--------
//!                    USED payload   FREE size = 4080
//!     ```
//! 3.  Free blocks form a doubly-linked list through their payload bytes:
//!     the first two words of a free block's payload hold the heap offsets
//!     of the previous and next free block. An allocation therefore only
//!     searches the free blocks, never the whole heap.
//! 4.  A freed block is merged with its neighbors immediately. The header
//!     of the following block is found by adding the size; the preceding
//!     block is found through a footer word that free blocks carry in
//!     their last 4 bytes. Allocated blocks have no footer: a flag bit in
//!     the next block's header (`prev_alloc`) records that the block below
//!     is allocated and must not be merged with. This is what makes the
//!     full tail of an allocated block usable as payload.
//! 5.  When no free block fits, the arena grows by a 4096-byte chunk (or by
//!     the request size, if that is larger) and the new space becomes one
//!     free block at the high edge, merged with a free neighbor if there is
//!     one. Growing fails once the reservation `N` is used up; the
//!     allocation then reports out-of-memory by returning null.
//!
//! The same walk happens in reverse on reallocation: a new block is
//! obtained, the payload prefix is copied and the old block is freed.
//!
//! [alloc]: https://doc.rust-lang.org/alloc/index.html
#![no_std]

#[cfg(test)]
extern crate std;

use core::alloc::{GlobalAlloc, Layout};
use core::ptr;

mod raw_allocator;
use raw_allocator::RawAllocator;

pub use raw_allocator::FitPolicy;

/// The memory allocator for embedded systems.
///
/// This is the core type of this crate: it is an allocator with a
/// predefined reservation of `N` bytes. The whole reservation is counted to
/// the static memory (e.g. `.bss`-section), so the heap usage of the final
/// binary is statically bounded; the allocator itself touches the
/// reservation only as far as the peak usage requires.
///
/// Its usage is simple: just copy and paste the following in the binary
/// crate you're developing. The reservation is `16384` or 16K in this
/// example. Adjust that value to your needs.
/// ```no_run
/// #[global_allocator]
/// static ALLOCATOR: tagalloc::Allocator<16384> = tagalloc::Allocator::new();
/// ```
/// Also please refer to the [crate-level](crate)-documentation for
/// recommendations on the reservation size and general usage.
pub struct Allocator<const N: usize> {
    raw: spin::Mutex<RawAllocator<N>>,
}

impl<const N: usize> Allocator<N> {
    /// Create a new [`Allocator`] with best-fit placement.
    ///
    /// This function is a `const fn`, therefore you can call it directly
    /// when creating the allocator.
    ///
    /// # Panics
    /// This function will panic, if the supplied reservation size, i.e.
    /// `N` is less than `4112` or not divisible by `8`.
    #[must_use = "assign the allocator to a static variable and apply the `#[global_allocator]`-attribute to make it the global allocator"]
    pub const fn new() -> Self {
        Self::with_policy(FitPolicy::BestFit)
    }

    /// Create a new [`Allocator`] with the given placement policy.
    ///
    /// # Panics
    /// Same conditions as [`new`](Self::new).
    #[must_use = "assign the allocator to a static variable and apply the `#[global_allocator]`-attribute to make it the global allocator"]
    pub const fn with_policy(policy: FitPolicy) -> Self {
        Self {
            raw: spin::Mutex::new(RawAllocator::with_policy(policy)),
        }
    }
}

unsafe impl<const N: usize> GlobalAlloc for Allocator<N> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.align() > 8 {
            return ptr::null_mut();
        }
        match self.raw.lock().alloc(layout.size()) {
            Some(memory) => memory.as_mut_ptr().cast(),
            None => ptr::null_mut(),
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        if ptr.is_null() {
            return;
        }
        // SAFETY: `ptr` stems from `alloc`/`realloc` per the trait contract
        unsafe { self.raw.lock().free(ptr) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if layout.align() > 8 {
            return ptr::null_mut();
        }
        // SAFETY: `ptr` is null or stems from `alloc`/`realloc` per the
        // trait contract
        match unsafe { self.raw.lock().realloc(ptr, new_size) } {
            Some(memory) => memory.as_mut_ptr().cast(),
            None => ptr::null_mut(),
        }
    }
}
