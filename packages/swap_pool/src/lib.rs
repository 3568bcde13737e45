#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A fixed-capacity object pool that lends out pre-allocated items without touching the
//! allocator on the hot path.
//!
//! This crate provides [`SwapPool`], which creates all of its items once, when it is built, and
//! then repeatedly lends them out and takes them back. It is intended for latency-sensitive
//! loops (simulation, rendering, packet processing) that need many short-lived objects.
//!
//! # Key Features
//!
//! - **O(1) acquire and release**: a single partition index splits the pool into an active
//!   prefix and a free suffix; release swaps the released item to the boundary
//! - **No allocation after construction**: only [`SwapPool::resize()`] touches the allocator
//! - **Copyable handles with misuse detection**: [`Handle`] tokens are checked against the pool
//!   ID, a resize epoch and a per-slot generation, so foreign, stale and double releases are
//!   reported as [`Error`]s instead of corrupting the pool
//! - **Zero-copy listing**: [`SwapPool::active()`] borrows the active items in place
//! - **Explicit capacity**: the pool never grows on its own
//! - **Flexible drop policies**: optionally panic if items are still lent out when the pool
//!   is dropped
//!
//! Items are not reset when they are reused. An acquired item holds whatever value it was
//! built with or was last left with.
//!
//! # Examples
//!
//! ## Acquire, use, release
//!
//! ```rust
//! use swap_pool::SwapPool;
//!
//! let mut pool = SwapPool::<Vec<u8>>::with_capacity(16).unwrap();
//!
//! let (handle, buffer) = pool.get_next_mut().unwrap();
//! buffer.extend_from_slice(b"payload");
//!
//! assert_eq!(pool.active_count(), 1);
//!
//! pool.release(handle).unwrap();
//! assert_eq!(pool.free_count(), 16);
//!
//! // The buffer comes back with its old contents (and its allocation).
//! let (_, buffer) = pool.get_next_mut().unwrap();
//! assert_eq!(buffer, b"payload");
//! ```
//!
//! ## Cloning a template
//!
//! ```rust
//! use swap_pool::SwapPool;
//!
//! #[derive(Clone, Debug)]
//! struct Bullet {
//!     speed: f32,
//!     alive: bool,
//! }
//!
//! let template = Bullet {
//!     speed: 12.5,
//!     alive: false,
//! };
//!
//! let mut pool = SwapPool::from_template(&template, 256).unwrap();
//!
//! let bullet = pool.get_next().unwrap();
//! pool.get_mut(bullet).unwrap().alive = true;
//!
//! for bullet in pool.active() {
//!     assert!(bullet.alive);
//!     assert_eq!(bullet.speed, 12.5);
//! }
//! # pool.release(bullet).unwrap();
//! ```
//!
//! ## Handling exhaustion
//!
//! ```rust
//! use swap_pool::{Error, SwapPool};
//!
//! let mut pool = SwapPool::<u32>::with_capacity(2).unwrap();
//! let _a = pool.get_next().unwrap();
//! let _b = pool.get_next().unwrap();
//!
//! match pool.get_next() {
//!     Err(Error::PoolExhausted { capacity }) => pool.resize(capacity * 2).unwrap(),
//!     _ => unreachable!(),
//! }
//!
//! assert_eq!(pool.free_count(), 2);
//! ```

mod active;
mod builder;
mod drop_policy;
mod error;
mod handle;
mod pool;

pub use active::{ActiveHandles, ActiveItems, ActiveIter};
pub use builder::*;
pub use drop_policy::*;
pub use error::Error;
pub(crate) use error::Result;
pub use handle::Handle;
pub use pool::{DEFAULT_CAPACITY, SwapPool};
