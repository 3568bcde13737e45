//! Integration tests exercising the public API of `swap_pool` the way a game or simulation
//! loop would.
#![allow(
    missing_docs,
    clippy::indexing_slicing,
    reason = "No need for API documentation or checked indexing in test code"
)]

use swap_pool::{DEFAULT_CAPACITY, DropPolicy, Error, Handle, SwapPool};

#[derive(Clone, Debug, Default, PartialEq)]
struct Particle {
    x: i32,
    ttl: u32,
}

fn snapshot(pool: &SwapPool<Particle>) -> Vec<i32> {
    pool.active().iter().map(|p| p.x).collect()
}

#[test]
fn default_pool_has_ten_free_items() {
    let pool = SwapPool::<Particle>::default();

    assert_eq!(pool.capacity(), DEFAULT_CAPACITY);
    assert_eq!(pool.capacity(), 10);
    assert_eq!(pool.free_count(), 10);
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn construction_rejects_zero_capacity() {
    assert_eq!(
        SwapPool::<Particle>::with_capacity(0).unwrap_err(),
        Error::InvalidCapacity { requested: 0 }
    );
    assert_eq!(
        SwapPool::from_template(&Particle::default(), 0).unwrap_err(),
        Error::InvalidCapacity { requested: 0 }
    );
}

#[test]
fn template_is_cloned_into_every_item() {
    let template = Particle { x: -1, ttl: 60 };
    let mut pool = SwapPool::from_template(&template, 3).unwrap();

    while pool.get_next().is_ok() {}

    assert!(pool.active().iter().all(|p| *p == template));
}

#[test]
fn partition_stays_in_bounds_through_mixed_operations() {
    let mut pool = SwapPool::<Particle>::with_capacity(6).unwrap();
    let mut live: Vec<Handle> = Vec::new();

    // Deterministic pseudo-random mix of acquires and releases.
    let mut state = 0x2545_f491_u32;
    for _ in 0..500 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;

        if state % 3 == 0 && !live.is_empty() {
            let victim = live.swap_remove(usize::try_from(state).unwrap() % live.len());
            pool.release(victim).unwrap();
        } else {
            match pool.get_next() {
                Ok(handle) => live.push(handle),
                Err(error) => assert_eq!(error, Error::PoolExhausted { capacity: 6 }),
            }
        }

        assert!(pool.active_count() <= pool.capacity());
        assert_eq!(pool.active_count(), live.len());
        assert_eq!(pool.active_count() + pool.free_count(), pool.capacity());

        for handle in &live {
            _ = pool.get(*handle).unwrap();
        }
    }
}

#[test]
fn capacity_n_accepts_exactly_n_acquires() {
    let mut pool = SwapPool::<Particle>::with_capacity(3).unwrap();

    let handles = (0..3).map(|_| pool.get_next().unwrap()).collect::<Vec<_>>();
    assert_eq!(pool.get_next(), Err(Error::PoolExhausted { capacity: 3 }));

    pool.release(handles[0]).unwrap();

    _ = pool.get_next().unwrap();
    assert_eq!(pool.get_next(), Err(Error::PoolExhausted { capacity: 3 }));
}

#[test]
fn released_value_is_retained_on_reacquire() {
    let mut pool = SwapPool::<Particle>::with_capacity(4).unwrap();

    let handle = pool.get_next().unwrap();
    *pool.get_mut(handle).unwrap() = Particle { x: 7, ttl: 3 };
    pool.release(handle).unwrap();

    let again = pool.get_next().unwrap();

    assert_eq!(*pool.get(again).unwrap(), Particle { x: 7, ttl: 3 });
}

#[test]
fn release_keeps_other_handles_pointing_at_their_items() {
    let mut pool = SwapPool::<Particle>::with_capacity(4).unwrap();

    let handles = (0..4)
        .map(|x| {
            let (handle, particle) = pool.get_next_mut().unwrap();
            particle.x = x;
            handle
        })
        .collect::<Vec<_>>();

    pool.release(handles[0]).unwrap();

    // The former last active item was relocated to the front of the active region.
    assert_eq!(snapshot(&pool), vec![3, 1, 2]);

    for (x, handle) in handles.iter().enumerate().skip(1) {
        assert_eq!(pool.get(*handle).unwrap().x, i32::try_from(x).unwrap());
    }
}

#[test]
fn double_release_leaves_counts_unchanged() {
    let mut pool = SwapPool::<Particle>::with_capacity(3).unwrap();

    let a = pool.get_next().unwrap();
    let _b = pool.get_next().unwrap();

    pool.release(a).unwrap();
    let (active, free) = (pool.active_count(), pool.free_count());

    assert_eq!(pool.release(a), Err(Error::AlreadyReleased));
    assert_eq!((pool.active_count(), pool.free_count()), (active, free));
}

#[test]
fn foreign_handle_is_rejected() {
    let mut pool = SwapPool::<Particle>::with_capacity(3).unwrap();
    let mut other = SwapPool::<Particle>::with_capacity(3).unwrap();

    let _mine = pool.get_next().unwrap();
    let theirs = other.get_next().unwrap();

    assert_eq!(pool.release(theirs), Err(Error::UnknownHandle));
    assert_eq!(pool.active_count(), 1);
    assert_eq!(other.active_count(), 1);
}

#[test]
fn growth_clones_last_item_and_keeps_partition() {
    let mut pool = SwapPool::<Particle>::with_capacity(3).unwrap();

    for x in [1, 2, 3] {
        let (_, particle) = pool.get_next_mut().unwrap();
        particle.x = x;
    }

    let last = pool.active().handles().last().unwrap();
    pool.release(last).unwrap();

    pool.resize(5).unwrap();

    assert_eq!(pool.capacity(), 5);
    assert_eq!(pool.active_count(), 2);
    assert_eq!(snapshot(&pool), vec![1, 2]);

    // The free region is [3, 3, 3]: the former last item plus two clones of it.
    while pool.get_next().is_ok() {}
    assert_eq!(snapshot(&pool), vec![1, 2, 3, 3, 3]);
}

#[test]
fn shrink_below_partition_clamps_activity() {
    let mut pool = SwapPool::<Particle>::with_capacity(5).unwrap();

    while pool.get_next().is_ok() {}
    assert!(pool.is_exhausted());

    pool.resize(3).unwrap();

    assert_eq!(pool.capacity(), 3);
    assert_eq!(pool.active_count(), 3);
    assert_eq!(pool.free_count(), 0);
}

#[test]
fn resize_rejects_zero_and_keeps_handles() {
    let mut pool = SwapPool::<Particle>::with_capacity(2).unwrap();
    let handle = pool.get_next().unwrap();

    assert_eq!(pool.resize(0), Err(Error::InvalidCapacity { requested: 0 }));
    assert_eq!(pool.capacity(), 2);
    pool.release(handle).unwrap();
}

#[test]
fn handles_do_not_survive_resize() {
    let mut pool = SwapPool::<Particle>::with_capacity(2).unwrap();
    let handle = pool.get_next().unwrap();

    pool.resize(4).unwrap();

    assert_eq!(pool.release(handle), Err(Error::UnknownHandle));
    assert_eq!(pool.active_count(), 1);

    let relisted = pool.active().handles().collect::<Vec<_>>();
    for handle in relisted {
        pool.release(handle).unwrap();
    }
    assert!(pool.is_all_free());
}

#[test]
fn simulation_tick_expires_particles() {
    let mut pool = SwapPool::<Particle>::with_capacity(8).unwrap();

    for ttl in 1..=5 {
        let (_, particle) = pool.get_next_mut().unwrap();
        *particle = Particle {
            x: i32::try_from(ttl).unwrap(),
            ttl,
        };
    }

    for _ in 0..3 {
        pool.for_each_active_mut(|p| p.ttl = p.ttl.saturating_sub(1));

        let expired = pool
            .active()
            .handles()
            .zip(pool.active().iter())
            .filter(|(_, p)| p.ttl == 0)
            .map(|(handle, _)| handle)
            .collect::<Vec<_>>();

        for handle in expired {
            pool.release(handle).unwrap();
        }
    }

    let mut remaining = snapshot(&pool);
    remaining.sort_unstable();
    assert_eq!(remaining, vec![4, 5]);
}

#[test]
fn must_not_drop_items_is_satisfied_by_release_all() {
    let mut pool = SwapPool::<Particle>::builder()
        .capacity(4)
        .drop_policy(DropPolicy::MustNotDropItems)
        .build()
        .unwrap();

    _ = pool.get_next().unwrap();
    _ = pool.get_next().unwrap();

    pool.release_all();
}
