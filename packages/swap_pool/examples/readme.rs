//! Example that demonstrates the usage shown in the package documentation.
//!
//! This shows how to use `SwapPool` to recycle objects in a simulation loop.

use swap_pool::{Error, SwapPool};

#[derive(Clone, Debug, Default)]
struct Projectile {
    position: f32,
    velocity: f32,
}

fn main() -> Result<(), Error> {
    println!("=== Swap Pool README Example ===");

    let template = Projectile {
        position: 0.0,
        velocity: 2.5,
    };

    // All projectiles are allocated here, once.
    let mut pool = SwapPool::from_template(&template, 4)?;

    // Fire until the pool runs dry.
    let mut fired = Vec::new();
    loop {
        match pool.get_next() {
            Ok(handle) => fired.push(handle),
            Err(Error::PoolExhausted { capacity }) => {
                println!("Pool of {capacity} projectiles exhausted");
                break;
            }
            Err(other) => return Err(other),
        }
    }

    // Advance the simulation in place.
    for _ in 0..3 {
        pool.for_each_active_mut(|p| p.position += p.velocity);
    }

    for (index, projectile) in pool.active().iter().enumerate() {
        println!("Projectile {index}: {projectile:?}");
    }

    // Return half of them. The rest stay valid, no matter how the pool reorders itself.
    for handle in fired.drain(..2) {
        pool.release(handle)?;
    }

    println!(
        "Active: {}, free: {}",
        pool.active_count(),
        pool.free_count()
    );

    // Reused projectiles keep their old state until you reset them.
    let (_, reused) = pool.get_next_mut()?;
    println!("Reused projectile before reset: {reused:?}");
    reused.position = 0.0;

    println!("README example completed successfully!");
    Ok(())
}
