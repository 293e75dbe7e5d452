// Demo binary for the itempool library - walks the classic cat-pool
// scenario: one pool per key, bounded checkout, fail-fast exhaustion.

use itempool::{PoolConfig, PoolError, PoolRegistry};
use std::sync::Arc;

#[derive(Debug)]
struct Cat {
    name: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = PoolRegistry::new();
    let config = PoolConfig::new(5).with_initial_labels(["Ricou", "Pilou"]);

    let pool = registry
        .get_or_create("cats", config, |name| Cat {
            name: name.to_owned(),
        })
        .expect("initial labels fit the capacity");

    // A second request with a different config returns the same pool.
    let again = registry
        .get_or_create("cats", PoolConfig::new(1), |name| Cat {
            name: name.to_owned(),
        })
        .expect("existing pool is returned as-is");
    assert!(Arc::ptr_eq(&pool, &again));
    println!("Registry returns one pool per key: capacity stays {}", again.capacity());

    let first = pool.acquire().expect("two cats available");
    println!("Here is your cat, named {}. Treat it nicely.", first.name);
    let second = pool.acquire().expect("one cat left");
    println!("Here is your cat, named {}. Treat it nicely.", second.name);

    match pool.acquire() {
        Err(PoolError::PoolExhausted) => println!("No more cat available"),
        other => println!("unexpected: {other:?}"),
    }

    pool.release(first).expect("cat came from this pool");
    println!("Thank you, your cat is back in the pool");

    let third = pool.acquire().expect("a cat was just returned");
    println!("Here is your cat again, named {}", third.name);
}
