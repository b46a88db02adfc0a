/// Entities that can be parked in a [`Pool`] and handed out again.
pub trait Recyclable {
    /// Arguments needed to put an entity into play.
    type Spawn;

    fn spawn(args: Self::Spawn) -> Self;

    /// Re-initialises a recycled entity with fresh spawn arguments.
    fn rearm(&mut self, args: Self::Spawn);

    /// Clears mutable state before the entity is parked.
    fn reset(&mut self);
}

/// Free list of reusable entities. Grows on demand, so acquiring never fails.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    free: Vec<T>,
    allocated: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            free: Vec::new(),
            allocated: 0,
        }
    }

    /// Number of parked entities waiting to be reused.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Number of entities this pool ever had to allocate.
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

impl<T: Recyclable> Pool<T> {
    pub fn acquire(&mut self, args: T::Spawn) -> T {
        match self.free.pop() {
            Some(mut entity) => {
                entity.rearm(args);
                entity
            }
            None => {
                self.allocated += 1;
                T::spawn(args)
            }
        }
    }

    /// Takes entities back. Ownership moves into the pool, so a recycled
    /// entity cannot be touched again until it is re-acquired.
    pub fn recycle<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = T>,
    {
        for mut entity in entities {
            entity.reset();
            self.free.push(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Token {
        value: i32,
        generation: u32,
    }

    impl Recyclable for Token {
        type Spawn = i32;

        fn spawn(value: i32) -> Self {
            Self {
                value,
                generation: 0,
            }
        }

        fn rearm(&mut self, value: i32) {
            self.value = value;
            self.generation += 1;
        }

        fn reset(&mut self) {
            self.value = 0;
        }
    }

    #[test]
    fn test_acquire_allocates_when_empty() {
        let mut pool: Pool<Token> = Pool::new();
        let token = pool.acquire(7);
        assert_eq!(token.value, 7);
        assert_eq!(pool.allocated(), 1);
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn test_recycled_entity_is_reused() {
        let mut pool: Pool<Token> = Pool::new();
        let token = pool.acquire(7);
        pool.recycle(vec![token]);
        assert_eq!(pool.free_len(), 1);

        let token = pool.acquire(9);
        assert_eq!(token.value, 9);
        assert_eq!(token.generation, 1);
        assert_eq!(pool.allocated(), 1);
        assert_eq!(pool.free_len(), 0);
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_pool_never_allocates_more_than_peak_live(
                ops in prop::collection::vec(prop::bool::ANY, 0..200)
            ) {
                let mut pool: Pool<Token> = Pool::new();
                let mut live = Vec::new();
                let mut peak = 0;
                for acquire in ops {
                    if acquire {
                        live.push(pool.acquire(1));
                    } else if let Some(token) = live.pop() {
                        pool.recycle(vec![token]);
                    }
                    peak = peak.max(live.len());
                    prop_assert_eq!(pool.allocated(), live.len() + pool.free_len());
                }
                prop_assert_eq!(pool.allocated(), peak);
            }
        }
    }
}
