use std::fmt::Debug;

use rand::Rng;

use svcat_types::defaults::{MAX_GENERATED_NAME_LENGTH, MAX_GENERATED_NAME_RANDOM_LENGTH};

// no vowels, avoids generating words
const ALPHANUMS: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";

/// Produces a unique name from the `generateName` base of an object
pub trait NameGenerator: Debug + Send + Sync {
    fn generate_name(&self, base: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleNameGenerator;

impl NameGenerator for SimpleNameGenerator {
    fn generate_name(&self, base: &str) -> String {
        let mut rng = rand::thread_rng();
        let mut name: String = base.chars().take(MAX_GENERATED_NAME_LENGTH).collect();
        for _ in 0..MAX_GENERATED_NAME_RANDOM_LENGTH {
            name.push(ALPHANUMS[rng.gen_range(0..ALPHANUMS.len())] as char);
        }
        name
    }
}
