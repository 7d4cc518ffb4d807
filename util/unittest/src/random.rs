// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Random inputs for tests.

use rand::{Rng, distr::uniform::SampleUniform};

/// Uniform integer in `[min, max]`. Swapped bounds are accepted.
pub fn random_int<T>(min: T, max: T) -> T
where
    T: SampleUniform + PartialOrd,
{
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    rand::rng().random_range(low..=high)
}

/// Uniform float in `[0, 1]`.
pub fn random_float() -> f32 {
    rand::rng().random_range(0.0..=1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_stay_in_inclusive_range() {
        for _ in 0..1000 {
            let roll = random_int(1, 6);
            assert!((1..=6).contains(&roll));
        }
        assert_eq!(random_int(7u8, 7u8), 7);
        let swapped = random_int(10i64, -10i64);
        assert!((-10..=10).contains(&swapped));
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        for _ in 0..1000 {
            let x = random_float();
            assert!((0.0..=1.0).contains(&x));
        }
    }
}
