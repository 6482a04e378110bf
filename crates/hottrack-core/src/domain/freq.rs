//! Frequency sampling and the temperature calculus.
//!
//! `nr_reads`/`nr_writes` are plain atomics — there is no correctness reason
//! to serialize a counter bump. The EMA fields (`avg_delta_*`) and the two
//! `last_*_time` timestamps are updated together under a small mutex
//! because `update_sample` needs a consistent read-modify-write of all
//! three; the spec only requires that this group not tear, not that it be
//! lock-free.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::config::TemperatureCoefficients;

/// Mutable half of a [`FreqSample`]: everything that needs a joint
/// read-modify-write on every access.
#[derive(Debug, Clone, Copy)]
struct FreqEma {
    last_read_time: u64,
    last_write_time: u64,
    avg_delta_reads: u64,
    avg_delta_writes: u64,
}

impl Default for FreqEma {
    fn default() -> Self {
        // u64::MAX biases a freshly-seen item toward "cold" until a second
        // sample gives the EMA something real to decay toward.
        Self {
            last_read_time: 0,
            last_write_time: 0,
            avg_delta_reads: u64::MAX,
            avg_delta_writes: u64::MAX,
        }
    }
}

/// Per-entity access-frequency state backing the temperature calculus.
#[derive(Debug, Default)]
pub struct FreqSample {
    nr_reads: AtomicU64,
    nr_writes: AtomicU64,
    ema: Mutex<FreqEma>,
}

impl FreqSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nr_reads(&self) -> u64 {
        self.nr_reads.load(Ordering::Relaxed)
    }

    pub fn nr_writes(&self) -> u64 {
        self.nr_writes.load(Ordering::Relaxed)
    }

    /// Record one access at time `now` (nanoseconds on whatever [`Clock`]
    /// the caller uses), updating the read or write side.
    ///
    /// [`Clock`]: crate::ports::Clock
    pub fn update(&self, now: u64, is_write: bool, freq_power: u32) {
        let mut ema = self.ema.lock().unwrap();
        if is_write {
            self.nr_writes.fetch_add(1, Ordering::Relaxed);
            let delta = now.saturating_sub(ema.last_write_time);
            ema.avg_delta_writes = decay(ema.avg_delta_writes, delta, freq_power);
            ema.last_write_time = now;
        } else {
            self.nr_reads.fetch_add(1, Ordering::Relaxed);
            let delta = now.saturating_sub(ema.last_read_time);
            ema.avg_delta_reads = decay(ema.avg_delta_reads, delta, freq_power);
            ema.last_read_time = now;
        }
    }

    fn snapshot(&self) -> (u64, u64, u64, u64) {
        let ema = self.ema.lock().unwrap();
        (
            ema.last_read_time,
            ema.last_write_time,
            ema.avg_delta_reads,
            ema.avg_delta_writes,
        )
    }

    pub fn last_read_time(&self) -> u64 {
        self.ema.lock().unwrap().last_read_time
    }

    pub fn last_write_time(&self) -> u64 {
        self.ema.lock().unwrap().last_write_time
    }

    pub fn avg_delta_reads(&self) -> u64 {
        self.ema.lock().unwrap().avg_delta_reads
    }

    pub fn avg_delta_writes(&self) -> u64 {
        self.ema.lock().unwrap().avg_delta_writes
    }
}

/// Exponential moving average update, the same wrapping fixed-point trick
/// the kernel's load-average calculation uses: `avg += (delta - avg) /
/// 2^power`, computed as `((avg << power) - avg + delta) >> power` so the
/// whole thing stays in integer arithmetic. Intentionally wrapping, not
/// saturating: the subtraction and the shift cancel out over repeated
/// calls even when the intermediate `avg << power` overflows.
fn decay(avg: u64, delta: u64, power: u32) -> u64 {
    let shifted = avg.wrapping_shl(power);
    shifted.wrapping_sub(avg).wrapping_add(delta) >> power
}

fn sat_u32(v: u64) -> u32 {
    v.min(u32::MAX as u64) as u32
}

/// Compute the current temperature of an entity from its frequency sample.
///
/// Six saturating terms — raw read/write frequency, read/write recency, and
/// read/write burstiness — each scaled by a configured coefficient power
/// and summed with `saturating_add` so the result is monotonic in its
/// inputs instead of wrapping around near `u32::MAX`.
pub fn temperature(sample: &FreqSample, now: u64, coeffs: &TemperatureCoefficients) -> u32 {
    let (last_read, last_write, avg_read, avg_write) = sample.snapshot();
    let nr_reads = sample.nr_reads();
    let nr_writes = sample.nr_writes();

    let term_nr_reads = sat_u32(
        (nr_reads)
            .checked_shl(coeffs.nr_read_mult_power)
            .unwrap_or(u64::MAX),
    ) >> shift_for(coeffs.nr_read_coeff_power);
    let term_nr_writes = sat_u32(
        (nr_writes)
            .checked_shl(coeffs.nr_write_mult_power)
            .unwrap_or(u64::MAX),
    ) >> shift_for(coeffs.nr_write_coeff_power);

    // A side with at most one access has no second timestamp to measure
    // recency against; without this, the access that just set `last_*_time`
    // would read as maximally recent (age 0) forever, since `now` and
    // `last_*_time` are the same instant on that very access.
    let term_last_read = if nr_reads <= 1 {
        0
    } else {
        let read_age = now.saturating_sub(last_read) >> coeffs.last_read_div_power.min(63);
        sat_u32((1u64 << 32).saturating_sub(read_age)) >> shift_for(coeffs.last_read_coeff_power)
    };
    let term_last_write = if nr_writes <= 1 {
        0
    } else {
        let write_age = now.saturating_sub(last_write) >> coeffs.last_write_div_power.min(63);
        sat_u32((1u64 << 32).saturating_sub(write_age)) >> shift_for(coeffs.last_write_coeff_power)
    };

    let term_avg_read = sat_u32((u64::MAX - avg_read) >> coeffs.avg_read_div_power.min(63))
        >> shift_for(coeffs.avg_read_coeff_power);
    let term_avg_write = sat_u32((u64::MAX - avg_write) >> coeffs.avg_write_div_power.min(63))
        >> shift_for(coeffs.avg_write_coeff_power);

    term_nr_reads
        .saturating_add(term_nr_writes)
        .saturating_add(term_last_read)
        .saturating_add(term_last_write)
        .saturating_add(term_avg_read)
        .saturating_add(term_avg_write)
}

/// Coefficient powers are documented as 0..=3, where a higher power means
/// *more* weight on that term. Expressed as a shift, that's less shift, so
/// the power is subtracted from the ceiling rather than applied directly;
/// `saturating_sub` keeps an out-of-range power from underflowing instead
/// of turning into a no-op shift.
fn shift_for(coeff_power: u32) -> u32 {
    3u32.saturating_sub(coeff_power)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeffs() -> TemperatureCoefficients {
        TemperatureCoefficients::default()
    }

    #[test]
    fn fresh_sample_is_coldest() {
        let sample = FreqSample::new();
        let temp = temperature(&sample, 0, &coeffs());
        assert_eq!(temp, 0);
    }

    #[test]
    fn more_reads_never_lowers_temperature() {
        let sample = FreqSample::new();
        let t0 = temperature(&sample, 1_000, &coeffs());
        sample.update(1_000, false, 4);
        let t1 = temperature(&sample, 1_000, &coeffs());
        assert!(t1 >= t0);
        sample.update(1_100, false, 4);
        let t2 = temperature(&sample, 1_100, &coeffs());
        assert!(t2 >= t1);
    }

    #[test]
    fn recency_decays_temperature_over_time() {
        let sample = FreqSample::new();
        // A second access is required before the recency term means
        // anything; see the `nr_reads <= 1` gate in `temperature`.
        sample.update(1_000, false, 4);
        sample.update(2_000, false, 4);
        let hot = temperature(&sample, 2_000, &coeffs());
        let cold = temperature(&sample, 2_000 + (1u64 << 40), &coeffs());
        assert!(cold < hot);
    }

    #[test]
    fn temperature_never_panics_on_saturating_inputs() {
        let sample = FreqSample::new();
        for _ in 0..10 {
            sample.update(u64::MAX, true, 4);
            sample.update(u64::MAX, false, 4);
        }
        let temp = temperature(&sample, u64::MAX, &coeffs());
        assert!(temp <= u32::MAX);
    }

    #[test]
    fn write_access_updates_only_write_side() {
        let sample = FreqSample::new();
        sample.update(500, true, 4);
        assert_eq!(sample.nr_writes(), 1);
        assert_eq!(sample.nr_reads(), 0);
        assert_eq!(sample.last_write_time(), 500);
        assert_eq!(sample.last_read_time(), 0);
    }
}
