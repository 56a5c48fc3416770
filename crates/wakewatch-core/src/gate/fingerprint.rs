//! Content fingerprints used to skip reparsing unchanged reports.

use xxhash_rust::xxh3::xxh3_64;

/// Cheap summary of report text.
///
/// Equal texts must give equal fingerprints. Different texts may collide;
/// a collision only costs a missed refresh until the report changes again.
pub trait Fingerprint: Send + Sync {
    fn fingerprint(&self, text: &str) -> u64;
}

impl<F: Fingerprint + ?Sized> Fingerprint for Box<F> {
    fn fingerprint(&self, text: &str) -> u64 {
        (**self).fingerprint(text)
    }
}

/// 64-bit xxh3 hash of the whole text. The default strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct Xxh3Fingerprint;

impl Fingerprint for Xxh3Fingerprint {
    fn fingerprint(&self, text: &str) -> u64 {
        xxh3_64(text.as_bytes())
    }
}

/// Length plus first and last character.
///
/// Collides on any edit that keeps length and both ends, which is common for
/// reports that differ only in a process path. Use only when hashing the
/// full text is not wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct EdgeFingerprint;

impl Fingerprint for EdgeFingerprint {
    fn fingerprint(&self, text: &str) -> u64 {
        let len = text.len() as u64;
        let first = text.chars().next().map_or(0, u64::from);
        let last = text.chars().next_back().map_or(0, u64::from);
        (len << 42) ^ (first << 21) ^ last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xxh3_stable_and_distinct() {
        let fp = Xxh3Fingerprint;
        assert_eq!(fp.fingerprint("DISPLAY:\n"), fp.fingerprint("DISPLAY:\n"));
        assert_ne!(
            fp.fingerprint("DISPLAY:\n[PROCESS] a.exe"),
            fp.fingerprint("DISPLAY:\n[PROCESS] b.exe")
        );
    }

    #[test]
    fn test_edge_collides_on_same_shape() {
        let fp = EdgeFingerprint;
        assert_eq!(fp.fingerprint("a-x-z"), fp.fingerprint("a-y-z"));
        assert_ne!(fp.fingerprint("abc"), fp.fingerprint("abcd"));
        assert_ne!(fp.fingerprint("abc"), fp.fingerprint("xbc"));
    }

    #[test]
    fn test_boxed_strategy_delegates() {
        let boxed: Box<dyn Fingerprint> = Box::new(Xxh3Fingerprint);
        assert_eq!(
            boxed.fingerprint("report"),
            Xxh3Fingerprint.fingerprint("report")
        );
    }
}
