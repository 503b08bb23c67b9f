use serde::Deserialize;

/// `{epoch, round}` pair returned by the epoch clock. Totally ordered
/// lexicographically; read-only once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct Epoch {
    pub epoch: i64,
    pub round: i64,
}

impl Epoch {
    pub fn new(epoch: i64, round: i64) -> Self {
        Self { epoch, round }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_lexicographically() {
        assert!(Epoch::new(1, 9) < Epoch::new(2, 0));
        assert!(Epoch::new(2, 0) < Epoch::new(2, 1));
        assert_eq!(Epoch::new(2, 1), Epoch::new(2, 1));
    }
}
