use rand::Rng as _;

/// Decides whether an update reported at `sample_rate` is sent.
///
/// Rates of 1.0 or more always send, so the common case never touches the random number generator.
pub(crate) fn should_send(sample_rate: f64) -> bool {
    if sample_rate >= 1.0 {
        return true;
    }

    sample_rate > 0.0 && rand::rng().random::<f64>() < sample_rate
}

#[cfg(test)]
mod tests {
    use super::should_send;

    #[test]
    fn full_rate_always_sends() {
        assert!((0..1_000).all(|_| should_send(1.0)));
    }

    #[test]
    fn zero_and_invalid_rates_never_send() {
        assert!((0..1_000).all(|_| !should_send(0.0)));
        assert!((0..1_000).all(|_| !should_send(-0.5)));
        assert!((0..1_000).all(|_| !should_send(f64::NAN)));
    }

    #[test]
    fn partial_rate_sends_roughly_that_share() {
        let sent = (0..20_000).filter(|_| should_send(0.5)).count();
        assert!((8_000..12_000).contains(&sent), "sent {} of 20000", sent);
    }
}
