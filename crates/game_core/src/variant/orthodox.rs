use super::{Rules, Variant};

/// Standard chess rules, also used for Wild (Fischer-random) starts where
/// only castling geometry differs and that lives in the position.
#[derive(Debug)]
pub struct OrthodoxRules(pub(crate) Variant);

impl Rules for OrthodoxRules {
    fn variant(&self) -> Variant {
        self.0
    }
}
