use uuid::Uuid;

/// Source of bearer tokens handed to agents at confirm time. The
/// production implementation must be cryptographically random.
pub trait TokenSource: Send + Sync {
    fn mint(&self) -> String;
}

/// Random v4 UUIDs, backed by the OS entropy source.
pub struct UuidTokenSource;

impl TokenSource for UuidTokenSource {
    fn mint(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
pub(crate) struct SeqTokenSource(std::sync::atomic::AtomicU32);

#[cfg(test)]
impl SeqTokenSource {
    pub fn new() -> Self {
        Self(std::sync::atomic::AtomicU32::new(0))
    }
}

#[cfg(test)]
impl TokenSource for SeqTokenSource {
    fn mint(&self) -> String {
        let n = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("token-{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_tokens_are_unique() {
        let source = UuidTokenSource;
        let a = source.mint();
        let b = source.mint();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
