use crate::RegistryError;
use alloy::primitives::Address;
use parking_lot::RwLock;
use std::{collections::HashSet, sync::Arc};
use tracing::debug;

/// The allow-list of quote tokens orders may be priced in.
///
/// Cloning the registry produces another handle to the same list. Only the
/// operator can add tokens, and tokens are never removed.
#[derive(Debug, Clone)]
pub struct QuoteTokenRegistry {
    operator: Address,
    tokens: Arc<RwLock<HashSet<Address>>>,
}

impl QuoteTokenRegistry {
    /// Create an empty registry managed by `operator`.
    pub fn new(operator: Address) -> Self {
        Self { operator, tokens: Default::default() }
    }

    /// Get the operator.
    pub const fn operator(&self) -> Address {
        self.operator
    }

    /// Add a token to the allow-list.
    ///
    /// Returns `true` if the token was newly added. Adding a listed token
    /// again is a no-op.
    pub fn add_quote_token(&self, caller: Address, token: Address) -> Result<bool, RegistryError> {
        if caller != self.operator {
            return Err(RegistryError::NotOperator { caller, operator: self.operator });
        }

        let added = self.tokens.write().insert(token);
        if added {
            debug!(%token, "quote token added");
        }
        Ok(added)
    }

    /// True if orders may be priced in `token`.
    pub fn is_allowed(&self, token: Address) -> bool {
        self.tokens.read().contains(&token)
    }

    /// A snapshot of the allowed tokens.
    pub fn tokens(&self) -> Vec<Address> {
        self.tokens.read().iter().copied().collect()
    }

    /// The number of allowed tokens.
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    /// True if no token is allowed.
    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_constants::test_utils::{TEST_OPERATOR, TEST_QUOTE_TOKEN, TEST_UNLISTED_TOKEN};

    #[test]
    fn operator_adds_tokens() {
        let registry = QuoteTokenRegistry::new(TEST_OPERATOR);
        assert!(registry.is_empty());
        assert!(!registry.is_allowed(TEST_QUOTE_TOKEN));

        assert_eq!(registry.add_quote_token(TEST_OPERATOR, TEST_QUOTE_TOKEN), Ok(true));
        assert!(registry.is_allowed(TEST_QUOTE_TOKEN));
        assert!(!registry.is_allowed(TEST_UNLISTED_TOKEN));
        assert_eq!(registry.tokens(), vec![TEST_QUOTE_TOKEN]);
    }

    #[test]
    fn adding_twice_is_a_noop() {
        let registry = QuoteTokenRegistry::new(TEST_OPERATOR);
        assert_eq!(registry.add_quote_token(TEST_OPERATOR, TEST_QUOTE_TOKEN), Ok(true));
        assert_eq!(registry.add_quote_token(TEST_OPERATOR, TEST_QUOTE_TOKEN), Ok(false));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn only_operator_adds() {
        let registry = QuoteTokenRegistry::new(TEST_OPERATOR);
        let caller = Address::repeat_byte(0xbb);

        assert_eq!(
            registry.add_quote_token(caller, TEST_QUOTE_TOKEN),
            Err(RegistryError::NotOperator { caller, operator: TEST_OPERATOR })
        );
        assert!(!registry.is_allowed(TEST_QUOTE_TOKEN));
    }

    #[test]
    fn clones_share_the_list() {
        let registry = QuoteTokenRegistry::new(TEST_OPERATOR);
        let handle = registry.clone();

        registry.add_quote_token(TEST_OPERATOR, TEST_QUOTE_TOKEN).unwrap();
        assert!(handle.is_allowed(TEST_QUOTE_TOKEN));
    }
}
