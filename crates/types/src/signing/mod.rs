mod error;
pub use error::{SignatureError, SigningError};

mod order;

mod signature;
pub use signature::{OrderSignature, SignaturePair};

use alloy::{
    primitives::{keccak256, Address, B256, U256},
    sol_types::Eip712Domain,
};
use gallery_constants::MarketConstants;
use std::{borrow::Cow, sync::OnceLock};

/// The EIP-712 domain of a gallery settlement contract.
///
/// Binds signatures to one protocol name and version, one chain and one
/// settlement contract. The separator is computed once and cached.
#[derive(Debug, Clone)]
pub struct MarketDomain {
    domain: Eip712Domain,
    chain_id: u64,
    verifying_contract: Address,

    separator: OnceLock<B256>,
}

impl PartialEq for MarketDomain {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain
    }
}

impl Eq for MarketDomain {}

impl MarketDomain {
    /// Create the domain for the given protocol name, version, chain and
    /// settlement contract.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        version: impl Into<Cow<'static, str>>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        let domain = Eip712Domain {
            name: Some(name.into()),
            version: Some(version.into()),
            chain_id: Some(U256::from(chain_id)),
            verifying_contract: Some(verifying_contract),
            salt: None,
        };
        Self { domain, chain_id, verifying_contract, separator: OnceLock::new() }
    }

    /// Create the domain of the settlement contract described by the
    /// constants.
    pub fn from_constants(constants: &MarketConstants) -> Self {
        Self::new(
            constants.name().to_owned(),
            constants.version().to_owned(),
            constants.chain_id(),
            constants.market(),
        )
    }

    /// Get the underlying EIP-712 domain.
    pub const fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Get the chain id.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the settlement contract address.
    pub const fn verifying_contract(&self) -> Address {
        self.verifying_contract
    }

    /// Get the domain separator, i.e. `hashStruct(EIP712Domain)`.
    pub fn separator(&self) -> B256 {
        *self.separator.get_or_init(|| self.domain.hash_struct())
    }

    /// Combine a struct hash with the domain separator, producing the digest
    /// a party signs.
    ///
    /// # Composition
    ///
    /// `keccak256(0x19 ‖ 0x01 ‖ separator ‖ struct_hash)`
    pub fn signing_hash(&self, struct_hash: B256) -> B256 {
        // 2 + 32 + 32 bytes
        let mut buf = [0u8; 66];
        buf[0] = 0x19;
        buf[1] = 0x01;
        buf[2..34].copy_from_slice(self.separator().as_slice());
        buf[34..].copy_from_slice(struct_hash.as_slice());
        keccak256(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetId, SellOrder};
    use alloy::{primitives::b256, sol_types::SolStruct};
    use gallery_constants::test_utils::{
        TEST_CHAIN_ID, TEST_MARKET, TEST_MARKET_ADDRESS, TEST_NFT, TEST_OTHER_CONTRACT,
        TEST_QUOTE_TOKEN,
    };

    fn vector_order() -> SellOrder {
        SellOrder::new(
            Address::repeat_byte(0x01),
            TEST_QUOTE_TOKEN,
            U256::from(2),
            1_000,
            AssetId::new(TEST_NFT, U256::from(1)),
        )
    }

    /// The separator must remain stable, off-chain signers reproduce it
    /// independently.
    #[test]
    fn test_domain_separator() {
        let domain = MarketDomain::from_constants(&TEST_MARKET);
        assert_eq!(
            domain.separator(),
            b256!("0xbf77c930ddeab8965116766955551998adf0616ab7870fe277423f61f52f9259")
        );
        assert_eq!(domain.separator(), domain.domain().hash_struct());
        assert_eq!(domain.chain_id(), TEST_CHAIN_ID);
        assert_eq!(domain.verifying_contract(), TEST_MARKET_ADDRESS);
    }

    #[test]
    fn direct_sell_signing_hash_vector() {
        let domain = MarketDomain::from_constants(&TEST_MARKET);
        let order = vector_order();

        assert_eq!(
            order.struct_hash(),
            b256!("0x858fcbba4aa19baa5ccca9bdc5d5d308b4e29410fb406667bfe0c60453ab6cfa")
        );
        assert_eq!(
            order.signing_hash(&domain),
            b256!("0xb9a9a69ce1fd8941527f3b6b003aa47be6c3d74aa5d73f5998a6568983b51199")
        );
    }

    #[test]
    fn signing_hash_matches_eip712() {
        let domain = MarketDomain::from_constants(&TEST_MARKET);
        let order = vector_order();

        assert_eq!(
            order.signing_hash(&domain),
            order.as_struct().eip712_signing_hash(domain.domain())
        );
    }

    #[test]
    fn separator_is_scoped() {
        let base = MarketDomain::from_constants(&TEST_MARKET);
        let other_contract =
            MarketDomain::new("NFTGallery721", "1", TEST_CHAIN_ID, TEST_OTHER_CONTRACT);
        let other_chain = MarketDomain::new("NFTGallery721", "1", 1, TEST_MARKET_ADDRESS);
        let other_version =
            MarketDomain::new("NFTGallery721", "2", TEST_CHAIN_ID, TEST_MARKET_ADDRESS);
        let other_name = MarketDomain::new("Gallery", "1", TEST_CHAIN_ID, TEST_MARKET_ADDRESS);

        for other in [other_contract, other_chain, other_version, other_name] {
            assert_ne!(base.separator(), other.separator());
            assert_ne!(base, other);
        }

        let same = MarketDomain::new("NFTGallery721", "1", TEST_CHAIN_ID, TEST_MARKET_ADDRESS);
        assert_eq!(base, same);
        assert_eq!(base.separator(), same.separator());
    }
}
