use crate::{MarketDomain, OfferOrder, OrderSignature, SellOrder, SigningError};
use alloy::{
    primitives::{Address, B256},
    signers::Signer,
};

/// Sign a digest, producing the packed 65-byte form.
async fn sign_digest<S: Signer>(
    digest: &B256,
    signer: &S,
) -> Result<OrderSignature, SigningError> {
    let signature = signer.sign_hash(digest).await?;
    Ok(signature.into())
}

/// Ensure the signer is the party the order names.
fn ensure_party<S: Signer>(expected: Address, signer: &S) -> Result<(), SigningError> {
    let actual = signer.address();
    if actual != expected {
        return Err(SigningError::WrongSigner { expected, actual });
    }
    Ok(())
}

impl SellOrder {
    /// Sign the listing as its seller.
    pub async fn sign<S: Signer>(
        &self,
        domain: &MarketDomain,
        signer: &S,
    ) -> Result<OrderSignature, SigningError> {
        ensure_party(self.seller, signer)?;
        sign_digest(&self.signing_hash(domain), signer).await
    }

    /// Sign the listing as a buyer, authorizing a relayer to settle it on the
    /// buyer's behalf.
    pub async fn sign_purchase<S: Signer>(
        &self,
        domain: &MarketDomain,
        signer: &S,
    ) -> Result<OrderSignature, SigningError> {
        sign_digest(&self.signing_hash(domain), signer).await
    }
}

impl OfferOrder {
    /// Sign the offer as its provider. The signature is bound to the offer
    /// deadline.
    pub async fn sign_offer<S: Signer>(
        &self,
        domain: &MarketDomain,
        signer: &S,
    ) -> Result<OrderSignature, SigningError> {
        ensure_party(self.offer_maker, signer)?;
        sign_digest(&self.maker_signing_hash(domain), signer).await
    }

    /// Sign the offer as the accepting seller. The signature is bound to the
    /// sale deadline.
    pub async fn sign_acceptance<S: Signer>(
        &self,
        domain: &MarketDomain,
        signer: &S,
    ) -> Result<OrderSignature, SigningError> {
        sign_digest(&self.acceptance_signing_hash(domain), signer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::TEST_SIGNERS, AssetId};
    use alloy::primitives::U256;
    use gallery_constants::test_utils::{TEST_MARKET, TEST_NFT, TEST_QUOTE_TOKEN};

    fn domain() -> MarketDomain {
        MarketDomain::from_constants(&TEST_MARKET)
    }

    #[tokio::test]
    async fn seller_signature_recovers_to_seller() {
        let seller = &TEST_SIGNERS[1];
        let order = SellOrder::new(
            seller.address(),
            TEST_QUOTE_TOKEN,
            U256::from(2),
            1_000,
            AssetId::new(TEST_NFT, U256::from(1)),
        );

        let sig = order.sign(&domain(), seller).await.unwrap();
        assert_eq!(sig.recover(&order.signing_hash(&domain())).unwrap(), seller.address());
    }

    #[tokio::test]
    async fn sell_rejects_wrong_signer() {
        let order = SellOrder::new(
            TEST_SIGNERS[1].address(),
            TEST_QUOTE_TOKEN,
            U256::from(2),
            1_000,
            AssetId::new(TEST_NFT, U256::from(1)),
        );

        let err = order.sign(&domain(), &TEST_SIGNERS[2]).await.unwrap_err();
        assert!(matches!(
            err,
            SigningError::WrongSigner { expected, actual }
                if expected == TEST_SIGNERS[1].address() && actual == TEST_SIGNERS[2].address()
        ));

        // Buyers sign the same digest without being the named party.
        let sig = order.sign_purchase(&domain(), &TEST_SIGNERS[2]).await.unwrap();
        assert_eq!(
            sig.recover(&order.signing_hash(&domain())).unwrap(),
            TEST_SIGNERS[2].address()
        );
    }

    #[tokio::test]
    async fn offer_signatures_bind_their_deadlines() {
        let maker = &TEST_SIGNERS[2];
        let seller = &TEST_SIGNERS[1];
        let offer = OfferOrder::new(
            maker.address(),
            TEST_QUOTE_TOKEN,
            U256::from(3),
            1_000,
            2_000,
            AssetId::new(TEST_NFT, U256::from(2)),
        );

        let maker_sig = offer.sign_offer(&domain(), maker).await.unwrap();
        let seller_sig = offer.sign_acceptance(&domain(), seller).await.unwrap();

        let maker_digest = offer.maker_signing_hash(&domain());
        let acceptance_digest = offer.acceptance_signing_hash(&domain());

        assert_eq!(maker_sig.recover(&maker_digest).unwrap(), maker.address());
        assert_eq!(seller_sig.recover(&acceptance_digest).unwrap(), seller.address());
        assert_ne!(maker_sig.recover(&acceptance_digest).unwrap(), maker.address());

        assert!(offer.sign_offer(&domain(), seller).await.is_err());
    }
}
